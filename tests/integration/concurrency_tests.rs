//! Racing input and refresh threads against one shared controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use thermostat::app::commands::InputEvent;
use thermostat::app::controller::{Controller, ControllerState, SETPOINT_DEFAULT, SETPOINT_MAX};
use thermostat::app::dispatch::{InputDispatcher, InputQueue};
use thermostat::app::ports::{Channel, IndicatorOutput, PulseTiming};
use thermostat::app::refresh::RefreshCycle;
use thermostat::config::ThermostatConfig;
use thermostat::control::policy;
use thermostat::fsm::Mode;

use crate::mock_hw::{FixedClock, MockDisplay, MockIndicators, MockSensor, MockWire};

fn shared(temperature: i32) -> Arc<Controller<MockIndicators>> {
    Arc::new(Controller::new(
        MockIndicators::new(),
        PulseTiming::default(),
        temperature,
    ))
}

#[test]
fn racing_cycle_and_increase_serialize() {
    for _ in 0..200 {
        let c = shared(70);
        let barrier = Arc::new(Barrier::new(2));

        let a = {
            let (c, barrier) = (c.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                c.cycle_mode();
            })
        };
        let b = {
            let (c, barrier) = (c.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                c.increase_setpoint();
            })
        };
        a.join().unwrap();
        b.join().unwrap();

        let snap = c.snapshot();
        assert_eq!(
            snap.state(),
            ControllerState {
                mode: Mode::Heat,
                setpoint: SETPOINT_DEFAULT + 1
            }
        );
        assert_eq!(
            c.indicator_commands(),
            policy::evaluate(snap.mode, snap.temperature, snap.setpoint)
        );
        assert_eq!(c.with_indicators(|hw| hw.both_lit), 0);
    }
}

#[test]
fn racing_cycle_and_decrease_push_a_serial_sequence() {
    use Channel::{Cool, Heat};
    let pulse = IndicatorOutput::Pulse(PulseTiming::default());
    // Heat at 73 against 72: solid.  Lowering first keeps Heat solid for
    // one push; cycling first starts Cool pulsing at 72.
    let decrease_first = [
        (Cool, IndicatorOutput::Off),
        (Heat, IndicatorOutput::Solid),
        (Heat, IndicatorOutput::Off),
        (Cool, IndicatorOutput::Off),
        (Heat, IndicatorOutput::Off),
        (Cool, pulse),
    ];
    let cycle_first = [
        (Heat, IndicatorOutput::Off),
        (Cool, IndicatorOutput::Off),
        (Heat, IndicatorOutput::Off),
        (Cool, pulse),
        (Heat, IndicatorOutput::Off),
        (Cool, pulse),
    ];

    for _ in 0..200 {
        let c = shared(SETPOINT_DEFAULT + 1);
        c.cycle_mode();
        assert_eq!(c.indicator_commands().heat, policy::IndicatorCommand::Solid);
        let start = c.with_indicators(|hw| hw.calls.len());
        let barrier = Arc::new(Barrier::new(2));

        let a = {
            let (c, barrier) = (c.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                c.cycle_mode();
            })
        };
        let b = {
            let (c, barrier) = (c.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                c.decrease_setpoint();
            })
        };
        a.join().unwrap();
        b.join().unwrap();

        assert_eq!(
            c.state(),
            ControllerState {
                mode: Mode::Cool,
                setpoint: SETPOINT_DEFAULT - 1
            }
        );
        c.with_indicators(|hw| {
            let pushed = &hw.calls[start..];
            assert!(
                pushed == decrease_first || pushed == cycle_first,
                "interleaved pushes: {pushed:?}"
            );
            assert_eq!(hw.output(Cool), pulse);
            assert_eq!(hw.output(Heat), IndicatorOutput::Off);
            assert_eq!(hw.both_lit, 0);
        });
    }
}

#[test]
fn many_threads_end_in_a_serial_outcome() {
    const THREADS: usize = 6;
    const CYCLES: usize = 20;
    const INCREASES: i32 = 5;

    let c = shared(68);
    let barrier = Arc::new(Barrier::new(THREADS));
    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let (c, barrier) = (c.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                for i in 0..CYCLES {
                    c.cycle_mode();
                    if (i as i32) < INCREASES {
                        c.increase_setpoint();
                    }
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    let total_cycles = THREADS * CYCLES;
    let state = c.state();
    assert_eq!(state.mode, Mode::CYCLE[total_cycles % Mode::COUNT]);
    assert_eq!(
        state.setpoint,
        (SETPOINT_DEFAULT + THREADS as i32 * INCREASES).min(SETPOINT_MAX)
    );
    assert_eq!(c.with_indicators(|hw| hw.both_lit), 0);
}

#[test]
fn input_during_refresh_keeps_indicators_consistent() {
    let c = shared(70);
    let sensor = MockSensor::new(70.0);
    let shutdown = Arc::new(AtomicBool::new(false));
    let config = ThermostatConfig {
        tick_interval_ms: 1,
        view_ticks: 1,
        ..ThermostatConfig::default()
    };
    let refresh = RefreshCycle::new(
        c.clone(),
        sensor.clone(),
        MockDisplay::new(),
        MockWire::new(),
        FixedClock::default(),
        &config,
        shutdown.clone(),
    );
    let refresh_thread = thread::spawn(move || refresh.run());

    let queue = Arc::new(InputQueue::new());
    let dispatcher = InputDispatcher::new(queue.clone(), c.clone());
    let dispatch_thread = thread::spawn(move || dispatcher.run());

    for i in 0..63 {
        sensor.set(60.0 + (i % 20) as f32);
        let event = match i % 3 {
            0 => InputEvent::CycleMode,
            1 => InputEvent::IncreaseSetpoint,
            _ => InputEvent::DecreaseSetpoint,
        };
        while !queue.press(event) {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(1));
    }

    queue.stop();
    let handled = dispatch_thread.join().unwrap();
    shutdown.store(true, Ordering::Release);
    let stats = refresh_thread.join().unwrap();

    assert_eq!(handled, 63);
    assert!(stats.ticks > 0);
    assert_eq!(c.with_indicators(|hw| hw.both_lit), 0);
    assert!(c.with_indicators(MockIndicators::all_off));
    // 21 of each event: mode back to Off, setpoint unchanged.
    assert_eq!(c.state(), ControllerState::default());
}
