//! Refresh-cycle integration: display cadence, indicator refresh windows,
//! telegram retries and shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use thermostat::app::controller::Controller;
use thermostat::app::ports::{Channel, IndicatorOutput, PulseTiming};
use thermostat::app::refresh::RefreshCycle;
use thermostat::config::ThermostatConfig;
use thermostat::control::policy::IndicatorCommand;
use thermostat::error::SensorError;

use crate::mock_hw::{FixedClock, MockDisplay, MockIndicators, MockSensor, MockWire};

type Cycle = RefreshCycle<MockIndicators, MockSensor, MockDisplay, MockWire, FixedClock>;

struct Rig {
    controller: Arc<Controller<MockIndicators>>,
    sensor: MockSensor,
    display: MockDisplay,
    wire: MockWire,
    shutdown: Arc<AtomicBool>,
}

impl Rig {
    fn new(fahrenheit: f32) -> Self {
        Self {
            controller: Arc::new(Controller::new(
                MockIndicators::new(),
                PulseTiming::default(),
                0,
            )),
            sensor: MockSensor::new(fahrenheit),
            display: MockDisplay::new(),
            wire: MockWire::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    fn cycle(&self, config: &ThermostatConfig) -> Cycle {
        RefreshCycle::new(
            self.controller.clone(),
            self.sensor.clone(),
            self.display.clone(),
            self.wire.clone(),
            FixedClock::default(),
            config,
            self.shutdown.clone(),
        )
    }
}

#[test]
fn ten_tick_window_alternates_and_evaluates_once() {
    let rig = Rig::new(71.4);
    let mut cycle = rig.cycle(&ThermostatConfig::default());
    cycle.start();
    rig.controller.cycle_mode();
    let base = rig.controller.evaluations();

    for window in 1..=3u64 {
        for _ in 0..10 {
            cycle.tick();
        }
        assert_eq!(rig.controller.evaluations(), base + window);
    }

    let lines = rig.display.line_two();
    assert_eq!(lines.len(), 30);
    for (i, line) in lines.iter().enumerate() {
        let expected = if i % 10 < 5 {
            "Temp: 71F       "
        } else {
            "HEAT SP: 72F    "
        };
        assert_eq!(line, expected, "tick {}", i + 1);
    }
    let log = rig.display.log.lock().unwrap();
    assert!(log.frames.iter().all(|(l1, _)| l1 == "01/15 09:30:00  "));
}

#[test]
fn drift_without_input_reaches_indicators_at_window_end() {
    let rig = Rig::new(75.0);
    let mut cycle = rig.cycle(&ThermostatConfig::default());
    cycle.start();
    rig.controller.cycle_mode();
    rig.controller.cycle_mode();
    assert_eq!(
        rig.controller.indicator_commands().cool,
        IndicatorCommand::Pulsing
    );

    rig.sensor.set(70.0);
    for _ in 0..9 {
        cycle.tick();
    }
    assert_eq!(
        rig.controller.indicator_commands().cool,
        IndicatorCommand::Pulsing
    );
    cycle.tick();
    assert_eq!(
        rig.controller.indicator_commands().cool,
        IndicatorCommand::Solid
    );
    rig.controller.with_indicators(|hw| {
        assert_eq!(hw.output(Channel::Cool), IndicatorOutput::Solid);
    });
}

#[test]
fn failed_telegram_retries_next_period() {
    let rig = Rig::new(68.0);
    let mut cycle = rig.cycle(&ThermostatConfig::default());
    cycle.start();
    rig.controller.cycle_mode();
    rig.wire.fail_next(1);

    for _ in 0..60 {
        cycle.tick();
    }
    assert_eq!(rig.wire.sent(), vec!["HEAT,68,72\n".to_owned()]);
    let stats = cycle.stats();
    assert_eq!(stats.telegram_failures, 1);
    assert_eq!(stats.telegrams_sent, 1);
    assert_eq!(stats.ticks, 60);
}

#[test]
fn telegram_reflects_latest_input() {
    let rig = Rig::new(70.2);
    let mut cycle = rig.cycle(&ThermostatConfig::default());
    cycle.start();
    for _ in 0..29 {
        cycle.tick();
    }
    rig.controller.cycle_mode();
    rig.controller.cycle_mode();
    for _ in 0..4 {
        rig.controller.decrease_setpoint();
    }
    cycle.tick();
    assert_eq!(rig.wire.sent(), vec!["COOL,70,68\n".to_owned()]);
}

#[test]
fn sensor_outage_keeps_showing_last_good_value() {
    let rig = Rig::new(66.9);
    let mut cycle = rig.cycle(&ThermostatConfig::default());
    cycle.start();
    rig.sensor.fail(SensorError::BusFailed);
    for _ in 0..3 {
        cycle.tick();
    }
    assert!(rig.display.line_two().iter().all(|l| l == "Temp: 66F       "));
    assert_eq!(cycle.stats().sensor_failures, 3);

    rig.sensor.set(64.0);
    cycle.tick();
    assert_eq!(rig.display.line_two().last().unwrap(), "Temp: 64F       ");
}

#[test]
fn shutdown_turns_indicators_off_within_one_tick() {
    let rig = Rig::new(60.0);
    rig.controller.cycle_mode();
    let config = ThermostatConfig {
        tick_interval_ms: 10,
        ..ThermostatConfig::default()
    };
    let cycle = rig.cycle(&config);
    let worker = thread::spawn(move || cycle.run());

    thread::sleep(Duration::from_millis(35));
    assert!(!rig.controller.with_indicators(MockIndicators::all_off));

    let signalled = Instant::now();
    rig.shutdown.store(true, Ordering::Release);
    let stats = worker.join().unwrap();

    assert!(signalled.elapsed() < Duration::from_millis(500));
    assert!(stats.ticks >= 1);
    assert!(rig.controller.is_stopped());
    assert!(rig.controller.with_indicators(MockIndicators::all_off));
    assert_eq!(rig.display.log.lock().unwrap().teardowns, 1);
}

#[test]
fn teardown_failure_is_swallowed() {
    let mut rig = Rig::new(60.0);
    rig.display.fail_teardown = true;
    rig.shutdown.store(true, Ordering::Release);
    let cycle = rig.cycle(&ThermostatConfig::default());
    let stats = cycle.run();
    assert_eq!(stats.ticks, 0);
    assert!(rig.controller.with_indicators(MockIndicators::all_off));
    assert_eq!(rig.display.log.lock().unwrap().teardowns, 1);
}
