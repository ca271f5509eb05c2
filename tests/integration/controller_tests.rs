//! Integration tests for the controller core: mode cycling, setpoint
//! clamping, indicator policy and the heat/cool hand-over ordering.

use thermostat::app::commands::InputEvent;
use thermostat::app::controller::{
    Controller, ControllerState, SETPOINT_DEFAULT, SETPOINT_MAX, SETPOINT_MIN,
};
use thermostat::app::ports::{Channel, IndicatorOutput, PulseTiming};
use thermostat::control::policy::{IndicatorCommand, IndicatorCommands};
use thermostat::fsm::Mode;

use crate::mock_hw::MockIndicators;

fn make(temperature: i32) -> Controller<MockIndicators> {
    Controller::new(MockIndicators::new(), PulseTiming::new(500, 700), temperature)
}

#[test]
fn power_on_state() {
    let c = make(70);
    assert_eq!(c.state(), ControllerState::default());
    assert_eq!(c.state().setpoint, SETPOINT_DEFAULT);
    assert!(c.with_indicators(MockIndicators::all_off));
}

#[test]
fn cycle_order_wraps_every_three() {
    let c = make(70);
    let seen: Vec<Mode> = (0..7).map(|_| c.cycle_mode().mode).collect();
    assert_eq!(
        seen,
        vec![
            Mode::Heat,
            Mode::Cool,
            Mode::Off,
            Mode::Heat,
            Mode::Cool,
            Mode::Off,
            Mode::Heat
        ]
    );
}

#[test]
fn heating_below_setpoint_pulses_with_configured_fades() {
    let c = make(65);
    c.cycle_mode();
    c.with_indicators(|hw| {
        assert_eq!(
            hw.output(Channel::Heat),
            IndicatorOutput::Pulse(PulseTiming::new(500, 700))
        );
        assert_eq!(hw.output(Channel::Cool), IndicatorOutput::Off);
    });
}

#[test]
fn heating_at_or_above_setpoint_is_solid() {
    for t in [72, 80] {
        let c = make(t);
        c.cycle_mode();
        assert_eq!(
            c.indicator_commands(),
            IndicatorCommands {
                heat: IndicatorCommand::Solid,
                cool: IndicatorCommand::Off
            },
            "temperature {t}"
        );
    }
}

#[test]
fn cooling_above_setpoint_pulses() {
    let c = make(75);
    c.cycle_mode();
    c.cycle_mode();
    for _ in 0..2 {
        c.decrease_setpoint();
    }
    assert_eq!(c.state().setpoint, 70);
    assert_eq!(c.indicator_commands().cool, IndicatorCommand::Pulsing);
    assert_eq!(c.indicator_commands().heat, IndicatorCommand::Off);
}

#[test]
fn off_mode_keeps_both_channels_dark() {
    let c = make(20);
    for _ in 0..3 {
        c.cycle_mode();
    }
    assert_eq!(c.state().mode, Mode::Off);
    c.increase_setpoint();
    assert!(c.with_indicators(MockIndicators::all_off));
}

#[test]
fn never_two_channels_lit_across_full_cycles() {
    let c = make(60);
    for _ in 0..9 {
        c.cycle_mode();
        c.increase_setpoint();
        c.decrease_setpoint();
    }
    assert_eq!(c.with_indicators(|hw| hw.both_lit), 0);
}

#[test]
fn leaving_cool_darkens_cool_channel() {
    let c = make(80);
    c.cycle_mode();
    c.cycle_mode();
    let start = c.with_indicators(|hw| hw.calls.len());
    c.cycle_mode();
    c.with_indicators(|hw| {
        let first_cool = hw.calls[start..].iter().find(|(ch, _)| *ch == Channel::Cool);
        assert_eq!(first_cool, Some(&(Channel::Cool, IndicatorOutput::Off)));
        assert!(hw.all_off());
    });
}

#[test]
fn setpoint_clamps_without_error() {
    let c = make(70);
    for _ in 0..(SETPOINT_MAX - SETPOINT_DEFAULT + 5) {
        c.handle(InputEvent::IncreaseSetpoint);
    }
    assert_eq!(c.state().setpoint, SETPOINT_MAX);
    for _ in 0..(SETPOINT_MAX - SETPOINT_MIN + 5) {
        c.handle(InputEvent::DecreaseSetpoint);
    }
    assert_eq!(c.state().setpoint, SETPOINT_MIN);
}

#[test]
fn every_input_re_evaluates_synchronously() {
    let c = make(70);
    let before = c.evaluations();
    c.cycle_mode();
    c.increase_setpoint();
    c.decrease_setpoint();
    assert_eq!(c.evaluations(), before + 3);
}

#[test]
fn shutdown_from_any_mode_leaves_indicators_off() {
    for cycles in 0..3 {
        let c = make(50);
        for _ in 0..cycles {
            c.cycle_mode();
        }
        c.shutdown();
        assert!(c.with_indicators(MockIndicators::all_off), "after {cycles} cycles");
        c.cycle_mode();
        c.increase_setpoint();
        assert!(c.with_indicators(MockIndicators::all_off));
    }
}
