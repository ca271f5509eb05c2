//! Fuzz target: arbitrary button and temperature sequences
//!
//! Each byte is one step: the low two bits pick an input event (or a
//! temperature sample + indicator refresh), the rest is the temperature.
//! Invariants checked:
//! - Setpoint never leaves [40, 90]
//! - Both indicator channels are never lit at once
//! - Pushed indicator commands always equal the policy for the final state
//!
//! cargo fuzz run fuzz_input_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermostat::app::commands::InputEvent;
use thermostat::app::controller::{Controller, SETPOINT_MAX, SETPOINT_MIN};
use thermostat::app::ports::{Channel, IndicatorOutput, IndicatorPort, PulseTiming};
use thermostat::control::policy;

#[derive(Default)]
struct Watch {
    outputs: [IndicatorOutput; 2],
}

impl IndicatorPort for Watch {
    fn drive(&mut self, channel: Channel, output: IndicatorOutput) {
        self.outputs[channel.index()] = output;
        assert!(
            self.outputs.iter().any(|o| *o == IndicatorOutput::Off),
            "both channels lit"
        );
    }
}

fuzz_target!(|data: &[u8]| {
    let c = Controller::new(Watch::default(), PulseTiming::default(), 70);
    for &byte in data {
        let snap = match byte & 0b11 {
            0 => c.handle(InputEvent::CycleMode),
            1 => c.handle(InputEvent::IncreaseSetpoint),
            2 => c.handle(InputEvent::DecreaseSetpoint),
            _ => {
                c.observe_temperature(i32::from(byte >> 2) + 30);
                c.refresh_indicators();
                c.snapshot()
            }
        };
        assert!((SETPOINT_MIN..=SETPOINT_MAX).contains(&snap.setpoint));
        assert_eq!(
            c.indicator_commands(),
            policy::evaluate(snap.mode, snap.temperature, snap.setpoint)
        );
    }
});
