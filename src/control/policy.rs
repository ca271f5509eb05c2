//! Indicator policy.
//!
//! | Mode | Heat channel                  | Cool channel                  |
//! |------|-------------------------------|-------------------------------|
//! | Off  | off                           | off                           |
//! | Heat | pulsing if temp < sp, else on | off                           |
//! | Cool | off                           | pulsing if temp > sp, else on |
//!
//! Comparisons are strict: a temperature equal to the setpoint counts as
//! satisfied and shows solid in both modes.

use crate::fsm::Mode;

/// Instruction for one indicator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorCommand {
    #[default]
    Off,
    /// Fully on: the target is satisfied.
    Solid,
    /// Fading in and out: the system is working toward the setpoint.
    Pulsing,
}

/// Instructions for both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorCommands {
    pub heat: IndicatorCommand,
    pub cool: IndicatorCommand,
}

impl IndicatorCommands {
    /// Both channels off.
    pub const fn all_off() -> Self {
        Self {
            heat: IndicatorCommand::Off,
            cool: IndicatorCommand::Off,
        }
    }
}

/// Evaluate the policy.  Pure; no I/O.
pub fn evaluate(mode: Mode, temperature: i32, setpoint: i32) -> IndicatorCommands {
    match mode {
        Mode::Off => IndicatorCommands::all_off(),
        Mode::Heat => IndicatorCommands {
            heat: if temperature < setpoint {
                IndicatorCommand::Pulsing
            } else {
                IndicatorCommand::Solid
            },
            cool: IndicatorCommand::Off,
        },
        Mode::Cool => IndicatorCommands {
            heat: IndicatorCommand::Off,
            cool: if temperature > setpoint {
                IndicatorCommand::Pulsing
            } else {
                IndicatorCommand::Solid
            },
        },
    }
}
