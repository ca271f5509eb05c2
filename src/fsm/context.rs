//! Context threaded through every FSM hook.
//!
//! Hooks only write indicator commands here.  The controller applies the
//! result to the indicator port after the transition, turning channels
//! off before driving any channel on.

use crate::control::policy::IndicatorCommands;

/// The shared context passed to every state hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsmContext {
    /// Commands to be pushed to the indicator port after the transition.
    pub commands: IndicatorCommands,
}

impl FsmContext {
    /// Context with both channels off.
    pub fn new() -> Self {
        Self::default()
    }
}
