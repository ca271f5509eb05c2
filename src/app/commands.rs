//! Inbound user-input events.
//!
//! Each event maps one-to-one onto a public controller operation.
//! Adapters (buttons, stdin, tests) produce them; the
//! [`InputDispatcher`](super::dispatch::InputDispatcher) delivers them.

/// Events that input adapters can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Advance OFF → HEAT → COOL → OFF (green button).
    CycleMode,
    /// Setpoint +1 °F (red button).
    IncreaseSetpoint,
    /// Setpoint −1 °F (blue button).
    DecreaseSetpoint,
}

impl InputEvent {
    /// Event source name, as wired by the input dispatch layer.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CycleMode => "cycle-mode",
            Self::IncreaseSetpoint => "increase-setpoint",
            Self::DecreaseSetpoint => "decrease-setpoint",
        }
    }

    /// Look up an event by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cycle-mode" => Some(Self::CycleMode),
            "increase-setpoint" => Some(Self::IncreaseSetpoint),
            "decrease-setpoint" => Some(Self::DecreaseSetpoint),
            _ => None,
        }
    }
}
