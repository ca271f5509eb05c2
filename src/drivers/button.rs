//! Polled, debounced push buttons.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  The poller calls
//! [`ButtonPanel::poll`] every few milliseconds; each button runs a small
//! debounce state machine and reports one press per falling edge that
//! stays low for [`DEBOUNCE_MS`].
//!
//! | Button | Event                               |
//! |--------|-------------------------------------|
//! | Green  | [`InputEvent::CycleMode`]           |
//! | Red    | [`InputEvent::IncreaseSetpoint`]    |
//! | Blue   | [`InputEvent::DecreaseSetpoint`]    |

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::commands::InputEvent;

pub const DEBOUNCE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    Released,
    Settling { since_ms: u32 },
    Held,
}

pub struct DebouncedButton<P> {
    pin: P,
    state: EdgeState,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: EdgeState::Released,
        }
    }

    /// Sample the pin.  Returns `true` once per debounced press.
    /// `now_ms` is monotonic milliseconds; wrap-around is tolerated.
    pub fn poll(&mut self, now_ms: u32) -> Result<bool, P::Error> {
        let low = self.pin.is_low()?;
        let (next, pressed) = match self.state {
            EdgeState::Released if low => (EdgeState::Settling { since_ms: now_ms }, false),
            EdgeState::Released => (EdgeState::Released, false),
            EdgeState::Settling { .. } if !low => (EdgeState::Released, false),
            EdgeState::Settling { since_ms } if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS => {
                (EdgeState::Held, true)
            }
            settling @ EdgeState::Settling { .. } => (settling, false),
            EdgeState::Held if !low => (EdgeState::Released, false),
            EdgeState::Held => (EdgeState::Held, false),
        };
        self.state = next;
        Ok(pressed)
    }

    pub fn is_held(&self) -> bool {
        self.state == EdgeState::Held
    }
}

/// The three front-panel buttons.
pub struct ButtonPanel<P> {
    buttons: [(DebouncedButton<P>, InputEvent); 3],
}

impl<P: InputPin> ButtonPanel<P> {
    pub fn new(green: P, red: P, blue: P) -> Self {
        Self {
            buttons: [
                (DebouncedButton::new(green), InputEvent::CycleMode),
                (DebouncedButton::new(red), InputEvent::IncreaseSetpoint),
                (DebouncedButton::new(blue), InputEvent::DecreaseSetpoint),
            ],
        }
    }

    /// Poll every button and report presses.  A failed pin read is logged
    /// and skipped for this round.
    pub fn poll(&mut self, now_ms: u32, mut on_press: impl FnMut(InputEvent)) {
        for (button, event) in &mut self.buttons {
            match button.poll(now_ms) {
                Ok(true) => on_press(*event),
                Ok(false) => {}
                Err(_) => warn!("Button read failed for {}", event.name()),
            }
        }
    }
}
