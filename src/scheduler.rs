//! Tick cadence engine for the refresh cycle.
//!
//! One 1-based tick counter drives three independent periods:
//!
//! ```text
//!  tick      1 2 3 4 5 6 7 8 9 10 11 ... 20 ... 30
//!  line 2    T T T T T M M M M M  T      M      M
//!  lights                      ▲          ▲      ▲
//!  telegram                                      ▲
//! ```
//!
//! - line 2 shows the temperature view for `view_ticks` ticks, then the
//!   mode/setpoint view for `view_ticks` ticks;
//! - the indicator policy re-runs once at the end of each window
//!   (`2 · view_ticks`);
//! - a telegram goes out every `telegram_interval_ticks`.

use crate::app::render::LineTwoView;
use crate::config::ThermostatConfig;

/// What the refresh cycle must do on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    /// 1-based tick number.
    pub tick: u64,
    pub view: LineTwoView,
    /// Re-run the indicator policy after rendering.
    pub refresh_indicators: bool,
    pub send_telegram: bool,
}

/// Counts ticks and decides each tick's work.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    view_ticks: u64,
    telegram_interval: u64,
    tick: u64,
}

impl TickSchedule {
    /// Zero periods are raised to 1.
    pub fn new(view_ticks: u32, telegram_interval_ticks: u32) -> Self {
        Self {
            view_ticks: u64::from(view_ticks.max(1)),
            telegram_interval: u64::from(telegram_interval_ticks.max(1)),
            tick: 0,
        }
    }

    pub fn from_config(config: &ThermostatConfig) -> Self {
        Self::new(config.view_ticks, config.telegram_interval_ticks)
    }

    /// Ticks in one indicator window.
    pub fn window_ticks(&self) -> u64 {
        self.view_ticks * 2
    }

    /// Ticks planned so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Advance one tick and return its plan.
    pub fn next_tick(&mut self) -> TickPlan {
        self.tick += 1;
        let n = self.tick;
        let window = self.window_ticks();

        let view = if (n - 1) % window < self.view_ticks {
            LineTwoView::Temperature
        } else {
            LineTwoView::ModeSetpoint
        };

        TickPlan {
            tick: n,
            view,
            refresh_indicators: n % window == 0,
            send_telegram: n % self.telegram_interval == 0,
        }
    }
}
