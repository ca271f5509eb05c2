//! System configuration parameters
//!
//! All tunable timing and I/O parameters for the thermostat.  Values come
//! from a JSON file through [`ConfigPort`](crate::app::ports::ConfigPort);
//! missing fields fall back to the defaults below.
//!
//! The setpoint range and its power-on value are fixed by the control
//! policy and live in [`crate::app::controller`], not here.

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort, FADE_MAX_MS};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    // --- Timing ---
    /// Refresh tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// Consecutive ticks each line-2 view is shown; the indicator refresh
    /// window is twice this
    pub view_ticks: u32,
    /// Ticks between status telegrams
    pub telegram_interval_ticks: u32,

    // --- Indicators ---
    /// Pulse ramp-up duration (milliseconds)
    pub pulse_fade_in_ms: u32,
    /// Pulse ramp-down duration (milliseconds)
    pub pulse_fade_out_ms: u32,
    /// Indicator animation frame period (milliseconds)
    pub indicator_frame_ms: u32,

    // --- Serial ---
    /// Telegram serial device, e.g. `/dev/ttyS0`.  `None` logs telegrams only.
    pub serial_port: Option<String>,
    /// Telegram baud rate
    pub baud_rate: u32,

    // --- Diagnostics ---
    /// Raise the default log level to `debug`
    pub debug: bool,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 1000,      // 1 Hz
            view_ticks: 5,               // 5 s per view, 10 s window
            telegram_interval_ticks: 30, // every 30 s

            // Indicators
            pulse_fade_in_ms: 800,
            pulse_fade_out_ms: 800,
            indicator_frame_ms: 20, // 50 Hz

            // Serial
            serial_port: None,
            baud_rate: 115_200,

            debug: false,
        }
    }
}

impl ThermostatConfig {
    /// Load through `port`, or fall back to defaults when nothing is
    /// stored.  The flag is `true` when stored values were used.
    pub fn load_or_default(port: &impl ConfigPort) -> crate::Result<(Self, bool)> {
        match port.load() {
            Ok(config) => Ok((config, true)),
            Err(ConfigError::NotFound) => Ok((Self::default(), false)),
            Err(e) => Err(e.into()),
        }
    }

    /// Reject values the refresh loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.view_ticks == 0 {
            return Err(ConfigError::ValidationFailed("view_ticks must be > 0"));
        }
        if self.telegram_interval_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "telegram_interval_ticks must be > 0",
            ));
        }
        if self.pulse_fade_in_ms == 0 || self.pulse_fade_out_ms == 0 {
            return Err(ConfigError::ValidationFailed("pulse fades must be > 0"));
        }
        if self.pulse_fade_in_ms > FADE_MAX_MS || self.pulse_fade_out_ms > FADE_MAX_MS {
            return Err(ConfigError::ValidationFailed(
                "pulse fades must be <= 60000 ms",
            ));
        }
        if self.indicator_frame_ms == 0 {
            return Err(ConfigError::ValidationFailed("indicator_frame_ms must be > 0"));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be > 0"));
        }
        Ok(())
    }
}
