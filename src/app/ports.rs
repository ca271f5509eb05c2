//! Port traits: the hexagonal boundary between the controller and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / RefreshCycle (domain)
//! ```
//!
//! Driven adapters (sensor, indicators, display, serial, clock, config)
//! implement these traits.  The domain consumes them via generics, so it
//! never touches hardware directly.

use crate::config::ThermostatConfig;
use crate::error::{CommsError, DisplayError, SensorError};

// ───────────────────────────────────────────────────────────────
// Temperature port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: ambient temperature.
pub trait TemperaturePort {
    /// Current ambient temperature in degrees Fahrenheit.
    fn read_fahrenheit(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One of the two status indicator channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red LED.
    Heat,
    /// Blue LED.
    Cool,
}

impl Channel {
    pub const ALL: [Self; 2] = [Self::Heat, Self::Cool];

    /// Position in per-channel arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Heat => 0,
            Self::Cool => 1,
        }
    }
}

/// Longest accepted fade, either direction (milliseconds).
pub const FADE_MAX_MS: u32 = 60_000;

/// Fade timing of a pulsing indicator.  Each half is clamped to
/// `1..=FADE_MAX_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    fade_in_ms: u32,
    fade_out_ms: u32,
}

impl PulseTiming {
    pub fn new(fade_in_ms: u32, fade_out_ms: u32) -> Self {
        Self {
            fade_in_ms: fade_in_ms.clamp(1, FADE_MAX_MS),
            fade_out_ms: fade_out_ms.clamp(1, FADE_MAX_MS),
        }
    }

    pub fn fade_in_ms(&self) -> u32 {
        self.fade_in_ms
    }

    pub fn fade_out_ms(&self) -> u32 {
        self.fade_out_ms
    }

    /// One full in-and-out cycle.
    pub fn period_ms(&self) -> u32 {
        self.fade_in_ms + self.fade_out_ms
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

/// What a channel should physically do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorOutput {
    #[default]
    Off,
    /// Full brightness.
    Solid,
    /// Repeating fade-in / fade-out.
    Pulse(PulseTiming),
}

/// Write-side port: fire-and-forget indicator instructions.
///
/// Implementations must not block; the controller calls this while
/// holding its state lock.
pub trait IndicatorPort {
    fn drive(&mut self, channel: Channel, output: IndicatorOutput);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → 16×2 character display)
// ───────────────────────────────────────────────────────────────

/// Two-line character display.
pub trait DisplayPort {
    /// Replace both lines.  Each line is exactly
    /// [`LINE_WIDTH`](super::render::LINE_WIDTH) characters.
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;

    /// Clear the panel and release its pins.
    fn teardown(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Telegram port (domain → serial link)
// ───────────────────────────────────────────────────────────────

/// One-directional byte channel for status telegrams.
pub trait TelegramPort {
    fn send(&mut self, telegram: &[u8]) -> Result<(), CommsError>;
}

impl<T: TelegramPort + ?Sized> TelegramPort for Box<T> {
    fn send(&mut self, telegram: &[u8]) -> Result<(), CommsError> {
        (**self).send(telegram)
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for display line 1.
pub trait ClockPort {
    fn now(&self) -> chrono::NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations return [`ConfigError::NotFound`] when no stored config
/// exists so the caller can decide to fall back to defaults.
pub trait ConfigPort {
    fn load(&self) -> Result<ThermostatConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found (first run).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("not found"),
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}
