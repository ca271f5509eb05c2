//! Unified error types for the thermostat.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! refresh loop's error handling uniform.  All variants are `Copy` so they
//! can be logged and passed around without allocation.
//!
//! Setpoint range violations are not errors: adjustments clamp.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature sensor could not be read.
    Sensor(SensorError),
    /// The display sink rejected a write or teardown.
    Display(DisplayError),
    /// The telegram transport failed.
    Comms(CommsError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C bus transaction failed.
    BusFailed,
    /// The sensor stayed busy past the measurement deadline.
    Timeout,
    /// The sensor reports it is not calibrated.
    NotCalibrated,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFailed => write!(f, "I2C transaction failed"),
            Self::Timeout => write!(f, "measurement timed out"),
            Self::NotCalibrated => write!(f, "sensor not calibrated"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Writing a line to the panel failed.
    WriteFailed,
    /// The panel has already been torn down.
    Released,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::Released => write!(f, "display released"),
        }
    }
}

impl std::error::Error for DisplayError {}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The serial port could not be opened.
    OpenFailed,
    /// Writing the telegram failed or timed out.
    WriteFailed,
    /// Fewer bytes than the telegram length were accepted.
    ShortWrite,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "serial open failed"),
            Self::WriteFailed => write!(f, "serial write failed"),
            Self::ShortWrite => write!(f, "serial short write"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
