//! Sensor drivers.
//!
//! Each driver implements [`TemperaturePort`](crate::app::ports::TemperaturePort)
//! so the refresh cycle never sees bus details.

pub mod aht20;
