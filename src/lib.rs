//! Thermostat controller library.
//!
//! Three-mode (OFF / HEAT / COOL) controller with a 16×2 status display,
//! two PWM status indicators and a periodic UART telegram.  Domain logic
//! lives behind the port traits in [`app::ports`]; hardware and host
//! adapters plug in from [`adapters`], [`drivers`] and [`sensors`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod sensors;

pub use error::{Error, Result};
