//! Application core: domain logic behind port traits.
//!
//! This module contains the thermostat's rules: the mode FSM wiring,
//! setpoint handling, the indicator policy hook-up, display rendering and
//! the periodic refresh cycle.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod controller;
pub mod dispatch;
pub mod ports;
pub mod refresh;
pub mod render;
