//! Control laws.  The thermostat is on/off only: the policy maps
//! (mode, temperature, setpoint) to indicator instructions.

pub mod policy;
