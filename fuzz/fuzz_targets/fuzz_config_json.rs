//! Fuzz target: `ThermostatConfig` JSON parsing + validation
//!
//! Feeds arbitrary bytes through the same path `JsonConfigFile::load` uses
//! and checks:
//! - No panics under any byte sequence
//! - A config that validates can drive the tick schedule without panicking
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermostat::config::ThermostatConfig;
use thermostat::scheduler::TickSchedule;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = serde_json::from_str::<ThermostatConfig>(text) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    let mut schedule = TickSchedule::from_config(&config);
    for _ in 0..64 {
        let plan = schedule.next_tick();
        assert!(plan.tick <= 64);
    }
});
