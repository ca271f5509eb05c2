//! Wall-clock adapter.
//!
//! Implements [`ClockPort`] with the host's local time zone via `chrono`.

use chrono::{Local, NaiveDateTime};

use crate::app::ports::ClockPort;

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl LocalClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
