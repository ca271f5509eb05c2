//! Text rendering for the 16×2 display and the serial telegram.
//!
//! Everything here is pure and allocation-free: lines are
//! `heapless::String`s of exactly [`LINE_WIDTH`] characters.  Width is
//! counted in `char`s, so each line reserves room for four UTF-8 bytes per
//! column.

use core::fmt::{self, Write};

use chrono::NaiveDateTime;

use super::controller::Snapshot;
use crate::fsm::Mode;

/// Display columns.
pub const LINE_WIDTH: usize = 16;

/// Bytes reserved for one display line.
pub const LINE_CAPACITY: usize = LINE_WIDTH * 4;

/// Widest telegram: `"COOL,-2147483648,-2147483648\n"`.
pub const TELEGRAM_CAPACITY: usize = 32;

/// One display line.
pub type DisplayLine = heapless::String<LINE_CAPACITY>;

/// Encoded status telegram.
pub type Telegram = heapless::String<TELEGRAM_CAPACITY>;

/// Which rendering occupies line 2 on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTwoView {
    /// `Temp: 68F`
    Temperature,
    /// `HEAT SP: 72F`
    ModeSetpoint,
}

/// Writer that keeps the first `LINE_WIDTH` characters and drops the rest.
#[derive(Default)]
struct Truncating {
    line: DisplayLine,
    columns: usize,
}

impl Truncating {
    fn push(&mut self, c: char) -> bool {
        if self.columns == LINE_WIDTH || self.line.push(c).is_err() {
            return false;
        }
        self.columns += 1;
        true
    }
}

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if !self.push(c) {
                break;
            }
        }
        Ok(())
    }
}

/// Truncate or right-pad formatted text to exactly [`LINE_WIDTH`]
/// characters.
pub fn fit(args: fmt::Arguments<'_>) -> DisplayLine {
    let mut w = Truncating::default();
    // Truncating::write_str never fails.
    let _ = w.write_fmt(args);
    while w.push(' ') {}
    w.line
}

/// Line 1: `"MM/DD HH:MM:SS"`, padded.
pub fn date_time_line(now: NaiveDateTime) -> DisplayLine {
    fit(format_args!("{}", now.format("%m/%d %H:%M:%S")))
}

/// Line 2, temperature view.
pub fn temperature_line(temperature: i32) -> DisplayLine {
    fit(format_args!("Temp:{:>3}F", temperature))
}

/// Line 2, mode-and-setpoint view.
pub fn mode_setpoint_line(mode: Mode, setpoint: i32) -> DisplayLine {
    fit(format_args!("{} SP:{:>3}F", mode.name(), setpoint))
}

/// Line 2 for the requested view.
pub fn line_two(view: LineTwoView, snapshot: &Snapshot) -> DisplayLine {
    match view {
        LineTwoView::Temperature => temperature_line(snapshot.temperature),
        LineTwoView::ModeSetpoint => mode_setpoint_line(snapshot.mode, snapshot.setpoint),
    }
}

/// `"<MODE>,<temp>,<setpoint>\n"`, ASCII.
pub fn telegram(snapshot: &Snapshot) -> Telegram {
    let mut out = Telegram::new();
    // TELEGRAM_CAPACITY covers the widest field values.
    let _ = writeln!(
        out,
        "{},{},{}",
        snapshot.mode.name(),
        snapshot.temperature,
        snapshot.setpoint
    );
    out
}
