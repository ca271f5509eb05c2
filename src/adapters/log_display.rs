//! Log-backed display adapter.
//!
//! Implements [`DisplayPort`] by writing both lines to the logger.  Stands
//! in for the 16×2 character panel on hosts without one; a panel driver
//! would implement the same trait.

use log::info;

use crate::app::ports::DisplayPort;
use crate::app::render::{DisplayLine, LINE_WIDTH};
use crate::error::DisplayError;

/// Adapter that logs every frame to the console.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: Option<(DisplayLine, DisplayLine)>,
    released: bool,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame shown, if any.
    pub fn last_frame(&self) -> Option<(&str, &str)> {
        self.last.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        if self.released {
            return Err(DisplayError::Released);
        }
        if line1.chars().count() > LINE_WIDTH || line2.chars().count() > LINE_WIDTH {
            return Err(DisplayError::WriteFailed);
        }
        let mut frame = (DisplayLine::new(), DisplayLine::new());
        frame
            .0
            .push_str(line1)
            .map_err(|_| DisplayError::WriteFailed)?;
        frame
            .1
            .push_str(line2)
            .map_err(|_| DisplayError::WriteFailed)?;
        info!("LCD | {} | {}", frame.0, frame.1);
        self.last = Some(frame);
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), DisplayError> {
        if self.released {
            return Err(DisplayError::Released);
        }
        self.released = true;
        self.last = None;
        info!("LCD | cleared");
        Ok(())
    }
}
