//! Telegram transports.
//!
//! [`SerialTelegramSink`] writes telegrams to a UART (8N1, no flow
//! control).  [`LogTelegramSink`] only logs them, for hosts without a
//! serial link.

use std::io::Write;
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::app::ports::TelegramPort;
use crate::error::CommsError;

const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct SerialTelegramSink {
    port: Box<dyn SerialPort>,
}

impl SerialTelegramSink {
    /// Open `path` at `baud_rate`, 8N1.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, CommsError> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| {
                debug!("Serial open {} failed: {}", path, e);
                CommsError::OpenFailed
            })?;
        info!("Serial telegrams on {} @ {} baud", path, baud_rate);
        Ok(Self { port })
    }
}

impl TelegramPort for SerialTelegramSink {
    fn send(&mut self, telegram: &[u8]) -> Result<(), CommsError> {
        let written = self.port.write(telegram).map_err(|e| {
            debug!("Serial write failed: {}", e);
            CommsError::WriteFailed
        })?;
        if written != telegram.len() {
            return Err(CommsError::ShortWrite);
        }
        self.port.flush().map_err(|_| CommsError::WriteFailed)
    }
}

/// Logs telegrams instead of transmitting them.
#[derive(Debug, Default)]
pub struct LogTelegramSink {
    sent: u64,
}

impl LogTelegramSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl TelegramPort for LogTelegramSink {
    fn send(&mut self, telegram: &[u8]) -> Result<(), CommsError> {
        let text = core::str::from_utf8(telegram).map_err(|_| CommsError::WriteFailed)?;
        info!("UART | {}", text.trim_end());
        self.sent += 1;
        Ok(())
    }
}
