//! AHT20 temperature/humidity sensor over I2C.
//!
//! Blocking driver for any `embedded_hal::i2c::I2c` bus.  Only the
//! temperature half of the measurement is decoded.
//!
//! ## Measurement frame
//!
//! ```text
//!  byte 0      1       2       3            4       5
//!  status  │ hum19:12 │ hum11:4 │ hum3:0|t19:16 │ t15:8 │ t7:0
//! ```
//!
//! `°C = raw / 2^20 · 200 − 50`

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::app::ports::TemperaturePort;
use crate::error::SensorError;

/// Fixed 7-bit bus address.
pub const ADDRESS: u8 = 0x38;

const CMD_SOFT_RESET: [u8; 1] = [0xBA];
const CMD_CALIBRATE: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

const RESET_DELAY_MS: u32 = 20;
const CALIBRATE_DELAY_MS: u32 = 10;
const MEASURE_DELAY_MS: u32 = 80;
/// Busy polls after the first measurement wait.
const MAX_BUSY_POLLS: u8 = 5;

/// Datasheet operating range (°C).
const RANGE_C: core::ops::RangeInclusive<f32> = -40.0..=85.0;

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

pub struct Aht20<I2C, D> {
    i2c: I2C,
    delay: D,
    calibrated: bool,
}

impl<I2C: I2c, D: DelayNs> Aht20<I2C, D> {
    /// Create an uninitialised driver.  Call [`init`](Self::init) before use.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            calibrated: false,
        }
    }

    /// Soft-reset the sensor and load its calibration.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.write(&CMD_SOFT_RESET)?;
        self.delay.delay_ms(RESET_DELAY_MS);

        if self.status()? & STATUS_CALIBRATED == 0 {
            debug!("AHT20 not calibrated, sending calibrate command");
            self.write(&CMD_CALIBRATE)?;
            self.delay.delay_ms(CALIBRATE_DELAY_MS);
            if self.status()? & STATUS_CALIBRATED == 0 {
                return Err(SensorError::NotCalibrated);
            }
        }

        self.calibrated = true;
        info!("AHT20 ready at {:#04x}", ADDRESS);
        Ok(())
    }

    pub fn status(&mut self) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .read(ADDRESS, &mut buf)
            .map_err(|_| SensorError::BusFailed)?;
        Ok(buf[0])
    }

    /// Trigger one measurement and decode the temperature.
    pub fn read_celsius(&mut self) -> Result<f32, SensorError> {
        if !self.calibrated {
            return Err(SensorError::NotCalibrated);
        }
        self.write(&CMD_TRIGGER)?;
        self.delay.delay_ms(MEASURE_DELAY_MS);

        let mut frame = [0u8; 6];
        let mut polls = 0;
        loop {
            self.i2c
                .read(ADDRESS, &mut frame)
                .map_err(|_| SensorError::BusFailed)?;
            if frame[0] & STATUS_BUSY == 0 {
                break;
            }
            polls += 1;
            if polls > MAX_BUSY_POLLS {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_ms(CALIBRATE_DELAY_MS);
        }

        let celsius = Self::decode_celsius(&frame);
        if !RANGE_C.contains(&celsius) {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn decode_celsius(frame: &[u8; 6]) -> f32 {
        let raw = (u32::from(frame[3] & 0x0F) << 16)
            | (u32::from(frame[4]) << 8)
            | u32::from(frame[5]);
        raw as f32 / 1_048_576.0 * 200.0 - 50.0
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SensorError> {
        self.i2c
            .write(ADDRESS, bytes)
            .map_err(|_| SensorError::BusFailed)
    }
}

impl<I2C: I2c, D: DelayNs> TemperaturePort for Aht20<I2C, D> {
    fn read_fahrenheit(&mut self) -> Result<f32, SensorError> {
        self.read_celsius().map(celsius_to_fahrenheit)
    }
}
