//! Mock hardware adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! real PWM, I2C, LCD or UART hardware.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use thermostat::app::ports::{
    Channel, ClockPort, DisplayPort, IndicatorOutput, IndicatorPort, TelegramPort, TemperaturePort,
};
use thermostat::error::{CommsError, DisplayError, SensorError};

// ── Indicators ────────────────────────────────────────────────

/// Records drives and counts moments where both channels were lit.
#[derive(Debug, Default)]
pub struct MockIndicators {
    pub calls: Vec<(Channel, IndicatorOutput)>,
    outputs: [IndicatorOutput; 2],
    pub both_lit: usize,
}

#[allow(dead_code)]
impl MockIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self, channel: Channel) -> IndicatorOutput {
        self.outputs[channel.index()]
    }

    pub fn all_off(&self) -> bool {
        self.outputs.iter().all(|o| *o == IndicatorOutput::Off)
    }
}

impl IndicatorPort for MockIndicators {
    fn drive(&mut self, channel: Channel, output: IndicatorOutput) {
        self.calls.push((channel, output));
        self.outputs[channel.index()] = output;
        if self.outputs.iter().all(|o| *o != IndicatorOutput::Off) {
            self.both_lit += 1;
        }
    }
}

// ── Temperature ───────────────────────────────────────────────

/// Sensor whose reading the test can change while the cycle owns it.
#[derive(Clone)]
pub struct MockSensor {
    reading: Arc<Mutex<Result<f32, SensorError>>>,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new(fahrenheit: f32) -> Self {
        Self {
            reading: Arc::new(Mutex::new(Ok(fahrenheit))),
        }
    }

    pub fn set(&self, fahrenheit: f32) {
        *self.reading.lock().unwrap() = Ok(fahrenheit);
    }

    pub fn fail(&self, error: SensorError) {
        *self.reading.lock().unwrap() = Err(error);
    }
}

impl TemperaturePort for MockSensor {
    fn read_fahrenheit(&mut self) -> Result<f32, SensorError> {
        *self.reading.lock().unwrap()
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DisplayLog {
    pub frames: Vec<(String, String)>,
    pub teardowns: usize,
}

/// Display whose log stays readable after the cycle takes ownership.
#[derive(Clone, Default)]
pub struct MockDisplay {
    pub log: Arc<Mutex<DisplayLog>>,
    pub fail_teardown: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_two(&self) -> Vec<String> {
        let log = self.log.lock().unwrap();
        log.frames.iter().map(|(_, l2)| l2.clone()).collect()
    }
}

impl DisplayPort for MockDisplay {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        assert_eq!(line1.chars().count(), 16, "line 1 {:?}", line1);
        assert_eq!(line2.chars().count(), 16, "line 2 {:?}", line2);
        self.log
            .lock()
            .unwrap()
            .frames
            .push((line1.to_owned(), line2.to_owned()));
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), DisplayError> {
        self.log.lock().unwrap().teardowns += 1;
        if self.fail_teardown {
            Err(DisplayError::WriteFailed)
        } else {
            Ok(())
        }
    }
}

// ── Telegram ──────────────────────────────────────────────────

/// Telegram sink that can be told to fail the next N sends.
#[derive(Clone, Default)]
pub struct MockWire {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub failures_left: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockWire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, n: usize) {
        *self.failures_left.lock().unwrap() = n;
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl TelegramPort for MockWire {
    fn send(&mut self, telegram: &[u8]) -> Result<(), CommsError> {
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(CommsError::WriteFailed);
        }
        let text = String::from_utf8(telegram.to_vec()).unwrap();
        self.sent.lock().unwrap().push(text);
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

pub struct FixedClock(pub NaiveDateTime);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            NaiveDate::from_ymd_opt(2026, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        )
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
