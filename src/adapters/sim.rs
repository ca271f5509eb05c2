//! Host simulation adapters.
//!
//! Stand-ins for the PWM pins, the temperature sensor and the push buttons
//! so the full controller runs on a desktop.
//!
//! | Adapter          | Replaces                     |
//! |------------------|------------------------------|
//! | `SimPwm`         | LED PWM pin                  |
//! | `SimTemperature` | AHT20 on I2C                 |
//! | `read_buttons`   | green / red / blue buttons   |

use core::convert::Infallible;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::{debug, info};

use crate::app::commands::InputEvent;
use crate::app::dispatch::InputQueue;
use crate::app::ports::TemperaturePort;
use crate::error::SensorError;

/// Duty-cycle resolution of [`SimPwm`].
pub const SIM_PWM_MAX: u16 = 1000;

/// PWM pin that records its duty cycle.  Clones share the same duty.
#[derive(Clone, Default)]
pub struct SimPwm {
    duty: Arc<AtomicU16>,
}

impl SimPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty.load(Ordering::Relaxed)
    }
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        SIM_PWM_MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty.store(duty.min(SIM_PWM_MAX), Ordering::Relaxed);
        Ok(())
    }
}

/// Sinusoidal room temperature around a base value.
pub struct SimTemperature {
    base_f: f32,
    amplitude_f: f32,
    period: Duration,
    start: Instant,
}

impl SimTemperature {
    pub fn new(base_f: f32, amplitude_f: f32, period: Duration) -> Self {
        Self {
            base_f,
            amplitude_f,
            period,
            start: Instant::now(),
        }
    }

    /// Temperature `elapsed` after start.
    pub fn at(&self, elapsed: Duration) -> f32 {
        let period = self.period.as_secs_f32();
        if period <= 0.0 {
            return self.base_f;
        }
        let phase = elapsed.as_secs_f32() / period * core::f32::consts::TAU;
        self.base_f + self.amplitude_f * phase.sin()
    }
}

impl Default for SimTemperature {
    /// 70 °F ± 4 °F over ten minutes.
    fn default() -> Self {
        Self::new(70.0, 4.0, Duration::from_secs(600))
    }
}

impl TemperaturePort for SimTemperature {
    fn read_fahrenheit(&mut self) -> Result<f32, SensorError> {
        Ok(self.at(self.start.elapsed()))
    }
}

/// Map one console line to a button event.
///
/// | Input    | Event                |
/// |----------|----------------------|
/// | `m`, `g` | cycle mode (green)   |
/// | `+`, `r` | setpoint up (red)    |
/// | `-`, `b` | setpoint down (blue) |
pub fn parse_button(line: &str) -> Option<InputEvent> {
    let line = line.trim();
    match line {
        "m" | "g" => Some(InputEvent::CycleMode),
        "+" | "r" => Some(InputEvent::IncreaseSetpoint),
        "-" | "b" => Some(InputEvent::DecreaseSetpoint),
        other => InputEvent::from_name(other),
    }
}

/// Feed console lines into `queue` until `q` or end of input.
/// Returns the number of presses queued.
pub fn read_buttons(input: impl BufRead, queue: &InputQueue) -> usize {
    info!("Buttons: m = mode, + = up, - = down, q = quit");
    let mut pressed = 0;
    for line in input.lines() {
        let Ok(line) = line else { break };
        if line.trim() == "q" {
            break;
        }
        match parse_button(&line) {
            Some(event) => {
                if queue.press(event) {
                    pressed += 1;
                }
            }
            None if line.trim().is_empty() => {}
            None => debug!("Ignoring input {:?}", line.trim()),
        }
    }
    pressed
}
