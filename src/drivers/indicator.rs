//! PWM indicator channel with solid and pulsing output.
//!
//! Wraps one `embedded-hal` [`SetDutyCycle`] pin.  The owner calls
//! [`IndicatorChannel::step`] once per animation frame; the channel
//! advances its pulse phase and writes the matching duty cycle.
//!
//! | Output  | Duty cycle                                       |
//! |---------|--------------------------------------------------|
//! | Off     | fully off                                        |
//! | Solid   | fully on                                         |
//! | Pulse   | ramps 0→255 over `fade_in`, 255→0 over `fade_out`|

use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{IndicatorOutput, PulseTiming};

/// Brightness steps of a pulse.
pub const BRIGHTNESS_MAX: u8 = 255;

/// Triangular brightness curve: rises over the fade-in, falls over the
/// fade-out.  A new pulse starts dark.
pub fn pulse_level(phase_ms: u32, timing: PulseTiming) -> u8 {
    let pos = u64::from(phase_ms % timing.period_ms());
    let fade_in = u64::from(timing.fade_in_ms());
    let fade_out = u64::from(timing.fade_out_ms());
    let max = u64::from(BRIGHTNESS_MAX);
    if pos < fade_in {
        ((pos * max) / fade_in) as u8
    } else {
        (((fade_in + fade_out - pos) * max) / fade_out) as u8
    }
}

pub struct IndicatorChannel<P> {
    pwm: P,
    output: IndicatorOutput,
    phase_ms: u32,
}

impl<P: SetDutyCycle> IndicatorChannel<P> {
    /// Starts `Off`.  Nothing is written until the first [`step`](Self::step).
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            output: IndicatorOutput::Off,
            phase_ms: 0,
        }
    }

    pub fn output(&self) -> IndicatorOutput {
        self.output
    }

    /// Switch output.  A changed pulse restarts from dark.
    /// Returns `true` if the output changed.
    pub fn set(&mut self, output: IndicatorOutput) -> bool {
        if output == self.output {
            return false;
        }
        self.output = output;
        self.phase_ms = 0;
        true
    }

    /// Brightness the channel is currently showing.
    pub fn level(&self) -> u8 {
        match self.output {
            IndicatorOutput::Off => 0,
            IndicatorOutput::Solid => BRIGHTNESS_MAX,
            IndicatorOutput::Pulse(timing) => pulse_level(self.phase_ms, timing),
        }
    }

    /// Advance the pulse by `delta_ms` and write the duty cycle.
    pub fn step(&mut self, delta_ms: u32) -> Result<(), P::Error> {
        self.phase_ms = match self.output {
            IndicatorOutput::Pulse(timing) => {
                self.phase_ms.wrapping_add(delta_ms) % timing.period_ms()
            }
            _ => 0,
        };
        self.write()
    }

    /// Write the current output without advancing the phase.
    pub fn write(&mut self) -> Result<(), P::Error> {
        match self.output {
            IndicatorOutput::Off => self.pwm.set_duty_cycle_fully_off(),
            IndicatorOutput::Solid => self.pwm.set_duty_cycle_fully_on(),
            IndicatorOutput::Pulse(_) => {
                let level = self.level();
                self.pwm
                    .set_duty_cycle_fraction(u16::from(level), u16::from(BRIGHTNESS_MAX))
            }
        }
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}
