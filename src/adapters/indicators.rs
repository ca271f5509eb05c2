//! Indicator port over a shared target table and a PWM animator thread.
//!
//! ```text
//!  Controller ──drive()──▶ SignalIndicators ──▶ IndicatorTargets ◀── IndicatorAnimator ──▶ PWM
//!   (under its lock)        (non-blocking)     (critical section)     (frame loop)
//! ```
//!
//! [`SignalIndicators::drive`] only stores the desired output, so the
//! controller never waits on PWM writes.  Both channels live in one table
//! read atomically, so the animator never sees a half-applied push.

use core::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info, warn};

use crate::app::ports::{Channel, IndicatorOutput, IndicatorPort};
use crate::drivers::indicator::IndicatorChannel;

/// Desired output per channel.
pub struct IndicatorTargets {
    outputs: Mutex<CriticalSectionRawMutex, Cell<[IndicatorOutput; 2]>>,
}

impl Default for IndicatorTargets {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorTargets {
    pub const fn new() -> Self {
        Self {
            outputs: Mutex::new(Cell::new([IndicatorOutput::Off; 2])),
        }
    }

    pub fn set(&self, channel: Channel, output: IndicatorOutput) {
        self.outputs.lock(|cell| {
            let mut outputs = cell.get();
            outputs[channel.index()] = output;
            cell.set(outputs);
        });
    }

    pub fn get(&self, channel: Channel) -> IndicatorOutput {
        self.snapshot()[channel.index()]
    }

    /// Both channels, read together.
    pub fn snapshot(&self) -> [IndicatorOutput; 2] {
        self.outputs.lock(Cell::get)
    }
}

/// [`IndicatorPort`] handed to the controller.
#[derive(Clone)]
pub struct SignalIndicators {
    targets: Arc<IndicatorTargets>,
}

impl SignalIndicators {
    pub fn new(targets: Arc<IndicatorTargets>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &IndicatorTargets {
        &self.targets
    }
}

impl IndicatorPort for SignalIndicators {
    fn drive(&mut self, channel: Channel, output: IndicatorOutput) {
        self.targets.set(channel, output);
    }
}

/// Owns both PWM channels and animates them toward the targets.
pub struct IndicatorAnimator<H, C> {
    heat: IndicatorChannel<H>,
    cool: IndicatorChannel<C>,
    targets: Arc<IndicatorTargets>,
    frame_ms: u32,
}

impl<H: SetDutyCycle, C: SetDutyCycle> IndicatorAnimator<H, C> {
    /// Build the animator and the port the controller drives it through.
    pub fn new(heat_pwm: H, cool_pwm: C, frame_ms: u32) -> (Self, SignalIndicators) {
        let targets = Arc::new(IndicatorTargets::new());
        let port = SignalIndicators::new(targets.clone());
        let animator = Self {
            heat: IndicatorChannel::new(heat_pwm),
            cool: IndicatorChannel::new(cool_pwm),
            targets,
            frame_ms: frame_ms.max(1),
        };
        (animator, port)
    }

    /// Apply the current targets and advance one frame of `delta_ms`.
    /// Channels switching off are written before any channel lights up.
    pub fn step(&mut self, delta_ms: u32) {
        let [heat, cool] = self.targets.snapshot();
        let heat_changed = self.heat.set(heat);
        let cool_changed = self.cool.set(cool);
        if heat_changed || cool_changed {
            debug!("Indicators: heat={:?} cool={:?}", heat, cool);
        }

        if cool == IndicatorOutput::Off && heat != IndicatorOutput::Off {
            self.step_cool(delta_ms);
            self.step_heat(delta_ms);
        } else {
            self.step_heat(delta_ms);
            self.step_cool(delta_ms);
        }
    }

    /// Animate until `shutdown` is raised, then write both channels off.
    pub fn run(mut self, shutdown: &AtomicBool) {
        info!("Indicator animator running at {} ms/frame", self.frame_ms);
        let frame = Duration::from_millis(u64::from(self.frame_ms));
        while !shutdown.load(Ordering::Acquire) {
            self.step(self.frame_ms);
            thread::sleep(frame);
        }
        self.heat.set(IndicatorOutput::Off);
        self.cool.set(IndicatorOutput::Off);
        self.step_heat(0);
        self.step_cool(0);
        info!("Indicator animator stopped");
    }

    pub fn heat(&self) -> &IndicatorChannel<H> {
        &self.heat
    }

    pub fn cool(&self) -> &IndicatorChannel<C> {
        &self.cool
    }

    fn step_heat(&mut self, delta_ms: u32) {
        if self.heat.step(delta_ms).is_err() {
            warn!("Heat indicator PWM write failed");
        }
    }

    fn step_cool(&mut self, delta_ms: u32) {
        if self.cool.step(delta_ms).is_err() {
            warn!("Cool indicator PWM write failed");
        }
    }
}
