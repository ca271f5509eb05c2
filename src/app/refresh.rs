//! Periodic refresh cycle.
//!
//! Each tick samples the sensor, updates the cached temperature, renders
//! both display lines and, when the [`TickSchedule`] says so, re-runs the
//! indicator policy or emits a status telegram.
//!
//! ```text
//!  sensor ─▶ observe_temperature ─▶ render ─▶ display
//!                                    │
//!                 every window  ─────┼──▶ refresh_indicators
//!                 every 30 ticks ────┴──▶ telegram
//! ```
//!
//! All slow I/O happens outside the controller lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::controller::{Controller, Snapshot};
use super::ports::{ClockPort, DisplayPort, IndicatorPort, TelegramPort, TemperaturePort};
use super::render;
use crate::config::ThermostatConfig;
use crate::error::SensorError;
use crate::scheduler::{TickPlan, TickSchedule};

/// Counters kept by the refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub ticks: u64,
    pub sensor_failures: u64,
    pub display_failures: u64,
    pub telegrams_sent: u64,
    pub telegram_failures: u64,
}

/// Drives the display, the periodic indicator refresh and the telegram.
pub struct RefreshCycle<I, T, D, S, C> {
    controller: Arc<Controller<I>>,
    sensor: T,
    display: D,
    telegrams: S,
    clock: C,
    schedule: TickSchedule,
    period: Duration,
    shutdown: Arc<AtomicBool>,
    stats: RefreshStats,
}

impl<I, T, D, S, C> RefreshCycle<I, T, D, S, C>
where
    I: IndicatorPort,
    T: TemperaturePort,
    D: DisplayPort,
    S: TelegramPort,
    C: ClockPort,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        controller: Arc<Controller<I>>,
        sensor: T,
        display: D,
        telegrams: S,
        clock: C,
        config: &ThermostatConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            controller,
            sensor,
            display,
            telegrams,
            clock,
            schedule: TickSchedule::from_config(config),
            period: Duration::from_millis(u64::from(config.tick_interval_ms.max(1))),
            shutdown,
            stats: RefreshStats::default(),
        }
    }

    /// First sample and the initial indicator evaluation.
    pub fn start(&mut self) -> Snapshot {
        let snap = self.sample();
        self.controller.refresh_indicators();
        info!(
            "Refresh cycle started: {} | SetPoint: {} | Temp: {}",
            snap.mode, snap.setpoint, snap.temperature
        );
        snap
    }

    /// Run one tick and return what it did.
    pub fn tick(&mut self) -> TickPlan {
        let plan = self.schedule.next_tick();
        self.stats.ticks += 1;
        debug!("Counter: {}", plan.tick);

        let snap = self.sample();
        let line1 = render::date_time_line(self.clock.now());
        let line2 = render::line_two(plan.view, &snap);
        if let Err(e) = self.display.show(&line1, &line2) {
            self.stats.display_failures += 1;
            warn!("Display update failed: {}", e);
        }

        if plan.refresh_indicators {
            self.controller.refresh_indicators();
        }
        if plan.send_telegram {
            self.send_telegram();
        }
        plan
    }

    /// Tick every period until the shutdown flag is raised, then shut down.
    pub fn run(mut self) -> RefreshStats {
        self.start();
        let mut deadline = Instant::now();
        while !self.shutdown.load(Ordering::Acquire) {
            self.tick();
            deadline += self.period;
            let now = Instant::now();
            match deadline.checked_duration_since(now) {
                Some(wait) => thread::sleep(wait),
                None if now.duration_since(deadline) > self.period => {
                    warn!("Refresh cycle fell behind, re-anchoring");
                    deadline = now;
                }
                None => {}
            }
        }
        self.finish();
        self.stats
    }

    /// Darken indicators, stop input handling and release the display.
    pub fn finish(&mut self) {
        self.controller.shutdown();
        match self.display.teardown() {
            Ok(()) => info!("Display released"),
            Err(e) => debug!("Display teardown failed: {}", e),
        }
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn telegrams(&self) -> &S {
        &self.telegrams
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read the sensor; on failure keep the previous temperature.
    fn sample(&mut self) -> Snapshot {
        match self.read_whole_degrees() {
            Ok(t) => self.controller.observe_temperature(t),
            Err(e) => {
                self.stats.sensor_failures += 1;
                warn!("Temperature read failed ({}), keeping last value", e);
                self.controller.snapshot()
            }
        }
    }

    fn read_whole_degrees(&mut self) -> Result<i32, SensorError> {
        let reading = self.sensor.read_fahrenheit()?;
        if !reading.is_finite() {
            return Err(SensorError::OutOfRange);
        }
        Ok(reading.floor() as i32)
    }

    fn send_telegram(&mut self) {
        let snap = self.controller.snapshot();
        let telegram = render::telegram(&snap);
        match self.telegrams.send(telegram.as_bytes()) {
            Ok(()) => {
                self.stats.telegrams_sent += 1;
                debug!("UART -> {}", telegram.trim_end());
            }
            Err(e) => {
                self.stats.telegram_failures += 1;
                warn!("Telegram send failed: {}", e);
            }
        }
    }
}
