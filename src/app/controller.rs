//! Controller core.
//!
//! [`Controller`] owns the mode FSM, the setpoint, the last sampled
//! temperature and the indicator port, all behind a single mutex.  Input
//! handlers and the refresh cycle share it through an `Arc`.
//!
//! ```text
//!  InputDispatcher ──▶ ┌──────────────────────────┐
//!                      │ Mutex<Core>              │ ──▶ IndicatorPort
//!  RefreshCycle    ──▶ │ FSM · setpoint · policy  │
//!                      └──────────────────────────┘
//! ```
//!
//! The lock is held across the in-memory update, the policy evaluation
//! and the indicator push, never across sensor, display or serial I/O.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use super::commands::InputEvent;
use super::ports::{Channel, IndicatorOutput, IndicatorPort, PulseTiming};
use crate::control::policy::{self, IndicatorCommand, IndicatorCommands};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Mode};

/// Lowest accepted setpoint (°F).
pub const SETPOINT_MIN: i32 = 40;
/// Highest accepted setpoint (°F).
pub const SETPOINT_MAX: i32 = 90;
/// Setpoint at power-on (°F).
pub const SETPOINT_DEFAULT: i32 = 72;

/// The user-controlled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub mode: Mode,
    pub setpoint: i32,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: Mode::Off,
            setpoint: SETPOINT_DEFAULT,
        }
    }
}

/// Consistent copy of everything the outputs are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: Mode,
    pub setpoint: i32,
    /// Last sampled temperature, floored to whole °F.
    pub temperature: i32,
}

impl Snapshot {
    pub fn state(&self) -> ControllerState {
        ControllerState {
            mode: self.mode,
            setpoint: self.setpoint,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Lock-protected core
// ───────────────────────────────────────────────────────────────

struct Core<I> {
    fsm: Fsm,
    ctx: FsmContext,
    setpoint: i32,
    temperature: i32,
    indicators: I,
    pulse: PulseTiming,
    evaluations: u64,
    stopped: bool,
}

impl<I: IndicatorPort> Core<I> {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.fsm.current_mode(),
            setpoint: self.setpoint,
            temperature: self.temperature,
        }
    }

    /// Run the policy on the current values and push the result.
    fn evaluate(&mut self) -> IndicatorCommands {
        let snap = self.snapshot();
        debug!(
            "State: {} | SetPoint: {} | Temp: {}",
            snap.mode, snap.setpoint, snap.temperature
        );
        let commands = policy::evaluate(snap.mode, snap.temperature, snap.setpoint);
        self.push(commands);
        self.evaluations += 1;
        commands
    }

    /// Drive both channels, those going dark first.
    fn push(&mut self, commands: IndicatorCommands) {
        let channels = [(Channel::Heat, commands.heat), (Channel::Cool, commands.cool)];
        let dark = channels.iter().filter(|(_, cmd)| *cmd == IndicatorCommand::Off);
        let lit = channels.iter().filter(|(_, cmd)| *cmd != IndicatorCommand::Off);
        for &(channel, cmd) in dark.chain(lit) {
            let output = self.output_for(cmd);
            self.indicators.drive(channel, output);
        }
        self.ctx.commands = commands;
    }

    fn output_for(&self, cmd: IndicatorCommand) -> IndicatorOutput {
        match cmd {
            IndicatorCommand::Off => IndicatorOutput::Off,
            IndicatorCommand::Solid => IndicatorOutput::Solid,
            IndicatorCommand::Pulsing => IndicatorOutput::Pulse(self.pulse),
        }
    }

    fn adjust_setpoint(&mut self, delta: i32) -> Snapshot {
        if self.stopped {
            debug!("Setpoint change ignored after shutdown");
            return self.snapshot();
        }
        let before = self.setpoint;
        self.setpoint = (before + delta).clamp(SETPOINT_MIN, SETPOINT_MAX);
        if self.setpoint != before {
            info!("Setpoint: {} -> {}", before, self.setpoint);
        } else {
            debug!("Setpoint held at bound {}", before);
        }
        self.evaluate();
        self.snapshot()
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The thermostat controller.  Share it as `Arc<Controller<I>>`.
pub struct Controller<I> {
    core: Mutex<Core<I>>,
}

impl<I: IndicatorPort> Controller<I> {
    /// Build the controller in `Off` / 72 °F and drive both channels off.
    ///
    /// `temperature` seeds the cached reading used by input-triggered
    /// evaluations until the refresh cycle samples again.
    pub fn new(indicators: I, pulse: PulseTiming, temperature: i32) -> Self {
        let mut fsm = Fsm::new(build_state_table(), Mode::Off);
        let mut ctx = FsmContext::new();
        fsm.start(&mut ctx);

        let mut core = Core {
            fsm,
            ctx,
            setpoint: SETPOINT_DEFAULT,
            temperature,
            indicators,
            pulse,
            evaluations: 0,
            stopped: false,
        };
        core.push(ctx.commands);

        Self {
            core: Mutex::new(core),
        }
    }

    // ── Input operations ──────────────────────────────────────

    /// Advance OFF → HEAT → COOL → OFF and re-drive the indicators.
    pub fn cycle_mode(&self) -> Snapshot {
        let mut guard = self.lock();
        if guard.stopped {
            debug!("Mode change ignored after shutdown");
            return guard.snapshot();
        }

        let inner = &mut *guard;
        let (from, to) = inner.fsm.cycle(&mut inner.ctx);
        // Exit effects first: the departing channel goes dark before the
        // entered mode drives anything.
        let forced = inner.ctx.commands;
        inner.push(forced);
        inner.evaluate();
        info!("Mode: {} -> {}", from, to);
        inner.snapshot()
    }

    /// Setpoint +1, clamped to [`SETPOINT_MAX`].
    pub fn increase_setpoint(&self) -> Snapshot {
        self.lock().adjust_setpoint(1)
    }

    /// Setpoint −1, clamped to [`SETPOINT_MIN`].
    pub fn decrease_setpoint(&self) -> Snapshot {
        self.lock().adjust_setpoint(-1)
    }

    /// Dispatch an input event to its operation.
    pub fn handle(&self, event: InputEvent) -> Snapshot {
        match event {
            InputEvent::CycleMode => self.cycle_mode(),
            InputEvent::IncreaseSetpoint => self.increase_setpoint(),
            InputEvent::DecreaseSetpoint => self.decrease_setpoint(),
        }
    }

    // ── Refresh-cycle operations ──────────────────────────────

    /// Store a fresh reading and return a consistent snapshot.
    /// Does not touch the indicators.
    pub fn observe_temperature(&self, temperature: i32) -> Snapshot {
        let mut core = self.lock();
        core.temperature = temperature;
        core.snapshot()
    }

    /// Re-run the policy on the cached values.
    pub fn refresh_indicators(&self) -> IndicatorCommands {
        let mut core = self.lock();
        if core.stopped {
            return IndicatorCommands::all_off();
        }
        core.evaluate()
    }

    /// Force both channels off and ignore later input.  Idempotent.
    pub fn shutdown(&self) {
        let mut core = self.lock();
        core.stopped = true;
        core.push(IndicatorCommands::all_off());
        info!("Controller stopped, indicators off");
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn state(&self) -> ControllerState {
        self.snapshot().state()
    }

    /// Last commands pushed to the indicator port.
    pub fn indicator_commands(&self) -> IndicatorCommands {
        self.lock().ctx.commands
    }

    /// Policy evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.lock().evaluations
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Run `f` on the indicator port under the lock.
    pub fn with_indicators<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        f(&self.lock().indicators)
    }

    // ── Internal ──────────────────────────────────────────────

    /// The core is plain data, so a panic elsewhere cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, Core<I>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
