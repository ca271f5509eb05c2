//! Function-pointer finite state machine engine for the operating mode.
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  StateTable                                        │
//! │  ┌────────┬───────────┬──────────┬─────────────┐   │
//! │  │ Mode   │ on_enter  │ on_exit  │ cycle → next │   │
//! │  ├────────┼───────────┼──────────┼─────────────┤   │
//! │  │ Off    │ fn(ctx)   │    -     │ Heat        │   │
//! │  │ Heat   │ fn(ctx)   │ fn(ctx)  │ Cool        │   │
//! │  │ Cool   │ fn(ctx)   │ fn(ctx)  │ Off         │   │
//! │  └────────┴───────────┴──────────┴─────────────┘   │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The only event is `cycle`.  The engine runs `on_exit` for the current
//! mode, moves the pointer to the row's successor, then runs `on_enter`.
//! Hooks receive `&mut FsmContext` and write the indicator commands the
//! transition forces; the caller pushes them to hardware afterwards.

pub mod context;
pub mod states;

use core::fmt;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// The thermostat's operating regime.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Off = 0,
    Heat = 1,
    Cool = 2,
}

impl Mode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 3;

    /// Modes in cycle order, starting from the power-on mode.
    pub const CYCLE: [Mode; Mode::COUNT] = [Mode::Off, Mode::Heat, Mode::Cool];

    /// Convert an index back to `Mode`.  Panics on out-of-range in debug
    /// builds; returns `Off` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Heat,
            2 => Self::Cool,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Off
            }
        }
    }

    /// Uppercase name used on the display and in telegrams.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
pub struct StateDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    /// Successor on the `cycle` event.
    pub next: Mode,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The mode state machine.
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Number of transitions taken since construction.
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `cycle()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Take the `cycle` edge: `on_exit(current)` → pointer → `on_enter(next)`.
    /// Returns `(from, to)`.
    pub fn cycle(&mut self, ctx: &mut FsmContext) -> (Mode, Mode) {
        let from = self.current_mode();
        let to = self.table[self.current].next;
        self.transition(to, ctx);
        (from, to)
    }

    /// The current mode.
    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// Transitions taken so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
