//! Concrete mode hooks and table builder.
//!
//! ```text
//!        cycle           cycle
//!  OFF ────────▶ HEAT ────────▶ COOL
//!   ▲                             │
//!   └────────────── cycle ────────┘
//! ```
//!
//! Exit hooks force the departing channel off.  Entering OFF forces both
//! channels off.  The policy evaluation that follows every transition is
//! done by the controller, not here.

use super::context::FsmContext;
use super::{Mode, StateDescriptor};
use crate::control::policy::{IndicatorCommand, IndicatorCommands};
use log::debug;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // Index 0: Off
        StateDescriptor {
            id: Mode::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            next: Mode::Heat,
        },
        // Index 1: Heat
        StateDescriptor {
            id: Mode::Heat,
            name: "Heat",
            on_enter: Some(heat_enter),
            on_exit: Some(heat_exit),
            next: Mode::Cool,
        },
        // Index 2: Cool
        StateDescriptor {
            id: Mode::Cool,
            name: "Cool",
            on_enter: Some(cool_enter),
            on_exit: Some(cool_exit),
            next: Mode::Off,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FsmContext) {
    ctx.commands = IndicatorCommands::all_off();
    debug!("* Changing state to OFF");
}

// ═══════════════════════════════════════════════════════════════════════════
//  HEAT
// ═══════════════════════════════════════════════════════════════════════════

fn heat_enter(_ctx: &mut FsmContext) {
    debug!("* Changing state to HEAT");
}

fn heat_exit(ctx: &mut FsmContext) {
    ctx.commands.heat = IndicatorCommand::Off;
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOL
// ═══════════════════════════════════════════════════════════════════════════

fn cool_enter(_ctx: &mut FsmContext) {
    debug!("* Changing state to COOL");
}

fn cool_exit(ctx: &mut FsmContext) {
    ctx.commands.cool = IndicatorCommand::Off;
}
