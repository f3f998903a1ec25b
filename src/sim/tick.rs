//! Fixed timestep simulation tick
//!
//! One call is one 60 Hz frame: timers first, then the bomb key, then every
//! entity in registry order, then the HUD springs.

use serde::{Deserialize, Serialize};

use super::registry::EntityRegistry;
use super::state::GameContext;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held thrusters
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Drop a bomb (edge-triggered)
    pub drop_bomb: bool,
    /// Leave the game
    pub quit: bool,
}

impl TickInput {
    pub fn any_thrust(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(ctx: &mut GameContext, input: &TickInput) {
    ctx.tick += 1;
    ctx.input = input.clone();

    while let Some(action) = ctx.scheduler.pop_due(ctx.tick) {
        ctx.run_deferred(action);
    }

    if input.drop_bomb {
        ctx.drop_bomb();
    }

    EntityRegistry::update_each(ctx, |c| &mut c.entities, |id, entity, c| {
        entity.update(id, c)
    });

    if ctx.show_hud {
        ctx.economy.step_display();
    }
}
