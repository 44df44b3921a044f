//! Fixed timestep simulation tick
//!
//! One tick is one animation frame of the classic game: the falling block
//! moves `speed` field units and sweeps back and forth across the field
//! until the player taps.

use super::state::{Direction, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space: place when running, start otherwise
    pub tap: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.tap {
        state.handle_input();
    }
    state.advance();
}

impl GameState {
    /// Move the falling block one step, bouncing once it has fully left
    /// the field on the side it is travelling toward
    pub fn advance(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let field_width = self.tuning.field_width;
        let step = self.speed * self.direction.sign();
        let Some(block) = self.falling.as_mut() else {
            return;
        };

        block.x += step;
        match self.direction {
            Direction::Right if block.x > field_width => self.direction = Direction::Left,
            Direction::Left if block.x < -block.width => self.direction = Direction::Right,
            _ => {}
        }

        self.time_ticks += 1;
    }
}
