//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per classic animation frame)
//! - Seeded RNG only (demo player)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod block;
pub mod place;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autoplay::AutoPlayer;
pub use block::{Block, Overlap, PALETTE, palette_index};
pub use place::PlaceOutcome;
pub use snapshot::{RenderRect, RenderSnapshot};
pub use state::{Direction, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
