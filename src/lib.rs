//! Stack Game - A block-stacking arcade game for Farcaster Mini Apps
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block motion, overlap scoring, game state)
//! - `session`: Fixed-timestep driver and persistence routing
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Versioned save envelope
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod share;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryHighScore, StoredHighScore};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Block defaults
    pub const BLOCK_HEIGHT: f32 = 40.0;
    pub const INITIAL_BLOCK_SIZE: f32 = 200.0;

    /// Difficulty ramp (field units per tick)
    pub const INITIAL_SPEED: f32 = 2.0;
    pub const SPEED_INCREMENT: f32 = 0.1;

    /// Overlap ratio above which a placement counts as perfect
    pub const PERFECT_THRESHOLD: f32 = 0.95;
    /// Perfect streak length that earns the growth bonus
    pub const GROWTH_THRESHOLD: u32 = 3;
    /// Width multiplier applied by the growth bonus
    pub const GROWTH_FACTOR: f32 = 1.1;
    /// Perfect stacks per diamond
    pub const DIAMOND_INTERVAL: u32 = 10;
}
