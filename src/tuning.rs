//! Data-driven game balance
//!
//! Defaults reproduce the classic Stack Game feel. A JSON override can be
//! loaded for playtesting; every field is optional in the JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning override.
#[derive(Error, Debug)]
pub enum TuningError {
    /// The JSON could not be parsed.
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance knobs for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub block_height: f32,
    /// Width of the base block, also the cap for the growth bonus
    pub initial_block_size: f32,
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub perfect_threshold: f32,
    pub growth_threshold: u32,
    pub growth_factor: f32,
    pub diamond_interval: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            block_height: BLOCK_HEIGHT,
            initial_block_size: INITIAL_BLOCK_SIZE,
            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            perfect_threshold: PERFECT_THRESHOLD,
            growth_threshold: GROWTH_THRESHOLD,
            growth_factor: GROWTH_FACTOR,
            diamond_interval: DIAMOND_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse a JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.field_width > 0.0) {
            return invalid("field_width", "must be positive");
        }
        if !(self.field_height > 0.0) {
            return invalid("field_height", "must be positive");
        }
        if !(self.block_height > 0.0) || self.block_height > self.field_height {
            return invalid("block_height", "must be positive and fit the field");
        }
        if !(self.initial_block_size > 0.0) || self.initial_block_size > self.field_width {
            return invalid("initial_block_size", "must be positive and fit the field");
        }
        if !(self.initial_speed >= 0.0) {
            return invalid("initial_speed", "must not be negative");
        }
        if !(self.speed_increment >= 0.0) {
            return invalid("speed_increment", "must not be negative");
        }
        if !(self.perfect_threshold > 0.0 && self.perfect_threshold <= 1.0) {
            return invalid("perfect_threshold", "must be in (0, 1]");
        }
        if !(self.growth_factor >= 1.0) {
            return invalid("growth_factor", "must be at least 1");
        }
        if self.diamond_interval == 0 {
            return invalid("diamond_interval", "must be at least 1");
        }
        Ok(())
    }
}
