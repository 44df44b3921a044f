//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Typed errors for the storage seam

pub mod envelope;

pub use envelope::{Envelope, SAVE_VERSION};

use thiserror::Error;

/// Errors raised while saving or loading persisted data
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to serialize save data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse save data: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("storage backend error: {0}")]
    Storage(String),

    #[error("storage is not available")]
    Unavailable,
}

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;
