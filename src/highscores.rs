//! High score persistence
//!
//! The engine only needs an integer: read once when a session is created,
//! written whenever a run beats it. Persisted to LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::persistence::{Envelope, PersistResult};
use crate::platform::{self, KvStore};

/// Persistence collaborator for the best score
pub trait HighScoreStore {
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32) -> PersistResult<()>;
}

/// Volatile high score, for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    pub best: u32,
    /// Number of successful saves
    pub saves: u32,
}

impl HighScoreStore for MemoryHighScore {
    fn load_high_score(&self) -> u32 {
        self.best
    }

    fn save_high_score(&mut self, score: u32) -> PersistResult<()> {
        self.best = score;
        self.saves += 1;
        Ok(())
    }
}

/// Stored best-score record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best: u32,
    /// Unix timestamp (ms) when achieved
    pub achieved_at: f64,
}

/// High score kept in a key-value store
pub struct StoredHighScore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> StoredHighScore<K> {
    /// Storage key for the versioned record
    pub const STORAGE_KEY: &'static str = "stack_game_high_score";
    /// Key the first web release wrote a bare integer under
    pub const LEGACY_KEY: &'static str = "stackGameHighScore";

    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Current record, if one has been stored
    pub fn record(&self) -> Option<HighScoreRecord> {
        if let Some(json) = self.kv.get(Self::STORAGE_KEY) {
            match Envelope::<HighScoreRecord>::decode(&json) {
                Ok(envelope) => return Some(envelope.payload),
                Err(e) => log::warn!("Ignoring unreadable high score: {e}"),
            }
        }

        let legacy = self.kv.get(Self::LEGACY_KEY)?;
        let best = legacy.trim().parse::<u32>().ok()?;
        log::info!("Migrated legacy high score {best}");
        Some(HighScoreRecord {
            best,
            achieved_at: 0.0,
        })
    }

    pub fn into_inner(self) -> K {
        self.kv
    }
}

impl<K: KvStore> HighScoreStore for StoredHighScore<K> {
    fn load_high_score(&self) -> u32 {
        let best = self.record().map(|r| r.best).unwrap_or(0);
        log::info!("Loaded high score {best}");
        best
    }

    fn save_high_score(&mut self, score: u32) -> PersistResult<()> {
        let now = platform::now_ms();
        let record = HighScoreRecord {
            best: score,
            achieved_at: now,
        };
        let json = Envelope::new(record, now).encode()?;
        self.kv.set(Self::STORAGE_KEY, &json)?;
        // Drop the old format once the new one is written
        if self.kv.get(Self::LEGACY_KEY).is_some() {
            self.kv.remove(Self::LEGACY_KEY)?;
        }
        log::info!("High score saved ({score})");
        Ok(())
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    format_elapsed(js_sys::Date::now() - timestamp)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(timestamp: f64) -> String {
    format_elapsed(platform::now_ms() - timestamp)
}

/// Human-readable age of a record
pub fn format_elapsed(diff_ms: f64) -> String {
    let diff_mins = diff_ms / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        match diff_days.floor() as i64 {
            1 => "Yesterday".to_string(),
            days => format!("{days} days ago"),
        }
    } else if diff_hours >= 1.0 {
        match diff_hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            hours => format!("{hours} hours ago"),
        }
    } else if diff_mins >= 1.0 {
        match diff_mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            mins => format!("{mins} mins ago"),
        }
    } else {
        "Just now".to_string()
    }
}
