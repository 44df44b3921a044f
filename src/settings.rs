//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{Envelope, PersistResult};
use crate::platform::{self, KvStore};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no perfect-stack flash)
    pub reduced_motion: bool,

    /// Let the demo player take over while nobody is playing
    pub demo_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
            show_fps: false,
            reduced_motion: false,
            demo_mode: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "stack_game_settings";

    /// Effective sound effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective perfect-stack flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults
    pub fn load(kv: &dyn KvStore) -> Self {
        let Some(json) = kv.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Envelope::<Settings>::decode(&json) {
            Ok(envelope) => {
                log::info!("Loaded settings");
                envelope.payload
            }
            Err(e) => {
                log::warn!("Discarding unreadable settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, kv: &mut dyn KvStore) -> PersistResult<()> {
        let json = Envelope::new(self.clone(), platform::now_ms()).encode()?;
        kv.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
