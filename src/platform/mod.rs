//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Storage (LocalStorage on web, in-memory on native)

pub mod storage;

pub use storage::{KvStore, MemoryKv};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageKv;

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// The storage backend for the current platform
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KvStore> {
    match LocalStorageKv::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("LocalStorage unavailable ({e}), falling back to memory");
            Box::new(MemoryKv::default())
        }
    }
}

/// The storage backend for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KvStore> {
    Box::new(MemoryKv::default())
}
