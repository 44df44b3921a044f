//! Key-value storage backends

use std::collections::HashMap;

#[cfg(any(target_arch = "wasm32", test))]
use crate::persistence::PersistError;
use crate::persistence::PersistResult;

/// String key-value store (LocalStorage semantics)
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
    fn remove(&mut self, key: &str) -> PersistResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageKv {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageKv {
    pub fn open() -> PersistResult<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for LocalStorageKv {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }
}

/// Store whose writes always fail, for exercising error paths
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingKv;

#[cfg(test)]
impl KvStore for FailingKv {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> PersistResult<()> {
        Err(PersistError::Storage("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> PersistResult<()> {
        Err(PersistError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_remove() {
        let mut kv = MemoryKv::default();
        assert_eq!(kv.get("a"), None);
        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").as_deref(), Some("1"));
        kv.remove("a").unwrap();
        assert_eq!(kv.get("a"), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut kv: Box<dyn KvStore> = Box::new(MemoryKv::default());
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").as_deref(), Some("v"));
    }
}
