//! Browser LocalStorage as a [`PersistentStore`]

use crate::persistence::{PersistentStore, StoreError};

/// LocalStorage handle, resolved lazily so a missing or blocked storage area
/// only fails individual operations
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl PersistentStore for LocalStorageStore {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let storage = Self::storage()?;
        let value = storage
            .get_item(key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))?;
        Ok(value.map(String::into_bytes))
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = std::str::from_utf8(bytes).map_err(|_| StoreError::Encoding)?;
        storage
            .set_item(key, json)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}
