//! In-memory store with failure injection

use std::collections::HashMap;

use super::{PersistentStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
    fail_load: bool,
    fail_save: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_value(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), bytes.into());
        store
    }

    pub fn set_fail_load(&mut self, fail: bool) {
        self.fail_load = fail;
    }

    pub fn set_fail_save(&mut self, fail: bool) {
        self.fail_save = fail;
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistentStore for MemoryStore {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_load {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(StoreError::Backend("injected save failure".to_string()));
        }
        self.values.insert(key.to_string(), bytes.to_vec());
        self.saves += 1;
        Ok(())
    }
}
