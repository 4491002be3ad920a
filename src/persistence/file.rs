//! Directory-backed store for native builds
//!
//! Each key maps to `<dir>/<key>.json`. Writes land in a `.tmp` sibling first
//! and are renamed over the target so a crash never leaves half a file.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{PersistentStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistentStore for FileStore {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &target)?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(store.load("backlog-entries").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        store.save("backlog-entries", b"[]").unwrap();
        store.save("backlog-entries", b"{\"version\":1,\"entries\":[]}").unwrap();

        let loaded = store.load("backlog-entries").unwrap().unwrap();
        assert_eq!(loaded, b"{\"version\":1,\"entries\":[]}");
        assert!(!dir.path().join("nested/backlog-entries.json.tmp").exists());
    }
}
