//! Save/load persistence for the pile
//!
//! Features:
//! - Versioned JSON envelope (bare arrays from older saves still load)
//! - Pluggable key-value stores (memory, file, LocalStorage)
//! - Best-effort semantics: callers log and drop failures

pub mod envelope;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;

pub use envelope::{DecodeError, SCHEMA_VERSION, decode, encode};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Failure reported by a key-value store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid UTF-8")]
    Encoding,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Scoped key-value byte store
///
/// Both operations may fail; the backlog treats a failed load as "no data"
/// and a failed save as a lost write.
pub trait PersistentStore {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

