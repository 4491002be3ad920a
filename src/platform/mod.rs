//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (entry ids, save debouncing)
//! - Storage (LocalStorage on web)

#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
pub use time::now_ms;
