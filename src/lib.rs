//! Backlog Goblin - a painting backlog for miniature squads
//!
//! Core modules:
//! - `entry`: Entries, ids and paint status
//! - `backlog`: The pile controller (intents, load/save driver)
//! - `persistence`: Storage format and key-value stores
//! - `platform`: Browser/native platform abstraction
//! - `settings`: User preferences
//! - `scene`: Presentation values derived from the pile

pub mod backlog;
pub mod entry;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;

pub use backlog::{Backlog, ValidationError};
pub use entry::{BacklogEntry, EntryId, PaintStatus};
pub use persistence::{MemoryStore, PersistentStore, StoreError};
pub use settings::Settings;

/// App configuration constants
pub mod consts {
    /// Key the pile is stored under
    pub const STORAGE_KEY: &str = "backlog-entries";
    /// Quantity used when the input is not a positive integer
    pub const DEFAULT_QUANTITY: u32 = 1;
    /// Quiet period before a change is written (ms)
    pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 250;
}
