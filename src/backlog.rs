//! The pile controller
//!
//! Owns the canonical list of entries. The renderer reads [`Backlog::snapshot`]
//! and sends intents back (add, cycle, delete). Storage never runs inside an
//! intent: intents only mark the list dirty, and the host's frame loop calls
//! [`Backlog::pump`] to serve the pending load and write the latest list.

use crate::entry::{BacklogEntry, EntryId, PaintStatus, parse_quantity};
use crate::persistence::{self, PersistentStore};
use crate::platform;
use crate::settings::Settings;

/// Rejected `add_entry` input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("squad name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    /// `initialize` not called yet
    Idle,
    /// Waiting for the next pump
    Pending,
    Done,
}

/// Backlog controller over a key-value store
pub struct Backlog<S: PersistentStore> {
    entries: Vec<BacklogEntry>,
    store: S,
    storage_key: String,
    save_debounce_ms: u64,
    load: LoadState,
    /// Unsaved changes exist
    dirty: bool,
    /// Intents were applied before the stored pile arrived
    touched_before_load: bool,
    last_change_ms: u64,
    last_id_ms: u64,
    /// Suffix counter once numeric ids run out
    fallback_seq: u64,
}

impl<S: PersistentStore> Backlog<S> {
    pub fn new(store: S, settings: &Settings) -> Self {
        Self {
            entries: Vec::new(),
            store,
            storage_key: settings.storage_key.clone(),
            save_debounce_ms: settings.save_debounce_ms,
            load: LoadState::Idle,
            dirty: false,
            touched_before_load: false,
            last_change_ms: 0,
            last_id_ms: 0,
            fallback_seq: 0,
        }
    }

    /// Controller with default settings
    pub fn with_store(store: S) -> Self {
        Self::new(store, &Settings::default())
    }

    /// Request the stored pile. Served by the next [`pump`](Self::pump) or
    /// [`flush`](Self::flush); the list stays usable meanwhile.
    pub fn initialize(&mut self) {
        if self.load == LoadState::Idle {
            self.load = LoadState::Pending;
            log::debug!("Pile load requested (key {})", self.storage_key);
        }
    }

    /// Add a squad to the top of the pile
    pub fn add_entry(&mut self, name: &str, quantity_input: &str) -> Result<EntryId, ValidationError> {
        self.add_entry_at(name, quantity_input, platform::now_ms())
    }

    /// [`add_entry`](Self::add_entry) with an explicit clock reading
    pub fn add_entry_at(
        &mut self,
        name: &str,
        quantity_input: &str,
        now_ms: u64,
    ) -> Result<EntryId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let quantity = parse_quantity(quantity_input);
        let id = self.allocate_id(now_ms);
        self.entries
            .push(BacklogEntry::new(id.clone(), name, quantity));
        log::info!("Added {} x{} ({})", name, quantity, id);

        self.mark_changed(now_ms);
        Ok(id)
    }

    /// Advance an entry's paint status; unknown ids are ignored
    pub fn cycle_status(&mut self, id: &EntryId) -> Option<PaintStatus> {
        let entry = self.entries.iter_mut().find(|e| &e.id == id)?;
        let status = entry.cycle();
        log::info!("{} is now {}", entry.name, status.label());

        self.mark_changed(platform::now_ms());
        Some(status)
    }

    /// Remove an entry; unknown ids are ignored
    pub fn delete_entry(&mut self, id: &EntryId) -> Option<BacklogEntry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        let removed = self.entries.remove(index);
        log::info!("Deleted {} ({})", removed.name, removed.id);

        self.mark_changed(platform::now_ms());
        Some(removed)
    }

    /// Current pile, oldest first
    pub fn snapshot(&self) -> &[BacklogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&BacklogEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Changes not yet handed to the store
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The stored pile has been read (or found missing)
    pub fn is_loaded(&self) -> bool {
        self.load == LoadState::Done
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// One persistence step: serve the load (requesting it if `initialize`
    /// was skipped), then write the current pile once the debounce window
    /// since the last change has passed.
    pub fn pump(&mut self, now_ms: u64) {
        self.ensure_loaded();

        if self.dirty && now_ms.saturating_sub(self.last_change_ms) >= self.save_debounce_ms {
            self.save_now(now_ms);
        }
    }

    /// Write immediately if anything is unsaved, ignoring the debounce
    pub fn flush(&mut self) {
        self.ensure_loaded();

        if self.dirty {
            self.save_now(platform::now_ms());
        }
    }

    /// The stored pile is always read before anything is written over it
    fn ensure_loaded(&mut self) {
        if self.load != LoadState::Done {
            self.initialize();
            self.complete_load();
        }
    }

    fn mark_changed(&mut self, now_ms: u64) {
        self.dirty = true;
        self.last_change_ms = now_ms;
        if self.load != LoadState::Done {
            self.touched_before_load = true;
        }
    }

    /// Time-based id, strictly increasing within this controller and never
    /// equal to an id already on the pile
    fn allocate_id(&mut self, now_ms: u64) -> EntryId {
        let mut candidate = now_ms.max(self.last_id_ms.saturating_add(1));
        loop {
            let id = EntryId::new(candidate.to_string());
            if self.get(&id).is_none() {
                self.last_id_ms = candidate;
                return id;
            }
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => return self.allocate_fallback_id(now_ms),
            }
        }
    }

    /// Numeric ids are exhausted (a stored id sits at `u64::MAX`)
    fn allocate_fallback_id(&mut self, now_ms: u64) -> EntryId {
        loop {
            self.fallback_seq += 1;
            let id = EntryId::new(format!("{now_ms}-{}", self.fallback_seq));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn complete_load(&mut self) {
        self.load = LoadState::Done;

        let bytes = match self.store.load(&self.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("No saved pile found, starting fresh");
                return;
            }
            Err(e) => {
                log::warn!("Could not read saved pile: {e}");
                return;
            }
        };

        match persistence::decode(&bytes) {
            Ok(loaded) => self.adopt(loaded),
            Err(e) => log::warn!("Discarding unreadable saved pile: {e}"),
        }
    }

    fn adopt(&mut self, loaded: Vec<BacklogEntry>) {
        if let Some(newest) = loaded.iter().filter_map(|e| e.id.timestamp_ms()).max() {
            self.last_id_ms = self.last_id_ms.max(newest);
        }
        log::info!("Loaded {} entries", loaded.len());

        if !self.touched_before_load {
            self.entries = loaded;
            return;
        }

        // Entries added before the load finished go on top of the stored pile
        let session = std::mem::replace(&mut self.entries, loaded);
        for mut entry in session {
            if self.get(&entry.id).is_some() {
                let id = self.allocate_id(entry.id.timestamp_ms().unwrap_or(0));
                log::info!("Renumbered {} from {} to {}", entry.name, entry.id, id);
                entry.id = id;
            }
            self.entries.push(entry);
        }
        self.dirty = true;
    }

    /// Write the current pile. A failed write stays dirty and is retried
    /// after another debounce window.
    fn save_now(&mut self, now_ms: u64) {
        self.dirty = false;

        let bytes = match persistence::encode(&self.entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not encode pile: {e}");
                return;
            }
        };

        match self.store.save(&self.storage_key, &bytes) {
            Ok(()) => log::debug!("Pile saved ({} entries)", self.entries.len()),
            Err(e) => {
                log::warn!("Pile save failed, will retry: {e}");
                self.dirty = true;
                self.last_change_ms = now_ms;
            }
        }
    }
}
