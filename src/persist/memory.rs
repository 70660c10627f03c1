//! In-memory snapshot store
//!
//! Holds the snapshot in a mutex-guarded slot. Used as the reference store
//! in tests; sharing one store between bridges through an `Arc` models two
//! tabs writing the same storage key.

use std::sync::{Mutex, PoisonError};

use crate::persist::{SnapshotStore, StoreError};

/// An in-process [`SnapshotStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored value directly, bypassing any bridge. This is how
    /// tests simulate an external writer.
    pub fn put(&self, raw: impl Into<String>) {
        *self.lock() = Some(raw.into());
    }

    /// Clears the stored value directly.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().clone())
    }

    fn save(&self, snapshot: &str) -> Result<(), StoreError> {
        *self.lock() = Some(snapshot.to_string());
        Ok(())
    }
}
