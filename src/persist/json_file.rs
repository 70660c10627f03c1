//! File-backed snapshot store
//!
//! Persists the snapshot as a single JSON file, the native analogue of a
//! per-client durable storage key. An absent file means no snapshot; every
//! save replaces the whole file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::persist::{SnapshotStore, StoreError};

/// A [`SnapshotStore`] backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the given file path. The file is not created
    /// until the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::Read(error)),
        }
    }

    fn save(&self, snapshot: &str) -> Result<(), StoreError> {
        fs::write(&self.path, snapshot).map_err(StoreError::Write)
    }
}
