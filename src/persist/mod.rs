//! Cart persistence
//!
//! Bridges the cart engine to a durable per-client snapshot store so carts
//! survive reloads. The bridge only reads and writes whole serialized
//! snapshots; it never decides stock rules, and a snapshot that cannot be
//! read is recovered from by starting empty, never by failing the caller.

use std::fmt;

use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cart::{Cart, CartLine};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`SnapshotStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable value could not be read.
    #[error("snapshot storage read failed")]
    Read(#[source] std::io::Error),

    /// The durable value could not be written.
    #[error("snapshot storage write failed")]
    Write(#[source] std::io::Error),
}

/// Errors raised by the persistence bridge.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The durable snapshot could not be read. Recovered from by starting
    /// with an empty cart.
    #[error("failed to read persisted cart")]
    Read(#[source] StoreError),

    /// The durable snapshot could not be written. Non-fatal: the in-memory
    /// cart remains authoritative.
    #[error("failed to write persisted cart")]
    Write(#[source] StoreError),

    /// The durable snapshot did not parse as a cart.
    #[error("malformed cart snapshot")]
    Malformed(#[from] serde_json::Error),
}

/// A durable store holding at most one serialized cart snapshot.
///
/// The value is shared across clients of the same storage key (for example
/// same-origin tabs); every write replaces the whole value.
#[automock]
pub trait SnapshotStore: Send + Sync {
    /// Reads the current snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the underlying storage cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored snapshot wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the underlying storage cannot be written.
    fn save(&self, snapshot: &str) -> Result<(), StoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}

/// The serialized form of a cart: the full line list and the last-modified
/// stamp. Round-tripping preserves line contents and order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Cart lines in insertion order.
    pub lines: Vec<CartLine>,

    /// When the cart was last mutated.
    pub updated_at: Timestamp,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            updated_at: cart.updated_at(),
        }
    }
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        Cart::restore(snapshot.lines, snapshot.updated_at)
    }
}

/// Synchronizes a [`Cart`] with a [`SnapshotStore`].
///
/// The bridge remembers the last raw snapshot it read or wrote, which is how
/// [`CartBridge::sync_external`] detects that another writer has replaced
/// the durable value. Conflicts resolve by whole-snapshot last-writer-wins;
/// snapshots are never merged field-by-field.
pub struct CartBridge<S> {
    store: S,
    last_seen: Option<String>,
    listener: Option<Box<dyn Fn(&Cart) + Send + Sync>>,
}

impl<S> fmt::Debug for CartBridge<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartBridge")
            .field("store", &self.store)
            .field("last_seen", &self.last_seen.is_some())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl<S: SnapshotStore> CartBridge<S> {
    /// Creates a bridge over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_seen: None,
            listener: None,
        }
    }

    /// Registers a callback fired whenever [`CartBridge::sync_external`]
    /// replaces the in-memory cart with an externally written snapshot.
    #[must_use]
    pub fn with_change_listener(mut self, listener: impl Fn(&Cart) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Loads the persisted cart, or an empty one.
    ///
    /// Absent or malformed snapshots are logged and recovered from by
    /// starting empty; loading is never fatal.
    pub fn load(&mut self) -> Cart {
        match self.try_load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(%error, "could not load persisted cart, starting empty");
                Cart::new()
            }
        }
    }

    /// Loads the persisted cart, surfacing failures to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Read`] if the store cannot be read, or
    /// [`PersistError::Malformed`] if the snapshot does not parse.
    pub fn try_load(&mut self) -> Result<Option<Cart>, PersistError> {
        let Some(raw) = self.store.load().map_err(PersistError::Read)? else {
            self.last_seen = None;
            return Ok(None);
        };

        let snapshot: CartSnapshot = serde_json::from_str(&raw)?;
        self.last_seen = Some(raw);

        Ok(Some(Cart::from(snapshot)))
    }

    /// Writes the cart's full line list to the durable store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Write`] if the store cannot be written, or
    /// [`PersistError::Malformed`] if serialization fails. Both are
    /// non-fatal from the cart's perspective: in-memory state stays
    /// authoritative.
    pub fn persist(&mut self, cart: &Cart) -> Result<(), PersistError> {
        let raw = serde_json::to_string(&CartSnapshot::from(cart))?;

        self.store.save(&raw).map_err(PersistError::Write)?;
        self.last_seen = Some(raw);

        Ok(())
    }

    /// Writes the cart, downgrading failures to a warning. Returns whether
    /// the write succeeded.
    pub fn persist_or_warn(&mut self, cart: &Cart) -> bool {
        match self.persist(cart) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "could not persist cart, keeping in-memory state");
                false
            }
        }
    }

    /// Re-reads the store and, if another writer replaced the snapshot since
    /// this bridge last touched it, overwrites the in-memory cart wholesale
    /// and fires the change listener. Returns whether the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Read`] if the store cannot be read, or
    /// [`PersistError::Malformed`] if the external snapshot does not parse;
    /// in both cases the in-memory cart is left untouched.
    pub fn sync_external(&mut self, cart: &mut Cart) -> Result<bool, PersistError> {
        let latest = self.store.load().map_err(PersistError::Read)?;

        if latest == self.last_seen {
            return Ok(false);
        }

        match &latest {
            Some(raw) => {
                let snapshot: CartSnapshot = serde_json::from_str(raw)?;
                *cart = Cart::from(snapshot);
            }
            None => {
                // The external writer cleared the durable value.
                *cart = Cart::new();
            }
        }

        self.last_seen = latest;
        debug!("cart resynchronized from external snapshot change");

        if let Some(listener) = &self.listener {
            listener(cart);
        }

        Ok(true)
    }
}
