//! Durable snapshot storage
//!
//! Persistence is a convenience, not a correctness requirement: every
//! failure mode of the backing store collapses into "no snapshot" on read
//! and a discardable [`Persisted::Dropped`] on write. Nothing crosses this
//! boundary as an error, and nothing here may panic on a bad payload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

/// Outcome of a best-effort snapshot write.
///
/// Callers are allowed to discard this value; it exists so that ignoring a
/// persistence failure is a visible decision at the call site rather than
/// an invisible one inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The snapshot reached the backing store.
    Stored,
    /// The write failed and was deliberately ignored.
    Dropped,
}

/// A durable key/value store of serialized snapshots.
///
/// A missing key, a corrupt payload, and an unwritable backing store all
/// degrade the same way: `None` on read, [`Persisted::Dropped`] on write.
/// Implementations backed by files may materialize a default snapshot for
/// a key read before it was ever written, which is why [`load`] carries
/// `Serialize` and `Default` bounds.
///
/// [`load`]: SnapshotStore::load
pub trait SnapshotStore {
    /// Read and deserialize the snapshot under `key`, if one is present
    /// and parses.
    fn load<T>(&self, key: &str) -> Option<T>
    where
        T: Serialize + DeserializeOwned + Default;

    /// Serialize `value` under `key`, best-effort.
    fn save<T>(&self, key: &str, value: &T) -> Persisted
    where
        T: Serialize;
}

/// In-memory [`SnapshotStore`] for tests and embedded setups.
///
/// Clones share one underlying map, so a store handed to several
/// containers behaves like a single storage area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw serialized entry, bypassing serialization.
    ///
    /// Lets tests seed hand-written or deliberately corrupt payloads.
    pub fn put_raw(&self, key: &str, raw: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), raw.to_owned());
    }
}

impl SnapshotStore for MemoryStore {
    fn load<T>(&self, key: &str) -> Option<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let raw = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;
        serde_json::from_str(&raw).ok()
    }

    fn save<T>(&self, key: &str, value: &T) -> Persisted
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(raw) => {
                self.entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_owned(), raw);
                Persisted::Stored
            }
            Err(e) => {
                tracing::debug!("snapshot under `{key}` did not serialize: {e}");
                Persisted::Dropped
            }
        }
    }
}
