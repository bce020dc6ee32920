use serde::{de::DeserializeOwned, Serialize};
use teller_lib::store::{Persisted, SnapshotStore};

use crate::config;

/// Snapshot store backed by one confy file per key under the user's config
/// directory.
///
/// Storage trouble never surfaces to the user: an unreadable or corrupt
/// file loads as absent, and a failed write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfyStore;

impl SnapshotStore for ConfyStore {
    fn load<T>(&self, key: &str) -> Option<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        confy::load(config::BIN_NAME, key).ok()
    }

    fn save<T>(&self, key: &str, value: &T) -> Persisted
    where
        T: Serialize,
    {
        match confy::store(config::BIN_NAME, key, value) {
            Ok(()) => Persisted::Stored,
            Err(e) => {
                tracing::debug!("dropped snapshot write under `{key}`: {e}");
                Persisted::Dropped
            }
        }
    }
}
