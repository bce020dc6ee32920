//! Snapshot persistence binding
//!
//! Couples a [`Container`] to a [`SnapshotStore`]: load once at bind time,
//! then write the full record back after every change. The policy is
//! deliberately simple — no debouncing, no write coalescing, one write
//! attempt per mutation. Concurrent writers from other processes race and
//! the last physical write wins; the snapshot is a cache of
//! server-confirmed state, never the source of truth.

use serde::{de::DeserializeOwned, Serialize};

use crate::container::Container;
use crate::store::{Persisted, SnapshotStore};

/// The store key a container with logical name `name` persists under.
///
/// Deterministic and distinct per name; each container owns its key
/// exclusively and never reads another's.
#[must_use]
pub fn snapshot_key(name: &str) -> String {
    format!("state-{name}")
}

/// Rehydrate `container` from `store`, then keep persisting it.
///
/// A stored snapshot replaces the record in a single mutation. Records
/// carry `#[serde(default)]`, so fields the snapshot does not mention keep
/// their initializer values and a snapshot written by an older schema loads
/// cleanly. A snapshot that fails to parse is ignored and the record stays
/// at its initializer.
///
/// Call once per container, at startup, before any other mutation; only
/// changes made after the call are written back.
pub fn bind<S, K>(container: &Container<S>, name: &str, store: K)
where
    S: Clone + Serialize + DeserializeOwned + Default + Send + 'static,
    K: SnapshotStore + Send + 'static,
{
    let key = snapshot_key(name);

    if let Some(snapshot) = store.load::<S>(&key) {
        container.mutate(|state| *state = snapshot);
    }

    container
        .subscribe(move |state| {
            if store.save(&key, state) == Persisted::Dropped {
                tracing::debug!("snapshot write under `{key}` dropped");
            }
        })
        .detach();
}
