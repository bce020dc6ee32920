//! Session settings

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::persist;
use crate::store::SnapshotStore;

/// The session's settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Identifier of the bound account; empty while the session is
    /// unbound.
    pub account_id: String,
}

/// Store of the session [`Settings`].
///
/// A non-empty account id is the precondition for every account-mutating
/// operation; it is set by an explicit user action and cleared by its
/// logout counterpart, never implicitly.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    container: Container<Settings>,
}

impl SettingsStore {
    /// Logical name; also the stem of the persistence key.
    pub const NAME: &'static str = "settings";

    /// The underlying container.
    #[must_use]
    pub fn container(&self) -> &Container<Settings> {
        &self.container
    }

    /// Rehydrate from `store` and persist every subsequent change.
    pub fn bind<K>(&self, store: K)
    where
        K: SnapshotStore + Send + 'static,
    {
        persist::bind(&self.container, Self::NAME, store);
    }

    /// The bound account id; empty while unbound.
    #[must_use]
    pub fn account_id(&self) -> String {
        self.container.state().account_id
    }

    /// Bind the session to `account_id`.
    pub fn set_account_id(&self, account_id: &str) {
        let account_id = account_id.to_owned();
        self.container
            .mutate(move |settings| settings.account_id = account_id);
    }

    /// Unbind the session.
    pub fn clear(&self) {
        self.container.mutate(|settings| settings.account_id.clear());
    }
}
