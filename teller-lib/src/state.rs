//! Session state
//!
//! One store per logical domain — settings, account, health — each wrapping
//! an observable [`Container`](crate::container::Container) and owning its
//! mutation actions. A [`Session`] groups the three handles; build it once
//! at startup and pass it to whatever needs it.

mod account;
mod health;
mod settings;

pub use account::{AccountSnapshot, AccountStore};
pub use health::{HealthSnapshot, HealthStatus, HealthStore};
pub use settings::{Settings, SettingsStore};

use futures_util::future::join;

use crate::client::Client;
use crate::service::AccountService;
use crate::store::SnapshotStore;

/// The application's state handles, one per domain.
///
/// Containers live for the session's lifetime; cloning a `Session` clones
/// the handles, not the records.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Which account this session is bound to.
    pub settings: SettingsStore,
    /// Cached view of the bound account.
    pub account: AccountStore,
    /// Last known backend health.
    pub health: HealthStore,
}

impl Session {
    /// Fresh stores, all at their initializers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh stores rehydrated from `store` and snapshotted back to it on
    /// every subsequent change.
    pub fn restore<K>(store: &K) -> Self
    where
        K: SnapshotStore + Clone + Send + 'static,
    {
        let session = Self::new();
        session.settings.bind(store.clone());
        session.account.bind(store.clone());
        session.health.bind(store.clone());
        session
    }

    /// Refresh the account view and the backend health concurrently.
    pub async fn refresh(&self, accounts: &AccountService, client: &Client) {
        join(self.account.refresh(accounts, None), self.health.check(client)).await;
    }
}
