//! Cached account view

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::{Container, FetchSequence};
use crate::persist;
use crate::service::AccountService;
use crate::store::SnapshotStore;
use crate::types::Money;

/// Last known view of the bound account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSnapshot {
    /// Server-side identifier, once a fetch has succeeded.
    pub account_id: Option<Uuid>,
    /// Last confirmed balance.
    pub balance: Option<Money>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Displayable failure of the most recent fetch.
    pub error: Option<String>,
    /// When the snapshot was last confirmed against the service.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// Store of the [`AccountSnapshot`].
///
/// The balance is only ever written from a server response — a fetch or a
/// confirmed transfer receipt — never optimistically.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    container: Container<AccountSnapshot>,
    fetches: Arc<FetchSequence>,
}

impl AccountStore {
    /// Logical name; also the stem of the persistence key.
    pub const NAME: &'static str = "account";

    /// The underlying container.
    #[must_use]
    pub fn container(&self) -> &Container<AccountSnapshot> {
        &self.container
    }

    /// Rehydrate from `store` and persist every subsequent change.
    pub fn bind<K>(&self, store: K)
    where
        K: SnapshotStore + Send + 'static,
    {
        persist::bind(&self.container, Self::NAME, store);
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AccountSnapshot {
        self.container.state()
    }

    /// Fetch the account and record the outcome.
    ///
    /// Resolution follows the service: a non-blank `explicit` wins over the
    /// bound settings id. With neither set this is a no-op — an unbound
    /// session has nothing to refresh. While the fetch is in flight the
    /// snapshot is `loading` with the previous error cleared; completion
    /// records either the fresh summary or a displayable error, and always
    /// clears `loading`. A completion that lost the race to a newer fetch
    /// is discarded.
    pub async fn refresh(&self, accounts: &AccountService, explicit: Option<&str>) {
        let account_id = match accounts.resolve_account_id(explicit) {
            Ok(id) => id,
            Err(_) => return,
        };

        let seq = self.fetches.begin();
        self.container.mutate(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });

        let outcome = accounts.account(Some(account_id.as_str())).await;

        if !self.fetches.try_apply(seq) {
            tracing::debug!(seq, "discarding stale account fetch");
            return;
        }

        self.container.mutate(|snapshot| {
            match &outcome {
                Ok(summary) => {
                    snapshot.account_id = Some(summary.account_id);
                    snapshot.balance = Some(summary.balance);
                    snapshot.last_fetched_at = Some(Utc::now());
                }
                Err(e) => snapshot.error = Some(e.to_string()),
            }
            snapshot.loading = false;
        });
    }

    /// Record a balance confirmed by a transfer receipt.
    ///
    /// Claims a fetch ticket, so an in-flight fetch issued earlier cannot
    /// overwrite the confirmed value when it finally completes.
    pub fn record_balance(&self, account_id: Uuid, balance: Money) {
        let seq = self.fetches.begin();
        if !self.fetches.try_apply(seq) {
            return;
        }

        self.container.mutate(|snapshot| {
            snapshot.account_id = Some(account_id);
            snapshot.balance = Some(balance);
            snapshot.error = None;
            snapshot.loading = false;
            snapshot.last_fetched_at = Some(Utc::now());
        });
    }

    /// Reset every field to its initializer.
    pub fn clear(&self) {
        self.container
            .mutate(|snapshot| *snapshot = AccountSnapshot::default());
    }
}
