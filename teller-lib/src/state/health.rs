//! Backend health view

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::container::{Container, FetchSequence};
use crate::persist;
use crate::store::SnapshotStore;

/// Health advertised by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// The service reported itself healthy.
    Up,
    /// The service reported itself unhealthy, or could not be reached.
    Down,
    /// No check has completed yet.
    #[default]
    Unknown,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Last known backend health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSnapshot {
    /// Reported status.
    pub status: HealthStatus,
    /// Raw payload of the last successful probe.
    pub details: Option<serde_json::Value>,
    /// When a check last completed, successfully or not.
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Store of the [`HealthSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct HealthStore {
    container: Container<HealthSnapshot>,
    checks: Arc<FetchSequence>,
}

impl HealthStore {
    /// Logical name; also the stem of the persistence key.
    pub const NAME: &'static str = "health";

    /// The underlying container.
    #[must_use]
    pub fn container(&self) -> &Container<HealthSnapshot> {
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
    pub fn snapshot(&self) -> HealthSnapshot {
        self.container.state()
    }

    /// Probe the backend and record the outcome.
    ///
    /// A transport failure records [`HealthStatus::Down`] — once a check
    /// has run, the status is never left at `Unknown`. The check always
    /// stamps `last_checked_at`. A completion that lost the race to a newer
    /// check is discarded.
    pub async fn check(&self, client: &Client) {
        let seq = self.checks.begin();
        let outcome = client.health().await;

        if !self.checks.try_apply(seq) {
            tracing::debug!(seq, "discarding stale health check");
            return;
        }

        self.container.mutate(|snapshot| {
            match &outcome {
                Ok(report) => {
                    snapshot.status = report.status;
                    snapshot.details = Some(report.details.clone());
                }
                Err(_) => snapshot.status = HealthStatus::Down,
            }
            snapshot.last_checked_at = Some(Utc::now());
        });
    }
}
