//! Account operations
//!
//! Stateless operations against the account service. Every operation first
//! resolves the target account id — explicit argument over the bound
//! settings value — and fails with [`Error::MissingAccountId`] before any
//! network traffic when neither is set.

use chrono::SecondsFormat;
use tracing::instrument;

use crate::client::Client;
use crate::error::Error;
use crate::state::SettingsStore;
use crate::types::{
    AccountSummary, DateRange, DepositReceipt, StatementFormat, TimeRange, Transaction,
    TransferRequest, WithdrawReceipt,
};

/// Operations on the account bound to a session.
///
/// Holds no state beyond the transport client and the settings handle it
/// resolves account ids from. Performs no automatic retries: a caller
/// retrying a failed transfer must reuse the original
/// [`OperationId`](crate::types::OperationId).
#[derive(Debug, Clone)]
pub struct AccountService {
    client: Client,
    settings: SettingsStore,
}

impl AccountService {
    /// A service resolving ids from `settings` and talking through
    /// `client`.
    #[must_use]
    pub fn new(client: Client, settings: SettingsStore) -> Self {
        Self { client, settings }
    }

    /// The settings handle this service resolves account ids from.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Resolve the target account id: a non-blank `explicit` wins, else the
    /// bound settings value. Both are trimmed.
    ///
    /// # Errors
    ///
    /// [`Error::MissingAccountId`] when neither yields a non-empty id; no
    /// network call has been made at that point.
    pub fn resolve_account_id(&self, explicit: Option<&str>) -> Result<String, Error> {
        let explicit = explicit.map(str::trim).filter(|id| !id.is_empty());
        let resolved = match explicit {
            Some(id) => id.to_owned(),
            None => self.settings.account_id().trim().to_owned(),
        };

        if resolved.is_empty() {
            return Err(Error::MissingAccountId);
        }
        Ok(resolved)
    }

    /// Fetch the account — a point-in-time read with no idempotency
    /// concerns, safe to retry freely.
    ///
    /// # Errors
    ///
    /// Resolution, transport, and rejection errors per [`Error`].
    #[instrument(skip(self))]
    pub async fn account(&self, explicit: Option<&str>) -> Result<AccountSummary, Error> {
        let id = self.resolve_account_id(explicit)?;
        self.client.get_json(&format!("v1/accounts/{id}"), &[]).await
    }

    /// Deposit into the bound account.
    ///
    /// Replaying an operation id the service has already seen is safe: it
    /// answers with the stored result and
    /// [`applied`](DepositReceipt::applied) set to `false`. Both outcomes
    /// are success.
    ///
    /// # Errors
    ///
    /// Resolution, transport, and rejection errors per [`Error`].
    #[instrument(skip(self, request), fields(operation_id = %request.operation_id))]
    pub async fn deposit(&self, request: &TransferRequest) -> Result<DepositReceipt, Error> {
        let id = self.resolve_account_id(None)?;
        self.client
            .post_json(&format!("v1/accounts/{id}/deposit"), request)
            .await
    }

    /// Withdraw from the bound account, under the same idempotency
    /// contract as [`deposit`](AccountService::deposit).
    ///
    /// # Errors
    ///
    /// Insufficient funds arrives as [`Error::Rejected`] with the
    /// service's status and `INSUFFICIENT_FUNDS` code — a business
    /// rejection, distinct from transport failure and not retryable as-is.
    #[instrument(skip(self, request), fields(operation_id = %request.operation_id))]
    pub async fn withdraw(&self, request: &TransferRequest) -> Result<WithdrawReceipt, Error> {
        let id = self.resolve_account_id(None)?;
        self.client
            .post_json(&format!("v1/accounts/{id}/withdraw"), request)
            .await
    }

    /// List the account's transactions, in the order the service returns
    /// them (chronological). Every call re-fetches.
    ///
    /// # Errors
    ///
    /// Resolution, transport, and rejection errors per [`Error`].
    #[instrument(skip(self))]
    pub async fn transactions(&self, range: Option<TimeRange>) -> Result<Vec<Transaction>, Error> {
        let id = self.resolve_account_id(None)?;

        let mut query = Vec::new();
        if let Some(range) = range {
            if let Some(from) = range.from {
                query.push(("from", from.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }
            if let Some(to) = range.to {
                query.push(("to", to.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }
        }

        self.client
            .get_json(&format!("v1/accounts/{id}/transactions"), &query)
            .await
    }

    /// Export a statement as an opaque document in `format`.
    ///
    /// The document is not parsed here; it is for download or display
    /// as-is.
    ///
    /// # Errors
    ///
    /// Resolution, transport, and rejection errors per [`Error`].
    #[instrument(skip(self))]
    pub async fn statement(
        &self,
        range: Option<DateRange>,
        format: StatementFormat,
    ) -> Result<String, Error> {
        let id = self.resolve_account_id(None)?;

        let mut query = Vec::new();
        if let Some(range) = range {
            if let Some(from) = range.from {
                query.push(("from", from.to_string()));
            }
            if let Some(to) = range.to {
                query.push(("to", to.to_string()));
            }
        }

        self.client
            .get_text(
                &format!("v1/accounts/{id}/statement"),
                &query,
                format.accept(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::AccountService;
    use crate::client::{Client, DEFAULT_TIMEOUT};
    use crate::state::SettingsStore;

    #[test_case(Some(" acct-9 "), "acct-1" => Some("acct-9".to_owned()) ; "explicit wins and is trimmed")]
    #[test_case(None, " acct-1 " => Some("acct-1".to_owned()) ; "falls back to trimmed settings")]
    #[test_case(Some("   "), "acct-1" => Some("acct-1".to_owned()) ; "blank explicit falls through")]
    #[test_case(Some("   "), "" => None ; "blank everywhere fails")]
    #[test_case(None, "   " => None ; "whitespace settings fails")]
    #[test_case(None, "" => None ; "empty settings fails")]
    fn resolve(explicit: Option<&str>, bound: &str) -> Option<String> {
        let settings = SettingsStore::default();
        settings.set_account_id(bound);
        let service = AccountService::new(
            Client::new("http://localhost:8080", DEFAULT_TIMEOUT).unwrap(),
            settings,
        );

        service.resolve_account_id(explicit).ok()
    }
}
