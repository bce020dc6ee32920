//! Wire and domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A currency-precision decimal amount.
pub type Money = rust_decimal::Decimal;

/// Client-generated idempotency token for a mutating operation.
///
/// Mint one with [`fresh`](OperationId::fresh) per logical user intent and
/// attach it to the request; when retrying that same intent after a timeout,
/// reuse the original id. The service detects a repeated id and replays the
/// stored result instead of applying the operation again, so a retry can
/// never move money twice. A retry path must never mint a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    /// A new id for a new logical operation.
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OperationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Body of a deposit or withdraw request.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Amount to move; the service rejects non-positive values.
    pub amount: Money,
    /// Idempotency token for this logical operation.
    pub operation_id: OperationId,
}

/// Point-in-time view of an account.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Server-side account identifier.
    pub account_id: Uuid,
    /// Current balance.
    pub balance: Money,
}

/// Outcome of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    /// Account the deposit targeted.
    pub account_id: Uuid,
    /// Balance after the operation.
    pub balance: Money,
    /// `false` when the operation id had been seen before and the stored
    /// result was replayed instead of moving money again. Both values mean
    /// the deposit succeeded; callers may use `false` to suppress a
    /// duplicate success notification.
    pub applied: bool,
}

/// Outcome of a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawReceipt {
    /// Account the withdrawal targeted.
    pub account_id: Uuid,
    /// Balance after the operation.
    pub balance: Money,
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money moved into the account.
    Deposit,
    /// Money moved out of the account.
    Withdrawal,
}

/// A server-authoritative ledger entry.
///
/// Only ever read from the service, never constructed locally.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Entry direction.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Amount moved.
    pub amount: Money,
    /// When the service applied the entry.
    pub timestamp: DateTime<Utc>,
    /// Balance after the entry.
    pub resulting_balance: Money,
}

/// Instant range filter for transaction listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

/// Date range filter for statement exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    /// First day to include.
    pub from: Option<NaiveDate>,
    /// Last day to include.
    pub to: Option<NaiveDate>,
}

/// Representation requested for a statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// `text/csv`, columns `date,operation,amount,balanceAfter`.
    Csv,
    /// `application/json`.
    Json,
}

impl StatementFormat {
    pub(crate) fn accept(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

/// Error payload returned by the service with a rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub operation_id: Option<Uuid>,
}
