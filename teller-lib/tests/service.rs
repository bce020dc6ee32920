//! End-to-end tests for the account service client, driven against an
//! in-process stub bank that tracks seen operation ids.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use teller_lib::state::HealthStatus;
use teller_lib::store::MemoryStore;
use teller_lib::types::{OperationId, StatementFormat, TransferRequest};
use teller_lib::{AccountService, Client, Error, Session, DEFAULT_TIMEOUT};

struct StubBank {
    account_id: Uuid,
    known: String,
    balance: Mutex<Decimal>,
    seen: Mutex<HashSet<Uuid>>,
    hits: AtomicUsize,
    healthy: bool,
}

impl StubBank {
    fn new(known: &str, balance: Decimal) -> Arc<Self> {
        Arc::new(Self {
            account_id: Uuid::new_v4(),
            known: known.to_owned(),
            balance: Mutex::new(balance),
            seen: Mutex::new(HashSet::new()),
            hits: AtomicUsize::new(0),
            healthy: true,
        })
    }

    fn unhealthy(known: &str, balance: Decimal) -> Arc<Self> {
        let mut bank = Self::new(known, balance);
        Arc::get_mut(&mut bank).unwrap().healthy = false;
        bank
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn balance(&self) -> Decimal {
        *self.balance.lock().unwrap()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferBody {
    amount: Decimal,
    operation_id: Uuid,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": "ACCOUNT_NOT_FOUND", "message": "Account not found"})),
    )
        .into_response()
}

async fn account(State(bank): State<Arc<StubBank>>, Path(id): Path<String>) -> Response {
    bank.hits.fetch_add(1, Ordering::SeqCst);
    if id != bank.known {
        return not_found();
    }
    Json(json!({"accountId": bank.account_id, "balance": bank.balance()})).into_response()
}

async fn deposit(
    State(bank): State<Arc<StubBank>>,
    Path(id): Path<String>,
    Json(body): Json<TransferBody>,
) -> Response {
    bank.hits.fetch_add(1, Ordering::SeqCst);
    if id != bank.known {
        return not_found();
    }

    let applied = bank.seen.lock().unwrap().insert(body.operation_id);
    let mut balance = bank.balance.lock().unwrap();
    if applied {
        *balance += body.amount;
    }

    let status = if applied {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({
            "accountId": bank.account_id,
            "balance": *balance,
            "applied": applied,
        })),
    )
        .into_response()
}

async fn withdraw(
    State(bank): State<Arc<StubBank>>,
    Path(id): Path<String>,
    Json(body): Json<TransferBody>,
) -> Response {
    bank.hits.fetch_add(1, Ordering::SeqCst);
    if id != bank.known {
        return not_found();
    }

    let already = bank.seen.lock().unwrap().contains(&body.operation_id);
    let mut balance = bank.balance.lock().unwrap();
    if !already {
        if body.amount > *balance {
            return (
                StatusCode::CONFLICT,
                Json(json!({"code": "INSUFFICIENT_FUNDS", "message": "Insufficient funds"})),
            )
                .into_response();
        }
        *balance -= body.amount;
        bank.seen.lock().unwrap().insert(body.operation_id);
    }

    Json(json!({"accountId": bank.account_id, "balance": *balance})).into_response()
}

async fn transactions(State(bank): State<Arc<StubBank>>, Path(id): Path<String>) -> Response {
    bank.hits.fetch_add(1, Ordering::SeqCst);
    if id != bank.known {
        return not_found();
    }
    Json(json!([
        {
            "type": "DEPOSIT",
            "amount": 100.0,
            "timestamp": "2024-01-01T10:00:00Z",
            "resultingBalance": 100.0
        },
        {
            "type": "WITHDRAWAL",
            "amount": 40.0,
            "timestamp": "2024-01-02T11:00:00Z",
            "resultingBalance": 60.0
        }
    ]))
    .into_response()
}

async fn statement(
    State(bank): State<Arc<StubBank>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    bank.hits.fetch_add(1, Ordering::SeqCst);
    if id != bank.known {
        return not_found();
    }

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("text/csv");
    if accept.contains("application/json") {
        return Json(json!([{"date": "2024-01-01T12:00:00Z", "operation": "DEPOSIT"}]))
            .into_response();
    }

    (
        [(header::CONTENT_TYPE, "text/csv")],
        "date,operation,amount,balanceAfter\n2024-01-01T12:00:00Z,DEPOSIT,10.00,80.00\n",
    )
        .into_response()
}

async fn health(State(bank): State<Arc<StubBank>>) -> Response {
    if bank.healthy {
        Json(json!({"status": "UP", "components": {"db": {"status": "UP"}}})).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"status": "DOWN"}))).into_response()
    }
}

async fn serve(bank: Arc<StubBank>) -> SocketAddr {
    let app = Router::new()
        .route("/v1/accounts/:id", get(account))
        .route("/v1/accounts/:id/deposit", post(deposit))
        .route("/v1/accounts/:id/withdraw", post(withdraw))
        .route("/v1/accounts/:id/transactions", get(transactions))
        .route("/v1/accounts/:id/statement", get(statement))
        .route("/actuator/health", get(health))
        .with_state(bank);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn bound_session(addr: SocketAddr, account_id: &str) -> (Session, AccountService, Client) {
    let client = Client::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let session = Session::new();
    session.settings.set_account_id(account_id);
    let accounts = AccountService::new(client.clone(), session.settings.clone());
    (session, accounts, client)
}

#[tokio::test]
async fn a_replayed_operation_id_moves_money_exactly_once() {
    let bank = StubBank::new("acct-1", dec!(100.00));
    let addr = serve(bank.clone()).await;
    let (_, accounts, _) = bound_session(addr, "acct-1");

    let request = TransferRequest {
        amount: dec!(50.00),
        operation_id: OperationId::fresh(),
    };

    let first = accounts.deposit(&request).await.unwrap();
    assert!(first.applied);
    assert_eq!(first.balance, dec!(150.00));

    // Same logical intent retried with the same id: replayed, not re-applied.
    let second = accounts.deposit(&request).await.unwrap();
    assert!(!second.applied);
    assert_eq!(second.balance, dec!(150.00));

    assert_eq!(bank.balance(), dec!(150.00));
}

#[tokio::test]
async fn distinct_operation_ids_apply_independently() {
    let bank = StubBank::new("acct-1", dec!(100.00));
    let addr = serve(bank.clone()).await;
    let (_, accounts, _) = bound_session(addr, "acct-1");

    for _ in 0..2 {
        let request = TransferRequest {
            amount: dec!(25.00),
            operation_id: OperationId::fresh(),
        };
        accounts.deposit(&request).await.unwrap();
    }

    assert_eq!(bank.balance(), dec!(150.00));
}

#[tokio::test]
async fn a_missing_account_id_fails_before_any_network_call() {
    let bank = StubBank::new("acct-1", dec!(100.00));
    let addr = serve(bank.clone()).await;
    let (session, accounts, _) = bound_session(addr, "");

    let request = TransferRequest {
        amount: dec!(50.00),
        operation_id: OperationId::fresh(),
    };

    assert!(matches!(
        accounts.deposit(&request).await,
        Err(Error::MissingAccountId)
    ));
    assert!(matches!(
        accounts.withdraw(&request).await,
        Err(Error::MissingAccountId)
    ));
    assert!(matches!(
        accounts.transactions(None).await,
        Err(Error::MissingAccountId)
    ));
    assert!(matches!(
        accounts.account(None).await,
        Err(Error::MissingAccountId)
    ));
    assert!(matches!(
        accounts.statement(None, StatementFormat::Csv).await,
        Err(Error::MissingAccountId)
    ));

    // Refreshing an unbound session is a no-op, not an error.
    session.account.refresh(&accounts, None).await;
    assert_eq!(session.account.snapshot(), Default::default());

    assert_eq!(bank.hits(), 0);
}

#[tokio::test]
async fn insufficient_funds_is_a_rejection_not_a_transport_failure() {
    let bank = StubBank::new("acct-1", dec!(10.00));
    let addr = serve(bank.clone()).await;
    let (_, accounts, _) = bound_session(addr, "acct-1");

    let request = TransferRequest {
        amount: dec!(500.00),
        operation_id: OperationId::fresh(),
    };

    let error = accounts.withdraw(&request).await.unwrap_err();
    assert!(error.is_rejection());
    match error {
        Error::Rejected { status, code, .. } => {
            assert_eq!(status, 409);
            assert_eq!(code, "INSUFFICIENT_FUNDS");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    assert_eq!(bank.balance(), dec!(10.00));
}

#[tokio::test]
async fn a_confirmed_deposit_lands_in_the_account_store() {
    let bank = StubBank::new("acct-1", dec!(100.00));
    let addr = serve(bank.clone()).await;
    let (session, accounts, _) = bound_session(addr, "acct-1");

    let receipt = accounts
        .deposit(&TransferRequest {
            amount: dec!(50.00),
            operation_id: OperationId::fresh(),
        })
        .await
        .unwrap();
    session.account.record_balance(receipt.account_id, receipt.balance);

    let snapshot = session.account.snapshot();
    assert_eq!(snapshot.account_id, Some(bank.account_id));
    assert_eq!(snapshot.balance, Some(dec!(150.00)));
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn a_refresh_populates_the_account_snapshot() {
    let bank = StubBank::new("acct-1", dec!(75.00));
    let addr = serve(bank.clone()).await;
    let (session, accounts, _) = bound_session(addr, "acct-1");

    session.account.refresh(&accounts, None).await;

    let snapshot = session.account.snapshot();
    assert_eq!(snapshot.balance, Some(dec!(75.00)));
    assert_eq!(snapshot.account_id, Some(bank.account_id));
    assert!(!snapshot.loading);
    assert!(snapshot.last_fetched_at.is_some());
}

#[tokio::test]
async fn a_failed_refresh_records_a_displayable_error() {
    let bank = StubBank::new("acct-1", dec!(75.00));
    let addr = serve(bank.clone()).await;
    let (session, accounts, _) = bound_session(addr, "acct-unknown");

    session.account.refresh(&accounts, None).await;

    let snapshot = session.account.snapshot();
    assert_eq!(snapshot.balance, None);
    assert!(!snapshot.loading);
    assert!(snapshot.error.unwrap().contains("ACCOUNT_NOT_FOUND"));
}

#[tokio::test]
async fn health_reports_down_for_an_unhealthy_backend() {
    let bank = StubBank::unhealthy("acct-1", dec!(0.00));
    let addr = serve(bank).await;
    let (session, _, client) = bound_session(addr, "acct-1");

    session.health.check(&client).await;

    let snapshot = session.health.snapshot();
    assert_eq!(snapshot.status, HealthStatus::Down);
    assert!(snapshot.last_checked_at.is_some());
}

#[tokio::test]
async fn health_reports_down_for_an_unreachable_backend() {
    // Nothing listens on this port; the probe fails at the transport.
    let client = Client::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap();
    let session = Session::new();

    session.health.check(&client).await;

    let snapshot = session.health.snapshot();
    assert_eq!(snapshot.status, HealthStatus::Down);
    assert!(snapshot.last_checked_at.is_some());
}

#[tokio::test]
async fn health_reports_up_with_details() {
    let bank = StubBank::new("acct-1", dec!(0.00));
    let addr = serve(bank).await;
    let (session, _, client) = bound_session(addr, "acct-1");

    session.health.check(&client).await;

    let snapshot = session.health.snapshot();
    assert_eq!(snapshot.status, HealthStatus::Up);
    assert_eq!(snapshot.details.unwrap()["status"], "UP");
}

#[tokio::test]
async fn transactions_arrive_in_server_order() {
    let bank = StubBank::new("acct-1", dec!(60.00));
    let addr = serve(bank).await;
    let (_, accounts, _) = bound_session(addr, "acct-1");

    let transactions = accounts.transactions(None).await.unwrap();

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount, dec!(100.00));
    assert_eq!(transactions[1].resulting_balance, dec!(60.00));
    assert!(transactions[0].timestamp < transactions[1].timestamp);
}

#[tokio::test]
async fn statements_are_content_negotiated_and_opaque() {
    let bank = StubBank::new("acct-1", dec!(80.00));
    let addr = serve(bank).await;
    let (_, accounts, _) = bound_session(addr, "acct-1");

    let csv = accounts.statement(None, StatementFormat::Csv).await.unwrap();
    assert!(csv.starts_with("date,operation,amount,balanceAfter"));

    let json = accounts
        .statement(None, StatementFormat::Json)
        .await
        .unwrap();
    assert!(json.trim_start().starts_with('['));
}

#[tokio::test]
async fn a_session_rehydrates_from_its_store() {
    let bank = StubBank::new("acct-1", dec!(100.00));
    let addr = serve(bank.clone()).await;
    let store = MemoryStore::new();

    {
        let client = Client::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
        let session = Session::restore(&store);
        session.settings.set_account_id("acct-1");
        let accounts = AccountService::new(client, session.settings.clone());
        session.account.refresh(&accounts, None).await;
    }

    // A new process over the same storage picks up where the last left off.
    let restored = Session::restore(&store);
    assert_eq!(restored.settings.account_id(), "acct-1");
    assert_eq!(restored.account.snapshot().balance, Some(dec!(100.00)));
    assert_eq!(restored.account.snapshot().account_id, Some(bank.account_id));
}
