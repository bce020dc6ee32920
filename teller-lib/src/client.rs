//! HTTP transport for the account service
//!
//! A thin wrapper over reqwest: one base URL, one fixed overall deadline,
//! and mapping of non-success responses into the [`Error`] taxonomy. No
//! retries happen at this layer; retry policy — and the idempotency-token
//! reuse it requires — belongs to callers.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::error::Error;
use crate::state::HealthStatus;
use crate::types::ApiError;

/// Default overall request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parsed result of a health probe.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Status the service advertises for itself.
    pub status: HealthStatus,
    /// The raw health payload, for display.
    pub details: serde_json::Value,
}

/// A client for one account service instance.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    /// Build a client for the service at `base_url`, applying `timeout` as
    /// the overall deadline of every request.
    ///
    /// # Errors
    ///
    /// [`Error::BaseUrl`] when the URL does not parse, [`Error::Transport`]
    /// when the underlying client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let mut normalized = base_url.trim().trim_end_matches('/').to_owned();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::BaseUrl(format!("{}: {e}", base_url.trim())))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::BaseUrl(format!("{path}: {e}")))
    }

    #[instrument(skip(self))]
    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.endpoint(path)?)
            .query(query)
            .send()
            .await?;
        Ok(Self::accepted(response).await?.json().await?)
    }

    #[instrument(skip(self, body))]
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        Ok(Self::accepted(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    pub(crate) async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
        accept: &'static str,
    ) -> Result<String, Error> {
        let response = self
            .http
            .get(self.endpoint(path)?)
            .header(ACCEPT, accept)
            .query(query)
            .send()
            .await?;
        Ok(Self::accepted(response).await?.text().await?)
    }

    /// Map a non-success response into [`Error::Rejected`], preserving the
    /// service's `{code, message}` body when it parses and falling back to
    /// the raw body otherwise.
    async fn accepted(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiError>(&raw) {
            Ok(api) => (api.code, api.message),
            Err(_) => (
                status.canonical_reason().unwrap_or("ERROR").to_owned(),
                raw,
            ),
        };

        Err(Error::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }

    /// Probe `GET /actuator/health`.
    ///
    /// Health endpoints report an unhealthy service with a non-success
    /// status and a `{"status": "DOWN", ...}` body, so the payload is read
    /// regardless of the response status.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; a well-formed `DOWN` payload is a
    /// successful probe, not an error.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, Error> {
        let response = self
            .http
            .get(self.endpoint("actuator/health")?)
            .send()
            .await?;
        let details: serde_json::Value = response.json().await?;

        let status = match details.get("status").and_then(serde_json::Value::as_str) {
            Some("UP") => HealthStatus::Up,
            Some("DOWN") => HealthStatus::Down,
            _ => HealthStatus::Unknown,
        };

        Ok(HealthReport { status, details })
    }
}
