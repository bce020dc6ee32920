//! Failure taxonomy

/// Errors surfaced by the account service client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No explicit account id was given and none is bound in settings.
    ///
    /// Raised before any I/O; the request never leaves the process.
    #[error("no account id is bound; log in first or pass one explicitly")]
    MissingAccountId,

    /// The configured base URL does not parse.
    #[error("invalid api base url: {0}")]
    BaseUrl(String),

    /// Network-level failure: unreachable host, timeout, or a body that
    /// did not arrive intact. Propagated unchanged from the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The service understood the request and refused it — insufficient
    /// funds, validation failure, unknown account. Carries the
    /// server-supplied status and detail, and must not be retried as-is.
    #[error("{code}: {message}")]
    Rejected {
        /// HTTP status the service answered with.
        status: u16,
        /// Machine-readable code, e.g. `INSUFFICIENT_FUNDS`.
        code: String,
        /// Human-readable detail.
        message: String,
    },
}

impl Error {
    /// True for a business rejection, as opposed to a transport failure.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
