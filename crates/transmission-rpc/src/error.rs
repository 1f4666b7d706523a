//! Error type for RPC calls.

use thiserror::Error;

/// Error type for Transmission RPC operations.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The daemon answered `401`: basic credentials are missing or wrong.
    #[error("authentication required")]
    Auth,

    /// The daemon did not report success. Carries the `result` field of the response body,
    /// if there was one.
    #[error("connection error: {}", .0.as_deref().unwrap_or("no result reported"))]
    Connection(Option<String>),

    /// The daemon kept asking for a new session beyond the configured limit.
    #[error("session id still rejected after {0} renewals")]
    SessionRetriesExhausted(u32),

    /// Network-level failure (DNS, connection refused, TLS, timeouts, ...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request could not be encoded, or a result could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured host, port and path do not form a valid URL.
    #[error("invalid RPC URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RpcError {
    /// The `result` reported by the daemon, for [`RpcError::Connection`] errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Connection(detail) => detail.as_deref(),
            _ => None,
        }
    }
}
