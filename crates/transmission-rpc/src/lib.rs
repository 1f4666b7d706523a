//! # Transmission RPC connector
//!
//! Talks to the JSON RPC endpoint of a Transmission daemon. The connector takes care of the
//! session handshake (the daemon answers `409 Conflict` with a fresh
//! `X-Transmission-Session-Id` until the client echoes it back) and of HTTP basic
//! authentication, and hands back the `arguments` of successful responses.
//!
//! usage:
//!
//! ```rust,ignore
//! use serde_json::json;
//! use transmission_rpc::{Connector, ConnectorConfig, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut connector = Connector::new(ConnectorConfig {
//!         credentials: Some(Credentials::new("admin", "secret")),
//!         ..Default::default()
//!     });
//!     let session = connector
//!         .post(&json!({ "method": "session-get", "arguments": {} }))
//!         .await?;
//!     println!("Daemon version: {}", session["version"]);
//!     Ok(())
//! }
//! ```
//!

mod config;
mod connector;
mod error;
mod request;
mod sanitize;
mod transport;

#[cfg(test)]
mod testutil;

#[cfg(test)]
use test_log as _;
#[cfg(test)]
use tracing_subscriber as _;
#[cfg(test)]
use wiremock as _;

pub use config::{ConnectorConfig, Credentials, DEFAULT_BASE_PATH, DEFAULT_HOST, DEFAULT_PORT};
pub use connector::Connector;
pub use error::RpcError;
pub use request::RpcRequest;
pub use sanitize::{decode_wide_escapes, parse_body};
pub use transport::{HttpRequest, HttpTransport, RawResponse, SESSION_ID_HEADER, Transport};
