//! Session-aware RPC connector.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::{ConnectorConfig, Credentials};
use crate::error::RpcError;
use crate::request::RpcRequest;
use crate::sanitize::parse_body;
use crate::transport::{HttpRequest, HttpTransport, RawResponse, SESSION_ID_HEADER, Transport};


/// The value of `result` reported by the daemon on success.
const SUCCESS: &str = "success";

/// Connector for the Transmission JSON RPC endpoint.
///
/// The connector keeps the session token handed out by the daemon and renews it whenever the
/// daemon answers `409 Conflict`, so callers only ever see the outcome of the final attempt.
/// Calls take `&mut self`; share a connector between tasks by wrapping it in a mutex.
#[derive(Debug)]
pub struct Connector<T: Transport = HttpTransport> {
    config: ConnectorConfig,
    session_id: String,
    response: Option<RawResponse>,
    transport: T,
}

impl Connector {
    /// Creates a connector over HTTP. No connection is made until the first call.
    pub fn new(config: ConnectorConfig) -> Self {
        let transport = HttpTransport::new(config.accept_invalid_certs);
        Self::with_transport(config, transport)
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new(ConnectorConfig::default())
    }
}

/// What to do with a response.
#[derive(Debug)]
enum Outcome {
    /// The daemon wants the request again with this session token.
    RenewSession(String),
    /// The call is over.
    Done(Result<Value, RpcError>),
}

impl<T: Transport> Connector<T> {
    /// Creates a connector over a custom transport.
    pub fn with_transport(config: ConnectorConfig, transport: T) -> Self {
        Self {
            session_id: config.session_id.clone(),
            config,
            response: None,
            transport,
        }
    }

    /// The configuration the connector was created with.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// The daemon host.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The daemon port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Whether requests go over `https`.
    pub fn use_tls(&self) -> bool {
        self.config.use_tls
    }

    /// Path of the RPC endpoint.
    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    /// Basic authentication credentials, if configured.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.config.credentials.as_ref()
    }

    /// The current session token. Empty until the daemon hands one out.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The last response received, including responses that led to a session renewal.
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    /// The endpoint URL.
    pub fn url(&self) -> Result<Url, RpcError> {
        Ok(self.config.url()?)
    }

    /// Posts `params` as the JSON request body and returns the `arguments` of the response.
    ///
    /// A `409 Conflict` updates the session token from the response headers and sends the same
    /// body again. Any other response ends the call:
    /// - `401` fails with [`RpcError::Auth`];
    /// - `200` with a `result` of `"success"` returns `arguments` (`null` when absent);
    /// - everything else fails with [`RpcError::Connection`] carrying the reported `result`.
    pub async fn post<P>(&mut self, params: &P) -> Result<Value, RpcError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_string(params)?;
        let url = self.url()?;
        let mut renewals = 0;

        loop {
            let request = HttpRequest {
                url: url.clone(),
                session_id: self.session_id.clone(),
                body: body.clone(),
                credentials: self.config.credentials.clone(),
            };
            debug!("Posting RPC request to {url}");
            trace!("Request body: {body}");

            let response = self.transport.send(request).await?;
            debug!("Received RPC response with status {}", response.status);
            trace!("Response body: {}", response.body);

            let outcome = classify(&response);
            self.response = Some(response);

            match outcome {
                Outcome::RenewSession(session_id) => {
                    debug!("Daemon requested a new session, session id is now {session_id:?}");
                    self.session_id = session_id;
                    if self.config.max_session_retries == Some(renewals) {
                        warn!("Giving up after {renewals} session renewals");
                        return Err(RpcError::SessionRetriesExhausted(renewals));
                    }
                    renewals = renewals.saturating_add(1);
                }
                Outcome::Done(result) => {
                    if let Err(e) = &result {
                        warn!("RPC call failed: {e}");
                    }
                    return result;
                }
            }
        }
    }

    /// Posts an empty JSON object.
    pub async fn post_empty(&mut self) -> Result<Value, RpcError> {
        self.post(&Map::new()).await
    }

    /// Invokes an RPC method and returns its `arguments`.
    pub async fn call(
        &mut self,
        method: impl Into<String>,
        arguments: Value,
    ) -> Result<Value, RpcError> {
        self.post(&RpcRequest::new(method, arguments)).await
    }

    /// Invokes an RPC method and decodes its `arguments` into `R`.
    pub async fn call_as<R: DeserializeOwned>(
        &mut self,
        method: impl Into<String>,
        arguments: Value,
    ) -> Result<R, RpcError> {
        let value = self.call(method, arguments).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Decides between a session renewal, success and failure.
fn classify(response: &RawResponse) -> Outcome {
    match response.status.as_u16() {
        409 => Outcome::RenewSession(
            response
                .header(SESSION_ID_HEADER)
                .unwrap_or_default()
                .to_string(),
        ),
        401 => Outcome::Done(Err(RpcError::Auth)),
        status => {
            let mut body = parse_body(&response.body);
            let succeeded =
                status == 200 && body.get("result").and_then(Value::as_str) == Some(SUCCESS);
            if succeeded {
                Outcome::Done(Ok(body.remove("arguments").unwrap_or(Value::Null)))
            } else {
                Outcome::Done(Err(RpcError::Connection(result_detail(
                    body.remove("result"),
                ))))
            }
        }
    }
}

fn result_detail(result: Option<Value>) -> Option<String> {
    match result {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    }
}
