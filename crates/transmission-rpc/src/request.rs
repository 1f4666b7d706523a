//! The request envelope understood by the daemon.

use serde::Serialize;
use serde_json::{Map, Value};

/// A Transmission RPC request: a method name, its arguments and an optional tag that the
/// daemon echoes back in the response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// The RPC method, e.g. `session-get`.
    pub method: String,
    /// The method arguments.
    pub arguments: Value,
    /// Optional tag echoed back by the daemon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u64>,
}

impl RpcRequest {
    /// Creates a request with the given arguments and no tag.
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
            tag: None,
        }
    }

    /// Creates a request with an empty argument map.
    pub fn without_arguments(method: impl Into<String>) -> Self {
        Self::new(method, Value::Object(Map::new()))
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = Some(tag);
        self
    }
}
