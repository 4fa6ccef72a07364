//! JSON-RPC 2.0 envelope types.
//!
//! The agent only ever *receives* requests and notifications and only ever
//! *sends* responses and notifications, so the types here are split along
//! that line: [`IncomingMessage`] classifies whatever the client wrote, and
//! [`JsonRpcResponse`] / [`JsonRpcNotification`] are what goes back out.
//!
//! # Example
//!
//! ```
//! use mock_acp_agent::protocol::{IncomingMessage, JsonRpcResponse};
//! use serde_json::json;
//!
//! let incoming = IncomingMessage::from_value(json!({
//!     "jsonrpc": "2.0",
//!     "id": 7,
//!     "method": "initialize"
//! }))
//! .unwrap();
//! assert_eq!(incoming.method(), Some("initialize"));
//!
//! let response = JsonRpcResponse::success(json!(7), json!({}));
//! let line = serde_json::to_string(&response).unwrap();
//! assert!(line.contains("\"jsonrpc\":\"2.0\""));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version string carried by every outgoing message.
pub const JSONRPC_VERSION: &str = "2.0";

/// The method does not exist or is not available.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Implementation-defined server error; used for the induced prompt failure.
pub const SERVER_ERROR: i32 = -32000;

/// A message read from the client, classified by envelope shape.
///
/// An `id` of JSON `null` counts as absent, so `{"id": null, "method": ..}`
/// is a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Has a non-null id and a method; expects exactly one response.
    Request {
        /// Identifier to echo in the response, any non-null JSON value.
        id: Value,
        /// Method name.
        method: String,
        /// Parameters, `{}` when absent or not an object.
        params: Value,
    },
    /// Has a method but no id; never answered.
    Notification {
        /// Method name.
        method: String,
        /// Parameters, `{}` when absent or not an object.
        params: Value,
    },
    /// A response from the client to a request we never sent.
    Response {
        /// Identifier the client attached.
        id: Value,
    },
}

impl IncomingMessage {
    /// Classifies a parsed JSON document.
    ///
    /// An object with a non-null id is a request unless it carries no
    /// `method` and does carry `result`/`error`, which makes it an inbound
    /// response. A request whose `method` is missing gets the empty string as
    /// its method name; a non-string `method` is rendered as JSON text. Both
    /// then fall through to method-not-found like any unknown method.
    ///
    /// Returns `None` when the value is not a JSON-RPC envelope at all: not
    /// an object, or an id-less object without a string `method`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut obj) = value else {
            return None;
        };

        let id = obj.remove("id").filter(|id| !id.is_null());
        let method = obj.remove("method");
        let params = normalize_params(obj.remove("params"));

        match (id, method) {
            (Some(id), None) if obj.contains_key("result") || obj.contains_key("error") => {
                Some(Self::Response { id })
            }
            (Some(id), method) => Some(Self::Request {
                id,
                method: method_name(method),
                params,
            }),
            (None, Some(Value::String(method))) => Some(Self::Notification { method, params }),
            (None, _) => None,
        }
    }

    /// Returns the method name, if this message carries one.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request { method, .. } | Self::Notification { method, .. } => Some(method),
            Self::Response { .. } => None,
        }
    }

    /// Returns the message id, if present.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        match self {
            Self::Request { id, .. } | Self::Response { id } => Some(id),
            Self::Notification { .. } => None,
        }
    }

    /// Returns the parameters, or `None` for inbound responses.
    #[must_use]
    pub fn params(&self) -> Option<&Value> {
        match self {
            Self::Request { params, .. } | Self::Notification { params, .. } => Some(params),
            Self::Response { .. } => None,
        }
    }

    /// Returns true if this is a notification (no id, no response expected).
    #[must_use]
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification { .. })
    }
}

fn method_name(method: Option<Value>) -> String {
    match method {
        Some(Value::String(name)) => name,
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn normalize_params(params: Option<Value>) -> Value {
    match params {
        Some(params @ Value::Object(_)) => params,
        _ => Value::Object(Map::new()),
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code (negative for predefined errors)
    code: i32,

    /// Human-readable error message
    message: String,

    /// Additional error data (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcError {
    /// Creates a new JSON-RPC error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the additional error data, if present.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Creates a Method not found error (-32601) naming the offending method.
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"), None)
    }

    /// Creates a server error (-32000) with the given message.
    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(SERVER_ERROR, message, None)
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

/// A JSON-RPC 2.0 response message.
///
/// Holds either a result or an error, never both; the constructors are the
/// only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version, always "2.0"
    jsonrpc: String,

    /// Request ID that this response corresponds to
    id: Value,

    /// Result value (present on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,

    /// Error object (present on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Creates a successful response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    #[must_use]
    pub fn new_error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Returns true if this response indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Returns true if this response indicates an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the request ID.
    #[must_use]
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// Returns the result value, if present.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Returns the error object, if present.
    #[must_use]
    pub fn error(&self) -> Option<&JsonRpcError> {
        self.error.as_ref()
    }
}

/// A one-way JSON-RPC 2.0 message sent by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// JSON-RPC version, always "2.0"
    jsonrpc: String,

    /// Method name
    method: String,

    /// Parameters, omitted from the wire when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the parameters, if present.
    #[must_use]
    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }
}
