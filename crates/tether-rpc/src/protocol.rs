//! Wire types for the remote API.
//!
//! Requests are JSON-RPC style envelopes that carry a method version next to
//! the method name:
//!
//! ```text
//! {"method": "getVersions", "params": [], "id": 1, "version": "1.0"}
//! ```
//!
//! Responses carry either a `result` field or an `error` field. The error
//! field is conventionally `[code, message]`; the JSON-RPC 2.0 object form
//! `{"code": .., "message": ..}` is accepted as well.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tether_types::{ApiVersion, StatusCode};

pub const GET_VERSIONS: &str = "getVersions";
pub const GET_METHOD_TYPES: &str = "getMethodTypes";
pub const DEFAULT_REQUEST_ID: u64 = 1;

/// A single remote call: method name, version and positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
    pub id: u64,
    #[serde(default)]
    pub version: ApiVersion,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
            id: DEFAULT_REQUEST_ID,
            version: ApiVersion::default(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    /// Append one positional parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Value>) -> Self {
        self.params.push(param.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Serialize this request to the body posted to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A well-formed error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub status: StatusCode,
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Read the value of an `error` field.
    ///
    /// Accepts `[code]`, `[code, message, ...]` and `{"code": .., "message": ..}`.
    /// Returns `None` when the value has any other shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let (code, message) = match value {
            Value::Array(items) => (items.first()?, items.get(1)),
            Value::Object(fields) => (fields.get("code")?, fields.get("message")),
            _ => return None,
        };

        let code = i32::try_from(code.as_i64()?).ok()?;
        let message = match message {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => return None,
        };

        Some(Self {
            status: StatusCode::from(code),
            message,
        })
    }
}
