//! Shared data types for the tether remote API client.
//!
//! This crate provides the plain data types that cross the wire or are
//! handed back to callers of `tether-rpc`: status codes, API versions,
//! capability tuples and method descriptions. All types are serializable so
//! the CLI can print them as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status code reported by the remote service or assigned by the client.
///
/// Codes without a named variant are kept verbatim in [`StatusCode::Other`],
/// so converting any `i32` into a `StatusCode` and back is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StatusCode {
    Ok,
    Any,
    Timeout,
    IllegalArgument,
    IllegalDataFormat,
    IllegalRequest,
    IllegalResponse,
    IllegalState,
    IllegalType,
    IndexOutOfBounds,
    NoSuchElement,
    NoSuchField,
    NoSuchMethod,
    NullPointer,
    UnsupportedVersion,
    UnsupportedOperation,
    Unauthorized,
    Forbidden,
    NotAcceptable,
    RequestEntityTooLarge,
    RequestUriTooLong,
    NotImplemented,
    ServiceUnavailable,
    ShootingFail,
    CameraNotReady,
    AlreadyRunningPollingApi,
    StillCapturingNotFinished,
    SomeContentCouldNotBeDeleted,
    /// A code this client has no name for.
    Other(i32),
}

impl StatusCode {
    /// Numeric value of this code as it appears on the wire.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::Any => 1,
            StatusCode::Timeout => 2,
            StatusCode::IllegalArgument => 3,
            StatusCode::IllegalDataFormat => 4,
            StatusCode::IllegalRequest => 5,
            StatusCode::IllegalResponse => 6,
            StatusCode::IllegalState => 7,
            StatusCode::IllegalType => 8,
            StatusCode::IndexOutOfBounds => 9,
            StatusCode::NoSuchElement => 10,
            StatusCode::NoSuchField => 11,
            StatusCode::NoSuchMethod => 12,
            StatusCode::NullPointer => 13,
            StatusCode::UnsupportedVersion => 14,
            StatusCode::UnsupportedOperation => 15,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotAcceptable => 406,
            StatusCode::RequestEntityTooLarge => 413,
            StatusCode::RequestUriTooLong => 414,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::ShootingFail => 40400,
            StatusCode::CameraNotReady => 40401,
            StatusCode::AlreadyRunningPollingApi => 40402,
            StatusCode::StillCapturingNotFinished => 40403,
            StatusCode::SomeContentCouldNotBeDeleted => 41003,
            StatusCode::Other(code) => code,
        }
    }

    /// Short human readable name, e.g. `IllegalResponse`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Ok => "Ok",
            StatusCode::Any => "Any",
            StatusCode::Timeout => "Timeout",
            StatusCode::IllegalArgument => "IllegalArgument",
            StatusCode::IllegalDataFormat => "IllegalDataFormat",
            StatusCode::IllegalRequest => "IllegalRequest",
            StatusCode::IllegalResponse => "IllegalResponse",
            StatusCode::IllegalState => "IllegalState",
            StatusCode::IllegalType => "IllegalType",
            StatusCode::IndexOutOfBounds => "IndexOutOfBounds",
            StatusCode::NoSuchElement => "NoSuchElement",
            StatusCode::NoSuchField => "NoSuchField",
            StatusCode::NoSuchMethod => "NoSuchMethod",
            StatusCode::NullPointer => "NullPointer",
            StatusCode::UnsupportedVersion => "UnsupportedVersion",
            StatusCode::UnsupportedOperation => "UnsupportedOperation",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotAcceptable => "NotAcceptable",
            StatusCode::RequestEntityTooLarge => "RequestEntityTooLarge",
            StatusCode::RequestUriTooLong => "RequestUriTooLong",
            StatusCode::NotImplemented => "NotImplemented",
            StatusCode::ServiceUnavailable => "ServiceUnavailable",
            StatusCode::ShootingFail => "ShootingFail",
            StatusCode::CameraNotReady => "CameraNotReady",
            StatusCode::AlreadyRunningPollingApi => "AlreadyRunningPollingApi",
            StatusCode::StillCapturingNotFinished => "StillCapturingNotFinished",
            StatusCode::SomeContentCouldNotBeDeleted => "SomeContentCouldNotBeDeleted",
            StatusCode::Other(_) => "Other",
        }
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::Any,
            2 => StatusCode::Timeout,
            3 => StatusCode::IllegalArgument,
            4 => StatusCode::IllegalDataFormat,
            5 => StatusCode::IllegalRequest,
            6 => StatusCode::IllegalResponse,
            7 => StatusCode::IllegalState,
            8 => StatusCode::IllegalType,
            9 => StatusCode::IndexOutOfBounds,
            10 => StatusCode::NoSuchElement,
            11 => StatusCode::NoSuchField,
            12 => StatusCode::NoSuchMethod,
            13 => StatusCode::NullPointer,
            14 => StatusCode::UnsupportedVersion,
            15 => StatusCode::UnsupportedOperation,
            401 => StatusCode::Unauthorized,
            403 => StatusCode::Forbidden,
            406 => StatusCode::NotAcceptable,
            413 => StatusCode::RequestEntityTooLarge,
            414 => StatusCode::RequestUriTooLong,
            501 => StatusCode::NotImplemented,
            503 => StatusCode::ServiceUnavailable,
            40400 => StatusCode::ShootingFail,
            40401 => StatusCode::CameraNotReady,
            40402 => StatusCode::AlreadyRunningPollingApi,
            40403 => StatusCode::StillCapturingNotFinished,
            41003 => StatusCode::SomeContentCouldNotBeDeleted,
            other => StatusCode::Other(other),
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}

/// Version of a remote API method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
    #[serde(rename = "1.4")]
    V1_4,
}

impl ApiVersion {
    /// All known versions, oldest first.
    pub const ALL: [ApiVersion; 5] = [
        ApiVersion::V1_0,
        ApiVersion::V1_1,
        ApiVersion::V1_2,
        ApiVersion::V1_3,
        ApiVersion::V1_4,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1_0 => "1.0",
            ApiVersion::V1_1 => "1.1",
            ApiVersion::V1_2 => "1.2",
            ApiVersion::V1_3 => "1.3",
            ApiVersion::V1_4 => "1.4",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown API version: {0:?}")]
pub struct UnknownVersion(pub String);

impl FromStr for ApiVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiVersion::ALL
            .into_iter()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| UnknownVersion(s.to_string()))
    }
}

/// Current value of a tunable property plus the values it may be set to.
///
/// An empty candidate list means the property is reported but cannot be
/// adjusted right now. Serializes as `{"current": .., "candidates": [..]}`.
/// Read from the wire `[current, [..]]` form by the capability interpreter only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability<T> {
    current: T,
    candidates: Vec<T>,
}

impl<T> Capability<T> {
    /// Assemble a capability from an already decoded `[current, [candidates]]` pair.
    #[must_use]
    pub fn new(current: T, candidates: Vec<T>) -> Self {
        Self {
            current,
            candidates,
        }
    }

    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Candidate values in the order the server reported them.
    #[must_use]
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    #[must_use]
    pub fn is_adjustable(&self) -> bool {
        !self.candidates.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (T, Vec<T>) {
        (self.current, self.candidates)
    }
}

impl<T: PartialEq> Capability<T> {
    /// Whether `value` is one of the reported candidates.
    #[must_use]
    pub fn accepts(&self, value: &T) -> bool {
        self.candidates.contains(value)
    }
}

/// One API method as described by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodType {
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<String>,
    #[serde(default)]
    pub result_types: Vec<String>,
    pub version: String,
}

impl MethodType {
    #[must_use]
    pub fn parameter_arity(&self) -> usize {
        self.parameter_types.len()
    }

    #[must_use]
    pub fn result_arity(&self) -> usize {
        self.result_types.len()
    }

    /// The method version, if it is one this client knows.
    #[must_use]
    pub fn api_version(&self) -> Option<ApiVersion> {
        self.version.parse().ok()
    }
}
