//! Typed dispatch layer for JSON-RPC style remote APIs.
//!
//! Callers name a method, optionally supply parameters, and get back a typed
//! value. Transport faults and malformed responses are normalized into one
//! error type, [`RemoteApiError`].
//!
//! # Architecture
//!
//! - [`protocol`]: request builder and error envelope parsing
//! - [`interpret`]: pure response interpreters (primitive, list, object,
//!   capability, success-only, method types)
//! - [`client`]: the dispatch core and the typed call shapes
//! - [`transport`]: the [`Transport`] trait and its HTTP implementation
//! - [`config`]: JSON client configuration
//! - [`error`]: [`RemoteApiError`] and [`InterpretError`]
//!
//! # Example
//!
//! ```no_run
//! use tether_rpc::{ApiClient, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig {
//!     endpoint: Some("http://192.168.122.1:8080/sony/camera".to_string()),
//!     ..ClientConfig::default()
//! };
//! let client = ApiClient::from_config(&config)?;
//!
//! for version in client.get_versions().await? {
//!     println!("{version}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod interpret;
pub mod protocol;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, ConfigError};
pub use endpoint::Endpoint;
pub use error::{InterpretError, RemoteApiError, Result};
pub use interpret::ValueKind;
pub use protocol::{DEFAULT_REQUEST_ID, ErrorEnvelope, GET_METHOD_TYPES, GET_VERSIONS, Request};
pub use transport::{HttpTransport, Transport, TransportError};

pub use tether_types::{ApiVersion, Capability, MethodType, StatusCode};
