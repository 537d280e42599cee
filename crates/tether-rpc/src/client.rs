//! Dispatch core and typed call shapes.
//!
//! Every call goes through [`ApiClient::execute`]: one transport request,
//! then one interpreter over the raw body. Whatever goes wrong on the way is
//! folded into a single [`RemoteApiError`]. Server-reported errors keep their
//! code; everything else becomes `IllegalResponse`.
//!
//! Concrete endpoint methods are one-liners on top of the call shapes:
//!
//! ```no_run
//! use tether_rpc::{ApiClient, Result, ValueKind};
//! use tether_types::Capability;
//!
//! async fn exposure(client: &ApiClient) -> Result<Capability<i32>> {
//!     client
//!         .by_method_capability("getExposureCompensation", None, ValueKind::Primitive)
//!         .await
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use tether_types::{ApiVersion, Capability, MethodType, StatusCode};

use crate::config::{ClientConfig, ConfigError};
use crate::endpoint::Endpoint;
use crate::error::{InterpretError, RemoteApiError, Result};
use crate::interpret::{self, ValueKind};
use crate::protocol::{GET_METHOD_TYPES, GET_VERSIONS, Request};
use crate::transport::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpTransport, Transport, TransportError,
};

/// Client for one remote API endpoint.
///
/// Cheap to clone; clones share the transport. Holds no per-call state, so
/// concurrent calls are independent.
#[derive(Clone)]
pub struct ApiClient {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    default_version: ApiVersion,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("default_version", &self.default_version)
            .finish_non_exhaustive()
    }
}

/// Failure before it has been normalized
enum Failure {
    Transport(TransportError),
    Interpret(InterpretError),
}

impl ApiClient {
    #[must_use]
    pub fn new(endpoint: Endpoint, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint,
            transport: Arc::new(transport),
            default_version: ApiVersion::default(),
        }
    }

    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build an HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEndpoint` or `ConfigError::InvalidEndpoint`
    /// for a bad endpoint, and `ConfigError::Transport` if the HTTP client
    /// cannot be created.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        let endpoint = config.endpoint()?;
        let transport = HttpTransport::new(config.timeout(), &config.user_agent)?;
        Ok(Self {
            endpoint,
            transport: Arc::new(transport),
            default_version: config.default_version,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    /// Post `body` and interpret the response.
    ///
    /// This is the only place failures are classified: an
    /// [`InterpretError::Remote`] is returned as-is, any other interpreter or
    /// transport failure becomes `IllegalResponse`.
    ///
    /// # Errors
    ///
    /// Returns the server-reported error, or `IllegalResponse` for anything
    /// else that went wrong.
    pub async fn execute<T, F>(&self, body: String, interpreter: F) -> Result<T>
    where
        F: FnOnce(&str) -> std::result::Result<T, InterpretError> + Send,
        T: Send,
    {
        debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let outcome = match self.transport.post(&self.endpoint, body).await {
            Ok(raw) => interpreter(&raw).map_err(Failure::Interpret),
            Err(e) => Err(Failure::Transport(e)),
        };

        outcome.map_err(|failure| self.normalize(failure))
    }

    fn normalize(&self, failure: Failure) -> RemoteApiError {
        match failure {
            Failure::Interpret(InterpretError::Remote(reported)) => {
                debug!("{} reported {}", self.endpoint, reported);
                reported
            }
            Failure::Interpret(e) => {
                debug!("Malformed response from {}: {}", self.endpoint, e);
                RemoteApiError::illegal_response()
            }
            Failure::Transport(e) => {
                debug!("Transport failure for {}: {}", self.endpoint, e);
                RemoteApiError::illegal_response()
            }
        }
    }

    /// One value, decoded as `kind`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn single<T>(&self, request: &Request, kind: ValueKind) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let body = encode(request)?;
        self.execute(body, |raw| interpret::value(raw, kind)).await
    }

    /// A list of values in server order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn list<T>(&self, request: &Request, kind: ValueKind) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let body = encode(request)?;
        self.execute(body, |raw| interpret::values(raw, kind)).await
    }

    /// A `[current, [candidates...]]` capability.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn capability<T>(&self, request: &Request, kind: ValueKind) -> Result<Capability<T>>
    where
        T: DeserializeOwned + Send,
    {
        let body = encode(request)?;
        self.execute(body, |raw| interpret::capability(raw, kind))
            .await
    }

    /// A command with no result beyond success or a server error.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn no_value(&self, request: &Request) -> Result<()> {
        let body = encode(request)?;
        self.execute(body, interpret::success_only).await
    }

    /// [`ApiClient::single`] for a method without parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn by_method<T>(
        &self,
        method: &str,
        version: Option<ApiVersion>,
        kind: ValueKind,
    ) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.single(&self.method_request(method, version), kind)
            .await
    }

    /// [`ApiClient::list`] for a method without parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn by_method_list<T>(
        &self,
        method: &str,
        version: Option<ApiVersion>,
        kind: ValueKind,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.list(&self.method_request(method, version), kind).await
    }

    /// [`ApiClient::capability`] for a method without parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn by_method_capability<T>(
        &self,
        method: &str,
        version: Option<ApiVersion>,
        kind: ValueKind,
    ) -> Result<Capability<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.capability(&self.method_request(method, version), kind)
            .await
    }

    /// [`ApiClient::no_value`] for a method without parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn by_method_no_value(
        &self,
        method: &str,
        version: Option<ApiVersion>,
    ) -> Result<()> {
        self.no_value(&self.method_request(method, version)).await
    }

    /// Methods the server supports, optionally filtered to one version.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get_method_types(&self, version: Option<ApiVersion>) -> Result<Vec<MethodType>> {
        let filter = version.map(|v| v.to_string()).unwrap_or_default();
        let request = Request::new(GET_METHOD_TYPES)
            .with_version(ApiVersion::V1_0)
            .with_param(filter);
        let body = encode(&request)?;
        self.execute(body, interpret::method_types).await
    }

    /// API versions the server supports.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get_versions(&self) -> Result<Vec<String>> {
        self.by_method_list(GET_VERSIONS, Some(ApiVersion::V1_0), ValueKind::Primitive)
            .await
    }

    fn method_request(&self, method: &str, version: Option<ApiVersion>) -> Request {
        Request::new(method).with_version(version.unwrap_or(self.default_version))
    }
}

fn encode(request: &Request) -> Result<String> {
    request.to_body().map_err(|e| {
        debug!("Failed to encode request '{}': {}", request.method, e);
        RemoteApiError::new(StatusCode::IllegalRequest)
    })
}

/// Builder for [`ApiClient`]. An endpoint is required.
#[derive(Default)]
pub struct ApiClientBuilder {
    endpoint: Option<Endpoint>,
    transport: Option<Arc<dyn Transport>>,
    default_version: ApiVersion,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Use a custom transport instead of the default [`HttpTransport`].
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    #[must_use]
    pub fn default_version(mut self, version: ApiVersion) -> Self {
        self.default_version = version;
        self
    }

    /// Finish building the client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEndpoint` if no endpoint was set, and
    /// `ConfigError::Transport` if the default HTTP transport cannot be built.
    pub fn build(self) -> std::result::Result<ApiClient, ConfigError> {
        let endpoint = self.endpoint.ok_or(ConfigError::MissingEndpoint)?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)?),
        };

        Ok(ApiClient {
            endpoint,
            transport,
            default_version: self.default_version,
        })
    }
}
