use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::config::ConfigError;

/// Address of the remote service, e.g. `http://192.168.122.1:8080/sony/camera`.
///
/// Always an absolute `http` or `https` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Parse and validate an endpoint address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEndpoint` if the address is empty, not a
    /// URL, or does not use the `http`/`https` scheme.
    pub fn parse(address: &str) -> Result<Self, ConfigError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ConfigError::invalid_endpoint(address, "address is empty"));
        }

        let url =
            Url::parse(address).map_err(|e| ConfigError::invalid_endpoint(address, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ConfigError::invalid_endpoint(
                address,
                format!("unsupported scheme '{other}'"),
            )),
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
