//! Gateway configuration.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for [`crate::HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Client-side request timeout. `None` leaves timeouts to the backend.
    pub request_timeout: Option<Duration>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            user_agent: format!("serverwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    /// Create a configuration pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a client-side request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the base URL parses and uses http(s).
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}
