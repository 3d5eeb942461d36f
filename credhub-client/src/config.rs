//! CredHub client configuration and HTTP client building.

use crate::error::{CredHubError, CredHubResult};
use reqwest::{Client, ClientBuilder, Url};
use std::time::Duration;

/// Environment variable consulted for the default server address.
pub const CREDHUB_URL_ENV: &str = "CREDHUB_URL";

const DEFAULT_CREDHUB_URL: &str = "https://credhub.service.cf.internal:8844";

/// CredHub client configuration.
///
/// Transport concerns (timeouts, pooling) live here so they can be handed to
/// the HTTP client; the client itself never retries.
#[derive(Debug, Clone)]
pub struct CredHubConfig {
    /// CredHub server address
    pub base_url: String,
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for CredHubConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var(CREDHUB_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_CREDHUB_URL.to_string()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: concat!("credhub-client-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CredHubConfig {
    /// Create a new configuration for the given server.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set pool settings.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Parse and check the server address.
    ///
    /// # Errors
    ///
    /// Returns [`CredHubError::InvalidConfig`] if the address is not an
    /// absolute `http`/`https` URL.
    pub fn parsed_base_url(&self) -> CredHubResult<Url> {
        let url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|e| CredHubError::InvalidConfig(format!("base URL {}: {e}", self.base_url)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CredHubError::InvalidConfig(format!(
                "unsupported scheme {other} in base URL"
            ))),
        }
    }
}

/// Build a configured HTTP client.
///
/// Authentication (bearer tokens, mTLS identities) is not configured here;
/// callers needing it build their own client and hand it to
/// [`RestOperations::with_client`](crate::rest::RestOperations::with_client).
///
/// # Errors
///
/// Returns [`CredHubError::InvalidConfig`] if the client cannot be built.
pub fn build_http_client(config: &CredHubConfig) -> CredHubResult<Client> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent)
        .use_rustls_tls()
        .build()
        .map_err(|e| CredHubError::InvalidConfig(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CredHubConfig::new("https://credhub.example.com:8844");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.user_agent.starts_with("credhub-client-rust/"));
    }

    #[test]
    fn test_config_builder() {
        let config = CredHubConfig::new("https://credhub.example.com")
            .with_timeout(Duration::from_secs(5))
            .with_pool_config(Duration::from_secs(10), 2)
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 2);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_base_url_validation() {
        let url = CredHubConfig::new("https://credhub.example.com:8844/")
            .parsed_base_url()
            .unwrap();
        assert_eq!(url.host_str(), Some("credhub.example.com"));

        let err = CredHubConfig::new("ftp://credhub.example.com")
            .parsed_base_url()
            .unwrap_err();
        assert!(matches!(err, CredHubError::InvalidConfig(_)));

        assert!(CredHubConfig::new("not a url").parsed_base_url().is_err());
    }

    #[test]
    fn test_build_client() {
        let config = CredHubConfig::new("https://credhub.example.com");
        assert!(build_http_client(&config).is_ok());
    }
}
