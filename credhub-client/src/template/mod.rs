//! `CredHubTemplate`: the entry point tying configuration, the REST executor
//! and the operations implementations together.

mod credentials;
mod permissions;

pub use credentials::CredHubCredentialsTemplate;
pub use permissions::CredHubPermissionsTemplate;

use crate::config::CredHubConfig;
use crate::error::CredHubResult;
use crate::rest::{RestClient, RestOperations};
use reqwest::Client;
use std::future::Future;
use tracing::info;

/// Client for one CredHub server.
///
/// Cheap to clone; every clone and every operations handle shares one
/// connection pool. Safe to use from many tasks at once.
#[derive(Debug, Clone)]
pub struct CredHubTemplate {
    rest: RestOperations,
}

impl CredHubTemplate {
    /// Create a template with an HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bad base URL or client settings.
    pub fn new(config: &CredHubConfig) -> CredHubResult<Self> {
        let rest = RestOperations::new(config)?;
        info!(base_url = %rest.base_url(), "CredHub client configured");
        Ok(Self { rest })
    }

    /// Create a template around an already-authenticated HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bad base URL.
    pub fn with_client(config: &CredHubConfig, http: Client) -> CredHubResult<Self> {
        let rest = RestOperations::with_client(config, http)?;
        info!(base_url = %rest.base_url(), "CredHub client configured");
        Ok(Self { rest })
    }

    /// Credential operations.
    #[must_use]
    pub fn credentials(&self) -> CredHubCredentialsTemplate {
        CredHubCredentialsTemplate::new(self.rest.clone())
    }

    /// Permission operations.
    #[must_use]
    pub fn permissions(&self) -> CredHubPermissionsTemplate {
        CredHubPermissionsTemplate::new(self.rest.clone())
    }

    /// Run custom exchanges against the server with a leased client.
    ///
    /// # Errors
    ///
    /// Returns whatever error the callback produces.
    pub async fn do_with_rest<T, F, Fut>(&self, callback: F) -> CredHubResult<T>
    where
        F: FnOnce(RestClient) -> Fut,
        Fut: Future<Output = CredHubResult<T>>,
    {
        self.rest.do_with_rest(callback).await
    }

    /// The underlying executor.
    #[must_use]
    pub const fn rest(&self) -> &RestOperations {
        &self.rest
    }
}
