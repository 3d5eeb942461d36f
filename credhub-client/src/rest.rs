//! REST call executor.
//!
//! [`RestOperations::do_with_rest`] leases a [`RestClient`] for exactly one
//! unit of work. The lease is tied to the client value, so it is returned on
//! every exit path: success, translated error, transport failure, panic
//! unwind or the caller dropping the future.
//!
//! Response bodies are wiped once decoded.

use crate::config::{CredHubConfig, build_http_client};
use crate::error::{CredHubError, CredHubResult};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Query parameters appended to an endpoint path.
pub type Query<'a> = [(&'a str, &'a str)];

#[derive(Debug)]
struct Shared {
    base_url: Url,
    http: Client,
    leases: AtomicUsize,
}

/// Entry point for HTTP exchanges with CredHub.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RestOperations {
    shared: Arc<Shared>,
}

impl RestOperations {
    /// Build an executor with a client created from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CredHubError::InvalidConfig`] for a bad base URL or if the
    /// HTTP client cannot be built.
    pub fn new(config: &CredHubConfig) -> CredHubResult<Self> {
        let http = build_http_client(config)?;
        Self::with_client(config, http)
    }

    /// Build an executor around a caller-supplied client.
    ///
    /// This is where authentication is plugged in: default headers carrying a
    /// bearer token, a client identity for mTLS, proxies.
    ///
    /// # Errors
    ///
    /// Returns [`CredHubError::InvalidConfig`] for a bad base URL.
    pub fn with_client(config: &CredHubConfig, http: Client) -> CredHubResult<Self> {
        Ok(Self {
            shared: Arc::new(Shared {
                base_url: config.parsed_base_url()?,
                http,
                leases: AtomicUsize::new(0),
            }),
        })
    }

    /// Run one unit of work against a leased client.
    ///
    /// # Errors
    ///
    /// Returns whatever error the callback produces.
    pub async fn do_with_rest<T, F, Fut>(&self, callback: F) -> CredHubResult<T>
    where
        F: FnOnce(RestClient) -> Fut,
        Fut: Future<Output = CredHubResult<T>>,
    {
        let client = self.acquire();
        let result = callback(client).await;

        if let Err(e) = &result {
            debug!(error = %e, "CredHub call failed");
        }

        result
    }

    /// Number of clients currently leased.
    #[must_use]
    pub fn active_leases(&self) -> usize {
        self.shared.leases.load(Ordering::Acquire)
    }

    /// Server address requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    fn acquire(&self) -> RestClient {
        self.shared.leases.fetch_add(1, Ordering::AcqRel);
        RestClient {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// A leased client, valid for one unit of work.
///
/// Not `Clone`: dropping it returns the lease.
#[derive(Debug)]
pub struct RestClient {
    shared: Arc<Shared>,
}

impl Drop for RestClient {
    fn drop(&mut self) {
        self.shared.leases.fetch_sub(1, Ordering::AcqRel);
    }
}

impl RestClient {
    /// `GET` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and decoding errors, translated.
    pub async fn get_for_entity<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> CredHubResult<T> {
        let body = self.exchange::<()>(Method::GET, path, query, None).await?;
        decode(&body)
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and decoding errors, translated.
    pub async fn put_for_entity<B, T>(&self, path: &str, body: &B) -> CredHubResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.exchange(Method::PUT, path, &[], Some(body)).await?;
        decode(&body)
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status and decoding errors, translated.
    pub async fn post_for_entity<B, T>(&self, path: &str, body: &B) -> CredHubResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.exchange(Method::POST, path, &[], Some(body)).await?;
        decode(&body)
    }

    /// `POST` a JSON body, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Transport and HTTP status errors, translated.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> CredHubResult<()> {
        self.exchange(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// `DELETE`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Transport and HTTP status errors, translated.
    pub async fn delete(&self, path: &str, query: &Query<'_>) -> CredHubResult<()> {
        self.exchange::<()>(Method::DELETE, path, query, None).await?;
        Ok(())
    }

    fn url(&self, path: &str, query: &Query<'_>) -> Url {
        let base = &self.shared.base_url;
        let mut url = base.clone();
        url.set_path(&format!("{}{path}", base.path().trim_end_matches('/')));

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        url
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&B>,
    ) -> CredHubResult<Zeroizing<String>> {
        let url = self.url(path, query);
        debug!(%method, %url, "CredHub request");

        let mut request = self.shared.http.request(method.clone(), url);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = Zeroizing::new(response.text().await?);

        if !status.is_success() {
            let err = CredHubError::from_response(status, &text);
            warn!(%method, path, status = status.as_u16(), error = %err, "CredHub request rejected");
            return Err(err);
        }

        debug!(%method, path, status = status.as_u16(), "CredHub response");
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> CredHubResult<T> {
    serde_json::from_str(body).map_err(CredHubError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest(base: &str) -> RestOperations {
        RestOperations::new(&CredHubConfig::new(base)).unwrap()
    }

    #[test]
    fn test_url_building() {
        let ops = rest("https://credhub.example.com:8844");
        let client = ops.acquire();

        let url = client.url("/api/v1/data", &[("name", "/db/pw"), ("current", "true")]);
        assert_eq!(
            url.as_str(),
            "https://credhub.example.com:8844/api/v1/data?name=%2Fdb%2Fpw&current=true"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let ops = rest("https://gateway.example.com/credhub/");
        let client = ops.acquire();

        let url = client.url("/api/v1/permissions", &[]);
        assert_eq!(url.as_str(), "https://gateway.example.com/credhub/api/v1/permissions");
    }

    #[test]
    fn test_lease_released_on_drop() {
        let ops = rest("https://credhub.example.com");
        assert_eq!(ops.active_leases(), 0);

        let first = ops.acquire();
        let second = ops.clone().acquire();
        assert_eq!(ops.active_leases(), 2);

        drop(first);
        assert_eq!(ops.active_leases(), 1);
        drop(second);
        assert_eq!(ops.active_leases(), 0);
    }

    #[tokio::test]
    async fn test_lease_released_after_callback_error() {
        let ops = rest("https://credhub.example.com");

        let result: CredHubResult<()> = ops
            .do_with_rest(|_client| async { Err(CredHubError::invalid_argument("boom")) })
            .await;

        assert!(matches!(result, Err(CredHubError::InvalidArgument(_))));
        assert_eq!(ops.active_leases(), 0);
    }

    #[test]
    fn test_decode_error_kind() {
        let err = decode::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(err, CredHubError::Deserialization(_)));
    }
}
