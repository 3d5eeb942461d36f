//! Credentials operations over `/api/v1/data`.

use crate::credential::{
    CredentialDetails, CredentialName, CredentialParameters, CredentialPath, CredentialRequest,
    CredentialSummary, CredentialValue, ParametersRequest, RawCredentialDetails,
};
use crate::error::{CredHubError, CredHubResult};
use crate::operations::CredHubCredentialsOperations;
use crate::rest::RestOperations;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub(crate) const DATA_URL_PATH: &str = "/api/v1/data";

/// Single-credential reads come back either bare or wrapped in a page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataResponse {
    Page { data: Vec<RawCredentialDetails> },
    Single(RawCredentialDetails),
}

impl DataResponse {
    fn into_vec(self) -> Vec<RawCredentialDetails> {
        match self {
            Self::Page { data } => data,
            Self::Single(details) => vec![details],
        }
    }

    fn into_first(self, what: &str) -> CredHubResult<RawCredentialDetails> {
        self.into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| CredHubError::NotFound {
                message: format!("no credential returned for {what}"),
                error_code: None,
            })
    }
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    credentials: Vec<CredentialSummary>,
}

#[derive(Debug, Deserialize)]
struct PathsResponse {
    paths: Vec<CredentialPath>,
}

#[derive(Debug, Serialize)]
struct RegenerateRequest<'a> {
    name: &'a CredentialName,
}

/// [`CredHubCredentialsOperations`] backed by the CredHub REST API.
#[derive(Debug, Clone)]
pub struct CredHubCredentialsTemplate {
    rest: RestOperations,
}

impl CredHubCredentialsTemplate {
    /// Create the operations over an executor.
    #[must_use]
    pub const fn new(rest: RestOperations) -> Self {
        Self { rest }
    }

    async fn get_data(&self, query: &[(&str, &str)]) -> CredHubResult<DataResponse> {
        self.rest
            .do_with_rest(|client| async move { client.get_for_entity(DATA_URL_PATH, query).await })
            .await
    }

    async fn find(&self, query: &[(&str, &str)]) -> CredHubResult<Vec<CredentialSummary>> {
        let response: SummariesResponse = self
            .rest
            .do_with_rest(|client| async move { client.get_for_entity(DATA_URL_PATH, query).await })
            .await?;

        debug!(count = response.credentials.len(), "Credentials found");
        Ok(response.credentials)
    }
}

#[async_trait]
impl CredHubCredentialsOperations for CredHubCredentialsTemplate {
    #[instrument(skip(self, request), fields(name = %request.name(), credential_type = %request.credential_type()))]
    async fn write<T: CredentialValue>(
        &self,
        request: CredentialRequest<T>,
    ) -> CredHubResult<CredentialDetails<T>> {
        request.name().validate()?;

        let raw: RawCredentialDetails = self
            .rest
            .do_with_rest(|client| async move { client.put_for_entity(DATA_URL_PATH, &request).await })
            .await?;

        raw.into_typed()
    }

    #[instrument(skip(self, request), fields(name = %request.name(), credential_type = %request.credential_type()))]
    async fn generate<P: CredentialParameters + 'static>(
        &self,
        request: ParametersRequest<P>,
    ) -> CredHubResult<CredentialDetails<P::Credential>> {
        request.name().validate()?;

        let raw: RawCredentialDetails = self
            .rest
            .do_with_rest(|client| async move { client.post_for_entity(DATA_URL_PATH, &request).await })
            .await?;

        raw.into_typed()
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn regenerate<T: CredentialValue>(
        &self,
        name: &CredentialName,
    ) -> CredHubResult<CredentialDetails<T>> {
        name.validate()?;

        let body = RegenerateRequest { name };
        let raw: RawCredentialDetails = self
            .rest
            .do_with_rest(|client| async move { client.post_for_entity(DATA_URL_PATH, &body).await })
            .await?;

        raw.into_typed()
    }

    #[instrument(skip(self))]
    async fn get_by_id<T: CredentialValue>(&self, id: &str) -> CredHubResult<CredentialDetails<T>> {
        if id.trim().is_empty() {
            return Err(CredHubError::invalid_argument("credential id must not be empty"));
        }

        self.get_data(&[("id", id)])
            .await?
            .into_first(id)?
            .into_typed()
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_by_name<T: CredentialValue>(
        &self,
        name: &CredentialName,
    ) -> CredHubResult<CredentialDetails<T>> {
        name.validate()?;

        self.get_data(&[("name", name.as_str()), ("current", "true")])
            .await?
            .into_first(name.as_str())?
            .into_typed()
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_by_name_with_history<T: CredentialValue>(
        &self,
        name: &CredentialName,
        versions: Option<u32>,
    ) -> CredHubResult<Vec<CredentialDetails<T>>> {
        name.validate()?;
        if versions == Some(0) {
            return Err(CredHubError::invalid_argument("versions must be at least 1"));
        }

        let versions_param = versions.map(|v| v.to_string());
        let mut query = vec![("name", name.as_str())];
        if let Some(v) = versions_param.as_deref() {
            query.push(("versions", v));
        }

        let mut history = self.get_data(&query).await?.into_vec();
        if let Some(limit) = versions {
            history.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        debug!(count = history.len(), "Credential history retrieved");
        history.into_iter().map(RawCredentialDetails::into_typed).collect()
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn find_by_name(&self, name: &CredentialName) -> CredHubResult<Vec<CredentialSummary>> {
        name.validate()?;
        self.find(&[("name-like", name.as_str())]).await
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn find_by_path(&self, path: &CredentialPath) -> CredHubResult<Vec<CredentialSummary>> {
        path.validate()?;
        self.find(&[("path", path.as_str())]).await
    }

    #[instrument(skip(self))]
    async fn get_all_paths(&self) -> CredHubResult<Vec<CredentialPath>> {
        let response: PathsResponse = self
            .rest
            .do_with_rest(|client| async move {
                client.get_for_entity(DATA_URL_PATH, &[("paths", "true")]).await
            })
            .await?;

        Ok(response.paths)
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn delete_by_name(&self, name: &CredentialName) -> CredHubResult<()> {
        name.validate()?;

        self.rest
            .do_with_rest(|client| async move {
                client.delete(DATA_URL_PATH, &[("name", name.as_str())]).await
            })
            .await
    }
}
