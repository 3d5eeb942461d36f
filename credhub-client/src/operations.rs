//! Operations traits for credentials and permissions.
//!
//! Every method validates its identifying arguments before any request is
//! sent and fails with [`CredHubError::InvalidArgument`](crate::CredHubError::InvalidArgument).

use crate::credential::{
    CredentialDetails, CredentialName, CredentialParameters, CredentialPath, CredentialRequest,
    CredentialSummary, CredentialValue, ParametersRequest,
};
use crate::error::CredHubResult;
use crate::permission::{Actor, CredentialPermission};
use async_trait::async_trait;

/// Save, generate, retrieve and delete credentials.
#[async_trait]
pub trait CredHubCredentialsOperations: Send + Sync {
    /// Write a new credential, or a new version of an existing one.
    async fn write<T: CredentialValue>(
        &self,
        request: CredentialRequest<T>,
    ) -> CredHubResult<CredentialDetails<T>>;

    /// Have the server generate a credential from `request`'s parameters.
    async fn generate<P: CredentialParameters + 'static>(
        &self,
        request: ParametersRequest<P>,
    ) -> CredHubResult<CredentialDetails<P::Credential>>;

    /// Generate a new value with the parameters of the last generation.
    ///
    /// Fails with `UnsupportedOperation` if the credential was written rather
    /// than generated.
    async fn regenerate<T: CredentialValue>(
        &self,
        name: &CredentialName,
    ) -> CredHubResult<CredentialDetails<T>>;

    /// Retrieve one credential version by its id.
    async fn get_by_id<T: CredentialValue>(&self, id: &str) -> CredHubResult<CredentialDetails<T>>;

    /// Retrieve the current version of a credential.
    async fn get_by_name<T: CredentialValue>(
        &self,
        name: &CredentialName,
    ) -> CredHubResult<CredentialDetails<T>>;

    /// Retrieve stored versions, newest first.
    ///
    /// With `versions` of `None` the server's default count applies;
    /// otherwise at most `versions` entries are returned.
    async fn get_by_name_with_history<T: CredentialValue>(
        &self,
        name: &CredentialName,
        versions: Option<u32>,
    ) -> CredHubResult<Vec<CredentialDetails<T>>>;

    /// Find credentials whose name contains `name`.
    async fn find_by_name(&self, name: &CredentialName) -> CredHubResult<Vec<CredentialSummary>>;

    /// Find credentials stored under `path`.
    async fn find_by_path(&self, path: &CredentialPath) -> CredHubResult<Vec<CredentialSummary>>;

    /// List every path that contains credentials.
    async fn get_all_paths(&self) -> CredHubResult<Vec<CredentialPath>>;

    /// Delete every version of a credential.
    async fn delete_by_name(&self, name: &CredentialName) -> CredHubResult<()>;
}

/// Add, retrieve and delete credential permissions.
#[async_trait]
pub trait CredHubPermissionsOperations: Send + Sync {
    /// Permissions currently granted on a credential.
    async fn get_permissions(&self, name: &CredentialName)
    -> CredHubResult<Vec<CredentialPermission>>;

    /// Grant permissions on a credential in one request.
    async fn add_permissions(
        &self,
        name: &CredentialName,
        permissions: Vec<CredentialPermission>,
    ) -> CredHubResult<()>;

    /// Remove an actor's permissions on a credential.
    async fn delete_permission(&self, name: &CredentialName, actor: &Actor) -> CredHubResult<()>;
}
