//! Permissions operations over `/api/v1/permissions`.

use crate::credential::CredentialName;
use crate::error::CredHubResult;
use crate::operations::CredHubPermissionsOperations;
use crate::permission::{Actor, CredentialPermission, CredentialPermissions};
use crate::rest::RestOperations;
use async_trait::async_trait;
use tracing::{debug, instrument};

pub(crate) const PERMISSIONS_URL_PATH: &str = "/api/v1/permissions";

/// [`CredHubPermissionsOperations`] backed by the CredHub REST API.
#[derive(Debug, Clone)]
pub struct CredHubPermissionsTemplate {
    rest: RestOperations,
}

impl CredHubPermissionsTemplate {
    /// Create the operations over an executor.
    #[must_use]
    pub const fn new(rest: RestOperations) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl CredHubPermissionsOperations for CredHubPermissionsTemplate {
    #[instrument(skip(self), fields(name = %name))]
    async fn get_permissions(
        &self,
        name: &CredentialName,
    ) -> CredHubResult<Vec<CredentialPermission>> {
        name.validate()?;

        let response: CredentialPermissions = self
            .rest
            .do_with_rest(|client| async move {
                client
                    .get_for_entity(PERMISSIONS_URL_PATH, &[("credential_name", name.as_str())])
                    .await
            })
            .await?;

        debug!(count = response.permissions().len(), "Permissions retrieved");
        Ok(response.into_permissions())
    }

    #[instrument(skip(self, permissions), fields(name = %name, count = permissions.len()))]
    async fn add_permissions(
        &self,
        name: &CredentialName,
        permissions: Vec<CredentialPermission>,
    ) -> CredHubResult<()> {
        name.validate()?;

        let body = CredentialPermissions::new(name.clone(), permissions);
        self.rest
            .do_with_rest(|client| async move { client.post(PERMISSIONS_URL_PATH, &body).await })
            .await
    }

    #[instrument(skip(self), fields(name = %name, actor = %actor))]
    async fn delete_permission(&self, name: &CredentialName, actor: &Actor) -> CredHubResult<()> {
        name.validate()?;
        actor.validate()?;

        self.rest
            .do_with_rest(|client| async move {
                client
                    .delete(
                        PERMISSIONS_URL_PATH,
                        &[("credential_name", name.as_str()), ("actor", actor.identity())],
                    )
                    .await
            })
            .await
    }
}
