//! Access-control model: actors, operations and permission entries.

use crate::credential::CredentialName;
use crate::error::{CredHubError, CredHubResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An identity that can be granted operations on a credential,
/// e.g. `uaa-user:alice` or `mtls-app:<app-guid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Wrap a full actor identity.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// A user authenticated by UAA.
    #[must_use]
    pub fn uaa_user(user_id: &str) -> Self {
        Self(format!("uaa-user:{user_id}"))
    }

    /// An OAuth client authenticated by UAA.
    #[must_use]
    pub fn uaa_client(client_id: &str) -> Self {
        Self(format!("uaa-client:{client_id}"))
    }

    /// An application authenticated by its instance identity certificate.
    #[must_use]
    pub fn mtls_app(app_guid: &str) -> Self {
        Self(format!("mtls-app:{app_guid}"))
    }

    /// The full identity string.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.0
    }

    /// Prefix before the first `:`, e.g. `uaa-user`.
    #[must_use]
    pub fn actor_type(&self) -> Option<&str> {
        self.0.split_once(':').map(|(kind, _)| kind)
    }

    pub(crate) fn validate(&self) -> CredHubResult<()> {
        if self.0.trim().is_empty() {
            return Err(CredHubError::invalid_argument("actor must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An operation an actor may perform on a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Read the credential value
    Read,
    /// Write or generate new values
    Write,
    /// Delete the credential
    Delete,
    /// Read the permission list
    ReadAcl,
    /// Change the permission list
    WriteAcl,
}

/// Operations granted to one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPermission {
    actor: Actor,
    operations: BTreeSet<Operation>,
}

impl CredentialPermission {
    /// Grant `operations` to `actor`.
    #[must_use]
    pub fn new(actor: Actor, operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            actor,
            operations: operations.into_iter().collect(),
        }
    }

    /// The grantee.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Granted operations.
    #[must_use]
    pub const fn operations(&self) -> &BTreeSet<Operation> {
        &self.operations
    }

    /// Check if `operation` is granted.
    #[must_use]
    pub fn allows(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// The permission list of one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPermissions {
    credential_name: CredentialName,
    #[serde(default)]
    permissions: Vec<CredentialPermission>,
}

impl CredentialPermissions {
    /// Create a permission list.
    #[must_use]
    pub const fn new(credential_name: CredentialName, permissions: Vec<CredentialPermission>) -> Self {
        Self {
            credential_name,
            permissions,
        }
    }

    /// The credential the list belongs to.
    #[must_use]
    pub const fn credential_name(&self) -> &CredentialName {
        &self.credential_name
    }

    /// Entries in server order.
    #[must_use]
    pub fn permissions(&self) -> &[CredentialPermission] {
        &self.permissions
    }

    /// Consume the list, keeping only the entries.
    #[must_use]
    pub fn into_permissions(self) -> Vec<CredentialPermission> {
        self.permissions
    }
}
