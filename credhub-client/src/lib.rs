//! Typed async client for the CredHub credential-management API.
//!
//! Turns typed operations (write, generate, regenerate, get, find, delete,
//! and permission management) into calls against CredHub's REST surface and
//! maps the JSON responses back into typed results. Transport concerns such
//! as TLS identities and token injection belong to the [`reqwest::Client`]
//! handed to [`CredHubTemplate::with_client`].
//!
//! ```no_run
//! use credhub_client::{
//!     CredHubConfig, CredHubCredentialsOperations, CredHubTemplate, CredentialName,
//!     PasswordCredential,
//! };
//!
//! # async fn run() -> credhub_client::CredHubResult<()> {
//! let credhub = CredHubTemplate::new(&CredHubConfig::new("https://credhub.example.com:8844"))?;
//! let details = credhub
//!     .credentials()
//!     .get_by_name::<PasswordCredential>(&CredentialName::new("/db/password"))
//!     .await?;
//! println!("version from {:?}", details.version_created_at());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credential;
pub mod error;
pub mod operations;
pub mod permission;
pub mod rest;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod template;

pub use config::{CredHubConfig, build_http_client};
pub use credential::{
    CertificateCredential, CertificateParameters, CredentialDetails, CredentialName,
    CredentialParameters, CredentialPath, CredentialRequest, CredentialSummary, CredentialType,
    CredentialValue, JsonCredential, ParametersRequest, PasswordCredential, PasswordParameters,
    RsaCredential, RsaParameters, SshCredential, SshParameters, UserCredential, UserParameters,
    ValueCredential, WriteMode,
};
pub use error::{CredHubError, CredHubResult};
pub use operations::{CredHubCredentialsOperations, CredHubPermissionsOperations};
pub use permission::{Actor, CredentialPermission, CredentialPermissions, Operation};
pub use rest::{RestClient, RestOperations};
pub use secrecy::{ExposeSecret, SecretString};
pub use template::{CredHubCredentialsTemplate, CredHubPermissionsTemplate, CredHubTemplate};
