//! Credential model: names, type tags, requests and results.

mod parameters;
mod value;

pub use parameters::{
    CertificateParameters, CredentialParameters, ExtendedKeyUsage, KeyUsage, PasswordParameters,
    RsaParameters, SshParameters, UserParameters,
};
pub use value::{
    CertificateCredential, CredentialValue, JsonCredential, PasswordCredential, RsaCredential,
    SshCredential, UserCredential, ValueCredential,
};

use crate::error::{CredHubError, CredHubResult};
use crate::permission::CredentialPermission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-qualified credential name, e.g. `/db/password`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialName(String);

impl CredentialName {
    /// Wrap a full credential name as-is.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build a name from path segments, e.g. `["app", "db"]` becomes `/app/db`.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut name = String::new();
        for segment in segments {
            let segment = segment.as_ref().trim_matches('/');
            if segment.is_empty() {
                continue;
            }
            name.push('/');
            name.push_str(segment);
        }
        Self(name)
    }

    /// Name of a credential owned by a service broker for one binding:
    /// `/c/{broker}/{service_offering}/{binding_id}/{credential}`.
    #[must_use]
    pub fn service_instance(
        broker: &str,
        service_offering: &str,
        binding_id: &str,
        credential: &str,
    ) -> Self {
        Self::from_segments(["c", broker, service_offering, binding_id, credential])
    }

    /// The full name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn validate(&self) -> CredHubResult<()> {
        if self.0.trim().is_empty() {
            return Err(CredHubError::invalid_argument("credential name must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for CredentialName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CredentialName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CredentialName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A path prefix grouping credentials, as listed by the paths endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialPath {
    path: String,
}

impl CredentialPath {
    /// Create a path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The path prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub(crate) fn validate(&self) -> CredHubResult<()> {
        if self.path.trim().is_empty() {
            return Err(CredHubError::invalid_argument("credential path must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for CredentialPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Server-defined credential type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Single password string
    Password,
    /// X.509 certificate with private key and CA
    Certificate,
    /// Arbitrary JSON object
    Json,
    /// Single arbitrary string
    Value,
    /// Username and password pair
    User,
    /// RSA key pair
    Rsa,
    /// SSH key pair
    Ssh,
}

impl CredentialType {
    /// Wire representation of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Certificate => "certificate",
            Self::Json => "json",
            Self::Value => "value",
            Self::User => "user",
            Self::Rsa => "rsa",
            Self::Ssh => "ssh",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a write or generate treats an existing credential of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Always store a new version
    #[default]
    Overwrite,
    /// Keep the existing version if one exists
    NoOverwrite,
    /// Store a new version only if the value or parameters changed
    Converge,
}

/// Request to write a client-supplied credential value.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialRequest<T> {
    name: CredentialName,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    value: T,
    mode: WriteMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_permissions: Vec<CredentialPermission>,
}

impl<T: CredentialValue> CredentialRequest<T> {
    /// Create a request that overwrites any existing credential.
    #[must_use]
    pub fn new(name: impl Into<CredentialName>, value: T) -> Self {
        Self {
            name: name.into(),
            credential_type: T::CREDENTIAL_TYPE,
            value,
            mode: WriteMode::Overwrite,
            additional_permissions: Vec::new(),
        }
    }

    /// Set the write mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Grant a permission along with the write.
    #[must_use]
    pub fn with_permission(mut self, permission: CredentialPermission) -> Self {
        self.additional_permissions.push(permission);
        self
    }
}

impl<T> CredentialRequest<T> {
    /// Target credential name.
    #[must_use]
    pub const fn name(&self) -> &CredentialName {
        &self.name
    }

    /// Type tag sent with the request.
    #[must_use]
    pub const fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    /// Value to write.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Write mode.
    #[must_use]
    pub const fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Permissions granted with the write.
    #[must_use]
    pub fn additional_permissions(&self) -> &[CredentialPermission] {
        &self.additional_permissions
    }
}

/// Request to have the server generate a credential value.
#[derive(Debug, Clone, Serialize)]
pub struct ParametersRequest<P> {
    name: CredentialName,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    parameters: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<WriteMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_permissions: Vec<CredentialPermission>,
}

impl<P: CredentialParameters> ParametersRequest<P> {
    /// Create a generate request; the server default mode applies.
    #[must_use]
    pub fn new(name: impl Into<CredentialName>, parameters: P) -> Self {
        let value = parameters.value_hint();
        Self {
            name: name.into(),
            credential_type: P::CREDENTIAL_TYPE,
            parameters,
            mode: None,
            value,
            additional_permissions: Vec::new(),
        }
    }

    /// Set the write mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Grant a permission along with the generation.
    #[must_use]
    pub fn with_permission(mut self, permission: CredentialPermission) -> Self {
        self.additional_permissions.push(permission);
        self
    }
}

impl<P> ParametersRequest<P> {
    /// Target credential name.
    #[must_use]
    pub const fn name(&self) -> &CredentialName {
        &self.name
    }

    /// Type tag sent with the request.
    #[must_use]
    pub const fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    /// Generation parameters.
    #[must_use]
    pub const fn parameters(&self) -> &P {
        &self.parameters
    }

    /// Write mode, if set.
    #[must_use]
    pub const fn mode(&self) -> Option<WriteMode> {
        self.mode
    }
}

/// A stored credential version as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDetails<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<CredentialName>,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_created_at: Option<DateTime<Utc>>,
}

/// Details whose value has not been decoded yet.
pub(crate) type RawCredentialDetails = CredentialDetails<serde_json::Value>;

impl<T> CredentialDetails<T> {
    /// Opaque id of this version.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Credential name.
    #[must_use]
    pub const fn name(&self) -> Option<&CredentialName> {
        self.name.as_ref()
    }

    /// Type tag reported by the server.
    #[must_use]
    pub const fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    /// Credential value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consume the details, keeping only the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// When this version was stored.
    #[must_use]
    pub const fn version_created_at(&self) -> Option<DateTime<Utc>> {
        self.version_created_at
    }
}

impl RawCredentialDetails {
    /// Check the type tag, then decode the value.
    ///
    /// The untyped value is dropped without being wiped.
    pub(crate) fn into_typed<T: CredentialValue>(self) -> CredHubResult<CredentialDetails<T>> {
        if self.credential_type != T::CREDENTIAL_TYPE {
            return Err(CredHubError::TypeMismatch {
                expected: T::CREDENTIAL_TYPE,
                actual: self.credential_type,
            });
        }

        Ok(CredentialDetails {
            id: self.id,
            name: self.name,
            credential_type: self.credential_type,
            value: serde_json::from_value(self.value)?,
            version_created_at: self.version_created_at,
        })
    }
}

/// Search result entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSummary {
    name: CredentialName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_created_at: Option<DateTime<Utc>>,
}

impl CredentialSummary {
    /// Create a summary.
    #[must_use]
    pub const fn new(name: CredentialName, version_created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            version_created_at,
        }
    }

    /// Credential name.
    #[must_use]
    pub const fn name(&self) -> &CredentialName {
        &self.name
    }

    /// When the latest version was stored.
    #[must_use]
    pub const fn version_created_at(&self) -> Option<DateTime<Utc>> {
        self.version_created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{Actor, Operation};
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_name_from_segments() {
        assert_eq!(
            CredentialName::from_segments(["app", "/db/", "", "password"]).as_str(),
            "/app/db/password"
        );
        assert_eq!(
            CredentialName::service_instance("broker", "mysql", "binding-1", "creds").as_str(),
            "/c/broker/mysql/binding-1/creds"
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(CredentialName::new("").validate().is_err());
        assert!(CredentialName::new("  ").validate().is_err());
        assert!(CredentialName::new("/db/pw").validate().is_ok());
        assert!(CredentialPath::new("").validate().is_err());
    }

    #[test]
    fn test_write_request_serialization() {
        let request = CredentialRequest::new("/db/pw", PasswordCredential::new("secret"))
            .with_permission(CredentialPermission::new(
                Actor::new("user:alice"),
                [Operation::Read],
            ));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "/db/pw",
                "type": "password",
                "value": "secret",
                "mode": "overwrite",
                "additional_permissions": [{"actor": "user:alice", "operations": ["read"]}]
            })
        );
    }

    #[test]
    fn test_generate_request_omits_unset_fields() {
        let request = ParametersRequest::new("/db/pw", PasswordParameters::new().with_length(20));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"name": "/db/pw", "type": "password", "parameters": {"length": 20}})
        );

        let request = request.with_mode(WriteMode::NoOverwrite);
        assert_eq!(serde_json::to_value(&request).unwrap()["mode"], "no-overwrite");
    }

    #[test]
    fn test_into_typed_checks_type_before_decoding() {
        let raw: RawCredentialDetails = serde_json::from_value(json!({
            "type": "certificate",
            "value": {"certificate": "-----BEGIN CERTIFICATE-----"}
        }))
        .unwrap();

        let err = raw.into_typed::<PasswordCredential>().unwrap_err();
        assert!(matches!(
            err,
            CredHubError::TypeMismatch {
                expected: CredentialType::Password,
                actual: CredentialType::Certificate,
            }
        ));
    }

    #[test]
    fn test_into_typed_decodes_value() {
        let raw: RawCredentialDetails = serde_json::from_value(json!({
            "id": "67fc3def-bbfb-4953-83f8-4ab0682ad675",
            "name": "/db/pw",
            "type": "password",
            "value": "x",
            "version_created_at": "2017-01-01T04:07:18Z"
        }))
        .unwrap();

        let details = raw.into_typed::<PasswordCredential>().unwrap();
        assert_eq!(details.id(), Some("67fc3def-bbfb-4953-83f8-4ab0682ad675"));
        assert_eq!(details.name().map(CredentialName::as_str), Some("/db/pw"));
        assert_eq!(details.value().password().expose_secret(), "x");
        assert!(details.version_created_at().is_some());
    }
}
