//! Generation parameters for server-generated credentials.
//!
//! Only types the server can generate implement [`CredentialParameters`];
//! `json` and `value` credentials must be written.

use super::value::{
    CertificateCredential, CredentialValue, PasswordCredential, RsaCredential, SshCredential,
    UserCredential,
};
use super::CredentialType;
use serde::Serialize;

/// Parameters the server uses to generate one credential type.
pub trait CredentialParameters: Serialize + Send + Sync {
    /// Tag of the generated credential.
    const CREDENTIAL_TYPE: CredentialType;

    /// Value shape the server returns for the generated credential.
    type Credential: CredentialValue;

    /// Fixed parts of the value sent alongside the parameters.
    fn value_hint(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Password generation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PasswordParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_upper: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_lower: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_special: Option<bool>,
}

impl PasswordParameters {
    /// Server defaults for every rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the password length.
    #[must_use]
    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Leave out upper-case letters.
    #[must_use]
    pub const fn exclude_upper(mut self) -> Self {
        self.exclude_upper = Some(true);
        self
    }

    /// Leave out lower-case letters.
    #[must_use]
    pub const fn exclude_lower(mut self) -> Self {
        self.exclude_lower = Some(true);
        self
    }

    /// Leave out digits.
    #[must_use]
    pub const fn exclude_number(mut self) -> Self {
        self.exclude_number = Some(true);
        self
    }

    /// Include special characters.
    #[must_use]
    pub const fn include_special(mut self) -> Self {
        self.include_special = Some(true);
        self
    }
}

impl CredentialParameters for PasswordParameters {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Password;
    type Credential = PasswordCredential;
}

/// User generation: password rules plus an optional fixed username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserParameters {
    #[serde(skip)]
    username: Option<String>,
    #[serde(flatten)]
    password: PasswordParameters,
}

impl UserParameters {
    /// Generate both username and password.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep this username and only generate the password.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Rules for the generated password.
    #[must_use]
    pub fn with_password_parameters(mut self, password: PasswordParameters) -> Self {
        self.password = password;
        self
    }
}

impl CredentialParameters for UserParameters {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::User;
    type Credential = UserCredential;

    fn value_hint(&self) -> Option<serde_json::Value> {
        self.username
            .as_ref()
            .map(|username| serde_json::json!({ "username": username }))
    }
}

/// RSA key generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsaParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    key_length: Option<u32>,
}

impl RsaParameters {
    /// Server default key length.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key length in bits (2048, 3072 or 4096).
    #[must_use]
    pub const fn with_key_length(mut self, key_length: u32) -> Self {
        self.key_length = Some(key_length);
        self
    }
}

impl CredentialParameters for RsaParameters {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Rsa;
    type Credential = RsaCredential;
}

/// SSH key generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SshParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    key_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssh_comment: Option<String>,
}

impl SshParameters {
    /// Server default key length, no comment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key length in bits (2048, 3072 or 4096).
    #[must_use]
    pub const fn with_key_length(mut self, key_length: u32) -> Self {
        self.key_length = Some(key_length);
        self
    }

    /// Set the comment appended to the public key.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.ssh_comment = Some(comment.into());
        self
    }
}

impl CredentialParameters for SshParameters {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Ssh;
    type Credential = SshCredential;
}

/// X.509 key usage extension values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum KeyUsage {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

/// X.509 extended key usage extension values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ExtendedKeyUsage {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    Timestamping,
}

/// Certificate generation.
///
/// The server needs a subject (at least `common_name` or `organization`)
/// and either a signing CA, `self_sign` or `is_ca`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    common_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alternative_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    key_usage: Vec<KeyUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extended_key_usage: Vec<ExtendedKeyUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    self_sign: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_ca: Option<bool>,
}

impl CertificateParameters {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subject common name.
    #[must_use]
    pub fn with_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = Some(common_name.into());
        self
    }

    /// Add a subject alternative name.
    #[must_use]
    pub fn with_alternative_name(mut self, name: impl Into<String>) -> Self {
        self.alternative_names.push(name.into());
        self
    }

    /// Subject organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Subject organization unit.
    #[must_use]
    pub fn with_organization_unit(mut self, unit: impl Into<String>) -> Self {
        self.organization_unit = Some(unit.into());
        self
    }

    /// Subject locality, state and two-letter country code.
    #[must_use]
    pub fn with_location(
        mut self,
        locality: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.locality = Some(locality.into());
        self.state = Some(state.into());
        self.country = Some(country.into());
        self
    }

    /// Add a key usage.
    #[must_use]
    pub fn with_key_usage(mut self, usage: KeyUsage) -> Self {
        self.key_usage.push(usage);
        self
    }

    /// Add an extended key usage.
    #[must_use]
    pub fn with_extended_key_usage(mut self, usage: ExtendedKeyUsage) -> Self {
        self.extended_key_usage.push(usage);
        self
    }

    /// Key length in bits.
    #[must_use]
    pub const fn with_key_length(mut self, key_length: u32) -> Self {
        self.key_length = Some(key_length);
        self
    }

    /// Validity in days.
    #[must_use]
    pub const fn with_duration(mut self, days: u32) -> Self {
        self.duration = Some(days);
        self
    }

    /// Sign with the CA stored under this credential name.
    #[must_use]
    pub fn with_ca(mut self, ca: impl Into<String>) -> Self {
        self.ca = Some(ca.into());
        self
    }

    /// Produce a self-signed certificate.
    #[must_use]
    pub const fn self_signed(mut self) -> Self {
        self.self_sign = Some(true);
        self
    }

    /// Produce a CA certificate.
    #[must_use]
    pub const fn certificate_authority(mut self) -> Self {
        self.is_ca = Some(true);
        self
    }
}

impl CredentialParameters for CertificateParameters {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Certificate;
    type Credential = CertificateCredential;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_parameters() {
        let params = PasswordParameters::new()
            .with_length(32)
            .exclude_number()
            .include_special();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"length": 32, "exclude_number": true, "include_special": true})
        );
    }

    #[test]
    fn test_user_parameters_flatten_password_rules() {
        let params = UserParameters::new()
            .with_username("admin")
            .with_password_parameters(PasswordParameters::new().with_length(12));
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"length": 12}));
        assert_eq!(params.value_hint(), Some(json!({"username": "admin"})));
        assert_eq!(UserParameters::new().value_hint(), None);
    }

    #[test]
    fn test_certificate_parameters() {
        let params = CertificateParameters::new()
            .with_common_name("example.com")
            .with_alternative_name("*.example.com")
            .with_key_usage(KeyUsage::DigitalSignature)
            .with_extended_key_usage(ExtendedKeyUsage::ServerAuth)
            .with_duration(365)
            .with_ca("/example-ca");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "common_name": "example.com",
                "alternative_names": ["*.example.com"],
                "key_usage": ["digital_signature"],
                "extended_key_usage": ["server_auth"],
                "duration": 365,
                "ca": "/example-ca"
            })
        );
    }

    #[test]
    fn test_ssh_parameters() {
        let params = SshParameters::new().with_key_length(4096).with_comment("deploy");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"key_length": 4096, "ssh_comment": "deploy"})
        );
    }
}
