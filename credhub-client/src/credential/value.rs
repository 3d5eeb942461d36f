//! Credential value types, one per server type tag.
//!
//! Secret fields are held as [`SecretString`]: wiped on drop and printed as
//! `[REDACTED]` by `Debug`. Only the typed values are protected. The raw
//! response body and the intermediate JSON tree it is decoded through are
//! ordinary heap data.

use super::CredentialType;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A credential value shape bound to its server type tag.
pub trait CredentialValue: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Tag the server uses for this value shape.
    const CREDENTIAL_TYPE: CredentialType;
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// A password credential.
///
/// Reads both the bare string form (`"value": "x"`) and the object form
/// (`"value": {"password": "x"}`); always writes the bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "PasswordRepr")]
pub struct PasswordCredential {
    password: SecretString,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PasswordRepr {
    Plain(SecretString),
    Object { password: SecretString },
}

impl From<PasswordRepr> for PasswordCredential {
    fn from(repr: PasswordRepr) -> Self {
        match repr {
            PasswordRepr::Plain(password) | PasswordRepr::Object { password } => Self { password },
        }
    }
}

impl PasswordCredential {
    /// Wrap a password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: SecretString::from(password.into()),
        }
    }

    /// The password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

impl Serialize for PasswordCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        expose(&self.password, serializer)
    }
}

impl CredentialValue for PasswordCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Password;
}

/// A single arbitrary string.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ValueCredential(SecretString);

impl ValueCredential {
    /// Wrap a value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// The value.
    #[must_use]
    pub const fn value(&self) -> &SecretString {
        &self.0
    }
}

impl Serialize for ValueCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        expose(&self.0, serializer)
    }
}

impl CredentialValue for ValueCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Value;
}

/// An arbitrary JSON object.
///
/// Entries are free-form, so none of them is wiped on drop. `Debug` prints
/// the keys only.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonCredential(serde_json::Map<String, serde_json::Value>);

impl JsonCredential {
    /// Wrap a JSON object.
    #[must_use]
    pub const fn new(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(values)
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up one entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// All entries.
    #[must_use]
    pub const fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl fmt::Debug for JsonCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|key| (key, "[REDACTED]")))
            .finish()
    }
}

impl CredentialValue for JsonCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Json;
}

/// A username and password pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(serialize_with = "expose")]
    password: SecretString,
    #[serde(default, skip_serializing)]
    password_hash: Option<String>,
}

impl UserCredential {
    /// Create a user credential.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: SecretString::from(password.into()),
            password_hash: None,
        }
    }

    /// The username, if the credential has one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// SHA-512 crypt hash of the password, computed by the server.
    #[must_use]
    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}

impl CredentialValue for UserCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::User;
}

/// An X.509 certificate with its private key and issuing CA.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ca_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    certificate: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional"
    )]
    private_key: Option<SecretString>,
}

impl CertificateCredential {
    /// Create a certificate credential from PEM strings.
    #[must_use]
    pub fn new(certificate: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            certificate: Some(certificate.into()),
            private_key: Some(SecretString::from(private_key.into())),
            ..Self::default()
        }
    }

    /// Set the issuing CA certificate.
    #[must_use]
    pub fn with_ca(mut self, ca: impl Into<String>) -> Self {
        self.ca = Some(ca.into());
        self
    }

    /// Reference the issuing CA by its credential name instead.
    #[must_use]
    pub fn with_ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = Some(ca_name.into());
        self
    }

    /// Issuing CA certificate.
    #[must_use]
    pub fn ca(&self) -> Option<&str> {
        self.ca.as_deref()
    }

    /// Credential name of the issuing CA.
    #[must_use]
    pub fn ca_name(&self) -> Option<&str> {
        self.ca_name.as_deref()
    }

    /// PEM certificate.
    #[must_use]
    pub fn certificate(&self) -> Option<&str> {
        self.certificate.as_deref()
    }

    /// PEM private key.
    #[must_use]
    pub const fn private_key(&self) -> Option<&SecretString> {
        self.private_key.as_ref()
    }
}

impl CredentialValue for CertificateCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Certificate;
}

/// An RSA key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsaCredential {
    public_key: String,
    #[serde(serialize_with = "expose")]
    private_key: SecretString,
}

impl RsaCredential {
    /// Create an RSA credential from PEM strings.
    #[must_use]
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: SecretString::from(private_key.into()),
        }
    }

    /// PEM public key.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// PEM private key.
    #[must_use]
    pub const fn private_key(&self) -> &SecretString {
        &self.private_key
    }
}

impl CredentialValue for RsaCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Rsa;
}

/// An SSH key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshCredential {
    public_key: String,
    #[serde(serialize_with = "expose")]
    private_key: SecretString,
    #[serde(default, skip_serializing)]
    public_key_fingerprint: Option<String>,
}

impl SshCredential {
    /// Create an SSH credential.
    #[must_use]
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: SecretString::from(private_key.into()),
            public_key_fingerprint: None,
        }
    }

    /// OpenSSH public key.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// PEM private key.
    #[must_use]
    pub const fn private_key(&self) -> &SecretString {
        &self.private_key
    }

    /// SHA-256 fingerprint of the public key, computed by the server.
    #[must_use]
    pub fn public_key_fingerprint(&self) -> Option<&str> {
        self.public_key_fingerprint.as_deref()
    }
}

impl CredentialValue for SshCredential {
    const CREDENTIAL_TYPE: CredentialType = CredentialType::Ssh;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_accepts_both_forms() {
        let plain: PasswordCredential = serde_json::from_value(json!("x")).unwrap();
        let object: PasswordCredential = serde_json::from_value(json!({"password": "x"})).unwrap();
        assert_eq!(plain.password().expose_secret(), object.password().expose_secret());
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!("x"));
    }

    #[test]
    fn test_value_written_as_bare_string() {
        let value = ValueCredential::new("plain-text");
        assert_eq!(serde_json::to_value(&value).unwrap(), json!("plain-text"));

        let read: ValueCredential = serde_json::from_value(json!("plain-text")).unwrap();
        assert_eq!(read.value().expose_secret(), "plain-text");
    }

    #[test]
    fn test_user_password_hash_not_written() {
        let user: UserCredential = serde_json::from_value(json!({
            "username": "admin",
            "password": "pw",
            "password_hash": "$6$abc"
        }))
        .unwrap();
        assert_eq!(user.password_hash(), Some("$6$abc"));
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"username": "admin", "password": "pw"})
        );
    }

    #[test]
    fn test_certificate_skips_missing_fields() {
        let cert = CertificateCredential::new("CERT", "KEY").with_ca_name("/example-ca");
        assert_eq!(
            serde_json::to_value(&cert).unwrap(),
            json!({"ca_name": "/example-ca", "certificate": "CERT", "private_key": "KEY"})
        );

        let public_only: CertificateCredential =
            serde_json::from_value(json!({"certificate": "CERT"})).unwrap();
        assert!(public_only.private_key().is_none());
        assert_eq!(serde_json::to_value(&public_only).unwrap(), json!({"certificate": "CERT"}));
    }

    #[test]
    fn test_key_pairs_write_private_key() {
        let rsa = RsaCredential::new("PUBLIC", "PRIVATE");
        assert_eq!(
            serde_json::to_value(&rsa).unwrap(),
            json!({"public_key": "PUBLIC", "private_key": "PRIVATE"})
        );

        let ssh: SshCredential = serde_json::from_value(json!({
            "public_key": "ssh-rsa AAAA",
            "private_key": "PRIVATE",
            "public_key_fingerprint": "EvI0/GIUgDjcoCzUQM0EQ"
        }))
        .unwrap();
        assert_eq!(ssh.private_key().expose_secret(), "PRIVATE");
        assert_eq!(
            serde_json::to_value(&ssh).unwrap(),
            json!({"public_key": "ssh-rsa AAAA", "private_key": "PRIVATE"})
        );
    }

    #[test]
    fn test_json_credential_round_trip() {
        let value = json!({"client_id": "app", "nested": {"port": 5432}});
        let cred: JsonCredential = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(cred.get("client_id"), Some(&json!("app")));
        assert_eq!(serde_json::to_value(&cred).unwrap(), value);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!(
            "{:?} {:?} {:?} {:?} {:?} {:?} {:?}",
            PasswordCredential::new("hunter2"),
            ValueCredential::new("hunter2"),
            UserCredential::new("admin", "hunter2"),
            RsaCredential::new("PUBLIC", "hunter2"),
            SshCredential::new("ssh-rsa AAAA", "hunter2"),
            CertificateCredential::new("CERT", "hunter2"),
            JsonCredential::default().with("client_secret", "hunter2"),
        );
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("admin"));
        assert!(rendered.contains("PUBLIC"));
        assert!(rendered.contains("client_secret"));
    }
}
