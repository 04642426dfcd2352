use bridge_core::hash::hex_sha256;
use bridge_core::utils::Redact;
use bridge_core::KeyPair;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Authentication mode of a client. Exactly one is active at a time.
#[derive(Debug, Clone, Default)]
pub enum Credential {
    /// Sign every request with the key pair.
    KeyPair(Arc<dyn KeyPair>),
    /// HTTP basic auth with email and password digest.
    BasicAuth(BasicAuthCredential),
    /// Unauthenticated.
    #[default]
    None,
}

impl Credential {
    /// Check if no authentication is configured.
    pub fn is_none(&self) -> bool {
        matches!(self, Credential::None)
    }
}

/// Email and password digest used for basic auth.
///
/// Only the SHA256 hex digest of the password is kept; the plaintext is
/// dropped as soon as the credential is built.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthCredential {
    email: String,
    password_digest: String,
}

impl BasicAuthCredential {
    /// Build the credential from a plaintext password.
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            password_digest: hex_sha256(password.as_bytes()),
        }
    }

    /// Build the credential from an already computed SHA256 hex digest.
    pub fn from_digest(email: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_digest: password_digest.into(),
        }
    }

    /// Account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// SHA256 hex digest of the password.
    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }
}

impl Debug for BasicAuthCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthCredential")
            .field("email", &self.email)
            .field("password_digest", &Redact::from(&self.password_digest))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::hash::{sha256, Encoding};

    #[test]
    fn test_password_is_hashed_once() -> bridge_core::Result<()> {
        let cred = BasicAuthCredential::new("a@b.com", "secret");

        assert_eq!(cred.email(), "a@b.com");
        assert_eq!(cred.password_digest(), sha256("secret", Encoding::Utf8)?);
        assert_eq!(
            cred,
            BasicAuthCredential::from_digest("a@b.com", sha256("secret", Encoding::Utf8)?)
        );
        Ok(())
    }

    #[test]
    fn test_debug_is_redacted() {
        let cred = BasicAuthCredential::new("a@b.com", "secret");
        let output = format!("{:?}", Credential::BasicAuth(cred.clone()));

        assert!(output.contains("a@b.com"));
        assert!(!output.contains(cred.password_digest()));
        assert!(!output.contains("secret"));
    }
}
