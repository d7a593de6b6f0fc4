//! Credential types shared between login frontends and the backends that
//! verify them.

use std::fmt;

use secrecy::SecretString;

/// A username/password pair as presented by a client.
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Who a set of credentials turned out to belong to.
///
/// Directory backends use the distinguished name of the bound entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unknown error")]
    Unknown,
}

#[async_trait::async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, credentials: &Credentials) -> Result<Identity, ValidationError>;
}
