use auth::{Credentials, Identity, ValidationError, Validator};
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::{
    bind::Bind,
    config::Config,
    connect,
    error::{ConfigError, Result},
    ldap::LdapDialer,
    transport::{Connection, Dialer},
    Entry,
};

/// Verifies username/password pairs against one directory server.
///
/// Every call to [`Client::authenticate`] opens its own connection and
/// closes it before returning, so a `Client` can be shared freely.
#[derive(Debug, Clone)]
pub struct Client<D = LdapDialer> {
    pub config: Config,
    pub bind: Option<Bind>,
    dialer: D,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self::with_dialer(config, LdapDialer::default())
    }
}

impl<D: Dialer> Client<D> {
    pub fn with_dialer(config: Config, dialer: D) -> Self {
        Self {
            config,
            bind: None,
            dialer,
        }
    }

    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<Bind>) -> Self {
        self.bind = Some(bind.into());
        self
    }

    /// Authenticate `username` and return their directory entry.
    ///
    /// `username` is substituted into DN and filter templates as is. Callers
    /// must escape untrusted input with [`crate::escape()`] first, or a crafted
    /// username can rewrite the search filter.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Entry> {
        let bind = self.bind.as_ref().ok_or(ConfigError::NoBind)?;

        let mut conn = connect::establish(&self.dialer, &self.config).await?;
        let result = bind.auth(&mut conn, username, password).await;
        conn.close().await;

        match &result {
            Ok(entry) => debug!(dn = %entry.dn, "authenticated"),
            Err(e) => debug!(error = %e, "authentication failed"),
        }

        result
    }
}

#[async_trait::async_trait]
impl<D: Dialer> Validator for Client<D> {
    async fn validate(&self, credentials: &Credentials) -> Result<Identity, ValidationError> {
        match self
            .authenticate(&credentials.username, credentials.password.expose_secret())
            .await
        {
            Ok(entry) => Ok(Identity(entry.dn)),
            Err(e) if e.is_rejection() => Err(ValidationError::InvalidCredentials),
            Err(e) => {
                warn!(error = %e, "directory unavailable for authentication");
                Err(ValidationError::Unknown)
            }
        }
    }
}
