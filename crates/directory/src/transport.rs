//! The seam between the authentication logic and whatever actually speaks
//! LDAP on the wire.

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;
use tracing::debug;

use crate::{config::TlsConfig, error::Phase, Entry};

/// An error reported by the directory client.
#[derive(Debug)]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<ldap3::LdapError> for TransportError {
    fn from(err: ldap3::LdapError) -> Self {
        Self::new(err)
    }
}

/// Opens connections to a directory server.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Conn: Connection;

    /// Open a plaintext connection.
    async fn dial(&self, host: &str, port: u16) -> Result<Self::Conn, TransportError>;

    /// Open a connection that is wrapped in TLS from the first byte.
    async fn dial_tls(
        &self,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<Self::Conn, TransportError>;

    /// Open a plaintext connection and upgrade it with StartTLS. On failure
    /// the connection is already closed and the error names the step that
    /// failed.
    ///
    /// Transports that can only negotiate StartTLS while opening a
    /// connection override this to make a single attempt.
    async fn dial_start_tls(
        &self,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<Self::Conn, (Phase, TransportError)> {
        let mut conn = self
            .dial(host, port)
            .await
            .map_err(|e| (Phase::Dial, e))?;

        if let Err(e) = conn.start_tls(tls).await {
            debug!(error = %e, "starttls failed");
            conn.close().await;
            return Err((Phase::StartTls, e));
        }

        Ok(conn)
    }
}

/// A live connection, owned by a single authentication attempt.
#[async_trait]
pub trait Connection: Send {
    /// Upgrade a plaintext connection in place.
    async fn start_tls(&mut self, _tls: Option<&TlsConfig>) -> Result<(), TransportError> {
        Err(TransportError::new(
            "this transport cannot upgrade an open connection",
        ))
    }

    /// Simple bind. Empty `dn` and `password` request an anonymous bind.
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), TransportError>;

    /// Subtree search under `base` returning every attribute of every match.
    async fn search(&mut self, base: &str, filter: &str) -> Result<Vec<Entry>, TransportError>;

    /// Release the connection. Failures are not reported.
    async fn close(&mut self);
}
