//! [`Dialer`] backed by the `ldap3` client.

use std::{io, time::Duration};

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use tracing::{debug, warn};

use crate::{
    config::{Protocol, TlsConfig},
    error::Phase,
    transport::{Connection, Dialer, TransportError},
    Entry,
};

#[derive(Debug, Clone, Default)]
pub struct LdapDialer {
    /// Deadline for the TCP connect, and the TLS handshake where there is one.
    pub connect_timeout: Option<Duration>,
}

impl LdapDialer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    fn settings(&self, tls: Option<&TlsConfig>) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new();
        if let Some(timeout) = self.connect_timeout {
            settings = settings.set_conn_timeout(timeout);
        }
        if let Some(tls) = tls {
            settings = settings.set_no_tls_verify(tls.allow_invalid_certs);
        }
        settings
    }

    async fn connect(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<LdapConnection, LdapError> {
        let url = url(protocol.scheme(), host, port);
        let settings = self
            .settings(tls)
            .set_starttls(protocol == Protocol::StartTls);
        let ldap = open(&url, settings).await?;
        Ok(LdapConnection { ldap, url })
    }
}

#[async_trait]
impl Dialer for LdapDialer {
    type Conn = LdapConnection;

    async fn dial(&self, host: &str, port: u16) -> Result<LdapConnection, TransportError> {
        Ok(self.connect(Protocol::Plain, host, port, None).await?)
    }

    async fn dial_tls(
        &self,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<LdapConnection, TransportError> {
        Ok(self.connect(Protocol::Tls, host, port, tls).await?)
    }

    // ldap3 issues StartTLS while it sets the connection up, so the upgrade
    // happens on the one socket it opens.
    async fn dial_start_tls(
        &self,
        host: &str,
        port: u16,
        tls: Option<&TlsConfig>,
    ) -> Result<LdapConnection, (Phase, TransportError)> {
        self.connect(Protocol::StartTls, host, port, tls)
            .await
            .map_err(|e| (start_tls_phase(&e), e.into()))
    }
}

/// Which step of a combined connect and StartTLS an error came from. I/O
/// errors that mean the server was never reached belong to the dial.
fn start_tls_phase(err: &LdapError) -> Phase {
    match err {
        LdapError::Io { source }
            if !matches!(
                source.kind(),
                io::ErrorKind::InvalidData
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ) =>
        {
            Phase::Dial
        }
        _ => Phase::StartTls,
    }
}

pub struct LdapConnection {
    ldap: Ldap,
    url: String,
}

#[async_trait]
impl Connection for LdapConnection {
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), TransportError> {
        self.ldap.simple_bind(dn, password).await?.success()?;
        Ok(())
    }

    async fn search(&mut self, base: &str, filter: &str) -> Result<Vec<Entry>, TransportError> {
        let (entries, _) = self
            .ldap
            .search(base, Scope::Subtree, filter, Vec::<&str>::new())
            .await?
            .success()?;

        Ok(entries
            .into_iter()
            .map(|entry| SearchEntry::construct(entry).into())
            .collect())
    }

    async fn close(&mut self) {
        if let Err(e) = self.ldap.unbind().await {
            debug!(error = %e, url = %self.url, "unbind failed");
        }
    }
}

async fn open(url: &str, settings: LdapConnSettings) -> Result<Ldap, LdapError> {
    let (conn, ldap) = LdapConnAsync::with_settings(settings, url).await?;

    tokio::spawn(async move {
        if let Err(e) = conn.drive().await {
            warn!(error = %e, "ldap connection driver error");
        }
    });

    Ok(ldap)
}

fn url(scheme: &str, host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("{scheme}://[{host}]:{port}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}
