use std::fmt;

/// How the transport to the directory server is secured.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Protocol {
    /// Unencrypted LDAP.
    #[default]
    Plain,
    /// LDAPS: TLS from the first byte.
    Tls,
    /// Plain LDAP upgraded with the StartTLS extended operation.
    StartTls,
}

impl Protocol {
    /// The well-known port for this protocol.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Plain | Self::StartTls => 389,
            Self::Tls => 636,
        }
    }

    pub(crate) const fn scheme(self) -> &'static str {
        match self {
            Self::Plain | Self::StartTls => "ldap",
            Self::Tls => "ldaps",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown protocol {0:?}, expected one of ldap, ldaps, starttls")]
pub struct UnknownProtocol(String);

impl std::str::FromStr for Protocol {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ldap" | "plain" => Ok(Self::Plain),
            "ldaps" | "tls" => Ok(Self::Tls),
            "starttls" | "start_tls" => Ok(Self::StartTls),
            _ => Err(UnknownProtocol(s.to_owned())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "ldap",
            Self::Tls => "ldaps",
            Self::StartTls => "starttls",
        })
    }
}

/// Certificate handling for [`Protocol::Tls`] and [`Protocol::StartTls`].
///
/// Leaving it out of [`Config`] means platform defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Skip server certificate and hostname verification. Test setups only.
    pub allow_invalid_certs: bool,
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    /// Ignored for [`Protocol::Plain`].
    pub tls: Option<TlsConfig>,
}

impl Config {
    /// A config for `host` on the protocol's default port.
    pub fn new(protocol: Protocol, host: impl Into<String>) -> Self {
        Self {
            protocol,
            host: host.into(),
            port: protocol.default_port(),
            tls: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// `host:port`, as used in logs and errors.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
