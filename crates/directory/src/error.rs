use std::fmt;

use crate::{template::TemplateError, transport::TransportError};

/// The step of connection setup that failed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Dial,
    StartTls,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dial => "dial",
            Self::StartTls => "starttls",
        })
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no bind strategy configured")]
    NoBind,
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Why an authentication attempt failed.
///
/// Messages carry the DN or filter involved, never a password.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot establish connection to {addr} ({phase}): {source}")]
    Dial {
        phase: Phase,
        addr: String,
        source: TransportError,
    },
    #[error("service bind failed for {dn:?}: {source}")]
    ServiceBind { dn: String, source: TransportError },
    #[error("search under {base:?} with filter {filter} failed: {source}")]
    Search {
        base: String,
        filter: String,
        source: TransportError,
    },
    #[error("no user matched filter {filter}")]
    NoSuchUser { filter: String },
    #[error("filter {filter} matched {count} users")]
    AmbiguousUser { filter: String, count: usize },
    #[error("search succeeded but entry has no DN")]
    MissingDn,
    #[error("authentication failed for {dn}")]
    AuthenticationFailed {
        dn: String,
        #[source]
        source: TransportError,
    },
}

impl Error {
    /// Whether the directory turned the presented credentials down, as
    /// opposed to the attempt failing for infrastructure or configuration
    /// reasons.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NoSuchUser { .. } | Self::AuthenticationFailed { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
