//! The two ways of turning a username and password into a bound entry.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{
    error::{ConfigError, Error, Result},
    template::Template,
    transport::{Connection, TransportError},
    Entry,
};

/// How a [`Client`](crate::Client) proves a user's password.
#[derive(Debug, Clone)]
pub enum Bind {
    Indirect(IndirectBind),
    Direct(DirectBind),
}

impl Bind {
    pub(crate) async fn auth<C: Connection>(
        &self,
        conn: &mut C,
        username: &str,
        password: &str,
    ) -> Result<Entry> {
        match self {
            Self::Indirect(bind) => bind.auth(conn, username, password).await,
            Self::Direct(bind) => bind.auth(conn, username, password).await,
        }
    }
}

impl From<IndirectBind> for Bind {
    fn from(bind: IndirectBind) -> Self {
        Self::Indirect(bind)
    }
}

impl From<DirectBind> for Bind {
    fn from(bind: DirectBind) -> Self {
        Self::Direct(bind)
    }
}

/// Search-then-bind.
///
/// 1. Bind as the service account (`bind_dn`, `bind_password`); both empty
///    means an anonymous bind.
/// 2. Search the subtree under `base_dn` with `filter`, which must match
///    exactly one entry.
/// 3. Bind as that entry's DN with the user's password.
#[derive(Debug, Clone)]
pub struct IndirectBind {
    pub bind_dn: String,
    pub bind_password: SecretString,
    pub base_dn: String,
    /// E.g. `(&(objectClass=posixAccount)(uid=%s))`, or
    /// `(&(objectClass=user)(sAMAccountName=%s))` for Active Directory.
    pub filter: Template,
}

impl IndirectBind {
    pub fn new(
        bind_dn: impl Into<String>,
        bind_password: impl Into<String>,
        base_dn: impl Into<String>,
        filter: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_dn: bind_dn.into(),
            bind_password: SecretString::new(bind_password.into()),
            base_dn: base_dn.into(),
            filter: Template::new(filter)?,
        })
    }

    /// Look users up without a service account.
    pub fn anonymous(base_dn: impl Into<String>, filter: &str) -> Result<Self, ConfigError> {
        Self::new("", "", base_dn, filter)
    }

    async fn auth<C: Connection>(
        &self,
        conn: &mut C,
        username: &str,
        password: &str,
    ) -> Result<Entry> {
        debug!(bind_dn = %self.bind_dn, "service bind");
        conn.bind(&self.bind_dn, self.bind_password.expose_secret())
            .await
            .map_err(|source| Error::ServiceBind {
                dn: self.bind_dn.clone(),
                source,
            })?;

        let entry = search_one(conn, &self.base_dn, self.filter.fill(username)).await?;

        // a directory must never hand back an entry without a DN
        if entry.dn.is_empty() {
            return Err(Error::MissingDn);
        }
        debug!(user_dn = %entry.dn, "user found");

        reject_empty_password(&entry.dn, password)?;
        conn.bind(&entry.dn, password)
            .await
            .map_err(|source| Error::AuthenticationFailed {
                dn: entry.dn.clone(),
                source,
            })?;
        debug!(user_dn = %entry.dn, "user authenticated");

        Ok(entry)
    }
}

/// Bind-then-search.
///
/// 1. Bind as `user_dn` filled with the username.
/// 2. Search the subtree under that DN with `filter`, which must match
///    exactly one entry. A correct password alone is not enough: the entry
///    must also satisfy the filter.
#[derive(Debug, Clone)]
pub struct DirectBind {
    /// E.g. `uid=%s,ou=People,dc=example,dc=com`.
    pub user_dn: Template,
    pub filter: Template,
}

impl DirectBind {
    pub fn new(user_dn: &str, filter: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            user_dn: Template::new(user_dn)?,
            filter: Template::new(filter)?,
        })
    }

    async fn auth<C: Connection>(
        &self,
        conn: &mut C,
        username: &str,
        password: &str,
    ) -> Result<Entry> {
        let user_dn = self.user_dn.fill(username);
        reject_empty_password(&user_dn, password)?;
        debug!(%user_dn, "user bind");

        if let Err(source) = conn.bind(&user_dn, password).await {
            return Err(Error::AuthenticationFailed {
                dn: user_dn,
                source,
            });
        }
        debug!(%user_dn, "user authenticated");

        search_one(conn, &user_dn, self.filter.fill(username)).await
    }
}

/// A simple bind with a DN and no password is an unauthenticated bind
/// (RFC 4513 5.1.2), which some servers report as a success.
fn reject_empty_password(dn: &str, password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::AuthenticationFailed {
            dn: dn.to_owned(),
            source: TransportError::new("empty password"),
        });
    }
    Ok(())
}

async fn search_one<C: Connection>(conn: &mut C, base: &str, filter: String) -> Result<Entry> {
    debug!(base, %filter, "searching");

    let mut entries = match conn.search(base, &filter).await {
        Ok(entries) => entries,
        Err(source) => {
            return Err(Error::Search {
                base: base.to_owned(),
                filter,
                source,
            })
        }
    };

    match entries.len() {
        0 => Err(Error::NoSuchUser { filter }),
        1 => Ok(entries.swap_remove(0)),
        count => Err(Error::AmbiguousUser { filter, count }),
    }
}
