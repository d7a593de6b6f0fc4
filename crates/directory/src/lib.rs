//! Username/password authentication against an LDAP directory.
//!
//! A [`Client`] connects (plain, LDAPS or StartTLS), then runs one of two
//! [`Bind`] strategies:
//!
//! - [`IndirectBind`]: bind as a service account, search for the user,
//!   bind as the entry found.
//! - [`DirectBind`]: bind as a DN built from the username, then confirm the
//!   entry matches a filter.
//!
//! ```no_run
//! # async fn run() -> Result<(), directory::Error> {
//! use directory::{escape, Client, Config, IndirectBind, Protocol};
//!
//! let client = Client::new(Config::new(Protocol::StartTls, "ldap.example.com")).with_bind(
//!     IndirectBind::new(
//!         "cn=reader,dc=example,dc=com",
//!         "secret",
//!         "dc=example,dc=com",
//!         "(&(objectClass=posixAccount)(uid=%s))",
//!     )?,
//! );
//!
//! let entry = client.authenticate(&escape("alice"), "hunter2").await?;
//! println!("{:?}", entry.attribute("mail"));
//! # Ok(())
//! # }
//! ```
//!
//! # Filter injection
//!
//! Usernames are substituted into templates without escaping. Anything that
//! did not come from a trusted source must go through [`escape`] (filters)
//! or [`escape_dn`] (DN templates) before it is passed in.

#![warn(clippy::pedantic)]

pub mod bind;
pub mod client;
pub mod config;
pub mod connect;
pub mod entry;
pub mod error;
pub mod escape;
pub mod ldap;
pub mod template;
pub mod transport;

#[cfg(test)]
mod testing;

pub use bind::{Bind, DirectBind, IndirectBind};
pub use client::Client;
pub use config::{Config, Protocol, TlsConfig};
pub use entry::Entry;
pub use error::{ConfigError, Error, Phase};
pub use escape::{escape, escape_dn};
pub use ldap::LdapDialer;
pub use template::{Template, TemplateError};
