//! Escaping for untrusted values that end up in filters or DNs.
//!
//! [`Client::authenticate`](crate::Client::authenticate) inserts usernames
//! into templates verbatim; these helpers are for the caller to apply first.

use std::borrow::Cow;

/// Escape a value for use inside a search filter (RFC 4515).
pub fn escape(value: &str) -> Cow<'_, str> {
    ldap3::ldap_escape(value)
}

/// Escape a value for use as an attribute value in a DN (RFC 4514).
pub fn escape_dn(value: &str) -> Cow<'_, str> {
    ldap3::dn_escape(value)
}
