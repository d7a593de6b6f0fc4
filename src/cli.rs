use std::time::Duration;

use clap::{ArgGroup, Parser};
use directory::{Bind, Config, ConfigError, DirectBind, IndirectBind, Protocol, TlsConfig};

const DEFAULT_FILTER: &str = "(&(objectClass=posixAccount)(uid=%s))";

/// Check a username and password against an LDAP directory and print the
/// matching entry.
///
/// With --base-dn the user is looked up after a service (or anonymous) bind;
/// with --user-dn the username is bound directly.
#[derive(Debug, Parser)]
#[command(name = "ldapc", version)]
#[command(group(ArgGroup::new("mode").required(true).args(["base_dn", "user_dn"])))]
pub struct Args {
    pub username: String,

    #[arg(long, env = "LDAPC_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// ldap, ldaps or starttls
    #[arg(long, env = "LDAPC_PROTOCOL", default_value = "ldap")]
    pub protocol: Protocol,

    #[arg(long, env = "LDAPC_HOST", default_value = "localhost")]
    pub host: String,

    /// Defaults to 636 for ldaps and 389 otherwise
    #[arg(long, env = "LDAPC_PORT")]
    pub port: Option<u16>,

    /// Accept any server certificate
    #[arg(long, env = "LDAPC_INSECURE")]
    pub insecure: bool,

    /// Connect timeout in seconds
    #[arg(long, env = "LDAPC_TIMEOUT", value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Subtree to search for the user
    #[arg(long, env = "LDAPC_BASE_DN")]
    pub base_dn: Option<String>,

    /// Service account for the search; leave empty for an anonymous bind
    #[arg(long, env = "LDAPC_BIND_DN", default_value = "")]
    pub bind_dn: String,

    #[arg(long, env = "LDAPC_BIND_PASSWORD", default_value = "", hide_env_values = true)]
    pub bind_password: String,

    /// DN to bind as, e.g. uid=%s,ou=People,dc=example,dc=com
    #[arg(long, env = "LDAPC_USER_DN")]
    pub user_dn: Option<String>,

    /// Filter the user entry must match; %s is replaced by the username
    #[arg(long, env = "LDAPC_FILTER", default_value = DEFAULT_FILTER)]
    pub filter: String,

    /// Attributes to print
    #[arg(short, long = "attribute", default_values = ["uid", "mail"])]
    pub attributes: Vec<String>,
}

impl Args {
    pub fn config(&self) -> Config {
        let mut config = Config::new(self.protocol, &self.host);
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if self.insecure {
            config = config.with_tls(TlsConfig {
                allow_invalid_certs: true,
            });
        }
        config
    }

    pub fn bind(&self) -> Result<Bind, ConfigError> {
        match (&self.user_dn, &self.base_dn) {
            (Some(user_dn), _) => Ok(DirectBind::new(user_dn, &self.filter)?.into()),
            (None, Some(base_dn)) => Ok(IndirectBind::new(
                &self.bind_dn,
                &self.bind_password,
                base_dn,
                &self.filter,
            )?
            .into()),
            (None, None) => Err(ConfigError::NoBind),
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify() {
        Args::command().debug_assert();
    }

    #[test]
    fn search_defaults() {
        let args = Args::try_parse_from([
            "ldapc",
            "--password",
            "user2",
            "--base-dn",
            "dc=test,dc=com",
            "user2",
        ])
        .unwrap();

        assert_eq!(args.config(), Config::new(Protocol::Plain, "localhost"));
        assert_eq!(args.attributes, ["uid", "mail"]);
        let Bind::Indirect(bind) = args.bind().unwrap() else {
            panic!("expected a search bind");
        };
        assert_eq!(bind.bind_dn, "");
        assert_eq!(bind.base_dn, "dc=test,dc=com");
        assert_eq!(bind.filter.as_str(), DEFAULT_FILTER);
    }

    #[test]
    fn direct_with_options() {
        let args = Args::try_parse_from([
            "ldapc",
            "--password",
            "user2",
            "--user-dn",
            "uid=%s,ou=People,dc=test,dc=com",
            "--protocol",
            "ldaps",
            "--insecure",
            "--timeout",
            "5",
            "-a",
            "cn",
            "user2",
        ])
        .unwrap();

        let config = args.config();
        assert_eq!(config.protocol, Protocol::Tls);
        assert_eq!(config.port, 636);
        assert_eq!(
            config.tls,
            Some(TlsConfig {
                allow_invalid_certs: true
            })
        );
        assert_eq!(args.timeout, Some(Duration::from_secs(5)));
        assert_eq!(args.attributes, ["cn"]);
        assert!(matches!(args.bind().unwrap(), Bind::Direct(_)));
    }

    #[test]
    fn modes_are_exclusive() {
        let res = Args::try_parse_from([
            "ldapc",
            "--password",
            "x",
            "--base-dn",
            "dc=test,dc=com",
            "--user-dn",
            "uid=%s,dc=test,dc=com",
            "user2",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_template() {
        let args = Args::try_parse_from([
            "ldapc",
            "--password",
            "x",
            "--base-dn",
            "dc=test,dc=com",
            "--filter",
            "(uid=user2)",
            "user2",
        ])
        .unwrap();
        assert!(matches!(args.bind(), Err(ConfigError::Template(_))));
    }
}
