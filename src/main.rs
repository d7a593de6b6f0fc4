mod cli;

use std::fmt::Write as _;

use anyhow::{bail, Context};
use clap::Parser;
use directory::{escape, escape_dn, Client, Entry, LdapDialer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // LDAPC_DEBUG=yes turns on step-by-step logging unless RUST_LOG says otherwise
    let default_level = match std::env::var("LDAPC_DEBUG") {
        Ok(value) if !value.is_empty() => "debug",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if escape(&args.username) != args.username || escape_dn(&args.username) != args.username {
        bail!("username {:?} contains characters reserved in LDAP filters or DNs", args.username);
    }

    let mut dialer = LdapDialer::new();
    if let Some(timeout) = args.timeout {
        dialer = dialer.with_connect_timeout(timeout);
    }
    let client = Client::with_dialer(args.config(), dialer).with_bind(args.bind()?);

    let entry = client
        .authenticate(&args.username, &args.password)
        .await
        .context("LDAP authentication failed")?;
    info!(dn = %entry.dn(), "authenticated");

    print!("{}", render(&entry, &args.attributes));

    Ok(())
}

fn render(entry: &Entry, attributes: &[String]) -> String {
    let mut out = format!("dn: {}\n", entry.dn());
    for name in attributes {
        for value in entry.attribute_values(name) {
            let _ = writeln!(out, "{name}: {value}");
        }
    }
    out
}
