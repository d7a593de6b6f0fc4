use tracing::debug;

use crate::{
    config::{Config, Protocol},
    error::{Error, Phase},
    transport::Dialer,
};

/// Open a connection secured as `config.protocol` asks.
///
/// A StartTLS upgrade that fails leaves no connection open.
pub async fn establish<D: Dialer>(dialer: &D, config: &Config) -> Result<D::Conn, Error> {
    let Config {
        protocol,
        host,
        port,
        tls,
    } = config;
    let dial_error = |phase, source| Error::Dial {
        phase,
        addr: config.addr(),
        source,
    };

    debug!(%protocol, %host, port, "connecting");

    match protocol {
        Protocol::Plain => dialer
            .dial(host, *port)
            .await
            .map_err(|e| dial_error(Phase::Dial, e)),
        Protocol::Tls => dialer
            .dial_tls(host, *port, tls.as_ref())
            .await
            .map_err(|e| dial_error(Phase::Dial, e)),
        Protocol::StartTls => dialer
            .dial_start_tls(host, *port, tls.as_ref())
            .await
            .map_err(|(phase, e)| dial_error(phase, e)),
    }
}
