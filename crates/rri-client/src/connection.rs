//! TLS connection to the registry.
//!
//! The exchange itself only needs a byte stream; this module is what
//! the binary uses to get one, and to take it down again afterwards.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Encrypted stream to the registry.
pub type RegistryStream = TlsStream<TcpStream>;

/// Open a TCP connection and run the TLS handshake, both within the
/// configured connect timeout.
pub async fn connect_tls(config: &Config) -> Result<RegistryStream> {
    let addr = config.socket_addr_string();
    info!("Connecting to {}...", addr);

    let server_name = ServerName::try_from(config.host.clone())
        .with_context(|| format!("invalid TLS server name {:?}", config.host))?;
    let connector = tls_connector();

    let handshake = async {
        let tcp = TcpStream::connect((config.host.as_str(), config.port))
            .await
            .with_context(|| format!("TCP connect to {} failed", addr))?;
        tcp.set_nodelay(true)?;
        debug!(peer = ?tcp.peer_addr().ok(), "TCP connected, starting TLS handshake");

        let stream = connector
            .connect(server_name, tcp)
            .await
            .with_context(|| format!("TLS handshake with {} failed", addr))?;
        Ok::<_, anyhow::Error>(stream)
    };

    let stream = timeout(config.connect_timeout, handshake)
        .await
        .with_context(|| {
            format!(
                "connecting to {} timed out after {:?}",
                addr, config.connect_timeout
            )
        })??;

    info!("Connected to {}", addr);
    Ok(stream)
}

/// Shut the TLS session down. Failures are logged, not returned: by the
/// time a connection is closed, the batch outcome is already decided.
pub async fn close(stream: &mut RegistryStream) {
    if let Err(e) = stream.shutdown().await {
        warn!("Closing connection failed: {}", e);
    } else {
        debug!("Connection closed");
    }
}

fn tls_connector() -> TlsConnector {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let tls = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(tls))
}
