pub mod ssh;
pub mod telnet;

use crate::config::{AddressFamily, SessionConfig};
use crate::error::NetcliError;
use async_trait::async_trait;
use std::net::SocketAddr;
use tracing::debug;

/// Duplex byte channel to a device CLI.
///
/// `read` completes as soon as any bytes are available and may otherwise
/// suspend indefinitely; callers are expected to wrap it in a timeout.
#[async_trait]
pub trait Transport: Send {
    /// Write raw bytes to the device.
    async fn send(&mut self, data: &[u8]) -> Result<(), NetcliError>;

    /// Read up to `max` bytes, suspending until at least one is available.
    async fn read(&mut self, max: usize) -> Result<Vec<u8>, NetcliError>;

    /// Close the channel. Best effort; safe to call more than once.
    async fn close(&mut self) -> Result<(), NetcliError>;
}

/// Resolve the target and open a TCP connection honouring the configured
/// address family and local bind address.
pub(crate) async fn open_tcp(
    config: &SessionConfig,
    port: u16,
) -> Result<tokio::net::TcpStream, NetcliError> {
    let host = &config.host;
    let target = format!("{}:{}", host, port);

    debug!(target: "transport::open_tcp", "Resolving {}", target);
    let lookup = tokio::time::timeout(config.timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| NetcliError::timeout(host, format!("resolving {}", target)))?
        .map_err(|e| NetcliError::connection(host, format!("failed to resolve {}: {}", target, e)))?;

    let addr: SocketAddr = lookup
        .filter(|a| match config.family {
            AddressFamily::Unspecified => true,
            AddressFamily::Ipv4 => a.is_ipv4(),
            AddressFamily::Ipv6 => a.is_ipv6(),
        })
        .next()
        .ok_or_else(|| {
            NetcliError::connection(host, format!("no usable address found for {}", target))
        })?;

    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4()
    } else {
        tokio::net::TcpSocket::new_v6()
    }
    .map_err(|e| NetcliError::connection(host, format!("failed to create socket: {}", e)))?;

    if let Some(local) = config.local_addr {
        socket
            .bind(local)
            .map_err(|e| NetcliError::connection(host, format!("failed to bind {}: {}", local, e)))?;
    }

    debug!(target: "transport::open_tcp", "Establishing TCP connection to {}", addr);
    let stream = tokio::time::timeout(config.timeout, socket.connect(addr))
        .await
        .map_err(|_| NetcliError::timeout(host, format!("connecting to {}", target)))?
        .map_err(|e| {
            NetcliError::connection(host, format!("failed to connect to {}: {}", target, e))
        })?;

    Ok(stream)
}
