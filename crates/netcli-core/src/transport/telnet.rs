use crate::config::SessionConfig;
use crate::error::NetcliError;
use crate::prompt_reader::PromptReader;
use crate::transport::{open_tcp, Transport};
use async_trait::async_trait;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Plain TCP transport for Telnet-managed devices.
pub struct TelnetTransport {
    stream: Option<TcpStream>,
    host: String,
}

impl TelnetTransport {
    /// Open a TCP connection to the device's Telnet port.
    pub async fn connect(config: &SessionConfig) -> Result<Self, NetcliError> {
        let host = config.host.clone();
        let port = config.port.unwrap_or(23);

        info!("Establishing Telnet connection to {}:{}", host, port);
        let stream = open_tcp(config, port).await?;

        Ok(Self {
            stream: Some(stream),
            host,
        })
    }

    fn stream_mut(&mut self) -> Result<&mut TcpStream, NetcliError> {
        let host = self.host.clone();
        self.stream.as_mut().ok_or_else(move || {
            NetcliError::read(host, "attempt to use a closed telnet connection")
        })
    }
}

#[async_trait]
impl Transport for TelnetTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), NetcliError> {
        let host = self.host.clone();
        let stream = self.stream_mut()?;
        stream
            .write_all(data)
            .await
            .map_err(|e| NetcliError::write(&host, format!("failed to write to socket: {}", e)))?;
        stream
            .flush()
            .await
            .map_err(|e| NetcliError::write(&host, format!("failed to flush socket: {}", e)))?;
        Ok(())
    }

    async fn read(&mut self, max: usize) -> Result<Vec<u8>, NetcliError> {
        let host = self.host.clone();
        let stream = self.stream_mut()?;
        let mut buffer = vec![0u8; max];
        let n = stream
            .read(&mut buffer)
            .await
            .map_err(|e| NetcliError::read(&host, format!("failed to read from socket: {}", e)))?;
        if n == 0 {
            return Err(NetcliError::connection(
                host,
                "connection closed by remote device",
            ));
        }
        buffer.truncate(n);
        Ok(buffer)
    }

    async fn close(&mut self) -> Result<(), NetcliError> {
        debug!(target: "TelnetTransport::close", "Closing telnet connection");
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!(target: "TelnetTransport::close", "Error shutting down socket: {}", e);
            }
        }
        Ok(())
    }
}

/// Run the Telnet login dialogue over an established connection.
///
/// Reads up to the username and password banners, answers with the
/// credentials, then waits for either a prompt delimiter or the device's
/// login rejection. The dialogue ends with a bare newline so the prompt
/// resolver has something to chew on.
pub async fn login(
    reader: &mut PromptReader,
    username: &str,
    password: &str,
) -> Result<(), NetcliError> {
    lazy_static! {
        static ref USERNAME_PATTERN: Regex = Regex::new(r"(?i)username").unwrap();
        static ref PASSWORD_PATTERN: Regex = Regex::new(r"(?i)password").unwrap();
        static ref LOGIN_INVALID_PATTERN: Regex = Regex::new(r"Login invalid").unwrap();
    }

    let host = reader.host().to_string();
    info!("Trying to login to {} over telnet", host);

    let mut output = reader
        .read_until_patterns(&[USERNAME_PATTERN.clone()], None)
        .await?;
    reader.send(&format!("{}\n", username)).await?;

    output += &reader
        .read_until_patterns(&[PASSWORD_PATTERN.clone()], None)
        .await?;
    reader.send(&format!("{}\n", password)).await?;

    let delimiter_pattern = reader.fallback_pattern().clone();
    output += &reader
        .read_until_patterns(&[delimiter_pattern, LOGIN_INVALID_PATTERN.clone()], None)
        .await?;
    reader.send("\n").await?;

    if output.contains("Login invalid") {
        return Err(NetcliError::authentication(host, "authentication failed"));
    }

    debug!(target: "telnet::login", "Telnet login complete");
    Ok(())
}
