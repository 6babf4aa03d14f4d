use crate::config::SessionConfig;
use crate::error::NetcliError;
use crate::transport::{open_tcp, Transport};
use async_trait::async_trait;
use ssh2::{CheckResult, KnownHostFileKind, MethodType, Session};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

// Poll interval for the non-blocking channel once the shell is up
const POLL_DELAY: Duration = Duration::from_millis(25);

/// Interactive SSH shell channel to a network device.
///
/// The underlying libssh2 session is blocking for connect, handshake and
/// authentication, then switched to non-blocking so that reads and writes
/// become suspension points for the scheduler.
pub struct SshTransport {
    session: Session,
    channel: ssh2::Channel,
    host: String,
}

impl SshTransport {
    /// Open a connection, authenticate and start an interactive shell.
    ///
    /// `username_suffix` is appended to the configured username; some
    /// platforms use it to pass terminal options at login (RouterOS `+ct`).
    pub async fn connect(
        config: &SessionConfig,
        username_suffix: &str,
    ) -> Result<Self, NetcliError> {
        let host = config.host.clone();
        let port = config.port.unwrap_or(22);
        let username = format!("{}{}", config.username, username_suffix);

        info!("Connecting to {}:{} with username {}", host, port, username);

        let stream = open_tcp(config, port).await?;
        let stream = stream
            .into_std()
            .map_err(|e| NetcliError::connection(&host, format!("failed to detach stream: {}", e)))?;
        stream
            .set_nonblocking(false)
            .map_err(|e| NetcliError::connection(&host, format!("failed to configure stream: {}", e)))?;

        debug!(target: "SshTransport::connect", "Creating SSH session");
        let mut session = Session::new().map_err(|e| {
            NetcliError::connection(&host, format!("failed to create SSH session: {}", e))
        })?;
        session.set_tcp_stream(stream);
        session.set_timeout(config.timeout.as_millis() as u32);

        session
            .set_banner(&format!("SSH-2.0-{}", config.client_version))
            .map_err(|e| NetcliError::connection(&host, format!("failed to set banner: {}", e)))?;

        Self::apply_algorithm_preferences(&session, config, &host)?;

        debug!(target: "SshTransport::connect", "Starting SSH handshake");
        session.handshake().map_err(|e| {
            info!("SSH handshake failed: {}", e);
            NetcliError::connection(&host, format!("SSH handshake failed: {}", e))
        })?;

        if let Some(path) = &config.known_hosts {
            Self::check_known_hosts(&session, &host, port, path)?;
        }

        Self::authenticate(&session, config, &host, &username)?;

        debug!(target: "SshTransport::connect", "Opening SSH channel");
        let mut channel = session.channel_session().map_err(|e| {
            NetcliError::connection(&host, format!("failed to create channel session: {}", e))
        })?;

        debug!(target: "SshTransport::connect", "Requesting PTY");
        channel
            .request_pty("xterm", None, None)
            .map_err(|e| NetcliError::connection(&host, format!("failed to request PTY: {}", e)))?;

        debug!(target: "SshTransport::connect", "Starting shell");
        channel
            .shell()
            .map_err(|e| NetcliError::connection(&host, format!("failed to start shell: {}", e)))?;

        // From here on every read and write polls; the async wrappers
        // suspend between polls instead of blocking the scheduler.
        session.set_blocking(false);

        debug!(target: "SshTransport::connect", "Connection established successfully");
        Ok(Self {
            session,
            channel,
            host,
        })
    }

    fn apply_algorithm_preferences(
        session: &Session,
        config: &SessionConfig,
        host: &str,
    ) -> Result<(), NetcliError> {
        let prefs: [(&[String], &[MethodType]); 5] = [
            (&config.kex_algs, &[MethodType::Kex]),
            (
                &config.encryption_algs,
                &[MethodType::CryptCs, MethodType::CryptSc],
            ),
            (&config.mac_algs, &[MethodType::MacCs, MethodType::MacSc]),
            (
                &config.compression_algs,
                &[MethodType::CompCs, MethodType::CompSc],
            ),
            (&config.signature_algs, &[MethodType::HostKey]),
        ];

        for (algs, method_types) in prefs {
            if algs.is_empty() {
                continue;
            }
            let joined = algs.join(",");
            for method_type in method_types {
                session.method_pref(*method_type, &joined).map_err(|e| {
                    NetcliError::connection(
                        host,
                        format!("failed to set algorithm preference {:?}: {}", joined, e),
                    )
                })?;
            }
        }
        Ok(())
    }

    fn check_known_hosts(
        session: &Session,
        host: &str,
        port: u16,
        path: &std::path::Path,
    ) -> Result<(), NetcliError> {
        debug!(target: "SshTransport::check_known_hosts", "Checking host key against {:?}", path);
        let mut known_hosts = session.known_hosts().map_err(|e| {
            NetcliError::connection(host, format!("failed to initialize known hosts: {}", e))
        })?;
        known_hosts
            .read_file(path, KnownHostFileKind::OpenSSH)
            .map_err(|e| {
                NetcliError::connection(host, format!("failed to read known hosts file: {}", e))
            })?;

        let (key, _key_type) = session
            .host_key()
            .ok_or_else(|| NetcliError::connection(host, "server did not present a host key"))?;

        match known_hosts.check_port(host, port, key) {
            CheckResult::Match => Ok(()),
            CheckResult::NotFound => Err(NetcliError::connection(
                host,
                "host key not found in known hosts file",
            )),
            CheckResult::Mismatch => Err(NetcliError::connection(
                host,
                "host key mismatch, possible man-in-the-middle",
            )),
            CheckResult::Failure => Err(NetcliError::connection(
                host,
                "host key verification failed",
            )),
        }
    }

    fn authenticate(
        session: &Session,
        config: &SessionConfig,
        host: &str,
        username: &str,
    ) -> Result<(), NetcliError> {
        if config.agent_forwarding {
            warn!("agent forwarding requested but not supported by libssh2; ignoring");
        }

        if !config.client_keys.is_empty() {
            let mut last_err = None;
            for key in &config.client_keys {
                debug!(target: "SshTransport::authenticate", "Trying client key {:?}", key);
                match session.userauth_pubkey_file(
                    username,
                    None,
                    key,
                    config.passphrase.as_deref(),
                ) {
                    Ok(()) => break,
                    Err(e) => last_err = Some(e),
                }
            }
            if !session.authenticated() {
                let reason = last_err
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "public key authentication failed".to_string());
                return Err(NetcliError::authentication(host, reason));
            }
        } else if let Some(password) = &config.password {
            debug!(target: "SshTransport::authenticate", "Attempting password authentication for user {}", username);
            session.userauth_password(username, password).map_err(|e| {
                info!("Password authentication failed: {}", e);
                NetcliError::authentication(host, e.to_string())
            })?;
        } else {
            if let Some(agent_path) = &config.agent_path {
                let env_sock = std::env::var("SSH_AUTH_SOCK").ok();
                if env_sock.as_deref() != Some(agent_path.as_str()) {
                    warn!("agent_path is only honoured through SSH_AUTH_SOCK with libssh2");
                }
            }
            debug!(target: "SshTransport::authenticate", "Attempting SSH agent authentication for user {}", username);
            session.userauth_agent(username).map_err(|e| {
                info!("SSH agent authentication failed: {}", e);
                NetcliError::authentication(host, e.to_string())
            })?;
        }

        if !session.authenticated() {
            return Err(NetcliError::authentication(host, "credentials rejected"));
        }

        debug!(target: "SshTransport::authenticate", "Authentication successful");
        Ok(())
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), NetcliError> {
        let mut written = 0;
        while written < data.len() {
            match self.channel.write(&data[written..]) {
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    tokio::time::sleep(POLL_DELAY).await;
                }
                Err(e) => {
                    return Err(NetcliError::write(
                        &self.host,
                        format!("failed to write to channel: {}", e),
                    ))
                }
            }
        }
        loop {
            match self.channel.flush() {
                Ok(()) => break,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    tokio::time::sleep(POLL_DELAY).await;
                }
                Err(e) => {
                    return Err(NetcliError::write(
                        &self.host,
                        format!("failed to flush channel: {}", e),
                    ))
                }
            }
        }
        Ok(())
    }

    async fn read(&mut self, max: usize) -> Result<Vec<u8>, NetcliError> {
        let mut buffer = vec![0u8; max];
        loop {
            match self.channel.read(&mut buffer) {
                Ok(0) => {
                    if self.channel.eof() {
                        return Err(NetcliError::connection(
                            &self.host,
                            "channel stream closed by remote device",
                        ));
                    }
                    tokio::time::sleep(POLL_DELAY).await;
                }
                Ok(n) => {
                    buffer.truncate(n);
                    return Ok(buffer);
                }
                Err(e)
                    if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut =>
                {
                    tokio::time::sleep(POLL_DELAY).await;
                }
                Err(e) => {
                    return Err(NetcliError::read(
                        &self.host,
                        format!("failed to read from channel: {}", e),
                    ))
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), NetcliError> {
        debug!(target: "SshTransport::close", "Closing channel");
        self.session.set_blocking(true);

        if let Err(e) = self.channel.send_eof() {
            debug!(target: "SshTransport::close", "Error sending EOF: {}", e);
        }
        if let Err(e) = self.channel.close() {
            debug!(target: "SshTransport::close", "Error closing channel: {}", e);
        }
        if let Err(e) = self.channel.wait_close() {
            debug!(target: "SshTransport::close", "Error waiting for channel to close: {}", e);
        }

        debug!(target: "SshTransport::close", "Channel closed");
        Ok(())
    }
}
