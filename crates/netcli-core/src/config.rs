use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Connection protocol used to reach the device CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Ssh,
    Telnet,
}

impl Protocol {
    /// Default TCP port for this protocol (22 for SSH, 23 for Telnet).
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Ssh => 22,
            Protocol::Telnet => 23,
        }
    }
}

/// Address family to use when resolving the target host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Unspecified,
    Ipv4,
    Ipv6,
}

/// Configuration settings for a device session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hostname or IP address of target device
    pub host: String,

    /// Username to authenticate with
    pub username: String,

    /// Password for authentication (optional)
    pub password: Option<String>,

    /// Secret for privilege escalation and interactive mode passwords (optional)
    pub secret: Option<String>,

    /// TCP port; defaults to 22 for SSH and 23 for Telnet when unset
    pub port: Option<u16>,

    /// Connection protocol (default: SSH)
    pub protocol: Protocol,

    /// Overall timeout applied to every channel read (default: 15 seconds)
    pub timeout: Duration,

    /// OpenSSH-format known-hosts file; None disables host key checking
    pub known_hosts: Option<PathBuf>,

    /// Local address to bind the TCP connection to
    pub local_addr: Option<SocketAddr>,

    /// Private key files to try for public-key authentication
    pub client_keys: Vec<PathBuf>,

    /// Passphrase for encrypted client keys
    pub passphrase: Option<String>,

    /// Allow agent forwarding (not supported by libssh2; accepted and warned about)
    pub agent_forwarding: bool,

    /// Path of the ssh-agent socket; libssh2 only honours SSH_AUTH_SOCK
    pub agent_path: Option<String>,

    /// Client software version advertised in the SSH banner
    pub client_version: String,

    /// Address family used when resolving the host (default: unspecified)
    pub family: AddressFamily,

    /// Preferred key exchange algorithms for the SSH handshake
    pub kex_algs: Vec<String>,

    /// Preferred encryption algorithms for the SSH handshake
    pub encryption_algs: Vec<String>,

    /// Preferred MAC algorithms for the SSH handshake
    pub mac_algs: Vec<String>,

    /// Preferred compression algorithms for the SSH handshake
    pub compression_algs: Vec<String>,

    /// Preferred host key / signature algorithms for the SSH handshake
    pub signature_algs: Vec<String>,

    /// Override for the platform prompt pattern template
    pub pattern: Option<String>,

    /// Path to a raw session transcript file; None disables session logging
    pub session_log: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: None,
            secret: None,
            port: None,
            protocol: Protocol::Ssh,
            timeout: Duration::from_secs(15),
            known_hosts: None,
            local_addr: None,
            client_keys: Vec::new(),
            passphrase: None,
            agent_forwarding: false,
            agent_path: None,
            client_version: concat!("netcli-", env!("CARGO_PKG_VERSION")).to_string(),
            family: AddressFamily::Unspecified,
            kex_algs: Vec::new(),
            encryption_algs: Vec::new(),
            mac_algs: Vec::new(),
            compression_algs: Vec::new(),
            signature_algs: Vec::new(),
            pattern: None,
            session_log: None,
        }
    }
}

impl SessionConfig {
    /// Creates a new SessionConfig with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for SessionConfig to allow fluent configuration
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for SessionConfig to allow fluent configuration
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = Some(secret.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn known_hosts(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.known_hosts = Some(path.into());
        self
    }

    pub fn local_addr(mut self, addr: SocketAddr) -> Self {
        self.config.local_addr = Some(addr);
        self
    }

    pub fn client_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.client_keys.push(path.into());
        self
    }

    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.config.passphrase = Some(passphrase.into());
        self
    }

    pub fn agent_forwarding(mut self, enable: bool) -> Self {
        self.config.agent_forwarding = enable;
        self
    }

    pub fn agent_path(mut self, path: impl Into<String>) -> Self {
        self.config.agent_path = Some(path.into());
        self
    }

    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.config.client_version = version.into();
        self
    }

    pub fn family(mut self, family: AddressFamily) -> Self {
        self.config.family = family;
        self
    }

    pub fn kex_algs(mut self, algs: Vec<String>) -> Self {
        self.config.kex_algs = algs;
        self
    }

    pub fn encryption_algs(mut self, algs: Vec<String>) -> Self {
        self.config.encryption_algs = algs;
        self
    }

    pub fn mac_algs(mut self, algs: Vec<String>) -> Self {
        self.config.mac_algs = algs;
        self
    }

    pub fn compression_algs(mut self, algs: Vec<String>) -> Self {
        self.config.compression_algs = algs;
        self
    }

    pub fn signature_algs(mut self, algs: Vec<String>) -> Self {
        self.config.signature_algs = algs;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = Some(pattern.into());
        self
    }

    pub fn session_log(mut self, path: impl Into<String>) -> Self {
        self.config.session_log = Some(path.into());
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
