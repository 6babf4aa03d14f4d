use crate::config::{Protocol, SessionConfig};
use crate::error::NetcliError;
use crate::modes::{Interaction, ModeStack, Reply};
use crate::parser::{registered_parser, ParsedOutput};
use crate::patterns::{ANSI_CSI_PATTERN, LINEFEED_PATTERN};
use crate::platform::PlatformProfile;
use crate::prompt;
use crate::prompt_reader::PromptReader;
use crate::session_log::SessionLog;
use crate::transport::ssh::SshTransport;
use crate::transport::telnet::{self, TelnetTransport};
use crate::transport::Transport;
use regex::{Regex, RegexBuilder};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options for a single `send_command` exchange.
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Extra pattern that may terminate the read (interactive sub-prompts).
    pub pattern: Option<String>,
    /// Compile `pattern` case-insensitively.
    pub case_insensitive: bool,
    /// Drop the trailing prompt line from the output.
    pub strip_prompt: bool,
    /// Drop the echoed command from the output.
    pub strip_command: bool,
    /// Per-call override of the session read timeout.
    pub read_for: Option<Duration>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            pattern: None,
            case_insensitive: false,
            strip_prompt: true,
            strip_command: true,
            read_for: None,
        }
    }
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn case_insensitive(mut self, enable: bool) -> Self {
        self.case_insensitive = enable;
        self
    }

    pub fn strip_prompt(mut self, enable: bool) -> Self {
        self.strip_prompt = enable;
        self
    }

    pub fn strip_command(mut self, enable: bool) -> Self {
        self.strip_command = enable;
        self
    }

    pub fn read_for(mut self, duration: Duration) -> Self {
        self.read_for = Some(duration);
        self
    }
}

/// Options for `send_config_set`.
#[derive(Debug, Clone)]
pub struct ConfigSetOptions {
    /// Send the platform's commit command after the config commands.
    /// Ignored on platforms without one.
    pub with_commit: bool,
    /// Comment attached to the commit, where the platform supports it.
    pub commit_comment: Option<String>,
    /// Leave the config mode afterwards; None uses the platform default
    /// (Comware stays in system view, the others exit).
    pub exit_config_mode: Option<bool>,
}

impl Default for ConfigSetOptions {
    fn default() -> Self {
        Self {
            with_commit: true,
            commit_comment: None,
            exit_config_mode: None,
        }
    }
}

impl ConfigSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, enable: bool) -> Self {
        self.with_commit = enable;
        self
    }

    pub fn commit_comment(mut self, comment: impl Into<String>) -> Self {
        self.commit_comment = Some(comment.into());
        self
    }

    pub fn exit_config_mode(mut self, exit: bool) -> Self {
        self.exit_config_mode = Some(exit);
        self
    }
}

/// Interactive CLI session to a single network device.
///
/// A session is a strict sequence of operations and is not safe for
/// concurrent use; drive one session per device and run them in parallel on
/// the scheduler. After a timeout or I/O failure the session latches a
/// failed state and refuses everything except `disconnect`.
pub struct DeviceSession {
    host: String,
    config: SessionConfig,
    profile: &'static PlatformProfile,
    reader: Option<PromptReader>,
    mode_stack: ModeStack,
    base_prompt: String,
    poisoned: Option<String>,
    session_log: SessionLog,
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("host", &self.host)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}

impl DeviceSession {
    pub fn new(
        profile: &'static PlatformProfile,
        config: SessionConfig,
    ) -> Result<Self, NetcliError> {
        if config.host.is_empty() {
            return Err(NetcliError::UsageError("host must be set".to_string()));
        }

        let mut session_log = SessionLog::new();
        if let Some(path) = &config.session_log {
            session_log.enable(path).map_err(|e| {
                NetcliError::UsageError(format!("cannot open session log {:?}: {}", path, e))
            })?;
        }

        let host = config.host.clone();
        Ok(Self {
            host,
            config,
            profile,
            reader: None,
            mode_stack: ModeStack::new(),
            base_prompt: String::new(),
            poisoned: None,
            session_log,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn device_type(&self) -> &'static str {
        self.profile.device_type
    }

    /// The trimmed prompt anchor resolved at connect time.
    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    /// Name of the currently active terminal mode, if any.
    pub fn current_mode(&self) -> Option<&'static str> {
        self.mode_stack
            .current()
            .map(|idx| self.profile.modes[idx].name)
    }

    pub fn is_connected(&self) -> bool {
        self.reader.is_some() && self.poisoned.is_none()
    }

    /// Connect to the device and prepare the session: establish the
    /// transport, run the login dialogue for Telnet, drain banners, enter
    /// any preparatory mode, resolve the prompt and disable paging.
    pub async fn connect(&mut self) -> Result<(), NetcliError> {
        if self.reader.is_some() {
            return Err(NetcliError::UsageError(
                "session is already connected".to_string(),
            ));
        }

        info!("Trying to connect to the device {}", self.host);
        match self.config.protocol {
            Protocol::Ssh => {
                let transport =
                    SshTransport::connect(&self.config, self.profile.username_suffix).await?;
                self.install_transport(Box::new(transport))?;
            }
            Protocol::Telnet => {
                let transport = TelnetTransport::connect(&self.config).await?;
                self.install_transport(Box::new(transport))?;

                let username = self.config.username.clone();
                let password = self.config.password.clone().unwrap_or_default();
                let login_result = match self.reader.as_mut() {
                    Some(reader) => telnet::login(reader, &username, &password).await,
                    None => Err(NetcliError::connection(&self.host, "transport lost")),
                };
                if let Err(e) = login_result {
                    self.abandon(&e.to_string()).await;
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.prepare_session().await {
            self.abandon(&e.to_string()).await;
            return Err(e);
        }

        info!("Has connected to the device {}", self.host);
        Ok(())
    }

    /// Run the connect pipeline over an already established transport.
    ///
    /// Lets callers bring their own byte channel (a jump-host tunnel, a
    /// scripted transport in tests). The login dialogue is assumed done.
    pub async fn connect_over(
        &mut self,
        transport: Box<dyn Transport>,
    ) -> Result<(), NetcliError> {
        if self.reader.is_some() {
            return Err(NetcliError::UsageError(
                "session is already connected".to_string(),
            ));
        }
        self.install_transport(transport)?;
        if let Err(e) = self.prepare_session().await {
            self.abandon(&e.to_string()).await;
            return Err(e);
        }
        Ok(())
    }

    /// Close the transport. Idempotent; errors are logged and swallowed so
    /// the call is safe on every exit path.
    pub async fn disconnect(&mut self) {
        info!("Disconnecting from {}", self.host);
        if let Some(mut reader) = self.reader.take() {
            if let Err(e) = reader.close().await {
                warn!("Error while closing connection to {}: {}", self.host, e);
            }
        }
        self.mode_stack.clear();
        self.session_log.disable();
    }

    /// Send a command and return its cleaned output (prompt and echo
    /// stripped, line feeds normalised).
    pub async fn send_command(&mut self, command: &str) -> Result<String, NetcliError> {
        self.send_command_with(command, &SendOptions::default()).await
    }

    /// Send a command with explicit options.
    pub async fn send_command_with(
        &mut self,
        command: &str,
        options: &SendOptions,
    ) -> Result<String, NetcliError> {
        self.ensure_ready()?;
        debug!(target: "DeviceSession::send_command", "Sending command: {:?}", command);

        let normalized = normalize_cmd(command);
        self.write_channel(&normalized).await?;

        let raw = match &options.pattern {
            Some(pattern) => {
                let regex = compile_pattern(pattern, options.case_insensitive)?;
                self.read_prompt_or(&[regex], options.read_for).await?
            }
            None => self.read_prompt(options.read_for).await?,
        };

        let mut output = raw;
        if self.profile.ansi_escape_codes {
            output = strip_ansi_escape_codes(&output);
        }
        output = normalize_linefeeds(&output);
        if options.strip_prompt {
            output = self.strip_prompt(&output);
        }
        if options.strip_command {
            output = strip_command_echo(&normalized, &output);
        }

        debug!(target: "DeviceSession::send_command", "Command output: {:?}", output);
        Ok(output)
    }

    /// Send a command and keep reading for the given duration instead of
    /// the session timeout.
    pub async fn send_command_timing(
        &mut self,
        command: &str,
        read_for: Duration,
    ) -> Result<String, NetcliError> {
        let options = SendOptions {
            read_for: Some(read_for),
            ..SendOptions::default()
        };
        self.send_command_with(command, &options).await
    }

    /// Send a command and hand the output to the registered structured
    /// parser; returns the raw text when no parser or template applies.
    pub async fn send_command_parsed(
        &mut self,
        command: &str,
    ) -> Result<ParsedOutput, NetcliError> {
        let output = self.send_command(command).await?;
        if let Some(parser) = registered_parser() {
            debug!(target: "DeviceSession::send_command_parsed", "Parsing output of {:?}", command);
            if let Some(value) = parser.parse(self.profile.device_type, command, &output)? {
                return Ok(ParsedOutput::Structured(value));
            }
        }
        Ok(ParsedOutput::Raw(output))
    }

    /// Send configuration commands inside the platform's config mode.
    pub async fn send_config_set(&mut self, commands: &[&str]) -> Result<String, NetcliError> {
        self.send_config_set_with(commands, &ConfigSetOptions::default())
            .await
    }

    /// Send configuration commands with explicit options. Commit-based
    /// platforms commit afterwards unless told otherwise; the config mode
    /// is left according to the options or the platform default.
    pub async fn send_config_set_with(
        &mut self,
        commands: &[&str],
        options: &ConfigSetOptions,
    ) -> Result<String, NetcliError> {
        if commands.is_empty() {
            return Ok(String::new());
        }
        self.ensure_ready()?;
        info!("Sending configuration settings to {}", self.host);

        let mut output = String::new();
        if let Some(mode) = self.profile.config_mode {
            output.push_str(&self.enter_mode(mode).await?);
        }

        for command in commands {
            output.push_str(&self.send_command_expect(command, &[], None).await?);
        }

        if options.with_commit && self.profile.commit_command.is_some() {
            output.push_str(&self.commit(options.commit_comment.as_deref()).await?);
        }

        let exit_config = options
            .exit_config_mode
            .unwrap_or(self.profile.exit_config_default);
        if exit_config {
            if let Some(mode) = self.profile.config_mode {
                output.push_str(&self.exit_mode(mode).await?);
            }
        }

        if self.profile.ansi_escape_codes {
            output = strip_ansi_escape_codes(&output);
        }
        let output = normalize_linefeeds(&output);
        debug!(target: "DeviceSession::send_config_set", "Config commands output: {:?}", output);
        Ok(output)
    }

    /// Send the platform's commit command and check the result.
    pub async fn commit(&mut self, comment: Option<&str>) -> Result<String, NetcliError> {
        self.ensure_ready()?;
        let command = match (self.profile.commit_command, comment) {
            (None, _) => {
                return Err(NetcliError::UsageError(format!(
                    "device type {} does not support commit",
                    self.profile.device_type
                )))
            }
            (Some(command), None) => command.to_string(),
            (Some(command), Some(text)) => match self.profile.commit_comment_template {
                Some(template) => template.replace("{}", text),
                None => command.to_string(),
            },
        };

        info!("Committing configuration on {}", self.host);
        let output = self.send_command_expect(&command, &[], None).await?;
        if output.contains("error:") || output.contains("failed") {
            return Err(NetcliError::commit(&self.host, output.trim().to_string()));
        }
        Ok(output)
    }

    /// Probe the device for its current prompt line.
    pub async fn find_prompt(&mut self) -> Result<String, NetcliError> {
        self.ensure_ready()?;
        let ansi_escape_codes = self.profile.ansi_escape_codes;
        let result = prompt::find_prompt(self.reader_mut()?, ansi_escape_codes).await;
        match result {
            Ok(found) => Ok(found),
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Whether the session is currently in the named mode.
    ///
    /// With `force` unset the mode stack answers directly when the mode is
    /// on top; otherwise the device is probed with a bare newline and the
    /// captured prompt is checked for the mode's signature.
    pub async fn check_mode(&mut self, name: &str, force: bool) -> Result<bool, NetcliError> {
        self.ensure_ready()?;
        let idx = self.mode_index(name)?;
        self.check_mode_idx(idx, force).await
    }

    /// Enter the named mode, entering its ancestors first as needed.
    /// Entering a mode the session is already in is a no-op.
    pub async fn enter_mode(&mut self, name: &str) -> Result<String, NetcliError> {
        self.ensure_ready()?;
        let idx = self.mode_index(name)?;

        let mut chain = Vec::new();
        let mut cursor = Some(idx);
        while let Some(mode) = cursor {
            if self.mode_stack.contains(mode) {
                break;
            }
            chain.push(mode);
            cursor = self.profile.modes[mode].parent;
        }
        chain.reverse();

        let mut output = String::new();
        for mode in chain {
            output.push_str(&self.enter_single_mode(mode).await?);
        }
        Ok(output)
    }

    /// Exit the named mode. A no-op when the session is not in it.
    pub async fn exit_mode(&mut self, name: &str) -> Result<String, NetcliError> {
        self.ensure_ready()?;
        let idx = self.mode_index(name)?;
        let descriptor = &self.profile.modes[idx];
        if descriptor.exit_command.is_empty() {
            return Ok(String::new());
        }

        info!("Exiting {} mode", descriptor.name);
        if !self.check_mode_idx(idx, false).await? {
            return Ok(String::new());
        }

        let output = self
            .run_interactions(descriptor.exit_command, descriptor.exit_interactions)
            .await?;

        if !descriptor.check_string.is_empty() && self.check_mode_idx(idx, true).await? {
            return Err(NetcliError::connection(
                &self.host,
                format!("failed to exit {} mode", descriptor.name),
            ));
        }
        self.mode_stack.remove(idx);
        Ok(output)
    }

    /// Strip the trailing prompt line from command output.
    pub fn strip_prompt(&self, output: &str) -> String {
        let lines: Vec<&str> = output.split('\n').collect();
        if let Some(last) = lines.last() {
            if last.contains(&self.base_prompt) {
                return lines[..lines.len() - 1].join("\n");
            }
        }
        output.to_string()
    }

    fn install_transport(&mut self, transport: Box<dyn Transport>) -> Result<(), NetcliError> {
        let fallback = prompt::delimiter_pattern(self.profile)?;
        self.reader = Some(PromptReader::new(
            transport,
            self.host.clone(),
            fallback,
            self.config.timeout,
        ));
        Ok(())
    }

    async fn prepare_session(&mut self) -> Result<(), NetcliError> {
        debug!(target: "DeviceSession::prepare_session", "Preparing session");

        // Drain login banners and MOTD up to the first prompt delimiter
        self.read_delimiters(None).await?;

        for name in self.profile.pre_resolve_modes {
            self.enter_mode(name).await?;
        }

        if self.profile.probe_prompt {
            self.resolve_prompt().await?;
        } else {
            let pattern = prompt::build_base_pattern(
                self.profile,
                "",
                self.config.pattern.as_deref(),
            )?;
            self.reader_mut()?.set_base_pattern(pattern);
        }

        if !self.profile.disable_paging_command.is_empty() {
            let command = self.profile.disable_paging_command;
            info!("Disabling pagination, command = {:?}", command);
            self.send_command_expect(command, &[], None).await?;
        }

        for name in self.profile.post_resolve_modes {
            self.enter_mode(name).await?;
        }

        debug!(target: "DeviceSession::prepare_session", "Session preparation complete");
        Ok(())
    }

    /// Discover the prompt and derive the base prompt and base pattern
    /// every later read terminates on.
    async fn resolve_prompt(&mut self) -> Result<(), NetcliError> {
        let ansi_escape_codes = self.profile.ansi_escape_codes;
        let result = prompt::find_prompt(self.reader_mut()?, ansi_escape_codes).await;
        let raw_prompt = match result {
            Ok(found) => found,
            Err(e) => return Err(self.poison(e)),
        };

        let base_prompt = prompt::derive_base_prompt(&raw_prompt, self.profile.prompt_trim);
        if base_prompt.is_empty() {
            return Err(NetcliError::connection(
                &self.host,
                "unable to find base_prompt",
            ));
        }

        let pattern =
            prompt::build_base_pattern(self.profile, &base_prompt, self.config.pattern.as_deref())?;

        debug!(target: "DeviceSession::resolve_prompt", "Base prompt: {}", base_prompt);
        debug!(target: "DeviceSession::resolve_prompt", "Base pattern: {}", pattern);

        let reader = self.reader_mut()?;
        reader.set_base_prompt(&base_prompt);
        reader.set_base_pattern(pattern);
        self.base_prompt = base_prompt;
        Ok(())
    }

    /// Write a normalised command and read up to the next prompt (or one of
    /// `extra`), without any output post-processing.
    async fn send_command_expect(
        &mut self,
        command: &str,
        extra: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let normalized = normalize_cmd(command);
        self.write_channel(&normalized).await?;
        if extra.is_empty() {
            self.read_prompt(timeout).await
        } else {
            self.read_prompt_or(extra, timeout).await
        }
    }

    async fn enter_single_mode(&mut self, idx: usize) -> Result<String, NetcliError> {
        let descriptor = &self.profile.modes[idx];
        info!("Entering {} mode", descriptor.name);

        if self.check_mode_idx(idx, false).await? {
            self.mode_stack.push(idx, descriptor.parent)?;
            return Ok(String::new());
        }

        let output = self
            .run_interactions(descriptor.enter_command, descriptor.enter_interactions)
            .await?;

        if let Some(error_string) = descriptor.error_string {
            if output.contains(error_string) {
                return Err(NetcliError::connection(
                    &self.host,
                    format!("failed to enter {} mode", descriptor.name),
                ));
            }
        }

        if !descriptor.check_string.is_empty() && !self.check_mode_idx(idx, true).await? {
            return Err(NetcliError::connection(
                &self.host,
                format!("failed to enter {} mode", descriptor.name),
            ));
        }

        self.mode_stack.push(idx, descriptor.parent)?;
        Ok(output)
    }

    async fn check_mode_idx(&mut self, idx: usize, force: bool) -> Result<bool, NetcliError> {
        if !force && self.mode_stack.current() == Some(idx) {
            return Ok(true);
        }
        let descriptor = &self.profile.modes[idx];
        if descriptor.check_string.is_empty() {
            // The mode leaves the prompt unchanged; the stack is the only witness
            return Ok(self.mode_stack.contains(idx));
        }
        self.write_channel("\n").await?;
        let output = self.read_prompt(None).await?;
        Ok(output.contains(descriptor.check_string))
    }

    /// Send a mode-change command and drive its interactive sub-prompts in
    /// order, finishing on the session prompt.
    async fn run_interactions(
        &mut self,
        command: &str,
        interactions: &'static [Interaction],
    ) -> Result<String, NetcliError> {
        let normalized = normalize_cmd(command);
        self.write_channel(&normalized).await?;

        let mut output = String::new();
        let mut pending = interactions;
        loop {
            let patterns = pending
                .iter()
                .map(|step| compile_pattern(step.expect, false))
                .collect::<Result<Vec<_>, _>>()?;
            let chunk = self.read_prompt_or(&patterns, None).await?;
            let matched = patterns.iter().position(|re| re.is_match(&chunk));
            output.push_str(&chunk);

            match matched {
                Some(pos) => {
                    let reply = match pending[pos].reply {
                        Reply::Literal(text) => text.to_string(),
                        Reply::Secret => self
                            .config
                            .secret
                            .clone()
                            .or_else(|| self.config.password.clone())
                            .ok_or_else(|| {
                                NetcliError::UsageError(
                                    "a secret is required for this mode transition".to_string(),
                                )
                            })?,
                    };
                    self.write_channel(&normalize_cmd(&reply)).await?;
                    pending = &pending[pos + 1..];
                }
                None => break,
            }
        }
        Ok(output)
    }

    fn mode_index(&self, name: &str) -> Result<usize, NetcliError> {
        self.profile.mode_index(name).ok_or_else(|| {
            NetcliError::UsageError(format!(
                "unknown mode {:?} for device type {}",
                name, self.profile.device_type
            ))
        })
    }

    fn ensure_ready(&self) -> Result<(), NetcliError> {
        if let Some(reason) = &self.poisoned {
            return Err(NetcliError::connection(
                &self.host,
                format!("session unusable after earlier failure: {}", reason),
            ));
        }
        if self.reader.is_none() {
            return Err(NetcliError::connection(&self.host, "session is not connected"));
        }
        Ok(())
    }

    fn reader_mut(&mut self) -> Result<&mut PromptReader, NetcliError> {
        let host = self.host.clone();
        self.reader
            .as_mut()
            .ok_or_else(move || NetcliError::connection(host, "session is not connected"))
    }

    async fn write_channel(&mut self, data: &str) -> Result<(), NetcliError> {
        let result = match self.reader.as_mut() {
            Some(reader) => reader.send(data).await,
            None => Err(NetcliError::connection(&self.host, "session is not connected")),
        };
        match result {
            Ok(()) => {
                if let Err(e) = self.session_log.write_raw(data.as_bytes()) {
                    warn!("Session log write failed for {}: {}", self.host, e);
                }
                Ok(())
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    async fn read_prompt(&mut self, timeout: Option<Duration>) -> Result<String, NetcliError> {
        let result = match self.reader.as_mut() {
            Some(reader) => reader.read_until_prompt(timeout).await,
            None => Err(NetcliError::connection(&self.host, "session is not connected")),
        };
        self.after_read(result)
    }

    async fn read_prompt_or(
        &mut self,
        extra: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let result = match self.reader.as_mut() {
            Some(reader) => reader.read_until_prompt_or_patterns(extra, timeout).await,
            None => Err(NetcliError::connection(&self.host, "session is not connected")),
        };
        self.after_read(result)
    }

    async fn read_delimiters(&mut self, timeout: Option<Duration>) -> Result<String, NetcliError> {
        let result = match self.reader.as_mut() {
            Some(reader) => reader.read_until_delimiters(timeout).await,
            None => Err(NetcliError::connection(&self.host, "session is not connected")),
        };
        self.after_read(result)
    }

    fn after_read(&mut self, result: Result<String, NetcliError>) -> Result<String, NetcliError> {
        match result {
            Ok(output) => {
                if let Err(e) = self.session_log.write(&output) {
                    warn!("Session log write failed for {}: {}", self.host, e);
                }
                Ok(output)
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Latch the failed state for unrecoverable errors.
    fn poison(&mut self, error: NetcliError) -> NetcliError {
        if error.poisons_session() {
            warn!("Session to {} is now unusable: {}", self.host, error);
            self.poisoned = Some(error.to_string());
        }
        error
    }

    async fn abandon(&mut self, reason: &str) {
        if let Some(mut reader) = self.reader.take() {
            if let Err(e) = reader.close().await {
                debug!(target: "DeviceSession::abandon", "Error closing transport: {}", e);
            }
        }
        self.poisoned = Some(reason.to_string());
    }
}

fn compile_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, NetcliError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| NetcliError::UsageError(format!("invalid pattern {:?}: {}", pattern, e)))
}

/// Normalise a CLI command to exactly one trailing newline.
pub fn normalize_cmd(command: &str) -> String {
    let mut normalized = command.trim_end_matches('\n').to_string();
    normalized.push('\n');
    normalized
}

/// Convert `\r\r\n`, `\r\n` and `\n\r` to `\n`.
pub fn normalize_linefeeds(data: &str) -> String {
    LINEFEED_PATTERN.replace_all(data, "\n").to_string()
}

/// Remove ANSI CSI escape sequences.
pub fn strip_ansi_escape_codes(data: &str) -> String {
    ANSI_CSI_PATTERN.replace_all(data, "").to_string()
}

/// Strip the echoed command from the start of the output.
///
/// Devices insert backspaces when a long command line wraps; in that case
/// the backspaces are removed and the whole first line is dropped.
pub fn strip_command_echo(command: &str, output: &str) -> String {
    const BACKSPACE: char = '\x08';
    if output.contains(BACKSPACE) {
        let cleaned: String = output.chars().filter(|&c| c != BACKSPACE).collect();
        let mut lines = cleaned.split('\n');
        lines.next();
        lines.collect::<Vec<_>>().join("\n")
    } else {
        output.chars().skip(command.chars().count()).collect()
    }
}
