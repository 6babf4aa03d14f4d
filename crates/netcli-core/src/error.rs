use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetcliError {
    #[error("Host {host} connection error: {reason}")]
    ConnectionError { host: String, reason: String },

    #[error("Host {host} authentication error: {reason}")]
    AuthenticationError { host: String, reason: String },

    #[error("Host {host} timeout error: {action}")]
    TimeoutError { host: String, action: String },

    #[error("Host {host} commit error: {reason}")]
    CommitError { host: String, reason: String },

    #[error("Usage error: {0}")]
    UsageError(String),

    #[error("Host {host} write error: {reason}")]
    WriteError { host: String, reason: String },

    #[error("Host {host} read error: {reason}")]
    ReadError { host: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

// Helper methods for error context
impl NetcliError {
    pub fn connection(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionError {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn authentication(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AuthenticationError {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout(host: impl Into<String>, action: impl Into<String>) -> Self {
        Self::TimeoutError {
            host: host.into(),
            action: action.into(),
        }
    }

    pub fn commit(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommitError {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn write(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteError {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn read(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadError {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error leaves the session in an unusable state.
    ///
    /// After a timeout or an I/O failure the channel buffer contents are
    /// unknown, so every operation except disconnect must be refused.
    pub fn poisons_session(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError { .. }
                | Self::TimeoutError { .. }
                | Self::WriteError { .. }
                | Self::ReadError { .. }
                | Self::IoError(_)
        )
    }
}
