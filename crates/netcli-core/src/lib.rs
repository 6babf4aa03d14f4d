pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod modes;
pub mod parser;
pub mod platform;
pub mod prompt;
pub mod prompt_reader;
pub mod session;
pub mod session_log;
pub mod transport;

// Import lazy_static for common regex patterns
#[macro_use]
extern crate lazy_static;

// Common regex patterns module
pub mod patterns {
    use regex::Regex;

    lazy_static! {
        // ANSI CSI escape sequences (colour, cursor movement)
        pub static ref ANSI_CSI_PATTERN: Regex =
            Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").unwrap();

        // Line ending normalization pattern
        pub static ref LINEFEED_PATTERN: Regex = Regex::new(r"(\r\r\n|\r\n|\n\r)").unwrap();
    }
}

// Re-export core types
pub use config::{AddressFamily, Protocol, SessionConfig, SessionConfigBuilder};
pub use dispatcher::{create, platforms};
pub use error::NetcliError;
pub use logging::init_logging;
pub use modes::{Interaction, ModeDescriptor, ModeStack, Reply};
pub use parser::{register_parser, registered_parser, OutputParser, ParsedOutput};
pub use platform::{PlatformProfile, PromptTrim, PLATFORMS};
pub use prompt_reader::PromptReader;
pub use session::{
    normalize_linefeeds, strip_ansi_escape_codes, strip_command_echo, ConfigSetOptions,
    DeviceSession, SendOptions,
};
pub use session_log::SessionLog;
pub use transport::{ssh::SshTransport, telnet::TelnetTransport, Transport};
