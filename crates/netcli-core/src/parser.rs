use crate::error::NetcliError;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Hook for turning raw command output into structured records.
///
/// Implementations typically wrap a template engine keyed by device type
/// and command; returning `Ok(None)` means no template applies and the
/// caller keeps the raw text.
pub trait OutputParser: Send + Sync {
    fn parse(
        &self,
        device_type: &str,
        command: &str,
        output: &str,
    ) -> Result<Option<Value>, NetcliError>;
}

/// Result of a parsed command exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedOutput {
    Raw(String),
    Structured(Value),
}

impl ParsedOutput {
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedOutput::Structured(_))
    }

    /// The structured value, if parsing produced one.
    pub fn structured(&self) -> Option<&Value> {
        match self {
            ParsedOutput::Structured(value) => Some(value),
            ParsedOutput::Raw(_) => None,
        }
    }

    /// The raw text, if no template applied.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ParsedOutput::Raw(text) => Some(text),
            ParsedOutput::Structured(_) => None,
        }
    }
}

lazy_static! {
    static ref PARSER: RwLock<Option<Arc<dyn OutputParser>>> = RwLock::new(None);
}

/// Install the process-wide structured parser. Meant to be called once at
/// startup; sessions treat the registry as read-only afterwards.
pub fn register_parser(parser: Arc<dyn OutputParser>) {
    debug!("Registering structured output parser");
    *PARSER.write() = Some(parser);
}

/// The currently registered parser, if any.
pub fn registered_parser() -> Option<Arc<dyn OutputParser>> {
    PARSER.read().clone()
}
