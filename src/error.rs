use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = ConformanceError> = std::result::Result<T, E>;

/// Every failure the client and the poller can report.
#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("argument property \"{argument}\" missing")]
    MissingArgument { argument: &'static str },

    #[error("{operation}: expected HTTP status {expected}, got {actual}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: u16,
        actual: u16,
    },

    #[error("module id {module_id} is {status} but {result}")]
    ResultMismatch {
        module_id: String,
        status: String,
        result: String,
    },

    #[error("module id {module_id} is {status}")]
    Interrupted { module_id: String, status: String },

    #[error(
        "Timed out after {timeout:?} waiting for test module {module_id} to be in one of states: {}",
        .states.join(", ")
    )]
    Timeout {
        module_id: String,
        states: Vec<String>,
        timeout: Duration,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of a [`ConformanceError`], for callers deciding
/// whether to retry a whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input was missing; nothing was sent.
    Validation,
    /// The service answered with an unexpected status code.
    Protocol,
    /// The module reached a definitive bad outcome (bad result or interrupted).
    RemoteOutcome,
    /// No terminal state was observed before the deadline.
    Timeout,
    /// Network or body decoding failure from the HTTP stack.
    Transport,
    /// Configuration could not be read or parsed.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::Protocol => write!(f, "Protocol"),
            ErrorKind::RemoteOutcome => write!(f, "RemoteOutcome"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::Config => write!(f, "Config"),
        }
    }
}

impl ConformanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConformanceError::MissingArgument { .. } => ErrorKind::Validation,
            ConformanceError::UnexpectedStatus { .. } => ErrorKind::Protocol,
            ConformanceError::ResultMismatch { .. } | ConformanceError::Interrupted { .. } => {
                ErrorKind::RemoteOutcome
            }
            ConformanceError::Timeout { .. } => ErrorKind::Timeout,
            ConformanceError::Http(_) => ErrorKind::Transport,
            ConformanceError::Config(_)
            | ConformanceError::Io(_)
            | ConformanceError::Toml(_) => ErrorKind::Config,
        }
    }

    /// The module id this error is about, when it comes from a wait session.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            ConformanceError::ResultMismatch { module_id, .. }
            | ConformanceError::Interrupted { module_id, .. }
            | ConformanceError::Timeout { module_id, .. } => Some(module_id),
            _ => None,
        }
    }
}

/// Fails with [`ConformanceError::MissingArgument`] when `value` is empty.
pub(crate) fn require(value: &str, argument: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(ConformanceError::MissingArgument { argument });
    }
    Ok(())
}
