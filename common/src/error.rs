use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Startup-fatal configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    Missing(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid trunk '{name}': {reason}")]
    InvalidTrunk { name: String, reason: String },

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Why a single transport attempt failed.
///
/// Always carried inside a [`crate::metrics::ProbeOutcome`]; never fatal to a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection refused")]
    Refused,

    #[error("peer closed the connection without responding")]
    Closed,

    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused => ProbeError::Refused,
            std::io::ErrorKind::UnexpectedEof => ProbeError::Closed,
            _ => ProbeError::Io(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("location store unreachable: {0}")]
    Connection(String),

    #[error("location store command failed: {0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("metrics sink request failed: {0}")]
    Transport(String),

    #[error("metrics sink rejected write ({status}): {body}")]
    Rejected { status: u16, body: String },
}
