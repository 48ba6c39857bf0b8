//! Error types for the Pairwatch application.

use thiserror::Error;

/// The main error type for Pairwatch.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/TUI related errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Exchange request errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Failure of a single request against the exchange.
///
/// The `Display` output is the human-readable cause shown to the user when
/// the catalog cannot be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, reset, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The exchange answered with a non-success HTTP status.
    #[error("exchange returned HTTP {0}")]
    Status(u16),

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Create a new malformed-response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// A price refresh that failed inside the tracking loop.
///
/// Never surfaced to the user; the poller logs it and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("poll cycle {cycle} failed: {source}")]
pub struct PollCycleError {
    /// Cycle counter of the failed refresh, starting at 1.
    pub cycle: u64,
    /// Underlying request failure.
    #[source]
    pub source: FetchError,
}

/// Why a symbol could not be added to the selection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The selection already holds the maximum number of symbols.
    #[error("selection is full")]
    AtCapacity,

    /// The symbol is already part of the selection.
    #[error("symbol is already selected")]
    AlreadySelected,

    /// The symbol is not part of the loaded catalog.
    #[error("symbol is not listed")]
    NotListed,
}
