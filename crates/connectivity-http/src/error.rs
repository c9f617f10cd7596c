//! Error types for HTTP polling.

/// Errors from a single HTTP probe.
///
/// Every variant except [`Cancelled`](Self::Cancelled) is an ordinary host
/// failure: the poll cycle records it and moves on to the next host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// Connection refused or failed.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The configured host could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Any other request failure.
    #[error("HTTP request error: {0}")]
    Request(String),
    /// The probe was cancelled; aborts the whole poll cycle.
    #[error("Request was cancelled")]
    Cancelled,
}

impl ProbeError {
    /// Check whether this error is a cancellation signal.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for ProbeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Errors from loading or validating HTTP polling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// No hosts are configured, so every poll would report disconnected.
    #[error("At least one host must be configured")]
    EmptyHosts,
    /// A zero timeout would fail every request.
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
    /// A zero polling interval would poll in a tight loop.
    #[error("Polling interval must be greater than zero")]
    ZeroPollingInterval,
}

/// A specialized Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
