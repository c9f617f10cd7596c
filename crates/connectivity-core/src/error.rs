//! Error types for the connectivity core.

/// Errors raised by the monitor core.
///
/// Connectivity loss is never an error: it is reported as
/// [`Status::Disconnected`](crate::Status::Disconnected). These variants cover
/// missing platform dependencies at the point of first use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectivityError {
    /// No async runtime is available to run the monitor on.
    #[error("no tokio runtime is available; construct the monitor with an explicit runtime handle")]
    NoRuntime,
}

/// A specialized Result type for connectivity operations.
pub type Result<T> = std::result::Result<T, ConnectivityError>;
