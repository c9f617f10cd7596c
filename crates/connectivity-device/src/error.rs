//! Error types for interface watching.

/// Errors from registering an interface watch.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The watcher thread could not be started.
    #[error("Failed to start interface watcher thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The OS refused the change-notification registration.
    #[error("Failed to register interface watch: {0}")]
    Watch(String),
    /// The watcher thread exited before reporting its registration.
    #[error("Interface watcher exited during registration")]
    WatcherExited,
}

/// A specialized Result type for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
