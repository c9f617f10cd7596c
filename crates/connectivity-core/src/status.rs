//! Connectivity status model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The connectivity state of the device.
///
/// A device is either connected, possibly over a metered (cellular or
/// otherwise expensive) link, or it has no network access at all.
///
/// # Example
///
/// ```
/// use connectivity_core::Status;
///
/// let status = Status::Connected { metered: true };
/// assert!(status.is_connected());
/// assert!(status.is_metered());
///
/// assert!(!Status::Disconnected.is_metered());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    /// The device has network access.
    Connected {
        /// Whether the active connection is metered (cellular, expensive or constrained).
        metered: bool,
    },
    /// The device has no network access.
    Disconnected,
}

impl Status {
    /// Check if the device is connected.
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Check if the device is connected over a metered link.
    ///
    /// Always `false` when disconnected.
    pub const fn is_metered(&self) -> bool {
        matches!(self, Self::Connected { metered: true })
    }

    /// Check if the device is disconnected.
    pub const fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { metered: true } => write!(f, "connected (metered)"),
            Self::Connected { metered: false } => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}
