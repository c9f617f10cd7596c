//! Constructors for device-backed monitors.

use connectivity_core::{Connectivity, ConnectivityOptions};
use tokio::runtime::Handle;

use crate::provider::DeviceProvider;

/// Factory for [`Connectivity`] monitors backed by OS interface notifications.
///
/// # Example
///
/// ```ignore
/// use connectivity_device::DeviceConnectivity;
///
/// let connectivity = DeviceConnectivity::with_defaults(tokio::runtime::Handle::current());
/// let mut updates = connectivity.status_updates();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DeviceConnectivity;

impl DeviceConnectivity {
    /// Create a monitor with the given options.
    pub fn new(options: ConnectivityOptions, runtime: Handle) -> Connectivity {
        Connectivity::new(DeviceProvider::new(), options, runtime)
    }

    /// Create a monitor that starts monitoring immediately.
    pub fn with_defaults(runtime: Handle) -> Connectivity {
        Self::new(Self::default_options(), runtime)
    }

    /// Options used by [`with_defaults`](Self::with_defaults).
    pub fn default_options() -> ConnectivityOptions {
        ConnectivityOptions::new(true)
    }
}
