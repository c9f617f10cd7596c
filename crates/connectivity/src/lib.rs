//! Connectivity - cross-platform network reachability monitoring.
//!
//! This is the umbrella crate that re-exports all public APIs. It reports
//! whether the device has network access and whether that access is
//! metered, both as a continuously observable stream and as an on-demand
//! check.
//!
//! Two providers are available behind features:
//!
//! - `device` (default): OS network interface notifications, with metered
//!   detection for cellular links
//! - `http` (default): periodic HTTP requests to well-known hosts
//!
//! # Example
//!
//! ```no_run
//! use connectivity::prelude::*;
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let connectivity = DeviceConnectivity::with_defaults(tokio::runtime::Handle::current());
//!     let mut updates = connectivity.status_updates();
//!     while let Some(status) = updates.next().await {
//!         println!("Connectivity: {status}");
//!     }
//! }
//! ```

pub use connectivity_core::*;

/// HTTP polling provider.
#[cfg(feature = "http")]
pub mod http {
    pub use connectivity_http::*;
}

/// OS interface notification provider.
#[cfg(feature = "device")]
pub mod device {
    pub use connectivity_device::*;
}

pub mod prelude;
