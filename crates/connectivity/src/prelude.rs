//! Prelude module for connectivity.
//!
//! ```ignore
//! use connectivity::prelude::*;
//! ```

pub use crate::{
    Connectivity, ConnectivityOptions, ConnectivityProvider, ConnectivityState, Status,
    StatusStream,
};

#[cfg(feature = "http")]
pub use crate::http::{HttpConnectivity, HttpConnectivityOptions, HttpMethod, PollResult};

#[cfg(feature = "device")]
pub use crate::device::DeviceConnectivity;
