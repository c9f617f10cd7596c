//! Device connectivity for the connectivity monitor.
//!
//! Watches the operating system's network interfaces and reports connected
//! whenever a usable interface exists. Traffic routed over a cellular
//! interface is reported as metered.
//!
//! Interface enumeration uses `netdev`; change notifications use
//! `netwatcher`, which wraps netlink on Linux, the routing socket on macOS
//! and iOS, and `NotifyIpInterfaceChange` on Windows.

mod connectivity;
mod error;
mod interface;
mod provider;

pub use connectivity::DeviceConnectivity;
pub use error::{DeviceError, Result};
pub use interface::{InterfaceType, NetworkInterface};
pub use provider::{DeviceProvider, status_from_interfaces};
