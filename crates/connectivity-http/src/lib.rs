//! HTTP polling connectivity for the connectivity monitor.
//!
//! Infers reachability by periodically sending HTTP requests to a list of
//! well-known hosts. The first host answering with a 2xx or 3xx status
//! makes the cycle report connected; if none does, the cycle reports
//! disconnected. Metered networks cannot be detected this way.
//!
//! - [`HttpConnectivity`] builds a ready-to-use [`Connectivity`] monitor
//! - [`HttpProvider`] is the underlying [`ConnectivityProvider`]
//! - [`HttpProbe`] is the seam for sending requests; [`ReqwestProbe`] is the
//!   default implementation
//! - [`HttpConnectivityOptions`] configures hosts, port, method, timeout and
//!   polling interval, and can be loaded from TOML
//!
//! [`Connectivity`]: connectivity_core::Connectivity
//! [`ConnectivityProvider`]: connectivity_core::ConnectivityProvider

mod connectivity;
mod error;
mod method;
pub mod options;
mod poll_result;
mod probe;
mod provider;
mod target;

pub use connectivity::HttpConnectivity;
pub use error::{ConfigError, ProbeError, Result};
pub use method::HttpMethod;
pub use options::{HttpConnectivityOptions, HttpConnectivityOptionsBuilder, PollCallback};
pub use poll_result::PollResult;
pub use probe::{
    HttpProbe, ProbeRequest, ProbeResponse, ReqwestProbe, ReqwestProbeBuilder, ReqwestProbeConfig,
};
pub use provider::HttpProvider;
pub use target::{ProbeTarget, Scheme};
