//! Constructors for HTTP-polling monitors.

use connectivity_core::Connectivity;
use tokio::runtime::Handle;

use crate::error::Result;
use crate::options::HttpConnectivityOptions;
use crate::probe::{HttpProbe, ReqwestProbe};
use crate::provider::HttpProvider;

/// Factory for [`Connectivity`] monitors backed by HTTP polling.
///
/// # Example
///
/// ```ignore
/// use connectivity_http::{HttpConnectivity, HttpConnectivityOptions};
///
/// let options = HttpConnectivityOptions::builder()
///     .hosts(["example.com"])
///     .polling_interval_ms(30_000)
///     .build();
/// let connectivity = HttpConnectivity::new(options, tokio::runtime::Handle::current())?;
/// println!("{}", connectivity.status().await);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HttpConnectivity;

impl HttpConnectivity {
    /// Create a monitor probing hosts with a default [`ReqwestProbe`].
    ///
    /// Fails only if the HTTP client cannot be initialized.
    pub fn new(options: HttpConnectivityOptions, runtime: Handle) -> Result<Connectivity> {
        let probe = ReqwestProbe::new()?;
        Ok(Self::with_probe(options, probe, runtime))
    }

    /// Create a monitor sending requests through `probe`.
    pub fn with_probe(
        options: HttpConnectivityOptions,
        probe: impl HttpProbe,
        runtime: Handle,
    ) -> Connectivity {
        let monitor_options = options.options;
        Connectivity::new(HttpProvider::new(options, probe), monitor_options, runtime)
    }
}
