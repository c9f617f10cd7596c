//! Connectivity by polling HTTP hosts.

use std::sync::Arc;

use async_stream::stream;
use connectivity_core::logging::targets;
use connectivity_core::{ConnectivityProvider, Status, StatusStream};
use futures_util::StreamExt;
use tracing::{debug, trace, warn};

use crate::error::{ProbeError, Result};
use crate::options::HttpConnectivityOptions;
use crate::poll_result::PollResult;
use crate::probe::{HttpProbe, ProbeRequest};
use crate::target::ProbeTarget;

/// A [`ConnectivityProvider`] that infers connectivity from HTTP requests.
///
/// Each poll cycle tries the configured hosts in order and stops at the
/// first one answering with a 2xx or 3xx status. The cycle reports
/// connected if any host succeeded and disconnected otherwise. HTTP polling
/// cannot detect metered networks, so a connected result is never metered.
///
/// [`monitor`](ConnectivityProvider::monitor) yields the result of one cycle
/// immediately, then one more after every polling interval.
#[derive(Clone)]
pub struct HttpProvider {
    options: Arc<HttpConnectivityOptions>,
    probe: Arc<dyn HttpProbe>,
}

impl HttpProvider {
    /// Create a provider sending requests through `probe`.
    pub fn new(options: HttpConnectivityOptions, probe: impl HttpProbe) -> Self {
        Self::with_shared_probe(options, Arc::new(probe))
    }

    /// Create a provider sharing an existing probe.
    pub fn with_shared_probe(options: HttpConnectivityOptions, probe: Arc<dyn HttpProbe>) -> Self {
        if options.hosts.is_empty() {
            warn!(target: targets::HTTP, "No hosts configured, every poll will report disconnected");
        }
        Self {
            options: Arc::new(options),
            probe,
        }
    }

    /// The options this provider polls with.
    pub fn options(&self) -> &HttpConnectivityOptions {
        &self.options
    }

    /// Run one poll cycle.
    ///
    /// Host failures are reported through the poll-result callback and never
    /// surface here. Returns [`ProbeError::Cancelled`] if a probe was
    /// cancelled, abandoning the remaining hosts.
    pub async fn check_connection(&self) -> Result<Status> {
        for host in &self.options.hosts {
            if self.check_host(host).await? {
                debug!(target: targets::HTTP, host = %host, "Host reachable");
                return Ok(Status::Connected { metered: false });
            }
        }

        debug!(
            target: targets::HTTP,
            hosts = self.options.hosts.len(),
            "No host reachable"
        );
        Ok(Status::Disconnected)
    }

    /// Probe one host. `Ok(true)` means it proved the network reachable.
    async fn check_host(&self, host: &str) -> Result<bool> {
        let target = ProbeTarget::parse(host, self.options.port);
        let url = match target.url() {
            Ok(url) => url,
            Err(error) => {
                trace!(target: targets::HTTP, host, %error, "Skipping unusable host");
                self.options.report(PollResult::Error { error });
                return Ok(false);
            }
        };

        let request = ProbeRequest {
            method: self.options.method,
            url,
            timeout: self.options.timeout,
        };

        let outcome = tokio::time::timeout(request.timeout, self.probe.probe(&request))
            .await
            .unwrap_or(Err(ProbeError::Timeout));

        match outcome {
            Ok(response) => {
                trace!(
                    target: targets::HTTP,
                    url = %request.url,
                    method = %request.method,
                    status = response.status.as_u16(),
                    "Probe answered"
                );
                let result = PollResult::from(response);
                let is_success = result.is_success();
                self.options.report(result);
                Ok(is_success)
            }
            Err(error) if error.is_cancellation() => Err(error),
            Err(error) => {
                trace!(target: targets::HTTP, url = %request.url, %error, "Probe failed");
                self.options.report(PollResult::Error { error });
                Ok(false)
            }
        }
    }
}

impl ConnectivityProvider for HttpProvider {
    fn monitor(&self) -> StatusStream {
        let provider = self.clone();

        stream! {
            loop {
                match provider.check_connection().await {
                    Ok(status) => yield status,
                    Err(error) => {
                        debug!(target: targets::HTTP, %error, "Polling cancelled");
                        break;
                    }
                }
                tokio::time::sleep(provider.options.polling_interval).await;
            }
        }
        .boxed()
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
