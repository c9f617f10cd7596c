//! Single HTTP reachability probes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::redirect::Policy;
use url::Url;

use crate::error::{ProbeError, Result};
use crate::method::HttpMethod;

/// A request to probe one host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Method to send.
    pub method: HttpMethod,
    /// Fully resolved URL.
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// The response to a probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeResponse {
    /// The URL that answered.
    pub url: Url,
    /// The response status code.
    pub status: StatusCode,
}

impl ProbeResponse {
    /// Create a response.
    pub fn new(url: Url, status: StatusCode) -> Self {
        Self { url, status }
    }

    /// Whether the host counts as reachable: any 2xx or 3xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }
}

/// Performs a single HTTP request for a poll cycle.
///
/// Implementations return [`ProbeError::Cancelled`] only when the whole
/// cycle should be abandoned; every other error is treated as a failed host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpProbe: Send + Sync + 'static {
    /// Send `request` and report the response status.
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResponse>;
}

#[async_trait]
impl<P: HttpProbe + ?Sized> HttpProbe for Arc<P> {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        (**self).probe(request).await
    }
}

/// Configuration for [`ReqwestProbe`].
#[derive(Clone, Debug)]
pub struct ReqwestProbeConfig {
    /// Connect timeout, applied in addition to the per-request timeout.
    pub connect_timeout: Option<Duration>,
    /// Whether to follow redirects. A redirect status already counts as
    /// reachable, so the default is not to.
    pub follow_redirects: bool,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// User agent sent with every probe.
    pub user_agent: Option<String>,
}

impl Default for ReqwestProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            follow_redirects: false,
            max_redirects: 10,
            user_agent: Some(format!("connectivity/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for a [`ReqwestProbe`] with custom configuration.
#[derive(Debug, Default)]
pub struct ReqwestProbeBuilder {
    config: ReqwestProbeConfig,
}

impl ReqwestProbeBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Follow up to `max` redirects instead of reporting the redirect itself.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.follow_redirects = true;
        self.config.max_redirects = max;
        self
    }

    /// Never follow redirects.
    pub fn no_redirects(mut self) -> Self {
        self.config.follow_redirects = false;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the probe.
    pub fn build(self) -> Result<ReqwestProbe> {
        let mut builder = reqwest::Client::builder();

        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if self.config.follow_redirects {
            builder = builder.redirect(Policy::limited(self.config.max_redirects));
        } else {
            builder = builder.redirect(Policy::none());
        }

        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder.build()?;
        Ok(ReqwestProbe {
            client,
            config: self.config,
        })
    }
}

/// An [`HttpProbe`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct ReqwestProbe {
    client: reqwest::Client,
    config: ReqwestProbeConfig,
}

impl ReqwestProbe {
    /// Create a probe with default configuration.
    pub fn new() -> Result<Self> {
        ReqwestProbeBuilder::new().build()
    }

    /// Create a builder for configuring a probe.
    pub fn builder() -> ReqwestProbeBuilder {
        ReqwestProbeBuilder::new()
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            config: ReqwestProbeConfig::default(),
        }
    }

    /// Get the probe's configuration.
    pub fn config(&self) -> &ReqwestProbeConfig {
        &self.config
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        let response = self
            .client
            .request(request.method.to_http(), request.url.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(ProbeError::from)?;

        Ok(ProbeResponse::new(response.url().clone(), response.status()))
    }
}

impl std::fmt::Debug for ReqwestProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestProbe")
            .field("config", &self.config)
            .finish()
    }
}
