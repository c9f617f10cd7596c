//! Turning configured hosts into probe URLs.
//!
//! A host may carry an explicit `http://` or `https://` prefix, which wins.
//! Without one, port 443 implies HTTPS and every other port implies HTTP.

use url::Url;

use crate::error::ProbeError;

/// URL scheme used for a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// The scheme name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// The scheme implied by a port when the host has no prefix.
    pub fn for_port(port: u16) -> Self {
        if port == 443 { Self::Https } else { Self::Http }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved probe destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Scheme to connect with.
    pub scheme: Scheme,
    /// Host with any scheme prefix removed. May include a path.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
}

impl ProbeTarget {
    /// Resolve a configured host against the configured port.
    pub fn parse(host: &str, port: u16) -> Self {
        let (scheme, host) = if let Some(rest) = host.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = host.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            (Scheme::for_port(port), host)
        };

        Self {
            scheme,
            host: host.to_string(),
            port,
        }
    }

    /// Build the request URL.
    pub fn url(&self) -> Result<Url, ProbeError> {
        let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host))?;
        url.set_port(Some(self.port))
            .map_err(|()| ProbeError::InvalidUrl(format!("cannot set port on {url}")))?;
        Ok(url)
    }
}
