//! Configuration for HTTP polling.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use connectivity_core::ConnectivityOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::method::HttpMethod;
use crate::poll_result::PollResult;

/// Hosts probed when none are configured explicitly.
pub const DEFAULT_HOSTS: [&str; 3] = ["google.com", "github.com", "bing.com"];
/// Port used when none is configured explicitly.
pub const DEFAULT_PORT: u16 = 443;
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2_000);
/// Delay between poll cycles.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Callback receiving every [`PollResult`].
pub type PollCallback = Arc<dyn Fn(PollResult) + Send + Sync>;

/// Options for HTTP polling connectivity.
///
/// Can be loaded from TOML, with durations given in milliseconds:
///
/// ```toml
/// auto_start = true
/// hosts = ["example.com", "http://intranet.local"]
/// port = 443
/// method = "HEAD"
/// timeout_ms = 2000
/// polling_interval_ms = 60000
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "OptionsFile")]
pub struct HttpConnectivityOptions {
    /// Monitor options.
    #[serde(flatten)]
    pub options: ConnectivityOptions,
    /// Hosts tried in order until one answers with 2xx or 3xx.
    pub hosts: Vec<String>,
    /// Port applied to every host.
    pub port: u16,
    /// Request method.
    pub method: HttpMethod,
    /// Per-request timeout.
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Delay between poll cycles.
    #[serde(rename = "polling_interval_ms", with = "duration_ms")]
    pub polling_interval: Duration,
    /// Observer for every attempt made during a poll cycle.
    #[serde(skip)]
    pub on_poll_result: Option<PollCallback>,
}

impl HttpConnectivityOptions {
    /// Create a builder starting from the defaults.
    pub fn builder() -> HttpConnectivityOptionsBuilder {
        HttpConnectivityOptionsBuilder::new()
    }

    /// Parse options from TOML and validate them.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject configurations that can never report connected or would poll
    /// without pause.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::EmptyHosts);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.polling_interval.is_zero() {
            return Err(ConfigError::ZeroPollingInterval);
        }
        Ok(())
    }

    /// Deliver `result` to the callback, if one is set.
    pub(crate) fn report(&self, result: PollResult) {
        if let Some(callback) = &self.on_poll_result {
            callback(result);
        }
    }
}

impl Default for HttpConnectivityOptions {
    fn default() -> Self {
        Self {
            options: ConnectivityOptions::new(true),
            hosts: DEFAULT_HOSTS.iter().map(|host| host.to_string()).collect(),
            port: DEFAULT_PORT,
            method: HttpMethod::Get,
            timeout: DEFAULT_TIMEOUT,
            polling_interval: DEFAULT_POLLING_INTERVAL,
            on_poll_result: None,
        }
    }
}

impl PartialEq for HttpConnectivityOptions {
    fn eq(&self, other: &Self) -> bool {
        let callbacks_equal = match (&self.on_poll_result, &other.on_poll_result) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };

        self.options == other.options
            && self.hosts == other.hosts
            && self.port == other.port
            && self.method == other.method
            && self.timeout == other.timeout
            && self.polling_interval == other.polling_interval
            && callbacks_equal
    }
}

impl fmt::Debug for HttpConnectivityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConnectivityOptions")
            .field("auto_start", &self.options.auto_start)
            .field("hosts", &self.hosts)
            .field("port", &self.port)
            .field("method", &self.method)
            .field("timeout", &self.timeout)
            .field("polling_interval", &self.polling_interval)
            .field("on_poll_result", &self.on_poll_result.is_some())
            .finish()
    }
}

/// The on-disk shape of [`HttpConnectivityOptions`].
///
/// Every missing key, `auto_start` included, takes its value from
/// [`HttpConnectivityOptions::default`].
#[derive(Deserialize)]
#[serde(default)]
struct OptionsFile {
    auto_start: bool,
    hosts: Vec<String>,
    port: u16,
    method: HttpMethod,
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    timeout: Duration,
    #[serde(rename = "polling_interval_ms", with = "duration_ms")]
    polling_interval: Duration,
}

impl Default for OptionsFile {
    fn default() -> Self {
        let defaults = HttpConnectivityOptions::default();
        Self {
            auto_start: defaults.options.auto_start,
            hosts: defaults.hosts,
            port: defaults.port,
            method: defaults.method,
            timeout: defaults.timeout,
            polling_interval: defaults.polling_interval,
        }
    }
}

impl From<OptionsFile> for HttpConnectivityOptions {
    fn from(file: OptionsFile) -> Self {
        Self {
            options: ConnectivityOptions::new(file.auto_start),
            hosts: file.hosts,
            port: file.port,
            method: file.method,
            timeout: file.timeout,
            polling_interval: file.polling_interval,
            on_poll_result: None,
        }
    }
}

/// Builder for [`HttpConnectivityOptions`].
///
/// Starts from the defaults. [`hosts`](Self::hosts) replaces the host list,
/// [`host`](Self::host) appends to it.
#[derive(Debug, Default)]
pub struct HttpConnectivityOptionsBuilder {
    options: HttpConnectivityOptions,
}

impl HttpConnectivityOptionsBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start monitoring as soon as the monitor is created.
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.options.options.auto_start = auto_start;
        self
    }

    /// Append a host to the list.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options.hosts.push(host.into());
        self
    }

    /// Replace the host list.
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Set the request method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.options.method = method;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the per-request timeout in milliseconds.
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Set the delay between poll cycles.
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.options.polling_interval = interval;
        self
    }

    /// Set the delay between poll cycles in milliseconds.
    pub fn polling_interval_ms(self, millis: u64) -> Self {
        self.polling_interval(Duration::from_millis(millis))
    }

    /// Observe every attempt made during a poll cycle.
    pub fn on_poll_result<F>(mut self, callback: F) -> Self
    where
        F: Fn(PollResult) + Send + Sync + 'static,
    {
        self.options.on_poll_result = Some(Arc::new(callback));
        self
    }

    /// Build the options.
    pub fn build(self) -> HttpConnectivityOptions {
        self.options
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = HttpConnectivityOptions::default();
        assert!(options.options.auto_start);
        assert_eq!(options.hosts, vec!["google.com", "github.com", "bing.com"]);
        assert_eq!(options.port, 443);
        assert_eq!(options.method, HttpMethod::Get);
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.polling_interval, Duration::from_secs(300));
        assert!(options.on_poll_result.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_matches_literal() {
        let built = HttpConnectivityOptions::builder()
            .auto_start(false)
            .hosts(["a.example", "b.example"])
            .port(8080)
            .method(HttpMethod::Head)
            .timeout_ms(500)
            .polling_interval_ms(10_000)
            .build();

        let literal = HttpConnectivityOptions {
            options: ConnectivityOptions::new(false),
            hosts: vec!["a.example".into(), "b.example".into()],
            port: 8080,
            method: HttpMethod::Head,
            timeout: Duration::from_millis(500),
            polling_interval: Duration::from_secs(10),
            on_poll_result: None,
        };

        assert_eq!(built, literal);
    }

    #[test]
    fn test_host_appends_and_hosts_replaces() {
        let options = HttpConnectivityOptions::builder()
            .hosts(["a.example"])
            .host("b.example")
            .build();
        assert_eq!(options.hosts, vec!["a.example", "b.example"]);

        let options = HttpConnectivityOptions::builder()
            .host("c.example")
            .hosts(["d.example"])
            .build();
        assert_eq!(options.hosts, vec!["d.example"]);
    }

    #[test]
    fn test_callback_equality_is_by_identity() {
        let callback: PollCallback = Arc::new(|_| {});
        let a = HttpConnectivityOptions {
            on_poll_result: Some(Arc::clone(&callback)),
            ..Default::default()
        };
        let b = HttpConnectivityOptions {
            on_poll_result: Some(callback),
            ..Default::default()
        };
        assert_eq!(a, b);

        let c = HttpConnectivityOptions::builder().on_poll_result(|_| {}).build();
        assert_ne!(a, c);
        assert_ne!(c, HttpConnectivityOptions::default());
    }

    #[test]
    fn test_from_toml() {
        let options = HttpConnectivityOptions::from_toml_str(
            r#"
            auto_start = false
            hosts = ["example.com"]
            port = 80
            method = "HEAD"
            timeout_ms = 1500
            polling_interval_ms = 60000
            "#,
        )
        .unwrap();

        assert!(!options.options.auto_start);
        assert_eq!(options.hosts, vec!["example.com"]);
        assert_eq!(options.port, 80);
        assert_eq!(options.method, HttpMethod::Head);
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.polling_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let options = HttpConnectivityOptions::from_toml_str("port = 8443").unwrap();
        assert_eq!(options.port, 8443);
        assert_eq!(options.hosts.len(), 3);
        assert!(options.options.auto_start);
    }

    #[test]
    fn test_from_toml_without_auto_start_matches_default() {
        let options = HttpConnectivityOptions::from_toml_str("port = 443").unwrap();
        assert_eq!(options, HttpConnectivityOptions::default());

        let options = HttpConnectivityOptions::from_toml_str("").unwrap();
        assert_eq!(options, HttpConnectivityOptions::default());
    }

    #[test]
    fn test_serialized_options_load_back() {
        let options = HttpConnectivityOptions::builder()
            .auto_start(false)
            .hosts(["example.com"])
            .timeout_ms(1500)
            .build();
        let text = toml::to_string(&options).unwrap();
        assert!(text.contains("auto_start = false"));
        assert!(text.contains("timeout_ms = 1500"));
        assert_eq!(HttpConnectivityOptions::from_toml_str(&text).unwrap(), options);
    }

    #[test]
    fn test_validation() {
        let err = HttpConnectivityOptions::from_toml_str("hosts = []").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyHosts));

        let err = HttpConnectivityOptions::from_toml_str("timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));

        let err = HttpConnectivityOptions::from_toml_str("polling_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPollingInterval));

        let err = HttpConnectivityOptions::from_toml_str("port = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
