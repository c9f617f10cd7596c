//! Monitor-level configuration.

use serde::{Deserialize, Serialize};

/// Options for a connectivity monitor.
///
/// The plain `Default` does not auto-start. Platform factories that start
/// monitoring immediately pass their own options explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityOptions {
    /// Whether monitoring starts while the monitor is being constructed.
    pub auto_start: bool,
}

impl ConnectivityOptions {
    /// Create options with an explicit auto-start flag.
    pub const fn new(auto_start: bool) -> Self {
        Self { auto_start }
    }

    /// Create a builder for configuring options.
    pub fn builder() -> ConnectivityOptionsBuilder {
        ConnectivityOptionsBuilder::new()
    }
}

/// Builder for [`ConnectivityOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConnectivityOptionsBuilder {
    options: ConnectivityOptions,
}

impl ConnectivityOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether monitoring starts on construction.
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.options.auto_start = auto_start;
        self
    }

    /// Build the options.
    pub fn build(self) -> ConnectivityOptions {
        self.options
    }
}
