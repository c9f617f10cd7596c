//! Tracing targets used by the connectivity crates.
//!
//! The crates never install a subscriber. Filter their output with these
//! targets, for example `RUST_LOG=connectivity::monitor=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Monitor lifecycle (start, stop, task completion).
    pub const MONITOR: &str = "connectivity::monitor";
    /// Status broadcast and subscriber lag.
    pub const BROADCAST: &str = "connectivity::broadcast";
    /// UI-facing state holder.
    pub const STATE: &str = "connectivity::state";
    /// HTTP polling provider.
    pub const HTTP: &str = "connectivity::http";
    /// Native device provider.
    pub const DEVICE: &str = "connectivity::device";
}
