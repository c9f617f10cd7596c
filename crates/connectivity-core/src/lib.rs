//! Core of the connectivity monitor.
//!
//! This crate provides the platform-independent parts of connectivity
//! monitoring:
//!
//! - **Status model**: [`Status`], connected (optionally metered) or disconnected
//! - **Providers**: the [`ConnectivityProvider`] trait that turns a platform or
//!   protocol specific source into a stream of statuses
//! - **Monitor**: [`Connectivity`], the start/stop state machine that fans a
//!   provider's stream out to any number of subscribers
//! - **UI state**: [`ConnectivityState`], synchronous snapshots for UI layers
//!
//! Concrete providers live in the `connectivity-http` (HTTP polling) and
//! `connectivity-device` (OS network-change notifications) crates.
//!
//! # Example
//!
//! ```ignore
//! use connectivity_core::{Connectivity, ConnectivityOptions};
//! use futures_util::StreamExt;
//!
//! let connectivity = Connectivity::with_current_runtime(provider, ConnectivityOptions::new(true))?;
//!
//! // One-shot check, independent of continuous monitoring
//! let status = connectivity.status().await;
//! println!("Currently {status}");
//!
//! // Observe every change
//! let mut updates = connectivity.status_updates();
//! while let Some(status) = updates.next().await {
//!     if status.is_metered() {
//!         println!("On a metered connection, deferring large downloads");
//!     }
//! }
//! ```

pub mod broadcast;
mod error;
pub mod logging;
mod monitor;
mod options;
mod provider;
mod state;
mod status;

pub use broadcast::{StatusBroadcast, Updates};
pub use error::{ConnectivityError, Result};
pub use monitor::Connectivity;
pub use options::{ConnectivityOptions, ConnectivityOptionsBuilder};
pub use provider::{ConnectivityProvider, ProviderFn, StatusStream, provider_fn};
pub use state::ConnectivityState;
pub use status::Status;
