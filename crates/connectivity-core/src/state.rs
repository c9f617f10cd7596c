//! Observable connectivity state for UI layers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::logging::targets;
use crate::monitor::Connectivity;
use crate::status::Status;

/// A snapshot-friendly view of a [`Connectivity`] monitor.
///
/// Background collectors keep the current status and monitoring flag up to
/// date, so a UI can read them synchronously on every frame. The collectors
/// stop when the state is dropped.
pub struct ConnectivityState {
    connectivity: Arc<Connectivity>,
    status: Arc<RwLock<Option<Status>>>,
    monitoring: Arc<AtomicBool>,
    collectors: CancellationToken,
}

impl ConnectivityState {
    /// Create a state holder observing `connectivity`.
    pub fn new(connectivity: Arc<Connectivity>) -> Self {
        let status = Arc::new(RwLock::new(connectivity.latest_status()));
        let monitoring = Arc::new(AtomicBool::new(connectivity.is_monitoring()));
        let collectors = CancellationToken::new();

        let mut updates = connectivity.status_updates();
        let status_slot = Arc::clone(&status);
        let token = collectors.clone();
        connectivity.runtime().spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    next = updates.next() => match next {
                        Some(value) => {
                            trace!(target: targets::STATE, status = %value, "Status changed");
                            *status_slot.write() = Some(value);
                        }
                        None => break,
                    },
                }
            }
        });

        let mut flags = connectivity.monitoring_updates();
        let monitoring_flag = Arc::clone(&monitoring);
        let token = collectors.clone();
        connectivity.runtime().spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    next = flags.next() => match next {
                        Some(value) => monitoring_flag.store(value, Ordering::Release),
                        None => break,
                    },
                }
            }
        });

        Self {
            connectivity,
            status,
            monitoring,
            collectors,
        }
    }

    /// The current status, or `None` until the first status arrives.
    pub fn status(&self) -> Option<Status> {
        *self.status.read()
    }

    /// Whether the underlying monitor is monitoring.
    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::Acquire)
    }

    /// Whether the device is known to be connected.
    pub fn is_connected(&self) -> bool {
        self.status().is_some_and(|status| status.is_connected())
    }

    /// Whether the device is known to be on a metered connection.
    pub fn is_metered(&self) -> bool {
        self.status().is_some_and(|status| status.is_metered())
    }

    /// Whether the device is known to be disconnected.
    pub fn is_disconnected(&self) -> bool {
        self.status().is_some_and(|status| status.is_disconnected())
    }

    /// Force a status check in the background.
    pub fn force_check(&self) -> JoinHandle<Status> {
        self.connectivity.force()
    }

    /// Start monitoring.
    pub fn start_monitoring(&self) {
        self.connectivity.start();
    }

    /// Stop monitoring.
    pub fn stop_monitoring(&self) {
        self.connectivity.stop();
    }

    /// The observed monitor.
    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }
}

impl Drop for ConnectivityState {
    fn drop(&mut self) {
        self.collectors.cancel();
    }
}

impl std::fmt::Debug for ConnectivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityState")
            .field("status", &self.status())
            .field("monitoring", &self.is_monitoring())
            .finish()
    }
}
