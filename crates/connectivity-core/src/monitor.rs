//! The connectivity monitor state machine.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::broadcast::{StatusBroadcast, Updates};
use crate::error::{ConnectivityError, Result};
use crate::logging::targets;
use crate::options::ConnectivityOptions;
use crate::provider::ConnectivityProvider;
use crate::status::Status;

/// A running monitoring session.
struct MonitorTask {
    id: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl MonitorTask {
    /// Stop the task at its next suspension point, dropping the provider
    /// stream.
    fn cancel(self) {
        self.token.cancel();
        self.handle.abort();
    }
}

type TaskSlot = Arc<Mutex<Option<MonitorTask>>>;

/// Monitors network connectivity through a [`ConnectivityProvider`].
///
/// The monitor is either idle or monitoring. While monitoring, a single
/// background task consumes the provider's stream and republishes every
/// value to all subscribers of [`status_updates`](Self::status_updates).
/// [`status`](Self::status) performs a one-shot check whether or not
/// monitoring is active.
///
/// All background work runs on the runtime handle supplied at construction.
///
/// # Example
///
/// ```ignore
/// use connectivity_core::{Connectivity, ConnectivityOptions, Status, provider_fn};
/// use futures_util::{StreamExt, stream};
///
/// let provider = provider_fn(|| stream::iter([Status::Connected { metered: false }]));
/// let connectivity = Connectivity::new(provider, ConnectivityOptions::new(true), handle);
/// assert!(connectivity.is_monitoring());
///
/// let mut updates = connectivity.status_updates();
/// while let Some(status) = updates.next().await {
///     println!("Connectivity: {status}");
/// }
/// ```
pub struct Connectivity {
    provider: Arc<dyn ConnectivityProvider>,
    runtime: Handle,
    updates: StatusBroadcast<Status>,
    monitoring: Arc<watch::Sender<bool>>,
    task: TaskSlot,
    next_task_id: AtomicU64,
}

impl Connectivity {
    /// Create a monitor that runs its background work on `runtime`.
    ///
    /// If `options.auto_start` is set, monitoring is started before this
    /// returns.
    pub fn new(
        provider: impl ConnectivityProvider,
        options: ConnectivityOptions,
        runtime: Handle,
    ) -> Self {
        Self::from_shared(Arc::new(provider), options, runtime)
    }

    /// Create a monitor from a shared provider.
    pub fn from_shared(
        provider: Arc<dyn ConnectivityProvider>,
        options: ConnectivityOptions,
        runtime: Handle,
    ) -> Self {
        let (monitoring, _) = watch::channel(false);
        let connectivity = Self {
            provider,
            runtime,
            updates: StatusBroadcast::new(),
            monitoring: Arc::new(monitoring),
            task: Arc::new(Mutex::new(None)),
            next_task_id: AtomicU64::new(1),
        };

        if options.auto_start {
            connectivity.start();
        }

        connectivity
    }

    /// Create a monitor on the runtime of the calling context.
    ///
    /// Fails with [`ConnectivityError::NoRuntime`] when called outside a
    /// tokio runtime.
    pub fn with_current_runtime(
        provider: impl ConnectivityProvider,
        options: ConnectivityOptions,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ConnectivityError::NoRuntime)?;
        Ok(Self::new(provider, options, runtime))
    }

    /// Subscribe to status updates.
    ///
    /// The stream starts with the most recent status, if one has been
    /// observed, and then yields every new status in order.
    pub fn status_updates(&self) -> Updates<Status> {
        self.updates.subscribe()
    }

    /// The most recently observed status, if any.
    pub fn latest_status(&self) -> Option<Status> {
        self.updates.latest()
    }

    /// Get a receiver for the monitoring flag.
    pub fn monitoring(&self) -> watch::Receiver<bool> {
        self.monitoring.subscribe()
    }

    /// Subscribe to monitoring flag changes, starting with the current value.
    pub fn monitoring_updates(&self) -> BoxStream<'static, bool> {
        WatchStream::new(self.monitoring.subscribe()).boxed()
    }

    /// Check if a background monitoring task is active.
    pub fn is_monitoring(&self) -> bool {
        *self.monitoring.borrow()
    }

    /// The runtime background work is spawned on.
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Perform one fresh status check.
    ///
    /// Reads the first value of a new provider stream, publishes it to
    /// [`status_updates`](Self::status_updates) and returns it. Safe to call
    /// while monitoring is active.
    pub async fn status(&self) -> Status {
        check_once(self.provider.as_ref(), &self.updates).await
    }

    /// Run a status check in the background.
    ///
    /// The result is delivered through [`status_updates`](Self::status_updates).
    pub fn force(&self) -> JoinHandle<Status> {
        let provider = Arc::clone(&self.provider);
        let updates = self.updates.clone();
        self.runtime
            .spawn(async move { check_once(provider.as_ref(), &updates).await })
    }

    /// Start monitoring.
    ///
    /// A session that is already running is cancelled and replaced, so at
    /// most one provider subscription is ever active.
    pub fn start(&self) {
        let mut slot = self.task.lock();
        if let Some(previous) = slot.take() {
            debug!(target: targets::MONITOR, task = previous.id, "Replacing active monitoring task");
            previous.cancel();
        }

        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.monitoring.send_replace(true);

        let handle = self.runtime.spawn(run_monitor(
            id,
            Arc::clone(&self.provider),
            self.updates.clone(),
            Arc::clone(&self.monitoring),
            Arc::clone(&self.task),
            token.clone(),
        ));

        debug!(target: targets::MONITOR, task = id, "Monitoring started");
        *slot = Some(MonitorTask {
            id,
            token,
            handle,
        });
    }

    /// Stop monitoring.
    ///
    /// Does nothing beyond clearing the flag when not monitoring.
    pub fn stop(&self) {
        let mut slot = self.task.lock();
        if let Some(task) = slot.take() {
            debug!(target: targets::MONITOR, task = task.id, "Monitoring stopped");
            task.cancel();
        }
        self.monitoring.send_replace(false);
    }
}

impl Drop for Connectivity {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            task.cancel();
        }
    }
}

impl fmt::Debug for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connectivity")
            .field("monitoring", &self.is_monitoring())
            .field("latest_status", &self.latest_status())
            .finish_non_exhaustive()
    }
}

async fn check_once(provider: &dyn ConnectivityProvider, updates: &StatusBroadcast<Status>) -> Status {
    let status = match provider.monitor().next().await {
        Some(status) => status,
        None => {
            warn!(target: targets::MONITOR, "Provider ended without a status, reporting disconnected");
            Status::Disconnected
        }
    };
    updates.publish(status);
    status
}

async fn run_monitor(
    id: u64,
    provider: Arc<dyn ConnectivityProvider>,
    updates: StatusBroadcast<Status>,
    monitoring: Arc<watch::Sender<bool>>,
    task: TaskSlot,
    token: CancellationToken,
) {
    // Replaced before it was first polled.
    if token.is_cancelled() {
        return;
    }

    let mut statuses = provider.monitor();

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(target: targets::MONITOR, task = id, "Monitoring task cancelled");
                return;
            }
            next = statuses.next() => match next {
                Some(status) => updates.publish(status),
                None => break,
            },
        }
    }

    drop(statuses);
    debug!(target: targets::MONITOR, task = id, "Provider stream ended");

    let mut slot = task.lock();
    if slot.as_ref().is_some_and(|current| current.id == id) {
        *slot = None;
        monitoring.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::provider_fn;
    use futures_util::stream;

    #[test]
    fn test_with_current_runtime_outside_runtime_fails() {
        let result = std::thread::spawn(|| {
            Connectivity::with_current_runtime(
                provider_fn(stream::empty::<Status>),
                ConnectivityOptions::default(),
            )
            .map(|_| ())
        })
        .join()
        .expect("thread panicked");

        assert_eq!(result.unwrap_err(), ConnectivityError::NoRuntime);
    }

    #[tokio::test]
    async fn test_with_current_runtime_inside_runtime() {
        let connectivity = Connectivity::with_current_runtime(
            provider_fn(stream::empty::<Status>),
            ConnectivityOptions::default(),
        )
        .expect("runtime available");
        assert!(!connectivity.is_monitoring());
    }

    #[tokio::test]
    async fn test_empty_provider_reports_disconnected() {
        let connectivity = Connectivity::new(
            provider_fn(stream::empty::<Status>),
            ConnectivityOptions::default(),
            Handle::current(),
        );
        assert_eq!(connectivity.status().await, Status::Disconnected);
        assert_eq!(connectivity.latest_status(), Some(Status::Disconnected));
    }
}
