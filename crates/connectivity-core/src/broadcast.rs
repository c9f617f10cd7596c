//! Multicast stream with a replay-latest cache.
//!
//! Every subscriber first receives the most recently published value (if
//! any), then every value published after it subscribed, in publish order.
//! Publishing never blocks: a subscriber that falls more than the buffer
//! capacity behind skips the oldest values it missed.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::trace;

use crate::logging::targets;

/// Default number of values buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 64;

/// A stream of values observed through a [`StatusBroadcast`].
pub type Updates<T> = BoxStream<'static, T>;

/// A replay-latest multicast channel.
///
/// Cheaply cloneable; clones publish into and subscribe from the same channel.
pub struct StatusBroadcast<T> {
    inner: Arc<BroadcastInner<T>>,
}

struct BroadcastInner<T> {
    sender: broadcast::Sender<T>,
    latest: Mutex<Option<T>>,
}

impl<T> StatusBroadcast<T>
where
    T: Clone + Send + 'static,
{
    /// Create a broadcast with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a broadcast that buffers up to `capacity` values per subscriber.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BroadcastInner {
                sender,
                latest: Mutex::new(None),
            }),
        }
    }

    /// Publish a value to all current subscribers and cache it for late ones.
    pub fn publish(&self, value: T) {
        // The cache and the channel are updated under one lock so a concurrent
        // subscriber sees the value either as its replay or as a live item.
        let mut latest = self.inner.latest.lock();
        *latest = Some(value.clone());
        // An error only means there are no live subscribers right now.
        let _ = self.inner.sender.send(value);
    }

    /// Get the most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.inner.latest.lock().clone()
    }

    /// Subscribe to the latest value and all subsequent values.
    pub fn subscribe(&self) -> Updates<T> {
        let (replay, receiver) = {
            let latest = self.inner.latest.lock();
            (latest.clone(), self.inner.sender.subscribe())
        };

        let live = BroadcastStream::new(receiver).filter_map(|item| async move {
            match item {
                Ok(value) => Some(value),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    trace!(target: targets::BROADCAST, skipped, "Subscriber lagged, dropping oldest values");
                    None
                }
            }
        });

        stream::iter(replay).chain(live).boxed()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }
}

impl<T> Default for StatusBroadcast<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StatusBroadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for StatusBroadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBroadcast")
            .field("subscribers", &self.inner.sender.receiver_count())
            .finish()
    }
}
