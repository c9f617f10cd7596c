//! Signal provider abstraction.
//!
//! A provider turns some underlying source of connectivity information (OS
//! network-change callbacks, HTTP polling, a test script) into a lazy stream of
//! [`Status`] values. The monitor core consumes providers without knowing how
//! the stream is produced.

use std::fmt;

use futures_util::stream::{BoxStream, Stream, StreamExt};

use crate::status::Status;

/// A boxed, possibly infinite stream of status values.
pub type StatusStream = BoxStream<'static, Status>;

/// A source of connectivity status.
///
/// Every call to [`monitor`](Self::monitor) must return a fresh, independent
/// stream: the monitor calls it once per monitoring session and once per
/// one-shot status check. Any resources the stream acquires (native callbacks,
/// sockets) must be released when the stream is dropped.
pub trait ConnectivityProvider: Send + Sync + 'static {
    /// Start observing connectivity and return the resulting status stream.
    fn monitor(&self) -> StatusStream;
}

/// A provider backed by a stream factory closure.
///
/// Created with [`provider_fn`].
pub struct ProviderFn<F> {
    factory: F,
}

impl<F, S> ConnectivityProvider for ProviderFn<F>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Stream<Item = Status> + Send + 'static,
{
    fn monitor(&self) -> StatusStream {
        (self.factory)().boxed()
    }
}

impl<F> fmt::Debug for ProviderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderFn").finish_non_exhaustive()
    }
}

/// Create a provider from a closure that builds a new status stream per call.
///
/// # Example
///
/// ```
/// use connectivity_core::{ConnectivityProvider, Status, provider_fn};
/// use futures_util::stream;
///
/// let provider = provider_fn(|| stream::iter([Status::Connected { metered: false }]));
/// let _stream = provider.monitor();
/// ```
pub fn provider_fn<F, S>(factory: F) -> ProviderFn<F>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Stream<Item = Status> + Send + 'static,
{
    ProviderFn { factory }
}
