//! Connectivity from OS network interface notifications.

use std::sync::mpsc as std_mpsc;
use std::thread;

use async_stream::stream;
use connectivity_core::logging::targets;
use connectivity_core::{ConnectivityProvider, Status, StatusStream};
use futures_util::StreamExt;
use futures_util::future::ready;
use futures_util::stream;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, trace};

use crate::error::{DeviceError, Result};
use crate::interface::{InterfaceType, NetworkInterface};

/// Derive a status from an interface snapshot.
///
/// Connected when the default-route interface is usable, or when any
/// usable interface that is not virtual exists. Metered when traffic goes
/// over cellular: the default-route interface is cellular, or, with no
/// usable default route, every usable interface is.
pub fn status_from_interfaces(
    interfaces: &[NetworkInterface],
    default_interface: Option<&NetworkInterface>,
) -> Status {
    let default_interface = default_interface.filter(|iface| iface.is_usable());

    if let Some(iface) = default_interface {
        return Status::Connected {
            metered: iface.is_cellular(),
        };
    }

    let mut usable = interfaces.iter().filter(|iface| {
        iface.is_usable() && iface.interface_type != InterfaceType::Virtual
    });

    match usable.next() {
        None => Status::Disconnected,
        Some(first) => Status::Connected {
            metered: first.is_cellular() && usable.all(NetworkInterface::is_cellular),
        },
    }
}

/// A [`ConnectivityProvider`] driven by OS interface-change notifications.
///
/// Each call to [`monitor`](ConnectivityProvider::monitor) registers its own
/// watch on a dedicated thread. The stream yields the current status as soon
/// as the watch is registered, then a new status whenever an interface change
/// alters it. Dropping the stream deregisters the watch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceProvider;

impl DeviceProvider {
    /// Create a provider.
    pub fn new() -> Self {
        Self
    }

    /// Query the current status synchronously.
    pub fn current_status() -> Status {
        let interfaces = NetworkInterface::list();
        let default_interface = NetworkInterface::default_interface();
        status_from_interfaces(&interfaces, default_interface.as_ref())
    }
}

impl ConnectivityProvider for DeviceProvider {
    fn monitor(&self) -> StatusStream {
        let (updates, receiver) = mpsc::unbounded_channel();
        let (registered_tx, registered_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        if let Err(err) = spawn_watcher(updates, registered_tx, stop_rx) {
            let err = DeviceError::Spawn(err);
            error!(target: targets::DEVICE, error = %err, "Interface watch unavailable, reporting disconnected");
            return stream::once(ready(Status::Disconnected)).boxed();
        }

        watch_stream(registered_rx, receiver, stop_tx)
    }
}

/// Register an interface watch on its own thread.
///
/// Once registered, the thread reports the current status through
/// `registered` and keeps the watch alive until every sender for `stop` is
/// dropped.
fn spawn_watcher(
    updates: mpsc::UnboundedSender<Status>,
    registered: oneshot::Sender<Result<Status>>,
    stop: std_mpsc::Receiver<()>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("connectivity-watch".into())
        .spawn(move || {
            let watch = netwatcher::watch_interfaces(move |_update| {
                let status = DeviceProvider::current_status();
                trace!(target: targets::DEVICE, %status, "Interfaces changed");
                let _ = updates.send(status);
            });

            match watch {
                Ok(handle) => {
                    let _ = registered.send(Ok(DeviceProvider::current_status()));
                    let _ = stop.recv();
                    drop(handle);
                    debug!(target: targets::DEVICE, "Interface watch deregistered");
                }
                Err(err) => {
                    let _ = registered.send(Err(DeviceError::Watch(err.to_string())));
                }
            }
        })?;
    Ok(())
}

/// Wait for the watch registration without blocking the runtime, then yield
/// the initial status and every change after it.
///
/// A failed registration yields a single [`Status::Disconnected`].
fn watch_stream<G>(
    registered: oneshot::Receiver<Result<Status>>,
    updates: mpsc::UnboundedReceiver<Status>,
    guard: G,
) -> StatusStream
where
    G: Send + 'static,
{
    stream! {
        let registration = registered
            .await
            .unwrap_or(Err(DeviceError::WatcherExited));

        match registration {
            Ok(initial) => {
                debug!(target: targets::DEVICE, status = %initial, "Interface watch registered");
                let mut changes = status_changes(initial, updates, guard);
                while let Some(status) = changes.next().await {
                    yield status;
                }
            }
            Err(err) => {
                error!(target: targets::DEVICE, error = %err, "Interface watch unavailable, reporting disconnected");
                yield Status::Disconnected;
            }
        }
    }
    .boxed()
}

/// Yield `initial`, then every value from `updates` that differs from the
/// previous one. `guard` is kept alive for as long as the stream.
fn status_changes<G>(initial: Status, updates: mpsc::UnboundedReceiver<Status>, guard: G) -> StatusStream
where
    G: Send + 'static,
{
    let mut last = initial;
    let changes = UnboundedReceiverStream::new(updates).filter(move |status| {
        let changed = *status != last;
        last = *status;
        ready(changed)
    });

    stream::once(ready(initial))
        .chain(changes)
        .map(move |status| {
            let _watch = &guard;
            status
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn iface(name: &str, interface_type: InterfaceType, up: bool, addressed: bool) -> NetworkInterface {
        NetworkInterface {
            name: name.into(),
            description: String::new(),
            ipv4_addresses: if addressed {
                vec![Ipv4Addr::new(10, 0, 0, 2)]
            } else {
                Vec::new()
            },
            ipv6_addresses: Vec::new(),
            interface_type,
            is_up: up,
            index: 1,
        }
    }

    #[test]
    fn test_no_interfaces_is_disconnected() {
        assert_eq!(status_from_interfaces(&[], None), Status::Disconnected);
    }

    #[test]
    fn test_loopback_only_is_disconnected() {
        let interfaces = [iface("lo", InterfaceType::Loopback, true, true)];
        assert_eq!(status_from_interfaces(&interfaces, None), Status::Disconnected);
    }

    #[test]
    fn test_down_or_unaddressed_is_disconnected() {
        let interfaces = [
            iface("eth0", InterfaceType::Ethernet, false, true),
            iface("wlan0", InterfaceType::WiFi, true, false),
        ];
        assert_eq!(status_from_interfaces(&interfaces, None), Status::Disconnected);
    }

    #[test]
    fn test_virtual_only_is_disconnected() {
        let interfaces = [iface("docker0", InterfaceType::Virtual, true, true)];
        assert_eq!(status_from_interfaces(&interfaces, None), Status::Disconnected);
    }

    #[test]
    fn test_wifi_default_is_unmetered() {
        let wifi = iface("wlan0", InterfaceType::WiFi, true, true);
        let cell = iface("wwan0", InterfaceType::Cellular, true, true);
        let interfaces = [wifi.clone(), cell];
        assert_eq!(
            status_from_interfaces(&interfaces, Some(&wifi)),
            Status::Connected { metered: false }
        );
    }

    #[test]
    fn test_cellular_default_is_metered() {
        let wifi = iface("wlan0", InterfaceType::WiFi, true, true);
        let cell = iface("wwan0", InterfaceType::Cellular, true, true);
        let interfaces = [wifi, cell.clone()];
        assert_eq!(
            status_from_interfaces(&interfaces, Some(&cell)),
            Status::Connected { metered: true }
        );
    }

    #[test]
    fn test_without_default_route_metered_only_if_all_cellular() {
        let cell = iface("rmnet0", InterfaceType::Cellular, true, true);
        let eth = iface("eth0", InterfaceType::Ethernet, true, true);

        assert_eq!(
            status_from_interfaces(&[cell.clone()], None),
            Status::Connected { metered: true }
        );
        assert_eq!(
            status_from_interfaces(&[cell, eth], None),
            Status::Connected { metered: false }
        );
    }

    #[test]
    fn test_unusable_default_falls_back_to_scan() {
        let stale = iface("eth0", InterfaceType::Ethernet, false, true);
        let cell = iface("wwan0", InterfaceType::Cellular, true, true);
        assert_eq!(
            status_from_interfaces(&[stale.clone(), cell], Some(&stale)),
            Status::Connected { metered: true }
        );
    }

    #[tokio::test]
    async fn test_registration_is_awaited_on_the_runtime() {
        let (registered_tx, registered_rx) = oneshot::channel();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut statuses = watch_stream(registered_rx, rx, ());

        // Registration completes on another task of this single-threaded
        // runtime, so waiting for it must not block the thread.
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            let _ = registered_tx.send(Ok(Status::Connected { metered: true }));
        });

        assert_eq!(statuses.next().await, Some(Status::Connected { metered: true }));
        tx.send(Status::Disconnected).unwrap();
        assert_eq!(statuses.next().await, Some(Status::Disconnected));
    }

    #[tokio::test]
    async fn test_failed_registration_reports_disconnected_once() {
        let (registered_tx, registered_rx) = oneshot::channel();
        let (_tx, rx) = mpsc::unbounded_channel();
        registered_tx
            .send(Err(DeviceError::Watch("permission denied".into())))
            .unwrap();

        let statuses: Vec<Status> = watch_stream(registered_rx, rx, ()).collect().await;
        assert_eq!(statuses, vec![Status::Disconnected]);
    }

    #[tokio::test]
    async fn test_exited_watcher_reports_disconnected() {
        let (registered_tx, registered_rx) = oneshot::channel::<Result<Status>>();
        let (_tx, rx) = mpsc::unbounded_channel();
        drop(registered_tx);

        let statuses: Vec<Status> = watch_stream(registered_rx, rx, ()).collect().await;
        assert_eq!(statuses, vec![Status::Disconnected]);
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_changes_skip_duplicates() {
        let (tx, rx) = mpsc::unbounded_channel();
        let dropped = Arc::new(AtomicBool::new(false));
        let mut statuses = status_changes(
            Status::Connected { metered: false },
            rx,
            DropFlag(Arc::clone(&dropped)),
        );

        tx.send(Status::Connected { metered: false }).unwrap();
        tx.send(Status::Disconnected).unwrap();
        tx.send(Status::Disconnected).unwrap();
        tx.send(Status::Connected { metered: true }).unwrap();
        drop(tx);

        let received: Vec<Status> = statuses.by_ref().collect().await;
        assert_eq!(
            received,
            vec![
                Status::Connected { metered: false },
                Status::Disconnected,
                Status::Connected { metered: true },
            ]
        );

        assert!(!dropped.load(Ordering::SeqCst));
        drop(statuses);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
