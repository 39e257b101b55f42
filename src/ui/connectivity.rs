use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::network::{ApiError, ConnectivityMonitor};

/// Connectivity state shared by view models.
///
/// Seeded with a point-in-time check, then kept current from
/// [`ConnectivityMonitor::observe_connectivity`]. Dropping the tracker stops
/// the forwarding task, which drops the stream and deregisters its callback.
pub struct ConnectivityTracker {
    monitor: ConnectivityMonitor,
    connected: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl ConnectivityTracker {
    /// Must be called within a Tokio runtime.
    pub fn new(monitor: ConnectivityMonitor) -> Self {
        let (tx, connected) = watch::channel(monitor.is_currently_connected());
        let mut changes = monitor.observe_connectivity();
        let task = tokio::spawn(async move {
            while let Some(reachable) = changes.next().await {
                tx.send_if_modified(|current| {
                    let changed = *current != reachable;
                    *current = reachable;
                    changed
                });
            }
        });

        Self {
            monitor,
            connected,
            task,
        }
    }

    /// Last state observed from the stream.
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Fresh point-in-time check against the monitor.
    pub fn is_network_available(&self) -> bool {
        self.monitor.is_currently_connected()
    }

    /// NETWORK and TIMEOUT errors are worth a connectivity retry prompt.
    pub fn is_network_error(&self, error: &ApiError) -> bool {
        error.kind.is_connectivity()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }
}

impl Drop for ConnectivityTracker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
