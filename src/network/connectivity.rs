//! Network reachability monitoring.
//!
//! A [`ReachabilitySource`] is the platform seam: it answers point-in-time
//! queries and pushes state changes to registered callbacks. The monitor
//! turns a registration into a deduplicated [`ConnectivityStream`] that
//! deregisters itself when dropped.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::Duration;

use futures_core::Stream;
use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ConnectivityConfig;

/// Callback receiving `true` when the network is reachable.
///
/// Callbacks run under the registry lock and must not (un)register.
pub type ReachabilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle identifying one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Platform reachability provider.
///
/// Implementations must deliver the current state to a newly registered
/// callback as soon as it is known, then call it on every transition.
pub trait ReachabilitySource: Send + Sync {
    /// Point-in-time answer. Must not block.
    fn is_reachable(&self) -> bool;

    /// Fresh check, which may perform I/O.
    fn check(&self) -> BoxFuture<'static, bool> {
        future::ready(self.is_reachable()).boxed()
    }

    fn register(&self, callback: ReachabilityCallback) -> CallbackId;

    fn unregister(&self, id: CallbackId);
}

struct Registered {
    state: Option<bool>,
    callbacks: HashMap<CallbackId, ReachabilityCallback>,
}

/// Callbacks plus the last published state, updated under one lock so a new
/// registration can never observe a state older than the next notification.
struct CallbackRegistry {
    next_id: AtomicU64,
    inner: Mutex<Registered>,
}

impl CallbackRegistry {
    fn new(state: Option<bool>) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            inner: Mutex::new(Registered {
                state,
                callbacks: HashMap::new(),
            }),
        }
    }

    /// Register `callback` and hand it the current state, if known.
    fn add(&self, callback: ReachabilityCallback) -> CallbackId {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut inner = self.inner.lock();
        if let Some(state) = inner.state {
            callback(state);
        }
        inner.callbacks.insert(id, callback);
        id
    }

    /// Returns the number of callbacks left.
    fn remove(&self, id: CallbackId) -> usize {
        let mut inner = self.inner.lock();
        inner.callbacks.remove(&id);
        inner.callbacks.len()
    }

    fn len(&self) -> usize {
        self.inner.lock().callbacks.len()
    }

    fn state(&self) -> Option<bool> {
        self.inner.lock().state
    }

    fn reset(&self) {
        self.inner.lock().state = None;
    }

    /// Record `reachable` and notify every callback, repeats included.
    fn publish(&self, reachable: bool) {
        let mut inner = self.inner.lock();
        inner.state = Some(reachable);
        for callback in inner.callbacks.values() {
            callback(reachable);
        }
    }

    /// Record `reachable`, notifying only when it differs from the last
    /// state. Returns whether it did.
    fn update(&self, reachable: bool) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.replace(reachable) == Some(reachable) {
            return false;
        }
        for callback in inner.callbacks.values() {
            callback(reachable);
        }
        true
    }
}

/// Reachability pushed in by the embedding application.
///
/// Hosts that receive OS network callbacks forward them through
/// [`HostReachability::set_reachable`]. Every call is forwarded, including
/// repeats; deduplication happens in [`ConnectivityStream`].
pub struct HostReachability {
    registry: CallbackRegistry,
}

impl HostReachability {
    pub fn new(reachable: bool) -> Self {
        Self {
            registry: CallbackRegistry::new(Some(reachable)),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.registry.publish(reachable);
    }

    /// Number of live registrations.
    pub fn callback_count(&self) -> usize {
        self.registry.len()
    }
}

impl ReachabilitySource for HostReachability {
    fn is_reachable(&self) -> bool {
        self.registry.state().unwrap_or(false)
    }

    fn register(&self, callback: ReachabilityCallback) -> CallbackId {
        self.registry.add(callback)
    }

    fn unregister(&self, id: CallbackId) {
        self.registry.remove(id);
    }
}

/// Reachability determined by periodically opening a TCP connection.
///
/// A background task runs only while at least one callback is registered.
pub struct ProbeReachability {
    inner: Arc<ProbeInner>,
}

struct ProbeInner {
    host: String,
    port: u16,
    interval: Duration,
    timeout: Duration,
    registry: CallbackRegistry,
    /// Also serializes registration against poller start/stop.
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl ProbeReachability {
    pub fn new(config: &ConnectivityConfig) -> Self {
        Self {
            inner: Arc::new(ProbeInner {
                host: config.probe_host.clone(),
                port: config.probe_port,
                interval: config.poll_interval(),
                timeout: config.probe_timeout(),
                registry: CallbackRegistry::new(None),
                poller: Mutex::new(None),
            }),
        }
    }

    fn start_poller(&self, poller: &mut Option<JoinHandle<()>>) {
        if poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, connectivity changes will not be observed");
            return;
        };
        let inner = Arc::clone(&self.inner);
        *poller = Some(handle.spawn(async move { inner.poll_loop().await }));
        tracing::debug!(host = %self.inner.host, port = self.inner.port, "Connectivity poller started");
    }

    fn stop_poller(&self, poller: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = poller.take() {
            handle.abort();
            self.inner.registry.reset();
            tracing::debug!("Connectivity poller stopped");
        }
    }
}

impl ProbeInner {
    async fn poll_loop(&self) {
        loop {
            let reachable = self.probe().await;
            if self.registry.update(reachable) {
                tracing::info!(reachable, "Connectivity changed");
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Resolution and connect together are bounded by the probe timeout.
    async fn probe(&self) -> bool {
        let connect = tokio::net::TcpStream::connect((self.host.as_str(), self.port));
        matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)))
    }
}

impl ReachabilitySource for ProbeReachability {
    /// The last probe result. Before any probe has completed the network is
    /// assumed reachable; the first poll corrects it.
    fn is_reachable(&self) -> bool {
        self.inner.registry.state().unwrap_or(true)
    }

    fn check(&self) -> BoxFuture<'static, bool> {
        let inner = Arc::clone(&self.inner);
        async move {
            let reachable = inner.probe().await;
            inner.registry.update(reachable);
            reachable
        }
        .boxed()
    }

    fn register(&self, callback: ReachabilityCallback) -> CallbackId {
        let mut poller = self.inner.poller.lock();
        let id = self.inner.registry.add(callback);
        self.start_poller(&mut poller);
        id
    }

    fn unregister(&self, id: CallbackId) {
        let mut poller = self.inner.poller.lock();
        if self.inner.registry.remove(id) == 0 {
            self.stop_poller(&mut poller);
        }
    }
}

impl Drop for ProbeReachability {
    fn drop(&mut self) {
        let mut poller = self.inner.poller.lock();
        self.stop_poller(&mut poller);
    }
}

/// Connectivity facade used by view models and the CLI.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    source: Arc<dyn ReachabilitySource>,
}

impl ConnectivityMonitor {
    pub fn new(source: Arc<dyn ReachabilitySource>) -> Self {
        Self { source }
    }

    /// Monitor backed by TCP probes against the configured host.
    pub fn probing(config: &ConnectivityConfig) -> Self {
        Self::new(Arc::new(ProbeReachability::new(config)))
    }

    /// Last known state; never blocks.
    pub fn is_currently_connected(&self) -> bool {
        self.source.is_reachable()
    }

    /// Run a fresh reachability check.
    pub async fn check_connectivity(&self) -> bool {
        self.source.check().await
    }


    /// Subscribe to reachability changes.
    ///
    /// The stream yields the current state first, then each transition,
    /// never the same value twice in a row. Dropping it deregisters the
    /// underlying callback.
    pub fn observe_connectivity(&self) -> ConnectivityStream {
        ConnectivityStream::new(Arc::clone(&self.source))
    }
}

/// Deduplicated stream of reachability states.
pub struct ConnectivityStream {
    source: Arc<dyn ReachabilitySource>,
    id: CallbackId,
    rx: mpsc::UnboundedReceiver<bool>,
    last: Option<bool>,
}

impl ConnectivityStream {
    fn new(source: Arc<dyn ReachabilitySource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = source.register(Arc::new(move |reachable| {
            let _ = tx.send(reachable);
        }));
        tracing::trace!(id = id.0, "Connectivity callback registered");
        Self {
            source,
            id,
            rx,
            last: None,
        }
    }
}

impl Stream for ConnectivityStream {
    type Item = bool;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        loop {
            match ready!(self.rx.poll_recv(cx)) {
                Some(reachable) if self.last == Some(reachable) => continue,
                Some(reachable) => {
                    self.last = Some(reachable);
                    return Poll::Ready(Some(reachable));
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for ConnectivityStream {
    fn drop(&mut self) {
        self.source.unregister(self.id);
        tracing::trace!(id = self.id.0, "Connectivity callback unregistered");
    }
}
