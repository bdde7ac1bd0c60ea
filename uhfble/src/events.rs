//! Event delivery to the application
//!
//! Observers subscribe to a [`Reader`](crate::Reader) and are called from
//! its notification task, one event at a time, in delivery order. Any
//! number of observers may be registered; each registration is undone
//! with the [`SubscriptionId`] it returned.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use uhfble_types::{ConnectionStatus, PowerLevel, TagReading};

/// Events emitted by the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A tag was read
    TagRead(TagReading),

    /// Connection status changed
    StatusChanged(ConnectionStatus),

    /// The reader answered a power query
    PowerReported(PowerLevel),
}

impl fmt::Display for ReaderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagRead(tag) => write!(f, "{}", tag),
            Self::StatusChanged(status) => write!(f, "Status[{}]", status),
            Self::PowerReported(level) => write!(f, "Power[{}]", level),
        }
    }
}

/// Observer trait for receiving reader events.
///
/// Implement this trait in your UI layer to receive updates. Every method
/// defaults to doing nothing.
pub trait ReaderObserver: Send + Sync {
    /// Called once per tag report
    fn on_tag_read(&self, _tag: &TagReading) {}

    /// Called on every connection status transition
    fn on_status_change(&self, _status: ConnectionStatus) {}

    /// Called when a power query is answered
    fn on_power_report(&self, _level: PowerLevel) {}
}

/// Observer that logs events using tracing.
pub struct TracingObserver;

impl ReaderObserver for TracingObserver {
    fn on_tag_read(&self, tag: &TagReading) {
        tracing::info!(epc = %tag.epc, pc = %tag.pc, rssi = tag.rssi, "Tag read");
    }

    fn on_status_change(&self, status: ConnectionStatus) {
        match status {
            ConnectionStatus::Error => tracing::warn!(status = %status, "Status changed"),
            _ => tracing::info!(status = %status, "Status changed"),
        }
    }

    fn on_power_report(&self, level: PowerLevel) {
        tracing::info!(level = %level, "Power reported");
    }
}

/// Observer forwarding every event into an unbounded channel
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ReaderEvent>,
}

impl ChannelObserver {
    /// Create the observer and its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: ReaderEvent) {
        // receiver gone: the subscriber lost interest
        let _ = self.tx.send(event);
    }
}

impl ReaderObserver for ChannelObserver {
    fn on_tag_read(&self, tag: &TagReading) {
        self.forward(ReaderEvent::TagRead(tag.clone()));
    }

    fn on_status_change(&self, status: ConnectionStatus) {
        self.forward(ReaderEvent::StatusChanged(status));
    }

    fn on_power_report(&self, level: PowerLevel) {
        self.forward(ReaderEvent::PowerReported(level));
    }
}

/// Handle identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Registry = Vec<(SubscriptionId, Arc<dyn ReaderObserver>)>;

/// Registered observers, shared with the notification task
#[derive(Clone, Default)]
pub(crate) struct Observers {
    registry: Arc<RwLock<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl Observers {
    pub(crate) fn subscribe(&self, observer: Arc<dyn ReaderObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry.write().push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write();
        let before = registry.len();
        registry.retain(|(existing, _)| *existing != id);
        registry.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Copy the list so observers may (un)subscribe from a callback
    fn snapshot(&self) -> Vec<Arc<dyn ReaderObserver>> {
        self.registry.read().iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    pub(crate) fn tag_read(&self, tag: &TagReading) {
        for observer in self.snapshot() {
            observer.on_tag_read(tag);
        }
    }

    pub(crate) fn status_changed(&self, status: ConnectionStatus) {
        for observer in self.snapshot() {
            observer.on_status_change(status);
        }
    }

    pub(crate) fn power_reported(&self, level: PowerLevel) {
        for observer in self.snapshot() {
            observer.on_power_report(level);
        }
    }
}
