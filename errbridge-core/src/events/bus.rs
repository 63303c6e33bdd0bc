//! Synchronous in-process event bus.
//!
//! Listeners run on the emitting thread, in subscription order. The listener
//! table is copied out of the lock before dispatch so a listener may
//! subscribe or unsubscribe without deadlocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;

use super::{EventKind, HostEvent, HostEventBus, Listener, SubscriptionId};

#[derive(Default)]
pub struct LocalEventBus {
    listeners: RwLock<HashMap<EventKind, Vec<(SubscriptionId, Listener)>>>,
    next_id: AtomicU64,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches `event` to every listener of its kind; returns how many ran.
    pub fn emit(&self, event: &HostEvent) -> usize {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .get(&event.kind())
            .map(|entries| entries.iter().map(|(_, l)| Listener::clone(l)).collect())
            .unwrap_or_default();

        trace!(kind = ?event.kind(), listeners = listeners.len(), "dispatching host event");
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        for entries in listeners.values_mut() {
            if let Some(pos) = entries.iter().position(|(entry, _)| *entry == id) {
                entries.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.read().get(&kind).map_or(0, Vec::len)
    }
}

impl HostEventBus for LocalEventBus {
    fn subscribe(&self, kind: EventKind, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::ReportableError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counter(bus: &LocalEventBus, kind: EventKind) -> (SubscriptionId, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let id = bus.subscribe(
            kind,
            Arc::new(move |_: &HostEvent| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (id, hits)
    }

    #[test]
    fn dispatches_only_to_matching_kind() {
        let bus = LocalEventBus::new();
        let (_, exceptions) = counter(&bus, EventKind::Exception);
        let (_, jobs) = counter(&bus, EventKind::JobError);

        let ran = bus.emit(&HostEvent::exception(ReportableError::from_message("boom")));
        assert_eq!(ran, 1);
        assert_eq!(exceptions.load(Ordering::SeqCst), 1);
        assert_eq!(jobs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_removes_listener() {
        let bus = LocalEventBus::new();
        let (id, hits) = counter(&bus, EventKind::Exception);
        assert_eq!(bus.listener_count(EventKind::Exception), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&HostEvent::exception(ReportableError::from_message("boom")));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn listener_may_subscribe_during_dispatch() {
        let bus = Arc::new(LocalEventBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe(
            EventKind::Exception,
            Arc::new(move |_: &HostEvent| {
                inner.subscribe(EventKind::JobError, Arc::new(|_: &HostEvent| {}));
            }),
        );

        bus.emit(&HostEvent::exception(ReportableError::from_message("boom")));
        assert_eq!(bus.listener_count(EventKind::JobError), 1);
    }
}
