//! Per-kind subscriber registry and fault-isolated dispatch.
//!
//! Subscribers are kept in registration order per event kind. Dispatch works
//! on a snapshot of the matching list, so callbacks run without holding the
//! watcher lock and registry edits made by a callback apply from the next
//! event onward.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

use crate::event::{MouseEvent, MouseEventKind};

/// Handle identifying one subscription, returned by
/// [`subscribe`](crate::watcher::MouseWatcher::subscribe).
pub type SubscriptionId = u64;

pub(crate) type Subscriber = Box<dyn FnMut(MouseEvent) + Send>;

/// Shared slot for one callback. Dispatch clones these out of the registry
/// and locks each one only for the duration of its call.
pub(crate) type SubscriberSlot = Arc<Mutex<Subscriber>>;

struct SubscriberEntry {
    id: SubscriptionId,
    slot: SubscriberSlot,
}

/// Registry mapping each published kind to its ordered subscriber list.
pub(crate) struct EventFanout {
    next_id: SubscriptionId,
    subscribers: HashMap<MouseEventKind, Vec<SubscriberEntry>>,
}

impl EventFanout {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: HashMap::new(),
        }
    }

    /// Registers a callback for one kind and returns its handle.
    pub(crate) fn add(
        &mut self,
        kind: MouseEventKind,
        callback: impl FnMut(MouseEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.entry(kind).or_default().push(SubscriberEntry {
            id,
            slot: Arc::new(Mutex::new(Box::new(callback))),
        });
        id
    }

    /// Unregisters a callback. Unknown handles are ignored.
    pub(crate) fn remove(&mut self, kind: MouseEventKind, id: SubscriptionId) {
        if let Some(entries) = self.subscribers.get_mut(&kind) {
            entries.retain(|entry| entry.id != id);
        }
    }

    /// Clones out the slots registered for `kind`, in registration order.
    pub(crate) fn snapshot(&self, kind: MouseEventKind) -> Vec<SubscriberSlot> {
        self.subscribers
            .get(&kind)
            .map(|entries| entries.iter().map(|entry| Arc::clone(&entry.slot)).collect())
            .unwrap_or_default()
    }
}

/// Invokes every snapshotted callback with `event`, in order.
///
/// A panicking callback is caught and logged; the remaining callbacks still
/// run and the panic never crosses back into the delivery thread.
pub(crate) fn dispatch(slots: &[SubscriberSlot], event: MouseEvent) {
    for slot in slots {
        let mut callback = slot.lock();
        let outcome = catch_unwind(AssertUnwindSafe(|| (*callback)(event)));
        if let Err(payload) = outcome {
            error!(
                kind = %event.kind,
                panic = panic_text(payload.as_ref()),
                "mouse subscriber panicked, skipping it for this event"
            );
        }
    }
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseEventKind as K;

    fn ev(kind: K) -> MouseEvent {
        MouseEvent { kind, x: 10, y: 20 }
    }

    fn recording(
        log: &Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl FnMut(MouseEvent) + Send + 'static {
        let log = Arc::clone(log);
        move |_| log.lock().push(tag)
    }

    #[test]
    fn delivers_in_registration_order() {
        let mut fanout = EventFanout::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            fanout.add(K::Move, recording(&log, tag));
        }

        dispatch(&fanout.snapshot(K::Move), ev(K::Move));
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn only_the_matching_kind_is_snapshotted() {
        let mut fanout = EventFanout::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        fanout.add(K::Move, recording(&log, "move"));
        fanout.add(K::LeftDrag, recording(&log, "drag"));

        dispatch(&fanout.snapshot(K::LeftDrag), ev(K::LeftDrag));
        assert_eq!(*log.lock(), vec!["drag"]);
        assert!(fanout.snapshot(K::RightUp).is_empty());
    }

    #[test]
    fn remove_drops_exactly_the_named_subscription() {
        let mut fanout = EventFanout::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = fanout.add(K::LeftDown, recording(&log, "first"));
        let _second = fanout.add(K::LeftDown, recording(&log, "second"));

        fanout.remove(K::LeftDown, first);
        dispatch(&fanout.snapshot(K::LeftDown), ev(K::LeftDown));
        assert_eq!(*log.lock(), vec!["second"]);

        // Unknown handle and wrong kind are both no-ops.
        fanout.remove(K::LeftDown, 999);
        fanout.remove(K::RightUp, first);
        dispatch(&fanout.snapshot(K::LeftDown), ev(K::LeftDown));
        assert_eq!(*log.lock(), vec!["second", "second"]);
    }

    #[test]
    fn ids_stay_unique_across_kinds() {
        let mut fanout = EventFanout::new();
        let a = fanout.add(K::Move, |_| {});
        let b = fanout.add(K::LeftDrag, |_| {});
        let c = fanout.add(K::Move, |_| {});
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn a_panicking_subscriber_does_not_block_the_others() {
        let mut fanout = EventFanout::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        fanout.add(K::Move, recording(&log, "before"));
        fanout.add(K::Move, |_| panic!("boom"));
        fanout.add(K::Move, recording(&log, "after"));

        // Silence the default panic hook for the expected panic.
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));
        dispatch(&fanout.snapshot(K::Move), ev(K::Move));
        dispatch(&fanout.snapshot(K::Move), ev(K::Move));
        std::panic::set_hook(hook);

        assert_eq!(*log.lock(), vec!["before", "after", "before", "after"]);
    }

    #[test]
    fn snapshot_taken_before_dispatch_is_not_affected_by_edits() {
        let mut fanout = EventFanout::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = fanout.add(K::Move, recording(&log, "a"));
        fanout.add(K::Move, recording(&log, "b"));

        let snap = fanout.snapshot(K::Move);
        fanout.remove(K::Move, a);
        dispatch(&snap, ev(K::Move));
        assert_eq!(*log.lock(), vec!["a", "b"]);

        dispatch(&fanout.snapshot(K::Move), ev(K::Move));
        assert_eq!(*log.lock(), vec!["a", "b", "b"]);
    }
}
