//! Hand-driven mouse source for demos, replays and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::event::{RawMouseEvent, RawMouseKind};
use crate::source::{MouseSource, RawEventSink};

/// A mouse source driven by calls instead of hardware.
///
/// Cloneable: keep one handle for feeding events and hand
/// [`opener`](VirtualMouse::opener) to
/// [`MouseWatcher::with_source`](crate::MouseWatcher::with_source). Every
/// clone shares the same underlying source.
///
/// Feeding is synchronous: `feed` returns after the watcher has translated
/// the event and every matching subscriber has run.
#[derive(Clone)]
pub struct VirtualMouse {
    core: Arc<VirtualCore>,
}

struct VirtualCore {
    sink: Mutex<Option<RawEventSink>>,
    destroyed: AtomicBool,
    referenced: AtomicBool,
    destroy_calls: AtomicUsize,
}

impl VirtualMouse {
    pub fn new() -> Self {
        Self {
            core: Arc::new(VirtualCore {
                sink: Mutex::new(None),
                destroyed: AtomicBool::new(false),
                // Sources start referenced.
                referenced: AtomicBool::new(true),
                destroy_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// One-shot opener wiring this source to a watcher.
    pub fn opener(
        &self,
    ) -> impl FnOnce(RawEventSink) -> Result<Box<dyn MouseSource>> + Send + 'static {
        let handle = self.clone();
        move |sink| {
            handle.attach(sink);
            Ok(Box::new(handle) as Box<dyn MouseSource>)
        }
    }

    /// Connects the sink events get fed into. Usually done by
    /// [`opener`](Self::opener).
    pub fn attach(&self, sink: RawEventSink) {
        *self.core.sink.lock() = Some(sink);
    }

    /// Pushes one raw event through the attached sink. Silently does nothing
    /// while unattached or after destroy.
    pub fn feed(&self, kind: RawMouseKind, x: i32, y: i32) {
        if self.core.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let mut sink = self.core.sink.lock();
        // Re-check: destroy may have landed while we waited for the lock.
        if self.core.destroyed.load(Ordering::SeqCst) {
            return;
        }
        if let Some(sink) = sink.as_mut() {
            sink(RawMouseEvent::new(kind, x, y));
        }
    }

    pub fn move_to(&self, x: i32, y: i32) {
        self.feed(RawMouseKind::Move, x, y);
    }

    pub fn press_left(&self, x: i32, y: i32) {
        self.feed(RawMouseKind::LeftDown, x, y);
    }

    pub fn release_left(&self, x: i32, y: i32) {
        self.feed(RawMouseKind::LeftUp, x, y);
    }

    pub fn press_right(&self, x: i32, y: i32) {
        self.feed(RawMouseKind::RightDown, x, y);
    }

    pub fn release_right(&self, x: i32, y: i32) {
        self.feed(RawMouseKind::RightUp, x, y);
    }

    /// Whether a sink is currently connected.
    pub fn is_attached(&self) -> bool {
        self.core.sink.lock().is_some()
    }

    /// Whether `destroy` has been observed.
    pub fn is_destroyed(&self) -> bool {
        self.core.destroyed.load(Ordering::SeqCst)
    }

    /// Current advisory keep-alive mark.
    pub fn is_referenced(&self) -> bool {
        self.core.referenced.load(Ordering::SeqCst)
    }

    /// Number of `destroy` calls observed so far.
    pub fn destroy_count(&self) -> usize {
        self.core.destroy_calls.load(Ordering::SeqCst)
    }
}

impl Default for VirtualMouse {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseSource for VirtualMouse {
    fn ref_(&self) {
        self.core.referenced.store(true, Ordering::SeqCst);
    }

    fn unref(&self) {
        self.core.referenced.store(false, Ordering::SeqCst);
    }

    fn destroy(&mut self) {
        self.core.destroy_calls.fetch_add(1, Ordering::SeqCst);
        self.core.destroyed.store(true, Ordering::SeqCst);
        // try_lock, not lock: destroy may be called from inside a callback
        // that a feed on this same source is currently driving. The flag
        // already stops delivery either way.
        if let Some(mut sink) = self.core.sink.try_lock() {
            sink.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn collecting_sink() -> (RawEventSink, mpsc::Receiver<RawMouseEvent>) {
        let (tx, rx) = mpsc::channel();
        let sink: RawEventSink = Box::new(move |ev| {
            let _ = tx.send(ev);
        });
        (sink, rx)
    }

    #[test]
    fn feeding_while_unattached_does_nothing() {
        let mouse = VirtualMouse::new();
        mouse.move_to(1, 2);
        mouse.press_left(1, 2);
        assert!(!mouse.is_attached());
    }

    #[test]
    fn feeds_reach_the_attached_sink_in_order() {
        let mouse = VirtualMouse::new();
        let (sink, rx) = collecting_sink();
        mouse.attach(sink);

        mouse.press_left(5, 6);
        mouse.move_to(7, 8);
        mouse.release_left(7, 8);

        assert_eq!(rx.try_recv().unwrap(), RawMouseEvent::new(RawMouseKind::LeftDown, 5, 6));
        assert_eq!(rx.try_recv().unwrap(), RawMouseEvent::new(RawMouseKind::Move, 7, 8));
        assert_eq!(rx.try_recv().unwrap(), RawMouseEvent::new(RawMouseKind::LeftUp, 7, 8));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn destroy_detaches_and_stops_delivery() {
        let mut mouse = VirtualMouse::new();
        let (sink, rx) = collecting_sink();
        mouse.attach(sink);

        mouse.move_to(1, 1);
        mouse.destroy();
        mouse.move_to(2, 2);

        assert!(mouse.is_destroyed());
        assert!(!mouse.is_attached());
        assert_eq!(rx.try_recv().unwrap().x, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn destroy_calls_are_counted_and_idempotent() {
        let mut mouse = VirtualMouse::new();
        mouse.destroy();
        mouse.destroy();
        assert_eq!(mouse.destroy_count(), 2);
        assert!(mouse.is_destroyed());
    }

    #[test]
    fn ref_marks_are_advisory_and_flip() {
        let mouse = VirtualMouse::new();
        assert!(mouse.is_referenced());
        mouse.unref();
        assert!(!mouse.is_referenced());
        mouse.ref_();
        assert!(mouse.is_referenced());
    }

    #[test]
    fn clones_share_one_source() {
        let mouse = VirtualMouse::new();
        let mut clone = mouse.clone();
        let (sink, rx) = collecting_sink();
        mouse.attach(sink);

        clone.feed(RawMouseKind::RightDown, 3, 4);
        assert_eq!(rx.try_recv().unwrap().kind, RawMouseKind::RightDown);

        clone.destroy();
        assert!(mouse.is_destroyed());
    }
}
