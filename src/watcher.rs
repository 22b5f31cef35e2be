//! The mouse watcher: translation, fan-out and source lifecycle.
//!
//! [`MouseWatcher`] sits between one raw input source and any number of
//! subscribers. It owns the button state, reclassifies moves into drags, and
//! fans each published event out to the callbacks registered for its kind.
//!
//! # Lifecycle
//! - The source is opened lazily, on the **first** `subscribe` call ever made
//!   on the instance. Construction does nothing observable.
//! - Activation is attempted at most once. If the opener fails, the error goes
//!   to that first caller, the callback is not registered, and the watcher
//!   stays source-less for good.
//! - `destroy` permanently stops the source. It is idempotent, safe from any
//!   state (including from inside a subscriber callback) and also runs on
//!   drop. A destroyed watcher still accepts `subscribe`/`unsubscribe`, but
//!   nothing fires again.
//!
//! # Threading
//! All methods take `&self`; internal state sits behind one lock. Callbacks
//! are invoked on the source's delivery thread, outside that lock, so they
//! may freely call back into the watcher.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::backends;
use crate::error::Result;
use crate::event::{MouseEvent, MouseEventKind, RawMouseEvent};
use crate::fanout::{self, EventFanout, SubscriptionId};
use crate::source::{MouseSource, RawEventSink, SourceOpener};
use crate::state::ButtonState;

/// Where the watcher stands with its raw source.
enum SourceState {
    /// Never activated. The next subscribe spends the opener.
    Idle,
    /// Live source attached, events flowing.
    Active(Box<dyn MouseSource>),
    /// The single activation attempt failed. Terminal.
    Failed,
    /// Torn down. Terminal.
    Destroyed,
}

struct Shared {
    buttons: ButtonState,
    fanout: EventFanout,
    source: SourceState,
}

struct WatcherInner {
    shared: Mutex<Shared>,
    /// Taken exactly once, by whichever subscribe call activates. Also
    /// serializes racing first subscribers so only one runs the opener.
    opener: Mutex<Option<SourceOpener>>,
}

impl WatcherInner {
    /// Sink target. Runs on the source's delivery thread, once per raw event.
    fn deliver(inner: &Arc<WatcherInner>, raw: RawMouseEvent) {
        let (event, slots) = {
            let mut shared = inner.shared.lock();
            if matches!(shared.source, SourceState::Destroyed) {
                // Stragglers already in flight when destroy ran.
                return;
            }
            let kind = shared.buttons.translate(raw.kind);
            let event = MouseEvent {
                kind,
                x: raw.x,
                y: raw.y,
            };
            (event, shared.fanout.snapshot(kind))
        };
        fanout::dispatch(&slots, event);
    }
}

/// Global mouse listener with drag detection.
///
/// ```no_run
/// use mousewatch::{MouseEventKind, MouseWatcher};
///
/// let watcher = MouseWatcher::new();
/// watcher.subscribe(MouseEventKind::LeftDrag, |ev| {
///     println!("dragging at ({}, {})", ev.x, ev.y);
/// })?;
/// # Ok::<(), mousewatch::Error>(())
/// ```
pub struct MouseWatcher {
    inner: Arc<WatcherInner>,
}

impl MouseWatcher {
    /// Watcher over the platform's global mouse source.
    ///
    /// Nothing is hooked yet; the OS source starts on the first subscribe.
    pub fn new() -> Self {
        Self::with_source(backends::open_system_source)
    }

    /// Watcher over a caller-supplied source (simulations, replays, tests).
    pub fn with_source<F>(opener: F) -> Self
    where
        F: FnOnce(RawEventSink) -> Result<Box<dyn MouseSource>> + Send + 'static,
    {
        Self {
            inner: Arc::new(WatcherInner {
                shared: Mutex::new(Shared {
                    buttons: ButtonState::new(),
                    fanout: EventFanout::new(),
                    source: SourceState::Idle,
                }),
                opener: Mutex::new(Some(Box::new(opener))),
            }),
        }
    }

    /// Registers `callback` for events of `kind` and returns a handle for
    /// [`unsubscribe`](Self::unsubscribe).
    ///
    /// The first call on an idle watcher activates the source; an activation
    /// error is returned here and the callback is not registered. Any later
    /// call registers and returns `Ok`, even after failure or destroy
    /// (callbacks registered then simply never fire).
    pub fn subscribe(
        &self,
        kind: MouseEventKind,
        callback: impl FnMut(MouseEvent) + Send + 'static,
    ) -> Result<SubscriptionId> {
        self.activate_if_idle()?;
        Ok(self.inner.shared.lock().fanout.add(kind, callback))
    }

    /// Removes one subscription. Unknown handles are ignored.
    pub fn unsubscribe(&self, kind: MouseEventKind, id: SubscriptionId) {
        self.inner.shared.lock().fanout.remove(kind, id);
    }

    /// Advisory keep-alive mark, forwarded to the live source. No-op in any
    /// other state.
    ///
    /// Named with a trailing underscore because `ref` is a keyword.
    pub fn ref_(&self) {
        // Forwarded under the state lock; MouseSource::ref_ is contractually
        // a flag flip that never calls back into the watcher.
        if let SourceState::Active(source) = &self.inner.shared.lock().source {
            source.ref_();
        }
    }

    /// Advisory don't-keep-alive mark, forwarded to the live source. No-op in
    /// any other state.
    pub fn unref(&self) {
        if let SourceState::Active(source) = &self.inner.shared.lock().source {
            source.unref();
        }
    }

    /// Permanently stops watching. Idempotent; safe to call from a subscriber
    /// callback. Once destroyed the watcher never activates again.
    pub fn destroy(&self) {
        let previous = {
            let mut shared = self.inner.shared.lock();
            std::mem::replace(&mut shared.source, SourceState::Destroyed)
        };
        // The source is stopped outside the lock: stopping may wait for an
        // in-flight delivery, and that delivery needs the lock to finish.
        if let SourceState::Active(mut source) = previous {
            source.destroy();
            info!("mouse watcher destroyed");
        }
    }

    /// Whether a live source is currently attached.
    pub fn is_active(&self) -> bool {
        matches!(self.inner.shared.lock().source, SourceState::Active(_))
    }

    fn activate_if_idle(&self) -> Result<()> {
        let mut opener_slot = self.inner.opener.lock();
        if !matches!(self.inner.shared.lock().source, SourceState::Idle) {
            return Ok(());
        }
        let opener = match opener_slot.take() {
            Some(opener) => opener,
            None => return Ok(()),
        };

        let sink_target = Arc::clone(&self.inner);
        let sink: RawEventSink = Box::new(move |raw| WatcherInner::deliver(&sink_target, raw));
        let outcome = opener(sink);

        let mut shared = self.inner.shared.lock();
        match outcome {
            Ok(mut source) => {
                if matches!(shared.source, SourceState::Destroyed) {
                    // Destroyed while the opener ran. Tear the fresh source
                    // straight back down.
                    drop(shared);
                    source.destroy();
                    return Ok(());
                }
                shared.source = SourceState::Active(source);
                info!("mouse source activated");
                Ok(())
            }
            Err(err) => {
                if !matches!(shared.source, SourceState::Destroyed) {
                    shared.source = SourceState::Failed;
                }
                warn!(error = %err, "mouse source failed to activate");
                Err(err)
            }
        }
    }
}

impl Default for MouseWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MouseWatcher {
    /// Dropping the watcher tears the source down. Without this, the
    /// source's sink would keep the shared state (and the delivery thread)
    /// alive in a reference cycle.
    fn drop(&mut self) {
        self.destroy();
    }
}
