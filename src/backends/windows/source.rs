//! Per-watcher bridge between the process hook and subscriber code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::source::{MouseSource, RawEventSink};

use super::hook;

/// [`MouseSource`] over the process-wide low-level hook.
///
/// The hook procedure must return in microseconds, so it only drops events
/// into this source's channel; a dedicated delivery thread drains the channel
/// and runs the sink, and with it every subscriber callback. Each source gets
/// its own delivery thread, so one slow subscriber never lags the
/// system-wide hook, and every event crosses the channel (bursts are
/// delivered one by one, not collapsed).
pub struct HookSource {
    registration: Option<u64>,
    delivery: Option<JoinHandle<()>>,
    referenced: AtomicBool,
}

impl HookSource {
    /// Registers with the process hook and starts the delivery thread.
    ///
    /// Most callers want [`MouseWatcher::new`](crate::MouseWatcher::new),
    /// which opens this source lazily on first subscribe; `open` is public
    /// for wrapping the hook behind a custom opener.
    pub fn open(mut sink: RawEventSink) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let delivery = thread::Builder::new()
            .name("mousewatch-deliver".into())
            .spawn(move || {
                while let Ok(event) = rx.recv() {
                    sink(event);
                }
            })
            .map_err(|err| {
                Error::SourceUnavailable(format!("delivery thread spawn failed: {err}"))
            })?;

        let registration = match hook::register(tx) {
            Ok(id) => id,
            Err(err) => {
                // register dropped our sender, so the thread is already on
                // its way out.
                let _ = delivery.join();
                return Err(err);
            }
        };
        debug!(registration, "hook source opened");

        Ok(Self {
            registration: Some(registration),
            delivery: Some(delivery),
            referenced: AtomicBool::new(true),
        })
    }
}

impl MouseSource for HookSource {
    fn ref_(&self) {
        self.referenced.store(true, Ordering::SeqCst);
    }

    fn unref(&self) {
        self.referenced.store(false, Ordering::SeqCst);
    }

    fn destroy(&mut self) {
        let Some(id) = self.registration.take() else {
            return;
        };
        // Dropping the registration drops our sender; the delivery thread
        // drains what is queued and exits on its own.
        hook::unregister(id);

        if let Some(handle) = self.delivery.take() {
            if !self.referenced.load(Ordering::SeqCst) {
                // Unreferenced: teardown is signalled but not waited for.
                return;
            }
            if thread::current().id() == handle.thread().id() {
                // destroy() issued from inside a subscriber callback, which
                // runs on the delivery thread itself. Joining here would
                // deadlock; the thread still exits right after the callback.
                return;
            }
            if handle.join().is_err() {
                warn!("delivery thread panicked during shutdown");
            }
        }
    }
}

impl Drop for HookSource {
    fn drop(&mut self) {
        self.destroy();
    }
}
