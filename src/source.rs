//! The raw input source seam.

use crate::error::Result;
use crate::event::RawMouseEvent;

/// Callback a source delivers raw events into.
pub type RawEventSink = Box<dyn FnMut(RawMouseEvent) + Send>;

/// One-shot factory that builds a source around a sink. The watcher invokes
/// it on first subscribe, never earlier and never twice.
pub type SourceOpener = Box<dyn FnOnce(RawEventSink) -> Result<Box<dyn MouseSource>> + Send>;

/// A live producer of raw mouse events, OS-level or simulated.
///
/// Implementations must deliver events through the sink one at a time, in
/// true temporal order, without duplication or reordering, and must tolerate
/// `ref_`/`unref`/`destroy` being called any number of times in any order.
pub trait MouseSource: Send {
    /// Advisory: this source should count as keeping its owner alive.
    /// Sources start referenced.
    ///
    /// The watcher forwards this call while holding its internal state lock,
    /// so implementations must not call back into the watcher from here. The
    /// expected scope is a flag flip.
    fn ref_(&self);

    /// Advisory: this source alone should not keep its owner alive.
    ///
    /// Same locking constraint as [`ref_`](MouseSource::ref_).
    fn unref(&self);

    /// Permanently stops delivery. After this returns, no new sink
    /// invocation may begin. Idempotent.
    fn destroy(&mut self);
}
