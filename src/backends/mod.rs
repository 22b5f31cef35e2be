//! Raw mouse source backends for `mousewatch`.
//!
//! Implementations of [`MouseSource`](crate::source::MouseSource):
//! - **`windows`**: global mouse capture via a low-level Windows hook.
//! - **`virtual_input`**: a hand-driven source for tests, demos and replays,
//!   available on every platform.
//!
//! # Feature flags
//! - **`hook`**: enables the Windows hook backend (default). With the
//!   feature off, or on other platforms, [`open_system_source`] reports
//!   [`Error::Unsupported`](crate::Error::Unsupported) and only the virtual
//!   source remains.

use crate::error::Result;
use crate::source::{MouseSource, RawEventSink};

pub mod virtual_input;

#[cfg(all(feature = "hook", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "hook", target_os = "windows"))))]
pub mod windows;

/// Opens the platform's global mouse source around `sink`.
///
/// This is the opener behind [`MouseWatcher::new`](crate::MouseWatcher::new).
#[cfg(all(feature = "hook", target_os = "windows"))]
pub fn open_system_source(sink: RawEventSink) -> Result<Box<dyn MouseSource>> {
    Ok(Box::new(windows::HookSource::open(sink)?))
}

/// Opens the platform's global mouse source around `sink`.
///
/// No backend is compiled in for this platform / feature set, so this always
/// reports [`Error::Unsupported`](crate::Error::Unsupported).
#[cfg(not(all(feature = "hook", target_os = "windows")))]
pub fn open_system_source(sink: RawEventSink) -> Result<Box<dyn MouseSource>> {
    let _ = sink;
    Err(crate::error::Error::Unsupported)
}
