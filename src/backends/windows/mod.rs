#![cfg(target_os = "windows")]

//! Windows mouse capture backend.
//!
//! Two pieces:
//! - **`hook`**: the process-wide low-level mouse hook (`WH_MOUSE_LL`), one
//!   dedicated thread owning the hook and its message loop, started when the
//!   first listener registers and stopped when the last one leaves.
//! - **`source`**: [`HookSource`], the per-watcher
//!   [`MouseSource`](crate::source::MouseSource) bridging hook deliveries onto
//!   a thread the watcher's subscribers can safely run on.
//!
//! Most users should not touch these modules directly; construct a
//! [`MouseWatcher`](crate::MouseWatcher) and let it open the source lazily.

pub(crate) mod hook;
pub mod source;

pub use source::HookSource;
