//! Crate error type.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by watcher activation.
///
/// Subscriber panics are deliberately not represented here: a faulting
/// callback is caught, logged and skipped during dispatch rather than turned
/// into an error the next caller would see.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS-level mouse source could not be started. Carries whatever
    /// detail the backend had (on Windows, the `GetLastError` code from
    /// installing the hook).
    #[error("mouse source unavailable: {0}")]
    SourceUnavailable(String),

    /// No mouse source backend exists for this platform / feature set.
    #[error("global mouse capture is not supported on this platform")]
    Unsupported,
}
