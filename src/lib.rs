#![cfg_attr(docsrs, feature(doc_cfg))]

//! Global mouse listener with drag detection.
//!
//! A [`MouseWatcher`] turns the OS's raw mouse stream (moves and left/right
//! button transitions) into discrete, subscribable events, classifying a move
//! while a button is held as a drag of that button. Nothing is hooked until
//! the first subscription; [`destroy`](MouseWatcher::destroy) (or drop) stops
//! watching for good.
//!
//! On Windows the events come from a process-wide low-level mouse hook.
//! Everywhere, a [`VirtualMouse`] can stand in as the source for tests,
//! demos and replays:
//!
//! ```
//! use mousewatch::{MouseEventKind, MouseWatcher, VirtualMouse};
//!
//! let mouse = VirtualMouse::new();
//! let watcher = MouseWatcher::with_source(mouse.opener());
//!
//! watcher.subscribe(MouseEventKind::LeftDrag, |ev| {
//!     println!("drag to ({}, {})", ev.x, ev.y);
//! })?;
//!
//! mouse.press_left(10, 10);
//! mouse.move_to(15, 12); // delivered as a left drag
//! # Ok::<(), mousewatch::Error>(())
//! ```

pub mod backends;
pub mod error;
pub mod event;
pub mod source;
pub mod watcher;

mod fanout;
mod state;

pub use backends::virtual_input::VirtualMouse;
pub use error::*;
pub use event::*;
pub use fanout::SubscriptionId;
pub use source::*;
pub use watcher::*;
