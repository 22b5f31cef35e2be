//! Process-wide low-level mouse hook.
//!
//! Windows allows any number of `WH_MOUSE_LL` hooks, but each one costs
//! latency on every mouse message in the system, so this module installs at
//! most one per process and fans the stream out to registered listener
//! channels:
//!
//! - [`register`] adds a channel. The first registration spawns the hook
//!   thread and waits for it to report either its thread id (hook installed)
//!   or the install error.
//! - [`unregister`] removes a channel. The last removal posts a stop message
//!   to the hook thread and joins it, so an idle process carries no hook.
//!
//! The hook thread owns the hook and a message loop; low-level hooks only
//! fire while their installing thread pumps messages. The hook procedure
//! does the minimum on that thread: map the message, read the cursor
//! position, send to every listener channel. Anything slow in a low-level
//! hook gets the whole system's input lagging and the hook silently dropped
//! by the OS.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use windows_sys::Win32::Foundation::{GetLastError, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetMessageW, PeekMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, MSG, MSLLHOOKSTRUCT, PM_NOREMOVE, WH_MOUSE_LL, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_MOUSEMOVE, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_USER,
};

use crate::error::{Error, Result};
use crate::event::{RawMouseEvent, RawMouseKind};

/// Private message that ends the hook thread's loop.
const WM_STOP_MESSAGE_LOOP: u32 = WM_USER;

struct HookListener {
    id: u64,
    tx: mpsc::Sender<RawMouseEvent>,
}

struct ListenerTable {
    next_id: u64,
    entries: Vec<HookListener>,
}

struct HookThread {
    handle: Option<JoinHandle<()>>,
    thread_id: Option<u32>,
}

/// Listener channels, touched by the hook procedure on every mouse message.
static LISTENERS: Mutex<ListenerTable> = Mutex::new(ListenerTable {
    next_id: 0,
    entries: Vec::new(),
});

/// Hook thread handle. Separate lock so starting/stopping the thread never
/// contends with event delivery, and so start/stop decisions are serialized
/// (lock order is always `LIFECYCLE` then `LISTENERS`).
static LIFECYCLE: Mutex<HookThread> = Mutex::new(HookThread {
    handle: None,
    thread_id: None,
});

/// Adds a listener channel, starting the hook thread if it is the first.
///
/// Blocks until the hook is actually installed; a refused hook surfaces as
/// [`Error::SourceUnavailable`] and leaves no listener behind.
pub(crate) fn register(tx: mpsc::Sender<RawMouseEvent>) -> Result<u64> {
    let mut lifecycle = LIFECYCLE.lock();

    let id = {
        let mut listeners = LISTENERS.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push(HookListener { id, tx });
        id
    };

    if lifecycle.handle.is_none() {
        match start_hook_thread() {
            Ok((handle, thread_id)) => {
                lifecycle.handle = Some(handle);
                lifecycle.thread_id = Some(thread_id);
                info!(thread_id, "mouse hook thread started");
            }
            Err(err) => {
                LISTENERS.lock().entries.retain(|entry| entry.id != id);
                return Err(err);
            }
        }
    }

    debug!(id, "mouse hook listener registered");
    Ok(id)
}

/// Removes a listener channel, stopping the hook thread if it was the last.
pub(crate) fn unregister(id: u64) {
    let mut lifecycle = LIFECYCLE.lock();

    let now_empty = {
        let mut listeners = LISTENERS.lock();
        listeners.entries.retain(|entry| entry.id != id);
        listeners.entries.is_empty()
    };
    debug!(id, "mouse hook listener unregistered");

    if !now_empty {
        return;
    }
    if let Some(handle) = lifecycle.handle.take() {
        let thread_id = lifecycle.thread_id.take();
        if let Some(thread_id) = thread_id {
            // The queue exists before register() ever returns, so this only
            // fails if the thread is already gone. Join either way.
            let posted =
                unsafe { PostThreadMessageW(thread_id, WM_STOP_MESSAGE_LOOP, 0, 0) };
            if posted == 0 {
                warn!(
                    error = unsafe { GetLastError() },
                    "failed to post stop message to hook thread"
                );
            }
        }
        if handle.join().is_err() {
            warn!("mouse hook thread panicked during shutdown");
        } else {
            info!("mouse hook thread stopped");
        }
    }
}

fn start_hook_thread() -> Result<(JoinHandle<()>, u32)> {
    let (ready_tx, ready_rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("mousewatch-hook".into())
        .spawn(move || hook_thread_main(ready_tx))
        .map_err(|err| Error::SourceUnavailable(format!("hook thread spawn failed: {err}")))?;

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => Ok((handle, thread_id)),
        Ok(Err(err)) => {
            let _ = handle.join();
            Err(err)
        }
        Err(_) => {
            let _ = handle.join();
            Err(Error::SourceUnavailable(
                "hook thread exited before reporting readiness".into(),
            ))
        }
    }
}

fn hook_thread_main(ready: mpsc::Sender<std::result::Result<u32, Error>>) {
    unsafe {
        let mut msg: MSG = std::mem::zeroed();

        // Force-create this thread's message queue so the stop message can be
        // posted no matter how early teardown happens.
        PeekMessageW(&mut msg, std::ptr::null_mut(), WM_USER, WM_USER, PM_NOREMOVE);

        let hook = SetWindowsHookExW(
            WH_MOUSE_LL,
            Some(low_level_mouse_proc),
            std::ptr::null_mut(),
            0,
        );
        if hook.is_null() {
            let code = GetLastError();
            let _ = ready.send(Err(Error::SourceUnavailable(format!(
                "SetWindowsHookExW failed (error {code})"
            ))));
            return;
        }
        if ready.send(Ok(GetCurrentThreadId())).is_err() {
            // The registrar is gone and nobody holds our thread id, so no
            // stop message will ever arrive. Bail out now.
            UnhookWindowsHookEx(hook);
            return;
        }
        info!("low-level mouse hook installed");

        loop {
            let status = GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0);
            if status == 0 || status == -1 {
                warn!(status, "hook message loop ended unexpectedly");
                break;
            }
            if msg.message == WM_STOP_MESSAGE_LOOP {
                break;
            }
        }

        UnhookWindowsHookEx(hook);
        info!("low-level mouse hook removed");
    }
}

unsafe extern "system" fn low_level_mouse_proc(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if code >= 0 {
        if let Some(kind) = raw_kind_from_message(wparam as u32) {
            let info = &*(lparam as *const MSLLHOOKSTRUCT);
            let event = RawMouseEvent::new(kind, info.pt.x, info.pt.y);
            let listeners = LISTENERS.lock();
            for listener in &listeners.entries {
                // A dead receiver just means its source is mid-teardown.
                let _ = listener.tx.send(event);
            }
        }
    }
    CallNextHookEx(std::ptr::null_mut(), code, wparam, lparam)
}

/// Maps a hook message to the transition it reports. Wheel, middle and X
/// button messages are not tracked and map to `None`.
#[inline]
fn raw_kind_from_message(message: u32) -> Option<RawMouseKind> {
    match message {
        WM_MOUSEMOVE => Some(RawMouseKind::Move),
        WM_LBUTTONDOWN => Some(RawMouseKind::LeftDown),
        WM_LBUTTONUP => Some(RawMouseKind::LeftUp),
        WM_RBUTTONDOWN => Some(RawMouseKind::RightDown),
        WM_RBUTTONUP => Some(RawMouseKind::RightUp),
        _ => None,
    }
}
