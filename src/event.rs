//! Mouse event types.
//!
//! `mousewatch` represents input as small `Copy` records: a raw transition as
//! reported by the OS ([`RawMouseEvent`]) and the published, drag-aware form
//! handed to subscribers ([`MouseEvent`]).
//!
//! ## Value conventions
//! - **Coordinates:** absolute screen position in pixels, signed (multi-monitor
//!   layouts can place monitors at negative coordinates).
//! - **Buttons:** left and right only. Wheel, middle and X buttons are filtered
//!   out at the source.
//! - **Drags:** a source never reports a drag. [`MouseEventKind::LeftDrag`] and
//!   [`MouseEventKind::RightDrag`] exist only on the published side, derived by
//!   the watcher from movement while a button is held.
//!
//! ## Wire names
//! The serde representation (and [`Display`](std::fmt::Display)) uses
//! kebab-case kind names: `"move"`, `"left-down"`, `"left-up"`, `"right-down"`,
//! `"right-up"`, `"left-drag"`, `"right-drag"`.

use serde::{Deserialize, Serialize};

/// Transition kinds a raw source may report.
///
/// Deliberately excludes drag kinds: sources report what the hardware did,
/// the watcher derives the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawMouseKind {
    /// The cursor moved.
    Move,
    /// Left button transitioned to pressed.
    LeftDown,
    /// Left button transitioned to released.
    LeftUp,
    /// Right button transitioned to pressed.
    RightDown,
    /// Right button transitioned to released.
    RightUp,
}

/// Event kinds delivered to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MouseEventKind {
    /// The cursor moved with no button held.
    Move,
    /// Left button pressed.
    LeftDown,
    /// Left button released.
    LeftUp,
    /// Right button pressed.
    RightDown,
    /// Right button released.
    RightUp,
    /// The cursor moved while the left button was held.
    LeftDrag,
    /// The cursor moved while the right button was held (and the left was not).
    RightDrag,
}

impl MouseEventKind {
    /// All published kinds, in declaration order. Handy for demos that
    /// subscribe to everything.
    pub const ALL: [MouseEventKind; 7] = [
        MouseEventKind::Move,
        MouseEventKind::LeftDown,
        MouseEventKind::LeftUp,
        MouseEventKind::RightDown,
        MouseEventKind::RightUp,
        MouseEventKind::LeftDrag,
        MouseEventKind::RightDrag,
    ];

    /// Kebab-case name, identical to the serde representation.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseEventKind::Move => "move",
            MouseEventKind::LeftDown => "left-down",
            MouseEventKind::LeftUp => "left-up",
            MouseEventKind::RightDown => "right-down",
            MouseEventKind::RightUp => "right-up",
            MouseEventKind::LeftDrag => "left-drag",
            MouseEventKind::RightDrag => "right-drag",
        }
    }
}

impl std::fmt::Display for MouseEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RawMouseKind> for MouseEventKind {
    /// Passthrough mapping. Drag classification is the watcher's job, not a
    /// property of the raw kind.
    #[inline]
    fn from(raw: RawMouseKind) -> Self {
        match raw {
            RawMouseKind::Move => MouseEventKind::Move,
            RawMouseKind::LeftDown => MouseEventKind::LeftDown,
            RawMouseKind::LeftUp => MouseEventKind::LeftUp,
            RawMouseKind::RightDown => MouseEventKind::RightDown,
            RawMouseKind::RightUp => MouseEventKind::RightUp,
        }
    }
}

/// A transition as reported by a raw source, before drag classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMouseEvent {
    /// What happened.
    pub kind: RawMouseKind,
    /// Screen X in pixels at the time of the transition.
    pub x: i32,
    /// Screen Y in pixels at the time of the transition.
    pub y: i32,
}

impl RawMouseEvent {
    #[inline]
    pub fn new(kind: RawMouseKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }
}

/// A published mouse event: the classified kind plus the cursor position.
///
/// Events are transient. The watcher forwards them and keeps nothing, so a
/// subscriber that wants history must record it itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// The classified kind (drag-aware).
    pub kind: MouseEventKind,
    /// Screen X in pixels.
    pub x: i32,
    /// Screen Y in pixels.
    pub y: i32,
}

impl std::fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.kind, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_kinds_pass_through_unchanged() {
        assert_eq!(MouseEventKind::from(RawMouseKind::Move), MouseEventKind::Move);
        assert_eq!(MouseEventKind::from(RawMouseKind::LeftDown), MouseEventKind::LeftDown);
        assert_eq!(MouseEventKind::from(RawMouseKind::LeftUp), MouseEventKind::LeftUp);
        assert_eq!(MouseEventKind::from(RawMouseKind::RightDown), MouseEventKind::RightDown);
        assert_eq!(MouseEventKind::from(RawMouseKind::RightUp), MouseEventKind::RightUp);
    }

    #[test]
    fn kind_names_are_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&MouseEvent {
            kind: MouseEventKind::LeftDrag,
            x: -3,
            y: 40,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"left-drag","x":-3,"y":40}"#);

        for kind in MouseEventKind::ALL {
            let name = serde_json::to_string(&kind).unwrap();
            assert_eq!(name, format!("\"{}\"", kind.as_str()));
            assert_eq!(name, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn events_round_trip_through_json() {
        let ev = MouseEvent {
            kind: MouseEventKind::RightDrag,
            x: 120,
            y: -77,
        };
        let back: MouseEvent = serde_json::from_str(&serde_json::to_string(&ev).unwrap()).unwrap();
        assert_eq!(back, ev);
    }
}
