//! Button hold tracking and drag classification.
//!
//! # Semantics
//! - A button is *held* from the moment its down transition is observed until
//!   its up transition is observed. Missed transitions (capture started
//!   mid-press, up without a down) simply leave the flag wherever the last
//!   observed transition put it.
//! - A move while the left button is held publishes as a left drag; while only
//!   the right button is held, as a right drag. Left wins when both are held.
//! - The transition mutates state *before* classification, so a down is never
//!   itself reclassified and the very first move after a down already counts
//!   as a drag.

use crate::event::{MouseEventKind, RawMouseKind};

/// Held-state of the two tracked buttons. Owned by the watcher, never shared.
#[derive(Debug, Default)]
pub(crate) struct ButtonState {
    left_held: bool,
    right_held: bool,
}

impl ButtonState {
    pub(crate) const fn new() -> Self {
        Self {
            left_held: false,
            right_held: false,
        }
    }

    /// Applies one raw transition and returns the kind to publish for it.
    pub(crate) fn translate(&mut self, kind: RawMouseKind) -> MouseEventKind {
        match kind {
            RawMouseKind::LeftDown => self.left_held = true,
            RawMouseKind::LeftUp => self.left_held = false,
            RawMouseKind::RightDown => self.right_held = true,
            RawMouseKind::RightUp => self.right_held = false,
            RawMouseKind::Move => {}
        }
        match kind {
            RawMouseKind::Move if self.left_held => MouseEventKind::LeftDrag,
            RawMouseKind::Move if self.right_held => MouseEventKind::RightDrag,
            other => other.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseEventKind as K;
    use crate::event::RawMouseKind as R;

    fn run(state: &mut ButtonState, kinds: &[R]) -> Vec<K> {
        kinds.iter().map(|&k| state.translate(k)).collect()
    }

    #[test]
    fn starts_with_both_buttons_released() {
        let state = ButtonState::new();
        assert!(!state.left_held);
        assert!(!state.right_held);
    }

    #[test]
    fn moves_without_a_held_button_stay_moves() {
        let mut state = ButtonState::new();
        assert_eq!(state.translate(R::Move), K::Move);
        assert_eq!(state.translate(R::Move), K::Move);
    }

    #[test]
    fn left_press_turns_following_moves_into_left_drags() {
        let mut state = ButtonState::new();
        let out = run(&mut state, &[R::Move, R::LeftDown, R::Move, R::Move, R::LeftUp, R::Move]);
        assert_eq!(
            out,
            vec![K::Move, K::LeftDown, K::LeftDrag, K::LeftDrag, K::LeftUp, K::Move]
        );
    }

    #[test]
    fn right_press_turns_following_moves_into_right_drags() {
        let mut state = ButtonState::new();
        let out = run(&mut state, &[R::RightDown, R::Move, R::RightUp, R::Move]);
        assert_eq!(out, vec![K::RightDown, K::RightDrag, K::RightUp, K::Move]);
    }

    #[test]
    fn first_move_after_a_down_is_already_a_drag() {
        let mut state = ButtonState::new();
        assert_eq!(state.translate(R::LeftDown), K::LeftDown);
        assert_eq!(state.translate(R::Move), K::LeftDrag);
    }

    #[test]
    fn left_wins_while_both_buttons_are_held() {
        let mut state = ButtonState::new();
        let out = run(&mut state, &[R::RightDown, R::LeftDown, R::Move, R::LeftUp, R::Move]);
        assert_eq!(
            out,
            vec![K::RightDown, K::LeftDown, K::LeftDrag, K::LeftUp, K::RightDrag]
        );
        assert!(state.right_held);
    }

    #[test]
    fn moves_never_change_the_hold_flags() {
        let mut state = ButtonState::new();
        state.translate(R::LeftDown);
        for _ in 0..5 {
            state.translate(R::Move);
            assert!(state.left_held);
            assert!(!state.right_held);
        }
        state.translate(R::LeftUp);
        for _ in 0..5 {
            state.translate(R::Move);
            assert!(!state.left_held);
            assert!(!state.right_held);
        }
    }

    #[test]
    fn repeated_downs_keep_the_button_held() {
        let mut state = ButtonState::new();
        state.translate(R::LeftDown);
        state.translate(R::LeftDown);
        assert!(state.left_held);
        assert_eq!(state.translate(R::Move), K::LeftDrag);
    }

    #[test]
    fn up_without_a_down_publishes_and_leaves_released() {
        let mut state = ButtonState::new();
        assert_eq!(state.translate(R::LeftUp), K::LeftUp);
        assert!(!state.left_held);
        assert_eq!(state.translate(R::Move), K::Move);
    }

    #[test]
    fn buttons_are_tracked_independently() {
        let mut state = ButtonState::new();
        state.translate(R::RightDown);
        assert!(!state.left_held);
        assert!(state.right_held);
        state.translate(R::LeftDown);
        state.translate(R::RightUp);
        assert!(state.left_held);
        assert!(!state.right_held);
        assert_eq!(state.translate(R::Move), K::LeftDrag);
    }
}
