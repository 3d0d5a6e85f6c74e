use layout_switcher_core::{KeyCode, keys::*};

use crate::state::{KeyOutcome, State, StateManager};

const TIMEOUT_MS: u64 = 400;

fn manager() -> StateManager {
    StateManager::new("en", TIMEOUT_MS)
}

fn tap(sm: &mut StateManager, code: KeyCode, at: u64) -> KeyOutcome {
    sm.on_key_press(code, at);
    sm.on_key_release(code, at + 20)
}

fn type_keys(sm: &mut StateManager, codes: &[KeyCode], start: u64) {
    for (i, &code) in codes.iter().enumerate() {
        tap(sm, code, start + i as u64 * 50);
    }
}

fn assert_char_invariant(sm: &StateManager) {
    let ctx = sm.context();
    let non_modifiers = ctx.strokes().iter().filter(|s| !s.code.is_modifier()).count();
    assert_eq!(ctx.chars_in_buffer(), non_modifiers);
}

#[test]
fn key_press_from_idle_starts_typing() {
    let mut sm = manager();
    assert_eq!(sm.on_key_press(KEY_G, 0), KeyOutcome::Buffered);
    assert_eq!(sm.state(), State::Typing);
    assert_eq!(sm.context().chars_in_buffer(), 1);
}

#[test]
fn single_shift_tap_returns_to_typing() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A], 0);

    sm.on_key_press(KEY_LEFTSHIFT, 100);
    assert_eq!(sm.state(), State::ShiftPressed);
    assert_eq!(sm.on_key_release(KEY_LEFTSHIFT, 150), KeyOutcome::ShiftTap);
    assert_eq!(sm.state(), State::Typing);
    assert_eq!(sm.context().last_shift_time(), Some(150));
}

#[test]
fn slow_second_tap_is_another_single_tap() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A], 0);

    tap(&mut sm, KEY_LEFTSHIFT, 100);
    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 100 + TIMEOUT_MS + 50), KeyOutcome::ShiftTap);
    assert_eq!(sm.state(), State::Typing);
}

#[test]
fn two_quick_shift_taps_request_conversion() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_G, KEY_H], 0);

    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 200), KeyOutcome::ShiftTap);
    assert_eq!(tap(&mut sm, KEY_RIGHTSHIFT, 300), KeyOutcome::ConvertRequested);
    assert_eq!(sm.state(), State::Converting);
    assert_eq!(sm.context().last_shift_time(), None);

    sm.finish_conversion(true);
    assert_eq!(sm.state(), State::Idle);
    assert!(sm.context().strokes().is_empty());
}

#[test]
fn double_tap_works_from_idle() {
    let mut sm = manager();
    tap(&mut sm, KEY_LEFTSHIFT, 0);
    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 100), KeyOutcome::ConvertRequested);
    sm.finish_conversion(false);
    assert_eq!(sm.state(), State::Idle);
}

#[test]
fn shift_used_for_a_capital_is_not_a_tap() {
    let mut sm = manager();
    sm.on_key_press(KEY_LEFTSHIFT, 0);
    tap(&mut sm, KEY_G, 10);
    assert_eq!(sm.on_key_release(KEY_LEFTSHIFT, 50), KeyOutcome::Modifier);

    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 100), KeyOutcome::ShiftTap);
    assert_eq!(sm.state(), State::Typing);
    assert!(sm.context().strokes()[1].shift);
}

#[test]
fn letter_between_taps_cancels_the_gesture() {
    let mut sm = manager();
    tap(&mut sm, KEY_LEFTSHIFT, 0);
    tap(&mut sm, KEY_A, 50);
    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 100), KeyOutcome::ShiftTap);
    assert_eq!(sm.state(), State::Typing);
}

#[test]
fn double_tap_while_converting_is_ignored() {
    let mut sm = manager();
    tap(&mut sm, KEY_LEFTSHIFT, 0);
    tap(&mut sm, KEY_LEFTSHIFT, 100);
    assert_eq!(sm.state(), State::Converting);

    tap(&mut sm, KEY_LEFTSHIFT, 200);
    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 300), KeyOutcome::ShiftTap);
    assert_eq!(sm.state(), State::Converting);
}

#[test]
fn navigation_enter_and_clicks_reset_the_buffer() {
    for boundary in [KEY_LEFT, KEY_ENTER, KEY_ESC, KEY_TAB] {
        let mut sm = manager();
        type_keys(&mut sm, &[KEY_A, KEY_B], 0);
        assert_eq!(sm.on_key_press(boundary, 200), KeyOutcome::Boundary);
        assert_eq!(sm.state(), State::Idle);
        assert_eq!(sm.context().chars_in_buffer(), 0);
    }

    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B], 0);
    assert_eq!(sm.on_mouse_click(), KeyOutcome::Boundary);
    assert_eq!(sm.state(), State::Idle);
    assert!(sm.context().strokes().is_empty());
}

#[test]
fn shortcuts_reset_the_buffer() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B], 0);
    sm.on_key_press(KEY_LEFTCTRL, 200);
    assert_eq!(sm.on_key_press(KEY_C, 210), KeyOutcome::Boundary);
    sm.on_key_release(KEY_C, 220);
    sm.on_key_release(KEY_LEFTCTRL, 230);

    assert_eq!(sm.context().chars_in_buffer(), 0);
    assert_eq!(sm.on_key_press(KEY_D, 300), KeyOutcome::Buffered);
}

#[test]
fn ctrl_shift_is_not_a_gesture_tap() {
    let mut sm = manager();
    sm.on_key_press(KEY_LEFTCTRL, 0);
    tap(&mut sm, KEY_LEFTSHIFT, 10);
    tap(&mut sm, KEY_LEFTSHIFT, 60);
    sm.on_key_release(KEY_LEFTCTRL, 100);
    assert_ne!(sm.state(), State::Converting);
}

#[test]
fn backspace_removes_last_character() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B, KEY_C], 0);
    assert_eq!(tap(&mut sm, KEY_BACKSPACE, 200), KeyOutcome::Ignored);
    assert_eq!(sm.context().chars_in_buffer(), 2);
    assert_char_invariant(&sm);
}

#[test]
fn three_repeats_trigger_hold_exactly_once() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F, KEY_G], 0);
    sm.on_key_press(KEY_BACKSPACE, 500);

    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 600), KeyOutcome::Deleted);
    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 630), KeyOutcome::Deleted);
    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 660), KeyOutcome::BackspaceHold);
    assert_eq!(sm.state(), State::BackspaceHold);
    assert!(sm.context().backspace_hold_active());

    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 690), KeyOutcome::Deleted);
    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 720), KeyOutcome::Deleted);
    assert_eq!(sm.state(), State::BackspaceHold);
    assert_char_invariant(&sm);
}

#[test]
fn releasing_backspace_resets_the_repeat_counter() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F], 0);

    sm.on_key_press(KEY_BACKSPACE, 500);
    sm.on_key_repeat(KEY_BACKSPACE, 600);
    sm.on_key_repeat(KEY_BACKSPACE, 630);
    sm.on_key_release(KEY_BACKSPACE, 650);
    assert_eq!(sm.context().backspace_repeats(), 0);

    sm.on_key_press(KEY_BACKSPACE, 700);
    sm.on_key_repeat(KEY_BACKSPACE, 800);
    assert_eq!(sm.on_key_repeat(KEY_BACKSPACE, 830), KeyOutcome::Deleted);
    assert_eq!(sm.state(), State::Typing);
    assert!(!sm.context().backspace_hold_active());
}

#[test]
fn other_key_resets_the_repeat_counter() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B, KEY_C], 0);
    sm.on_key_press(KEY_BACKSPACE, 200);
    sm.on_key_repeat(KEY_BACKSPACE, 300);
    sm.on_key_repeat(KEY_BACKSPACE, 330);
    sm.on_key_press(KEY_X, 350);
    assert_eq!(sm.context().backspace_repeats(), 0);
}

#[test]
fn double_tap_during_backspace_hold_converts() {
    let mut sm = manager();
    type_keys(&mut sm, &[KEY_A, KEY_B, KEY_C, KEY_D, KEY_E], 0);
    sm.on_key_press(KEY_BACKSPACE, 300);
    for t in [400, 430, 460] {
        sm.on_key_repeat(KEY_BACKSPACE, t);
    }
    sm.on_key_release(KEY_BACKSPACE, 480);
    assert_eq!(sm.state(), State::BackspaceHold);

    tap(&mut sm, KEY_LEFTSHIFT, 600);
    assert_eq!(tap(&mut sm, KEY_LEFTSHIFT, 700), KeyOutcome::ConvertRequested);
}

#[test]
fn held_letter_repeats_are_buffered() {
    let mut sm = manager();
    sm.on_key_press(KEY_A, 0);
    sm.on_key_repeat(KEY_A, 300);
    sm.on_key_repeat(KEY_A, 330);
    sm.on_key_release(KEY_A, 340);
    assert_eq!(sm.context().chars_in_buffer(), 3);
}

#[test]
fn char_count_matches_buffer_through_mixed_input() {
    let mut sm = manager();
    let mut t = 0;
    let script: &[(KeyCode, i32)] = &[
        (KEY_LEFTSHIFT, 1),
        (KEY_H, 1),
        (KEY_H, 0),
        (KEY_LEFTSHIFT, 0),
        (KEY_E, 1),
        (KEY_BACKSPACE, 1),
        (KEY_BACKSPACE, 2),
        (KEY_BACKSPACE, 2),
        (KEY_BACKSPACE, 0),
        (KEY_L, 1),
        (KEY_SPACE, 1),
        (KEY_RIGHTSHIFT, 1),
        (KEY_RIGHTSHIFT, 0),
        (KEY_O, 1),
    ];
    for &(code, value) in script {
        t += 40;
        match value {
            1 => sm.on_key_press(code, t),
            2 => sm.on_key_repeat(code, t),
            _ => sm.on_key_release(code, t),
        };
        assert_char_invariant(&sm);
    }
    assert_eq!(sm.context().chars_in_buffer(), 3);
}
