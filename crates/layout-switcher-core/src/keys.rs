//! Linux input key codes (`linux/input-event-codes.h`) used by the switcher.

/// A physical key code as reported by the kernel input layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct KeyCode(pub u16);

pub const KEY_ESC: KeyCode = KeyCode(1);
pub const KEY_1: KeyCode = KeyCode(2);
pub const KEY_2: KeyCode = KeyCode(3);
pub const KEY_3: KeyCode = KeyCode(4);
pub const KEY_4: KeyCode = KeyCode(5);
pub const KEY_5: KeyCode = KeyCode(6);
pub const KEY_6: KeyCode = KeyCode(7);
pub const KEY_7: KeyCode = KeyCode(8);
pub const KEY_8: KeyCode = KeyCode(9);
pub const KEY_9: KeyCode = KeyCode(10);
pub const KEY_0: KeyCode = KeyCode(11);
pub const KEY_MINUS: KeyCode = KeyCode(12);
pub const KEY_EQUAL: KeyCode = KeyCode(13);
pub const KEY_BACKSPACE: KeyCode = KeyCode(14);
pub const KEY_TAB: KeyCode = KeyCode(15);
pub const KEY_Q: KeyCode = KeyCode(16);
pub const KEY_W: KeyCode = KeyCode(17);
pub const KEY_E: KeyCode = KeyCode(18);
pub const KEY_R: KeyCode = KeyCode(19);
pub const KEY_T: KeyCode = KeyCode(20);
pub const KEY_Y: KeyCode = KeyCode(21);
pub const KEY_U: KeyCode = KeyCode(22);
pub const KEY_I: KeyCode = KeyCode(23);
pub const KEY_O: KeyCode = KeyCode(24);
pub const KEY_P: KeyCode = KeyCode(25);
pub const KEY_LEFTBRACE: KeyCode = KeyCode(26);
pub const KEY_RIGHTBRACE: KeyCode = KeyCode(27);
pub const KEY_ENTER: KeyCode = KeyCode(28);
pub const KEY_LEFTCTRL: KeyCode = KeyCode(29);
pub const KEY_A: KeyCode = KeyCode(30);
pub const KEY_S: KeyCode = KeyCode(31);
pub const KEY_D: KeyCode = KeyCode(32);
pub const KEY_F: KeyCode = KeyCode(33);
pub const KEY_G: KeyCode = KeyCode(34);
pub const KEY_H: KeyCode = KeyCode(35);
pub const KEY_J: KeyCode = KeyCode(36);
pub const KEY_K: KeyCode = KeyCode(37);
pub const KEY_L: KeyCode = KeyCode(38);
pub const KEY_SEMICOLON: KeyCode = KeyCode(39);
pub const KEY_APOSTROPHE: KeyCode = KeyCode(40);
pub const KEY_GRAVE: KeyCode = KeyCode(41);
pub const KEY_LEFTSHIFT: KeyCode = KeyCode(42);
pub const KEY_BACKSLASH: KeyCode = KeyCode(43);
pub const KEY_Z: KeyCode = KeyCode(44);
pub const KEY_X: KeyCode = KeyCode(45);
pub const KEY_C: KeyCode = KeyCode(46);
pub const KEY_V: KeyCode = KeyCode(47);
pub const KEY_B: KeyCode = KeyCode(48);
pub const KEY_N: KeyCode = KeyCode(49);
pub const KEY_M: KeyCode = KeyCode(50);
pub const KEY_COMMA: KeyCode = KeyCode(51);
pub const KEY_DOT: KeyCode = KeyCode(52);
pub const KEY_SLASH: KeyCode = KeyCode(53);
pub const KEY_RIGHTSHIFT: KeyCode = KeyCode(54);
pub const KEY_LEFTALT: KeyCode = KeyCode(56);
pub const KEY_SPACE: KeyCode = KeyCode(57);
pub const KEY_CAPSLOCK: KeyCode = KeyCode(58);
pub const KEY_KPENTER: KeyCode = KeyCode(96);
pub const KEY_RIGHTCTRL: KeyCode = KeyCode(97);
pub const KEY_RIGHTALT: KeyCode = KeyCode(100);
pub const KEY_HOME: KeyCode = KeyCode(102);
pub const KEY_UP: KeyCode = KeyCode(103);
pub const KEY_PAGEUP: KeyCode = KeyCode(104);
pub const KEY_LEFT: KeyCode = KeyCode(105);
pub const KEY_RIGHT: KeyCode = KeyCode(106);
pub const KEY_END: KeyCode = KeyCode(107);
pub const KEY_DOWN: KeyCode = KeyCode(108);
pub const KEY_PAGEDOWN: KeyCode = KeyCode(109);
pub const KEY_INSERT: KeyCode = KeyCode(110);
pub const KEY_DELETE: KeyCode = KeyCode(111);
pub const KEY_LEFTMETA: KeyCode = KeyCode(125);
pub const KEY_RIGHTMETA: KeyCode = KeyCode(126);

pub const BTN_LEFT: KeyCode = KeyCode(0x110);
pub const BTN_RIGHT: KeyCode = KeyCode(0x111);
pub const BTN_MIDDLE: KeyCode = KeyCode(0x112);
pub const BTN_SIDE: KeyCode = KeyCode(0x113);
pub const BTN_EXTRA: KeyCode = KeyCode(0x114);
pub const BTN_FORWARD: KeyCode = KeyCode(0x115);
pub const BTN_BACK: KeyCode = KeyCode(0x116);
pub const BTN_TASK: KeyCode = KeyCode(0x117);

impl KeyCode {
    pub const fn is_shift(self) -> bool {
        matches!(self.0, 42 | 54)
    }

    /// Ctrl, Alt and Meta on either side. Shift is tracked separately.
    pub const fn is_command_modifier(self) -> bool {
        matches!(self.0, 29 | 97 | 56 | 100 | 125 | 126)
    }

    pub const fn is_modifier(self) -> bool {
        self.is_shift() || self.is_command_modifier() || self.0 == KEY_CAPSLOCK.0
    }

    /// Keys that move the caret or leave the current text field.
    pub const fn is_navigation(self) -> bool {
        matches!(
            self.0,
            1 | 15 | 102 | 103 | 104 | 105 | 106 | 107 | 108 | 109 | 110 | 111
        )
    }

    pub const fn is_enter(self) -> bool {
        self.0 == KEY_ENTER.0 || self.0 == KEY_KPENTER.0
    }

    pub const fn is_pointer_button(self) -> bool {
        self.0 >= BTN_LEFT.0 && self.0 <= BTN_TASK.0
    }
}
