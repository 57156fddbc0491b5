use std::fmt;

use super::InputHandler;

/// Keyboard key identifier.
///
/// The platform maps its key codes into these variants where possible.
/// For unsupported keys, use `Key::Unknown(u32)` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Slot of this button in per-button flag arrays.
    ///
    /// Left/Right/Middle are 0/1/2, matching the conventional button numbering;
    /// extra buttons follow.
    pub fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(n) => 5 + n as usize,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Platform-agnostic input events.
///
/// Platforms normally call [`InputHandler`] directly while polling; this enum
/// is the recorded form, used for scripted input (headless runs, tests) and
/// for translating window-system events in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor position in window coordinates (logical pixels, top-left origin).
    CursorMoved { x: f64, y: f64 },

    MouseButton {
        button: MouseButton,
        state: MouseButtonState,
        modifiers: Modifiers,
    },

    /// Scroll offsets for this event.
    Scroll { x: f64, y: f64 },

    Key {
        key: Key,
        /// Stable platform code when available (e.g. scancode).
        code: u32,
        state: KeyState,
        modifiers: Modifiers,
        /// True when the event is a key-repeat.
        repeat: bool,
    },
}

impl InputEvent {
    /// Routes this event to the matching callback entry point of `handler`.
    pub fn dispatch(&self, handler: &mut dyn InputHandler) {
        match *self {
            InputEvent::CursorMoved { x, y } => handler.cursor_pos(x, y),
            InputEvent::MouseButton {
                button,
                state,
                modifiers,
            } => handler.mouse_button(button, state, modifiers),
            InputEvent::Scroll { x, y } => handler.scroll(x, y),
            InputEvent::Key {
                key,
                code,
                state,
                modifiers,
                repeat,
            } => handler.key(key, code, state, modifiers, repeat),
        }
    }
}
