use std::fmt;

use super::types::{Modifiers, MouseButton, MouseButtonState};

/// Number of per-button pressed flags tracked by [`MouseState`].
pub const MOUSE_BUTTON_COUNT: usize = 8;

/// Callback invoked for every button release event.
pub type MouseReleaseHook = Box<dyn FnMut(MouseButton, Modifiers)>;

/// Mouse state mutated by the platform's event callbacks.
///
/// # Button latch
///
/// Pressed flags are latches: a press sets the flag and nothing in this type
/// clears it on release. Consumers that want live "is held" semantics must
/// observe releases through [`set_release_hook`](Self::set_release_hook) and
/// call [`reset_button`](Self::reset_button) themselves.
#[derive(Default)]
pub struct MouseState {
    x: f64,
    y: f64,
    last_x: f64,
    last_y: f64,
    scroll_x: f64,
    scroll_y: f64,
    pressed: [bool; MOUSE_BUTTON_COUNT],
    dragging: bool,
    release_hook: Option<MouseReleaseHook>,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    /// Cursor moved: the current position becomes the previous one.
    pub fn cursor_pos_callback(&mut self, x: f64, y: f64) {
        self.last_x = self.x;
        self.last_y = self.y;
        self.x = x;
        self.y = y;
        self.dragging = self.pressed.iter().any(|&p| p);
    }

    pub fn mouse_button_callback(
        &mut self,
        button: MouseButton,
        state: MouseButtonState,
        modifiers: Modifiers,
    ) {
        let idx = button.index();
        if idx >= MOUSE_BUTTON_COUNT {
            log::debug!("ignoring mouse button {button:?} (index {idx} out of range)");
            return;
        }

        match state {
            MouseButtonState::Pressed => self.pressed[idx] = true,
            MouseButtonState::Released => {
                if let Some(hook) = self.release_hook.as_mut() {
                    hook(button, modifiers);
                }
            }
        }
    }

    pub fn scroll_callback(&mut self, x: f64, y: f64) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    /// Resets per-frame deltas: scroll offsets go back to zero and the
    /// previous cursor position catches up with the current one.
    pub fn end_frame(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.last_x = self.x;
        self.last_y = self.y;
    }

    // ── latch control ─────────────────────────────────────────────────────

    /// Installs a callback invoked on every release event.
    pub fn set_release_hook(&mut self, hook: impl FnMut(MouseButton, Modifiers) + 'static) {
        self.release_hook = Some(Box::new(hook));
    }

    pub fn clear_release_hook(&mut self) {
        self.release_hook = None;
    }

    /// Clears the latch for `button`.
    pub fn reset_button(&mut self, button: MouseButton) {
        if let Some(flag) = self.pressed.get_mut(button.index()) {
            *flag = false;
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn last_x(&self) -> f64 {
        self.last_x
    }

    pub fn last_y(&self) -> f64 {
        self.last_y
    }

    /// Horizontal movement since the previous cursor update.
    pub fn dx(&self) -> f64 {
        self.x - self.last_x
    }

    /// Vertical movement since the previous cursor update.
    pub fn dy(&self) -> f64 {
        self.y - self.last_y
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Latched pressed flag. Out-of-range buttons read as not pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed.get(button.index()).copied().unwrap_or(false)
    }
}

impl fmt::Debug for MouseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseState")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("last_x", &self.last_x)
            .field("last_y", &self.last_y)
            .field("scroll_x", &self.scroll_x)
            .field("scroll_y", &self.scroll_y)
            .field("pressed", &self.pressed)
            .field("dragging", &self.dragging)
            .field("release_hook", &self.release_hook.is_some())
            .finish()
    }
}
