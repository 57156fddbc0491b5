use super::keyboard::KeyboardState;
use super::mouse::MouseState;
use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};

/// Callback entry points matching the window system's input events.
///
/// Platforms invoke these synchronously from inside `poll_events`, on the
/// thread that owns the loop. Nothing else mutates input state.
pub trait InputHandler {
    fn cursor_pos(&mut self, x: f64, y: f64);
    fn mouse_button(&mut self, button: MouseButton, state: MouseButtonState, modifiers: Modifiers);
    fn scroll(&mut self, x: f64, y: f64);
    fn key(&mut self, key: Key, code: u32, state: KeyState, modifiers: Modifiers, repeat: bool);
}

/// Input state owned by the engine runner.
///
/// Lent mutably to the platform while polling and shared read-only with the
/// active scene during its update.
#[derive(Debug, Default)]
pub struct InputContext {
    pub mouse: MouseState,
    pub keyboard: KeyboardState,
}

impl InputContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a recorded event.
    pub fn apply(&mut self, event: &InputEvent) {
        event.dispatch(self);
    }

    /// Resets per-frame deltas. Called once per loop iteration after presenting.
    pub fn end_frame(&mut self) {
        self.mouse.end_frame();
    }
}

impl InputHandler for InputContext {
    fn cursor_pos(&mut self, x: f64, y: f64) {
        self.mouse.cursor_pos_callback(x, y);
    }

    fn mouse_button(&mut self, button: MouseButton, state: MouseButtonState, modifiers: Modifiers) {
        self.mouse.mouse_button_callback(button, state, modifiers);
    }

    fn scroll(&mut self, x: f64, y: f64) {
        self.mouse.scroll_callback(x, y);
    }

    fn key(&mut self, key: Key, code: u32, state: KeyState, modifiers: Modifiers, repeat: bool) {
        self.keyboard.key_callback(key, code, state, modifiers, repeat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_events_reach_the_right_state() {
        let mut input = InputContext::new();

        input.apply(&InputEvent::CursorMoved { x: 12.0, y: 7.5 });
        input.apply(&InputEvent::MouseButton {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            modifiers: Modifiers::default(),
        });
        input.apply(&InputEvent::Scroll { x: 0.0, y: 2.0 });
        input.apply(&InputEvent::Key {
            key: Key::Escape,
            code: 1,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });

        assert_eq!(input.mouse.x(), 12.0);
        assert!(input.mouse.is_button_pressed(MouseButton::Left));
        assert_eq!(input.mouse.scroll_y(), 2.0);
        assert!(input.keyboard.is_key_pressed(Key::Escape));
    }

    #[test]
    fn end_frame_only_touches_per_frame_deltas() {
        let mut input = InputContext::new();
        input.scroll(1.0, 1.0);
        input.mouse_button(MouseButton::Right, MouseButtonState::Pressed, Modifiers::default());

        input.end_frame();

        assert_eq!(input.mouse.scroll_x(), 0.0);
        assert!(input.mouse.is_button_pressed(MouseButton::Right));
    }
}
