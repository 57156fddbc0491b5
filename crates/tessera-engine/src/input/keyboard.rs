use std::collections::HashSet;
use std::fmt;

use super::types::{Key, KeyState, Modifiers};

/// Callback invoked for every key release event.
pub type KeyReleaseHook = Box<dyn FnMut(Key, Modifiers)>;

/// Keyboard state mutated by the platform's key callback.
///
/// Same latch semantics as [`MouseState`](super::MouseState): a press sets
/// the key's flag, releases are reported through the hook only.
#[derive(Default)]
pub struct KeyboardState {
    pressed: HashSet<Key>,
    modifiers: Modifiers,
    release_hook: Option<KeyReleaseHook>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_callback(
        &mut self,
        key: Key,
        code: u32,
        state: KeyState,
        modifiers: Modifiers,
        repeat: bool,
    ) {
        self.modifiers = modifiers;

        match state {
            KeyState::Pressed => {
                if self.pressed.insert(key) {
                    log::trace!("key {key} latched (code {code})");
                } else if !repeat {
                    log::trace!("key {key} pressed again while latched");
                }
            }
            KeyState::Released => {
                if let Some(hook) = self.release_hook.as_mut() {
                    hook(key, modifiers);
                }
            }
        }
    }

    pub fn set_release_hook(&mut self, hook: impl FnMut(Key, Modifiers) + 'static) {
        self.release_hook = Some(Box::new(hook));
    }

    pub fn clear_release_hook(&mut self) {
        self.release_hook = None;
    }

    /// Clears the latch for `key`.
    pub fn reset_key(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Modifier state reported by the most recent key event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardState")
            .field("pressed", &self.pressed)
            .field("modifiers", &self.modifiers)
            .field("release_hook", &self.release_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kb: &mut KeyboardState, k: Key, state: KeyState) {
        kb.key_callback(k, 0, state, Modifiers::default(), false);
    }

    #[test]
    fn key_press_latches() {
        let mut kb = KeyboardState::new();
        key(&mut kb, Key::Space, KeyState::Pressed);
        key(&mut kb, Key::Space, KeyState::Released);
        assert!(kb.is_key_pressed(Key::Space));
        assert!(!kb.is_key_pressed(Key::Enter));
    }

    #[test]
    fn reset_key_clears_latch() {
        let mut kb = KeyboardState::new();
        key(&mut kb, Key::A, KeyState::Pressed);
        kb.reset_key(Key::A);
        assert!(!kb.is_key_pressed(Key::A));
    }

    #[test]
    fn tracks_modifiers_from_last_event() {
        let mut kb = KeyboardState::new();
        let mods = Modifiers { shift: true, ..Modifiers::default() };
        kb.key_callback(Key::S, 31, KeyState::Pressed, mods, false);
        assert!(kb.modifiers().shift);
        assert!(kb.modifiers().any());
    }
}
