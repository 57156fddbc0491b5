//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platforms translate window-system events into [`InputHandler`] calls on the
//! engine-owned [`InputContext`].

mod context;
mod keyboard;
mod mouse;
mod types;

pub use context::{InputContext, InputHandler};
pub use keyboard::{KeyReleaseHook, KeyboardState};
pub use mouse::{MouseReleaseHook, MouseState, MOUSE_BUTTON_COUNT};
pub use types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};
