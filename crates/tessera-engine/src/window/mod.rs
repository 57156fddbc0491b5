//! Window-system platforms.
//!
//! A [`Platform`] owns the OS window (if any) and its event queue. The engine
//! loop asks it to poll events into the [`InputHandler`], to present frames,
//! and whether the user asked to close.

mod desktop;
mod headless;
mod translate;

pub use desktop::DesktopPlatform;
pub use headless::HeadlessPlatform;

use crate::gpu::GraphicsBackend;
use crate::input::InputHandler;

/// Window-system boundary used by the engine loop.
pub trait Platform {
    /// Backend the platform presents through.
    type Graphics: GraphicsBackend + 'static;

    /// True once the user (or the platform) has asked the window to close.
    fn should_close(&self) -> bool;

    /// Drains pending window-system events without blocking, invoking the
    /// input callbacks synchronously.
    fn poll_events(&mut self, gfx: &mut Self::Graphics, input: &mut dyn InputHandler);

    /// Presents the frame rendered since the last swap.
    fn swap_buffers(&mut self, gfx: &mut Self::Graphics);

    /// Releases platform resources. Called once, after the loop ends.
    fn shutdown(&mut self, _gfx: &mut Self::Graphics) {}
}
