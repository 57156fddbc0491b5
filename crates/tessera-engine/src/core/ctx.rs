use crate::color::Rgba;
use crate::gpu::GraphicsBackend;
use crate::input::InputContext;

/// Per-frame context handed to the active scene's update.
pub struct FrameCtx<'a> {
    pub gfx: &'a mut dyn GraphicsBackend,
    /// Input as of this iteration's poll. Read-only during the update.
    pub input: &'a InputContext,
    /// Completed loop iterations before this one.
    pub frame_index: u64,
    /// Clear color applied at the start of the next iteration.
    pub clear_color: &'a mut Rgba,
}
