use crate::color::Rgba;
use crate::core::FrameCtx;
use crate::error::EngineError;
use crate::gpu::GraphicsBackend;

use super::{Scene, SceneControl};

/// Scene entered after the editor fade. Owns no GPU resources.
#[derive(Debug, Default)]
pub struct LevelScene;

impl LevelScene {
    pub fn new() -> Self {
        Self
    }
}

impl Scene for LevelScene {
    fn name(&self) -> &'static str {
        "level"
    }

    fn init(
        &mut self,
        _gfx: &mut dyn GraphicsBackend,
        clear_color: &mut Rgba,
    ) -> Result<(), EngineError> {
        *clear_color = Rgba::white();
        Ok(())
    }

    fn update(&mut self, _dt: f32, _ctx: &mut FrameCtx<'_>) -> Result<SceneControl, EngineError> {
        Ok(SceneControl::Continue)
    }

    fn teardown(&mut self, _gfx: &mut dyn GraphicsBackend) {}
}
