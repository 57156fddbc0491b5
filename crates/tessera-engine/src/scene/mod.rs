//! Scenes and scene selection.
//!
//! Exactly one scene is active at a time. The set of scenes is closed and
//! addressed by [`SceneId`]; the engine runner owns the active scene and calls
//! [`Scene::teardown`] before replacing it.

mod editor;
mod level;

pub use editor::EditorScene;
pub use level::LevelScene;

use crate::color::Rgba;
use crate::core::FrameCtx;
use crate::error::EngineError;
use crate::gpu::GraphicsBackend;

/// What the engine should do after a scene update.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SceneControl {
    Continue,
    /// Replace the active scene at the end of this iteration.
    SwitchTo(SceneId),
    /// Stop the loop at the end of this iteration.
    Exit,
}

/// Identifier of a known scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum SceneId {
    Editor = 0,
    Level = 1,
}

impl SceneId {
    pub const ALL: [SceneId; 2] = [SceneId::Editor, SceneId::Level];

    /// Builds the uninitialized scene for this id.
    pub fn instantiate(self) -> Box<dyn Scene> {
        match self {
            SceneId::Editor => Box::new(EditorScene::new()),
            SceneId::Level => Box::new(LevelScene::new()),
        }
    }
}

impl TryFrom<i32> for SceneId {
    type Error = EngineError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SceneId::Editor),
            1 => Ok(SceneId::Level),
            other => Err(EngineError::UnknownScene(other)),
        }
    }
}

impl From<SceneId> for i32 {
    fn from(id: SceneId) -> Self {
        id as i32
    }
}

/// Scene contract.
///
/// `init` runs exactly once, before the first `update`. `teardown` runs once
/// when the scene is replaced or the engine shuts down and must release every
/// GPU object the scene created.
pub trait Scene {
    fn name(&self) -> &'static str;

    fn init(
        &mut self,
        gfx: &mut dyn GraphicsBackend,
        clear_color: &mut Rgba,
    ) -> Result<(), EngineError>;

    /// Advances the scene by `dt` seconds (never negative) and issues its draws.
    fn update(&mut self, dt: f32, ctx: &mut FrameCtx<'_>) -> Result<SceneControl, EngineError>;

    fn teardown(&mut self, gfx: &mut dyn GraphicsBackend);
}
