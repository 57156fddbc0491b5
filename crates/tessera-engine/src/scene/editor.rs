use crate::color::Rgba;
use crate::core::FrameCtx;
use crate::error::EngineError;
use crate::gpu::{GraphicsBackend, Mesh, ShaderProgram, Vertex};
use crate::input::Key;

use super::{Scene, SceneControl, SceneId};

const VERTEX_SHADER: &str = include_str!("shaders/position_color.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/position_color.frag.wgsl");

/// Colored quad: bottom-right red, top-left green, top-right blue, bottom-left yellow.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new([0.5, -0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::new([-0.5, 0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([0.5, 0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
    Vertex::new([-0.5, -0.5, 0.0], [1.0, 1.0, 0.0, 1.0]),
];

/// Two counter-clockwise triangles.
pub const QUAD_INDICES: [u32; 6] = [2, 1, 0, 0, 1, 3];

/// Seconds the fade runs before switching to the level.
const FADE_SECONDS: f32 = 2.0;
/// Clear color darkening per second while fading.
const FADE_RATE: f32 = 5.0;

/// Scene 0: draws the quad; Space fades the clear color out and switches to
/// the level scene.
#[derive(Debug)]
pub struct EditorScene {
    program: Option<ShaderProgram>,
    mesh: Option<Mesh>,

    changing_scene: bool,
    time_to_change_scene: f32,
}

impl EditorScene {
    pub fn new() -> Self {
        Self {
            program: None,
            mesh: None,
            changing_scene: false,
            time_to_change_scene: FADE_SECONDS,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.changing_scene
    }
}

impl Default for EditorScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for EditorScene {
    fn name(&self) -> &'static str {
        "editor"
    }

    fn init(
        &mut self,
        gfx: &mut dyn GraphicsBackend,
        _clear_color: &mut Rgba,
    ) -> Result<(), EngineError> {
        let program = ShaderProgram::build(gfx, "position_color", VERTEX_SHADER, FRAGMENT_SHADER)?;
        let mesh = match Mesh::upload(gfx, &QUAD_VERTICES, &QUAD_INDICES) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.destroy(gfx);
                return Err(e);
            }
        };

        self.program = Some(program);
        self.mesh = Some(mesh);
        Ok(())
    }

    fn update(&mut self, dt: f32, ctx: &mut FrameCtx<'_>) -> Result<SceneControl, EngineError> {
        if let (Some(program), Some(mesh)) = (&self.program, &self.mesh) {
            mesh.draw(ctx.gfx, program)?;
        }

        if !self.changing_scene && ctx.input.keyboard.is_key_pressed(Key::Space) {
            log::info!("editor: fading out");
            self.changing_scene = true;
        }

        if self.changing_scene {
            if self.time_to_change_scene > 0.0 {
                self.time_to_change_scene -= dt;
                *ctx.clear_color = ctx.clear_color.darkened(FADE_RATE * dt);
            } else {
                return Ok(SceneControl::SwitchTo(SceneId::Level));
            }
        }

        Ok(SceneControl::Continue)
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsBackend) {
        if let Some(mesh) = self.mesh.take() {
            mesh.destroy(gfx);
        }
        if let Some(program) = self.program.take() {
            program.destroy(gfx);
        }
    }
}
