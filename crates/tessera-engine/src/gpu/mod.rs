//! GPU resource pipeline.
//!
//! [`GraphicsBackend`] is the device contract. [`shader`] and [`mesh`] build
//! programs and geometry on top of it and turn backend failures into
//! [`EngineError`](crate::error::EngineError)s.

mod backend;
mod headless;
mod shader_check;
mod state;

pub mod mesh;
pub mod shader;

pub use backend::{
    BufferId, BufferTarget, GraphicsBackend, ProgramId, StageId, StageKind, VertexArrayId,
    VertexAttribute,
};
pub use headless::{DrawRecord, HeadlessBackend};
pub use mesh::{Mesh, Vertex, VertexLayout};
pub use shader::ShaderProgram;
pub use state::MAX_VERTEX_ATTRIBS;

pub(crate) use state::{truncate_log, AttributeBinding, GlState, LinkedProgram};
