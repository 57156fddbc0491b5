//! Engine error types.
//!
//! Every variant is fatal at the layer that produces it: scenes and the GPU
//! pipeline propagate these up to the engine runner, which logs them and stops
//! the loop. Setup failures (window, adapter, config files) use `anyhow`
//! instead and never reach this type.

use thiserror::Error;

use crate::gpu::StageKind;

/// Fatal engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A shader stage failed to compile.
    #[error("'{label}': {stage} shader compilation failed\n{log}")]
    Compile {
        label: String,
        stage: StageKind,
        log: String,
    },

    /// Compiled stages failed to link into a program.
    #[error("'{label}': linking shaders failed\n{log}")]
    Link { label: String, log: String },

    /// Scene selection received an identifier outside the known set.
    #[error("unknown scene '{0}'")]
    UnknownScene(i32),

    /// Mesh data violates the index/vertex invariant.
    #[error(
        "index {index} at position {position} references a missing vertex ({vertex_count} vertices)"
    )]
    InvalidMesh {
        index: u32,
        position: usize,
        vertex_count: usize,
    },

    /// The graphics backend reported an error after a pipeline operation.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Error reported by a graphics backend through its error queue.
///
/// Mirrors the GL error model: calls do not fail individually, the backend
/// queues an error and the caller polls for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// An argument referenced an object that does not exist or is out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The call is not allowed in the current binding state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The underlying device rejected the request.
    #[error("device error: {0}")]
    Device(String),
}
