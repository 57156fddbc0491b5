use std::fmt;

use crate::color::Rgba;
use crate::error::BackendError;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Raw backend object name.
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

object_id!(
    /// Handle to a shader stage object.
    StageId
);
object_id!(
    /// Handle to a program object.
    ProgramId
);
object_id!(
    /// Handle to a vertex array object.
    VertexArrayId
);
object_id!(
    /// Handle to a buffer object.
    BufferId
);

/// Buffer binding point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data; the binding is recorded in the bound vertex array.
    ElementArray,
}

/// Layout of one `f32` vertex attribute inside an interleaved buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Number of `f32` components (1..=4).
    pub components: u8,
    /// Byte distance between consecutive vertices.
    pub stride: u32,
    /// Byte offset of the first component within a vertex.
    pub offset: u32,
}

/// Graphics backend contract.
///
/// A GL-style state machine: objects are addressed by typed handles, most
/// calls act on the current bindings, and failures are not returned per call.
/// Instead the backend queues a [`BackendError`] that callers poll with
/// [`take_error`](Self::take_error). Compile and link outcomes are queried
/// through status + info-log calls.
///
/// Every draw is an indexed triangle list with `u32` indices.
pub trait GraphicsBackend {
    // ── shader stages ─────────────────────────────────────────────────────

    fn create_shader(&mut self, kind: StageKind) -> StageId;
    fn shader_source(&mut self, shader: StageId, source: &str);
    fn compile_shader(&mut self, shader: StageId);
    fn compile_status(&self, shader: StageId) -> bool;
    /// Length of the compile diagnostics in bytes (0 when there are none).
    fn shader_info_log_length(&self, shader: StageId) -> usize;
    /// Compile diagnostics, truncated to at most `max_len` bytes.
    fn shader_info_log(&self, shader: StageId, max_len: usize) -> String;
    fn delete_shader(&mut self, shader: StageId);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&mut self) -> ProgramId;
    fn attach_shader(&mut self, program: ProgramId, shader: StageId);
    fn link_program(&mut self, program: ProgramId);
    fn link_status(&self, program: ProgramId) -> bool;
    fn program_info_log_length(&self, program: ProgramId) -> usize;
    fn program_info_log(&self, program: ProgramId, max_len: usize) -> String;
    fn delete_program(&mut self, program: ProgramId);
    /// `None` unbinds the current program.
    fn use_program(&mut self, program: Option<ProgramId>);

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> VertexArrayId;
    /// `None` unbinds the current vertex array.
    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&mut self, vao: VertexArrayId);
    /// Declares attribute `slot` of the bound vertex array, sourced from the
    /// buffer currently bound to [`BufferTarget::Array`].
    fn vertex_attrib_pointer(&mut self, slot: u32, attribute: VertexAttribute);
    fn enable_vertex_attrib(&mut self, slot: u32);
    fn disable_vertex_attrib(&mut self, slot: u32);

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> BufferId;
    /// `None` unbinds the target.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    /// Replaces the storage of the buffer bound to `target` with `data`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    /// Reads back buffer contents. `None` when the backend cannot read GPU
    /// storage or the buffer does not exist.
    fn read_buffer(&self, buffer: BufferId) -> Option<Vec<u8>>;
    fn delete_buffer(&mut self, buffer: BufferId);

    // ── frame ─────────────────────────────────────────────────────────────

    /// Clears the color target of the current frame, starting one if needed.
    fn clear(&mut self, color: Rgba);
    /// Draws `index_count` indices starting at `first_index` of the bound
    /// vertex array's element buffer.
    fn draw_elements(&mut self, index_count: u32, first_index: u32);
    /// Finishes the current frame and hands it to the presentation engine.
    fn present(&mut self);

    /// Pops the oldest queued error.
    fn take_error(&mut self) -> Option<BackendError>;
}
