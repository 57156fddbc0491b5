use std::collections::HashMap;

use crate::color::Rgba;
use crate::error::BackendError;

use super::backend::{
    BufferId, BufferTarget, GraphicsBackend, ProgramId, StageId, StageKind, VertexArrayId,
    VertexAttribute,
};
use super::state::{truncate_log, GlState};

/// A draw call accepted by [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub program: ProgramId,
    pub vertex_array: VertexArrayId,
    pub index_count: u32,
    pub first_index: u32,
    /// Attribute slots that fed the draw.
    pub slots: Vec<u32>,
}

/// CPU-only backend.
///
/// Runs the full object model and validation without a device, keeps buffer
/// contents in memory so they can be read back, and records frame activity for
/// inspection.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    gl: GlState,
    buffer_data: HashMap<BufferId, Vec<u8>>,

    clears: Vec<Rgba>,
    draws: Vec<DrawRecord>,
    frames_presented: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear colors in call order.
    pub fn clears(&self) -> &[Rgba] {
        &self.clears
    }

    pub fn last_clear(&self) -> Option<Rgba> {
        self.clears.last().copied()
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of live buffer objects.
    pub fn buffer_count(&self) -> usize {
        self.buffer_data.len()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_shader(&mut self, kind: StageKind) -> StageId {
        self.gl.create_shader(kind)
    }

    fn shader_source(&mut self, shader: StageId, source: &str) {
        let r = self.gl.shader_source(shader, source);
        self.gl.check(r);
    }

    fn compile_shader(&mut self, shader: StageId) {
        let r = self.gl.compile_shader(shader);
        self.gl.check(r);
    }

    fn compile_status(&self, shader: StageId) -> bool {
        self.gl.compile_status(shader)
    }

    fn shader_info_log_length(&self, shader: StageId) -> usize {
        self.gl.shader_log(shader).len()
    }

    fn shader_info_log(&self, shader: StageId, max_len: usize) -> String {
        truncate_log(self.gl.shader_log(shader), max_len)
    }

    fn delete_shader(&mut self, shader: StageId) {
        let r = self.gl.delete_shader(shader);
        self.gl.check(r);
    }

    fn create_program(&mut self) -> ProgramId {
        self.gl.create_program()
    }

    fn attach_shader(&mut self, program: ProgramId, shader: StageId) {
        let r = self.gl.attach_shader(program, shader);
        self.gl.check(r);
    }

    fn link_program(&mut self, program: ProgramId) {
        let r = self.gl.link_program(program);
        self.gl.check(r);
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.gl.link_status(program)
    }

    fn program_info_log_length(&self, program: ProgramId) -> usize {
        self.gl.program_log(program).len()
    }

    fn program_info_log(&self, program: ProgramId, max_len: usize) -> String {
        truncate_log(self.gl.program_log(program), max_len)
    }

    fn delete_program(&mut self, program: ProgramId) {
        let r = self.gl.delete_program(program);
        self.gl.check(r);
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        let r = self.gl.use_program(program);
        self.gl.check(r);
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        self.gl.create_vertex_array()
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) {
        let r = self.gl.bind_vertex_array(vao);
        self.gl.check(r);
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        let r = self.gl.delete_vertex_array(vao);
        self.gl.check(r);
    }

    fn vertex_attrib_pointer(&mut self, slot: u32, attribute: VertexAttribute) {
        let r = self.gl.vertex_attrib_pointer(slot, attribute);
        self.gl.check(r);
    }

    fn enable_vertex_attrib(&mut self, slot: u32) {
        let r = self.gl.set_vertex_attrib_enabled(slot, true);
        self.gl.check(r);
    }

    fn disable_vertex_attrib(&mut self, slot: u32) {
        let r = self.gl.set_vertex_attrib_enabled(slot, false);
        self.gl.check(r);
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = self.gl.create_buffer();
        self.buffer_data.insert(id, Vec::new());
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        let r = self.gl.bind_buffer(target, buffer);
        self.gl.check(r);
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        let r = self.gl.buffer_data(target, data.len());
        if let Some(id) = self.gl.check(r) {
            self.buffer_data.insert(id, data.to_vec());
        }
    }

    fn read_buffer(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.buffer_data.get(&buffer).cloned()
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        let r = self.gl.delete_buffer(buffer);
        if self.gl.check(r).is_some() {
            self.buffer_data.remove(&buffer);
        }
    }

    fn clear(&mut self, color: Rgba) {
        self.clears.push(color);
    }

    fn draw_elements(&mut self, index_count: u32, first_index: u32) {
        let r = self.gl.prepare_draw(index_count, first_index);
        if let Some(setup) = self.gl.check(r) {
            self.draws.push(DrawRecord {
                program: setup.program,
                vertex_array: setup.vertex_array,
                index_count: setup.index_count,
                first_index: setup.first_index,
                slots: setup.attributes.iter().map(|(slot, _)| *slot).collect(),
            });
        }
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    fn take_error(&mut self) -> Option<BackendError> {
        self.gl.take_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_contents_can_be_read_back() {
        let mut gfx = HeadlessBackend::new();
        let vbo = gfx.create_buffer();
        gfx.bind_buffer(BufferTarget::Array, Some(vbo));
        gfx.buffer_data(BufferTarget::Array, &[1, 2, 3, 4]);

        assert_eq!(gfx.read_buffer(vbo), Some(vec![1, 2, 3, 4]));
        assert_eq!(gfx.take_error(), None);
    }

    #[test]
    fn errors_are_queued_not_returned() {
        let mut gfx = HeadlessBackend::new();
        gfx.buffer_data(BufferTarget::Array, &[0; 8]);
        gfx.bind_vertex_array(Some(VertexArrayId(99)));

        assert!(matches!(gfx.take_error(), Some(BackendError::InvalidOperation(_))));
        assert!(matches!(gfx.take_error(), Some(BackendError::InvalidValue(_))));
        assert_eq!(gfx.take_error(), None);
    }

    #[test]
    fn info_log_length_matches_log() {
        let mut gfx = HeadlessBackend::new();
        let fs = gfx.create_shader(StageKind::Fragment);
        gfx.shader_source(fs, "@fragment fn main( -> {}");
        gfx.compile_shader(fs);

        assert!(!gfx.compile_status(fs));
        let len = gfx.shader_info_log_length(fs);
        assert!(len > 0);
        assert_eq!(gfx.shader_info_log(fs, len).len(), len);
    }

    #[test]
    fn frame_activity_is_recorded() {
        let mut gfx = HeadlessBackend::new();
        gfx.clear(Rgba::white());
        gfx.present();
        gfx.clear(Rgba::black());
        gfx.present();

        assert_eq!(gfx.clears().len(), 2);
        assert_eq!(gfx.last_clear(), Some(Rgba::black()));
        assert_eq!(gfx.frames_presented(), 2);
    }

    #[test]
    fn deleted_buffer_is_gone() {
        let mut gfx = HeadlessBackend::new();
        let b = gfx.create_buffer();
        gfx.delete_buffer(b);
        assert_eq!(gfx.read_buffer(b), None);
        assert_eq!(gfx.buffer_count(), 0);
    }
}
