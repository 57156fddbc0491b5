//! Object tables and binding rules shared by every backend.
//!
//! Backends own a [`GlState`] and forward the bookkeeping part of each
//! [`GraphicsBackend`](super::GraphicsBackend) call to it, then do their own
//! device work with what it returns. Rule violations are queued as
//! [`BackendError`]s and surface through `take_error`.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::error::BackendError;

use super::backend::{
    BufferId, BufferTarget, ProgramId, StageId, StageKind, VertexArrayId, VertexAttribute,
};
use super::shader_check::{self, StageInterface};

/// Highest attribute slot count a vertex array supports.
pub const MAX_VERTEX_ATTRIBS: u32 = 16;

/// Size in bytes of one `u32` index.
const INDEX_SIZE: u64 = 4;

#[derive(Debug)]
pub(crate) struct StageObject {
    pub kind: StageKind,
    pub source: String,
    pub interface: Option<StageInterface>,
    pub log: String,
}

/// Snapshot taken at link time. Remains valid after the stages are deleted.
#[derive(Debug, Clone)]
pub(crate) struct LinkedProgram {
    pub vertex_source: String,
    pub vertex_entry: String,
    pub fragment_source: String,
    pub fragment_entry: String,
    /// Vertex input locations the program consumes.
    pub vertex_inputs: Vec<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct ProgramObject {
    pub attached: Vec<StageId>,
    pub linked: Option<LinkedProgram>,
    pub log: String,
}

/// One declared attribute and the buffer it reads from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct AttributeBinding {
    pub attribute: VertexAttribute,
    pub buffer: BufferId,
}

#[derive(Debug, Default)]
pub(crate) struct VertexArrayObject {
    pub attributes: BTreeMap<u32, AttributeBinding>,
    pub enabled: BTreeSet<u32>,
    pub element_buffer: Option<BufferId>,
}

#[derive(Debug, Default)]
pub(crate) struct BufferObject {
    pub len: u64,
}

/// Everything a backend needs to issue a validated draw.
#[derive(Debug, Clone)]
pub(crate) struct DrawSetup {
    pub program: ProgramId,
    pub vertex_array: VertexArrayId,
    pub element_buffer: BufferId,
    /// Enabled attributes the program consumes, ordered by slot.
    pub attributes: Vec<(u32, AttributeBinding)>,
    pub index_count: u32,
    pub first_index: u32,
}

#[derive(Debug, Default)]
pub(crate) struct GlState {
    next_name: u32,

    stages: HashMap<StageId, StageObject>,
    programs: HashMap<ProgramId, ProgramObject>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayObject>,
    buffers: HashMap<BufferId, BufferObject>,

    current_program: Option<ProgramId>,
    bound_vertex_array: Option<VertexArrayId>,
    bound_array_buffer: Option<BufferId>,

    errors: VecDeque<BackendError>,
}

impl GlState {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    // ── errors ────────────────────────────────────────────────────────────

    pub fn report(&mut self, err: BackendError) {
        log::debug!("backend error queued: {err}");
        self.errors.push_back(err);
    }

    /// Queues the error of `result`, if any, and passes the value through.
    pub fn check<T>(&mut self, result: Result<T, BackendError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn take_error(&mut self) -> Option<BackendError> {
        self.errors.pop_front()
    }

    // ── shader stages ─────────────────────────────────────────────────────

    pub fn create_shader(&mut self, kind: StageKind) -> StageId {
        let id = StageId(self.next_name());
        self.stages.insert(
            id,
            StageObject {
                kind,
                source: String::new(),
                interface: None,
                log: String::new(),
            },
        );
        id
    }

    fn stage_mut(&mut self, id: StageId) -> Result<&mut StageObject, BackendError> {
        self.stages
            .get_mut(&id)
            .ok_or_else(|| BackendError::InvalidValue(format!("no shader stage {}", id.0)))
    }

    pub fn shader_source(&mut self, id: StageId, source: &str) -> Result<(), BackendError> {
        let stage = self.stage_mut(id)?;
        stage.source = source.to_owned();
        Ok(())
    }

    /// Compiles the stage's current source. A failed compile is not an error;
    /// it is reported through the compile status and info log.
    pub fn compile_shader(&mut self, id: StageId) -> Result<(), BackendError> {
        let stage = self.stage_mut(id)?;
        match shader_check::compile_stage(stage.kind, &stage.source) {
            Ok(interface) => {
                stage.interface = Some(interface);
                stage.log.clear();
            }
            Err(log) => {
                stage.interface = None;
                stage.log = log;
            }
        }
        Ok(())
    }

    pub fn compile_status(&self, id: StageId) -> bool {
        self.stages.get(&id).is_some_and(|s| s.interface.is_some())
    }

    pub fn shader_log(&self, id: StageId) -> &str {
        self.stages.get(&id).map_or("", |s| s.log.as_str())
    }

    pub fn delete_shader(&mut self, id: StageId) -> Result<(), BackendError> {
        self.stages
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BackendError::InvalidValue(format!("no shader stage {}", id.0)))
    }

    // ── programs ──────────────────────────────────────────────────────────

    pub fn create_program(&mut self) -> ProgramId {
        let id = ProgramId(self.next_name());
        self.programs.insert(id, ProgramObject::default());
        id
    }

    pub fn program(&self, id: ProgramId) -> Option<&ProgramObject> {
        self.programs.get(&id)
    }

    fn program_mut(&mut self, id: ProgramId) -> Result<&mut ProgramObject, BackendError> {
        self.programs
            .get_mut(&id)
            .ok_or_else(|| BackendError::InvalidValue(format!("no program {}", id.0)))
    }

    pub fn attach_shader(
        &mut self,
        program: ProgramId,
        stage: StageId,
    ) -> Result<(), BackendError> {
        if !self.stages.contains_key(&stage) {
            return Err(BackendError::InvalidValue(format!("no shader stage {}", stage.0)));
        }
        let prog = self.program_mut(program)?;
        if prog.attached.contains(&stage) {
            return Err(BackendError::InvalidOperation(format!(
                "shader stage {} is already attached to program {}",
                stage.0, program.0
            )));
        }
        prog.attached.push(stage);
        Ok(())
    }

    /// Links the attached stages. Like compilation, a failed link is reported
    /// through the link status and info log.
    pub fn link_program(&mut self, id: ProgramId) -> Result<(), BackendError> {
        let attached = self.program_mut(id)?.attached.clone();
        let outcome = self.try_link(&attached);

        let prog = self.program_mut(id)?;
        match outcome {
            Ok(linked) => {
                prog.linked = Some(linked);
                prog.log.clear();
            }
            Err(log) => {
                prog.linked = None;
                prog.log = log;
            }
        }
        Ok(())
    }

    fn try_link(&self, attached: &[StageId]) -> Result<LinkedProgram, String> {
        let mut vertex = None;
        let mut fragment = None;

        for id in attached {
            // Attached stages deleted before linking are simply gone.
            let Some(stage) = self.stages.get(id) else {
                continue;
            };
            let slot = match stage.kind {
                StageKind::Vertex => &mut vertex,
                StageKind::Fragment => &mut fragment,
            };
            if slot.is_some() {
                return Err(format!("more than one {} stage attached", stage.kind));
            }
            *slot = Some(stage);
        }

        let vertex = vertex.ok_or("no vertex stage attached")?;
        let fragment = fragment.ok_or("no fragment stage attached")?;

        let vs = vertex
            .interface
            .as_ref()
            .ok_or("vertex stage was not successfully compiled")?;
        let fs = fragment
            .interface
            .as_ref()
            .ok_or("fragment stage was not successfully compiled")?;

        shader_check::link_stages(vs, fs)?;

        Ok(LinkedProgram {
            vertex_source: vertex.source.clone(),
            vertex_entry: vs.entry_point.clone(),
            fragment_source: fragment.source.clone(),
            fragment_entry: fs.entry_point.clone(),
            vertex_inputs: vs.inputs.clone(),
        })
    }

    pub fn link_status(&self, id: ProgramId) -> bool {
        self.programs.get(&id).is_some_and(|p| p.linked.is_some())
    }

    pub fn program_log(&self, id: ProgramId) -> &str {
        self.programs.get(&id).map_or("", |p| p.log.as_str())
    }

    pub fn delete_program(&mut self, id: ProgramId) -> Result<(), BackendError> {
        if self.programs.remove(&id).is_none() {
            return Err(BackendError::InvalidValue(format!("no program {}", id.0)));
        }
        if self.current_program == Some(id) {
            self.current_program = None;
        }
        Ok(())
    }

    pub fn use_program(&mut self, id: Option<ProgramId>) -> Result<(), BackendError> {
        if let Some(id) = id {
            let prog = self
                .programs
                .get(&id)
                .ok_or_else(|| BackendError::InvalidValue(format!("no program {}", id.0)))?;
            if prog.linked.is_none() {
                return Err(BackendError::InvalidOperation(format!(
                    "program {} is not linked",
                    id.0
                )));
            }
        }
        self.current_program = id;
        Ok(())
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    pub fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId(self.next_name());
        self.vertex_arrays.insert(id, VertexArrayObject::default());
        id
    }

    pub fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) -> Result<(), BackendError> {
        if let Some(id) = id {
            if !self.vertex_arrays.contains_key(&id) {
                return Err(BackendError::InvalidValue(format!("no vertex array {}", id.0)));
            }
        }
        self.bound_vertex_array = id;
        Ok(())
    }

    pub fn delete_vertex_array(&mut self, id: VertexArrayId) -> Result<(), BackendError> {
        if self.vertex_arrays.remove(&id).is_none() {
            return Err(BackendError::InvalidValue(format!("no vertex array {}", id.0)));
        }
        if self.bound_vertex_array == Some(id) {
            self.bound_vertex_array = None;
        }
        Ok(())
    }

    fn bound_vertex_array_mut(
        &mut self,
        call: &str,
    ) -> Result<&mut VertexArrayObject, BackendError> {
        let id = self.bound_vertex_array.ok_or_else(|| {
            BackendError::InvalidOperation(format!("{call} requires a bound vertex array"))
        })?;
        self.vertex_arrays.get_mut(&id).ok_or_else(|| {
            BackendError::InvalidOperation(format!("vertex array {} was deleted", id.0))
        })
    }

    fn check_slot(slot: u32) -> Result<(), BackendError> {
        if slot >= MAX_VERTEX_ATTRIBS {
            return Err(BackendError::InvalidValue(format!(
                "attribute slot {slot} exceeds the limit of {MAX_VERTEX_ATTRIBS}"
            )));
        }
        Ok(())
    }

    pub fn vertex_attrib_pointer(
        &mut self,
        slot: u32,
        attribute: VertexAttribute,
    ) -> Result<(), BackendError> {
        Self::check_slot(slot)?;
        if !(1..=4).contains(&attribute.components) {
            return Err(BackendError::InvalidValue(format!(
                "attribute slot {slot}: {} components (expected 1..=4)",
                attribute.components
            )));
        }
        let buffer = self.bound_array_buffer.ok_or_else(|| {
            BackendError::InvalidOperation(format!(
                "attribute slot {slot}: no buffer bound to the array target"
            ))
        })?;

        let vao = self.bound_vertex_array_mut("vertex_attrib_pointer")?;
        vao.attributes.insert(slot, AttributeBinding { attribute, buffer });
        Ok(())
    }

    pub fn set_vertex_attrib_enabled(
        &mut self,
        slot: u32,
        enabled: bool,
    ) -> Result<(), BackendError> {
        Self::check_slot(slot)?;
        let vao = self.bound_vertex_array_mut(if enabled {
            "enable_vertex_attrib"
        } else {
            "disable_vertex_attrib"
        })?;
        if enabled {
            vao.enabled.insert(slot);
        } else {
            vao.enabled.remove(&slot);
        }
        Ok(())
    }

    // ── buffers ───────────────────────────────────────────────────────────

    pub fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next_name());
        self.buffers.insert(id, BufferObject::default());
        id
    }

    pub fn bind_buffer(
        &mut self,
        target: BufferTarget,
        id: Option<BufferId>,
    ) -> Result<(), BackendError> {
        if let Some(id) = id {
            if !self.buffers.contains_key(&id) {
                return Err(BackendError::InvalidValue(format!("no buffer {}", id.0)));
            }
        }
        match target {
            BufferTarget::Array => self.bound_array_buffer = id,
            BufferTarget::ElementArray => {
                let vao = self.bound_vertex_array_mut("binding an element buffer")?;
                vao.element_buffer = id;
            }
        }
        Ok(())
    }

    /// Buffer currently bound to `target`.
    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.bound_array_buffer,
            BufferTarget::ElementArray => self
                .bound_vertex_array
                .and_then(|id| self.vertex_arrays.get(&id))
                .and_then(|vao| vao.element_buffer),
        }
    }

    /// Records the new size of the buffer bound to `target` and returns it.
    pub fn buffer_data(
        &mut self,
        target: BufferTarget,
        len: usize,
    ) -> Result<BufferId, BackendError> {
        let id = self.bound_buffer(target).ok_or_else(|| {
            BackendError::InvalidOperation(format!("buffer_data: no buffer bound to {target:?}"))
        })?;
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or_else(|| BackendError::InvalidOperation(format!("buffer {} was deleted", id.0)))?;
        buffer.len = len as u64;
        Ok(id)
    }

    pub fn delete_buffer(&mut self, id: BufferId) -> Result<(), BackendError> {
        if self.buffers.remove(&id).is_none() {
            return Err(BackendError::InvalidValue(format!("no buffer {}", id.0)));
        }
        if self.bound_array_buffer == Some(id) {
            self.bound_array_buffer = None;
        }
        for vao in self.vertex_arrays.values_mut() {
            if vao.element_buffer == Some(id) {
                vao.element_buffer = None;
            }
        }
        Ok(())
    }

    // ── draw ──────────────────────────────────────────────────────────────

    /// Validates the current bindings for an indexed draw.
    pub fn prepare_draw(
        &self,
        index_count: u32,
        first_index: u32,
    ) -> Result<DrawSetup, BackendError> {
        let program = self.current_program.ok_or_else(|| {
            BackendError::InvalidOperation("draw_elements: no program in use".into())
        })?;
        let linked = self
            .programs
            .get(&program)
            .and_then(|p| p.linked.as_ref())
            .ok_or_else(|| {
                BackendError::InvalidOperation(format!(
                    "draw_elements: program {} is not linked",
                    program.0
                ))
            })?;

        let vertex_array = self.bound_vertex_array.ok_or_else(|| {
            BackendError::InvalidOperation("draw_elements: no vertex array bound".into())
        })?;
        let vao = self.vertex_arrays.get(&vertex_array).ok_or_else(|| {
            BackendError::InvalidOperation(format!("vertex array {} was deleted", vertex_array.0))
        })?;

        let element_buffer = vao.element_buffer.ok_or_else(|| {
            BackendError::InvalidOperation(
                "draw_elements: vertex array has no element buffer".into(),
            )
        })?;
        let element_len = self.buffers.get(&element_buffer).map_or(0, |b| b.len);
        let needed = (u64::from(first_index) + u64::from(index_count)) * INDEX_SIZE;
        if needed > element_len {
            return Err(BackendError::InvalidOperation(format!(
                "draw_elements: indices {first_index}..{} exceed element buffer of \
                 {element_len} bytes",
                u64::from(first_index) + u64::from(index_count)
            )));
        }

        let mut attributes = Vec::with_capacity(linked.vertex_inputs.len());
        for &slot in &linked.vertex_inputs {
            if !vao.enabled.contains(&slot) {
                return Err(BackendError::InvalidOperation(format!(
                    "draw_elements: program reads attribute {slot} but it is not enabled"
                )));
            }
            let binding = vao.attributes.get(&slot).ok_or_else(|| {
                BackendError::InvalidOperation(format!(
                    "draw_elements: attribute {slot} is enabled without a pointer"
                ))
            })?;
            if !self.buffers.contains_key(&binding.buffer) {
                return Err(BackendError::InvalidOperation(format!(
                    "draw_elements: attribute {slot} reads deleted buffer {}",
                    binding.buffer.0
                )));
            }
            attributes.push((slot, *binding));
        }

        Ok(DrawSetup {
            program,
            vertex_array,
            element_buffer,
            attributes,
            index_count,
            first_index,
        })
    }
}

/// Truncates `log` to at most `max_len` bytes on a char boundary.
pub(crate) fn truncate_log(log: &str, max_len: usize) -> String {
    if log.len() <= max_len {
        return log.to_owned();
    }
    let mut end = max_len;
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct Out {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) p: vec3<f32>, @location(1) c: vec4<f32>) -> Out {
    var o: Out;
    o.pos = vec4<f32>(p, 1.0);
    o.color = c;
    return o;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) c: vec4<f32>) -> @location(0) vec4<f32> {
    return c;
}
"#;

    const ATTR: VertexAttribute = VertexAttribute {
        components: 3,
        stride: 12,
        offset: 0,
    };

    fn linked_program(gl: &mut GlState) -> ProgramId {
        let vs = gl.create_shader(StageKind::Vertex);
        gl.shader_source(vs, VS).unwrap();
        gl.compile_shader(vs).unwrap();
        let fs = gl.create_shader(StageKind::Fragment);
        gl.shader_source(fs, FS).unwrap();
        gl.compile_shader(fs).unwrap();

        let p = gl.create_program();
        gl.attach_shader(p, vs).unwrap();
        gl.attach_shader(p, fs).unwrap();
        gl.link_program(p).unwrap();
        gl.delete_shader(vs).unwrap();
        gl.delete_shader(fs).unwrap();
        p
    }

    /// VAO with two attribute pointers and a 6-index element buffer, left bound.
    fn ready_vertex_array(gl: &mut GlState) -> VertexArrayId {
        let vao = gl.create_vertex_array();
        gl.bind_vertex_array(Some(vao)).unwrap();
        let vbo = gl.create_buffer();
        gl.bind_buffer(BufferTarget::Array, Some(vbo)).unwrap();
        gl.buffer_data(BufferTarget::Array, 4 * 28).unwrap();
        let ebo = gl.create_buffer();
        gl.bind_buffer(BufferTarget::ElementArray, Some(ebo)).unwrap();
        gl.buffer_data(BufferTarget::ElementArray, 6 * 4).unwrap();
        gl.vertex_attrib_pointer(0, ATTR).unwrap();
        gl.vertex_attrib_pointer(1, VertexAttribute { components: 4, stride: 28, offset: 12 })
            .unwrap();
        vao
    }

    // ── programs ──────────────────────────────────────────────────────────

    #[test]
    fn program_stays_linked_after_stage_deletion() {
        let mut gl = GlState::new();
        let p = linked_program(&mut gl);
        assert!(gl.link_status(p));
        assert_eq!(gl.program_log(p), "");
        assert_eq!(gl.program(p).unwrap().linked.as_ref().unwrap().vertex_inputs, vec![0, 1]);
    }

    #[test]
    fn link_without_fragment_stage_fails() {
        let mut gl = GlState::new();
        let vs = gl.create_shader(StageKind::Vertex);
        gl.shader_source(vs, VS).unwrap();
        gl.compile_shader(vs).unwrap();
        let p = gl.create_program();
        gl.attach_shader(p, vs).unwrap();
        gl.link_program(p).unwrap();

        assert!(!gl.link_status(p));
        assert!(gl.program_log(p).contains("no fragment stage"));
    }

    #[test]
    fn link_with_uncompiled_stage_fails() {
        let mut gl = GlState::new();
        let vs = gl.create_shader(StageKind::Vertex);
        gl.shader_source(vs, "not wgsl").unwrap();
        gl.compile_shader(vs).unwrap();
        let fs = gl.create_shader(StageKind::Fragment);
        gl.shader_source(fs, FS).unwrap();
        gl.compile_shader(fs).unwrap();

        assert!(!gl.compile_status(vs));
        assert!(!gl.shader_log(vs).is_empty());

        let p = gl.create_program();
        gl.attach_shader(p, vs).unwrap();
        gl.attach_shader(p, fs).unwrap();
        gl.link_program(p).unwrap();
        assert!(!gl.link_status(p));
    }

    #[test]
    fn use_unlinked_program_is_invalid() {
        let mut gl = GlState::new();
        let p = gl.create_program();
        assert!(matches!(
            gl.use_program(Some(p)),
            Err(BackendError::InvalidOperation(_))
        ));
    }

    // ── bindings ──────────────────────────────────────────────────────────

    #[test]
    fn element_binding_requires_vertex_array() {
        let mut gl = GlState::new();
        let ebo = gl.create_buffer();
        assert!(matches!(
            gl.bind_buffer(BufferTarget::ElementArray, Some(ebo)),
            Err(BackendError::InvalidOperation(_))
        ));
    }

    #[test]
    fn element_binding_is_captured_by_vertex_array() {
        let mut gl = GlState::new();
        let vao = ready_vertex_array(&mut gl);
        gl.bind_vertex_array(None).unwrap();
        assert_eq!(gl.bound_buffer(BufferTarget::ElementArray), None);

        gl.bind_vertex_array(Some(vao)).unwrap();
        assert!(gl.bound_buffer(BufferTarget::ElementArray).is_some());
    }

    #[test]
    fn attrib_pointer_requires_array_buffer() {
        let mut gl = GlState::new();
        let vao = gl.create_vertex_array();
        gl.bind_vertex_array(Some(vao)).unwrap();
        assert!(gl.vertex_attrib_pointer(0, ATTR).is_err());
    }

    #[test]
    fn attrib_slot_limit_is_enforced() {
        let mut gl = GlState::new();
        ready_vertex_array(&mut gl);
        assert!(matches!(
            gl.set_vertex_attrib_enabled(MAX_VERTEX_ATTRIBS, true),
            Err(BackendError::InvalidValue(_))
        ));
    }

    #[test]
    fn check_queues_errors_in_order() {
        let mut gl = GlState::new();
        assert_eq!(gl.check::<()>(Err(BackendError::InvalidValue("a".into()))), None);
        assert_eq!(gl.check::<()>(Err(BackendError::InvalidOperation("b".into()))), None);
        assert_eq!(gl.take_error(), Some(BackendError::InvalidValue("a".into())));
        assert_eq!(gl.take_error(), Some(BackendError::InvalidOperation("b".into())));
        assert_eq!(gl.take_error(), None);
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_with_everything_bound_is_valid() {
        let mut gl = GlState::new();
        let p = linked_program(&mut gl);
        let vao = ready_vertex_array(&mut gl);
        gl.set_vertex_attrib_enabled(0, true).unwrap();
        gl.set_vertex_attrib_enabled(1, true).unwrap();
        gl.use_program(Some(p)).unwrap();

        let setup = gl.prepare_draw(6, 0).unwrap();
        assert_eq!(setup.vertex_array, vao);
        assert_eq!(setup.attributes.len(), 2);
        assert_eq!(setup.attributes[1].1.attribute.offset, 12);
    }

    #[test]
    fn draw_with_disabled_attribute_is_invalid() {
        let mut gl = GlState::new();
        let p = linked_program(&mut gl);
        ready_vertex_array(&mut gl);
        gl.set_vertex_attrib_enabled(0, true).unwrap();
        gl.use_program(Some(p)).unwrap();

        let err = gl.prepare_draw(6, 0).unwrap_err();
        assert!(err.to_string().contains("attribute 1"));
    }

    #[test]
    fn draw_past_element_buffer_is_invalid() {
        let mut gl = GlState::new();
        let p = linked_program(&mut gl);
        ready_vertex_array(&mut gl);
        gl.set_vertex_attrib_enabled(0, true).unwrap();
        gl.set_vertex_attrib_enabled(1, true).unwrap();
        gl.use_program(Some(p)).unwrap();

        assert!(gl.prepare_draw(6, 1).is_err());
        assert!(gl.prepare_draw(7, 0).is_err());
    }

    #[test]
    fn draw_without_program_is_invalid() {
        let mut gl = GlState::new();
        ready_vertex_array(&mut gl);
        assert!(gl.prepare_draw(3, 0).is_err());
    }

    #[test]
    fn truncate_log_respects_char_boundaries() {
        assert_eq!(truncate_log("héllo", 2), "h");
        assert_eq!(truncate_log("abc", 10), "abc");
        assert_eq!(truncate_log("abc", 0), "");
    }
}
