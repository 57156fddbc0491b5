use crate::error::EngineError;

use super::backend::{GraphicsBackend, ProgramId, StageId, StageKind};

/// Compiles one shader stage.
///
/// On failure the stage's info log is logged at error level, the stage object
/// is deleted, and [`EngineError::Compile`] carries the log to the caller.
pub fn compile(
    gfx: &mut dyn GraphicsBackend,
    kind: StageKind,
    label: &str,
    source: &str,
) -> Result<StageId, EngineError> {
    let stage = gfx.create_shader(kind);
    gfx.shader_source(stage, source);
    gfx.compile_shader(stage);

    if gfx.compile_status(stage) {
        log::debug!("'{label}': {kind} stage compiled");
        return Ok(stage);
    }

    let len = gfx.shader_info_log_length(stage);
    let log = gfx.shader_info_log(stage, len);
    gfx.delete_shader(stage);

    log::error!("'{label}': {kind} shader compilation failed");
    log::error!("{log}");

    Err(EngineError::Compile {
        label: label.to_owned(),
        stage: kind,
        log,
    })
}

/// Links compiled stages into a program.
///
/// The stages stay owned by the caller; a failed program object is deleted.
pub fn link(
    gfx: &mut dyn GraphicsBackend,
    label: &str,
    stages: &[StageId],
) -> Result<ProgramId, EngineError> {
    let program = gfx.create_program();
    for &stage in stages {
        gfx.attach_shader(program, stage);
    }
    gfx.link_program(program);

    if gfx.link_status(program) {
        log::debug!("'{label}': program linked");
        return Ok(program);
    }

    let len = gfx.program_info_log_length(program);
    let log = gfx.program_info_log(program, len);
    gfx.delete_program(program);

    log::error!("'{label}': linking of shaders failed");
    log::error!("{log}");

    Err(EngineError::Link {
        label: label.to_owned(),
        log,
    })
}

/// A linked vertex + fragment program.
///
/// Only constructible through [`ShaderProgram::build`], so holding one means
/// both stages compiled and linked.
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    label: String,
    id: ProgramId,
}

impl ShaderProgram {
    pub fn build(
        gfx: &mut dyn GraphicsBackend,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, EngineError> {
        let vs = compile(gfx, StageKind::Vertex, label, vertex_src)?;
        let fs = match compile(gfx, StageKind::Fragment, label, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                gfx.delete_shader(vs);
                return Err(e);
            }
        };

        let linked = link(gfx, label, &[vs, fs]);

        // The program keeps what it needs; the stage objects are done either way.
        gfx.delete_shader(vs);
        gfx.delete_shader(fs);

        Ok(Self {
            label: label.to_owned(),
            id: linked?,
        })
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn destroy(self, gfx: &mut dyn GraphicsBackend) {
        log::debug!("'{}': program destroyed", self.label);
        gfx.delete_program(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::HeadlessBackend;

    const VS: &str = include_str!("../scene/shaders/position_color.vert.wgsl");
    const FS: &str = include_str!("../scene/shaders/position_color.frag.wgsl");

    #[test]
    fn build_links_a_usable_program() {
        let mut gfx = HeadlessBackend::new();
        let program = ShaderProgram::build(&mut gfx, "quad", VS, FS).unwrap();

        gfx.use_program(Some(program.id()));
        assert_eq!(gfx.take_error(), None);
        assert_eq!(program.label(), "quad");
    }

    #[test]
    fn compile_failure_carries_the_info_log() {
        let mut gfx = HeadlessBackend::new();
        let err = compile(&mut gfx, StageKind::Vertex, "broken", "fn vs_main( {").unwrap_err();

        match err {
            EngineError::Compile { label, stage, log } => {
                assert_eq!(label, "broken");
                assert_eq!(stage, StageKind::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(gfx.take_error(), None);
    }

    #[test]
    fn fragment_failure_reports_fragment_stage() {
        let mut gfx = HeadlessBackend::new();
        let err =
            ShaderProgram::build(&mut gfx, "quad", VS, "@fragment fn fs_main() -> ").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Compile { stage: StageKind::Fragment, .. }
        ));
        assert_eq!(gfx.take_error(), None);
    }

    #[test]
    fn interface_mismatch_fails_to_link() {
        let fs = r#"
@fragment
fn fs_main(@location(2) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;
        let mut gfx = HeadlessBackend::new();
        let err = ShaderProgram::build(&mut gfx, "mismatch", VS, fs).unwrap_err();

        match err {
            EngineError::Link { label, log } => {
                assert_eq!(label, "mismatch");
                assert!(log.contains("location"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn destroy_releases_the_program() {
        let mut gfx = HeadlessBackend::new();
        let program = ShaderProgram::build(&mut gfx, "quad", VS, FS).unwrap();
        let id = program.id();
        program.destroy(&mut gfx);

        gfx.use_program(Some(id));
        assert!(gfx.take_error().is_some());
    }
}
