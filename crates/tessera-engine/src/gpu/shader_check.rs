//! WGSL front-end shared by all backends.
//!
//! Compilation parses and validates a single-stage WGSL source with naga and
//! extracts the stage's location interface. Linking matches the vertex
//! outputs against the fragment inputs.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, ShaderStage, Type, TypeInner};

use super::StageKind;

/// Location interface of a compiled stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StageInterface {
    pub entry_point: String,
    /// `@location` inputs, sorted and deduplicated.
    pub inputs: Vec<u32>,
    /// `@location` outputs, sorted and deduplicated.
    pub outputs: Vec<u32>,
}

/// Compiles one stage. On failure returns the diagnostic text.
pub(crate) fn compile_stage(kind: StageKind, source: &str) -> Result<StageInterface, String> {
    if source.trim().is_empty() {
        return Err(format!("{kind} shader source is empty"));
    }

    let module = wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let wanted = match kind {
        StageKind::Vertex => ShaderStage::Vertex,
        StageKind::Fragment => ShaderStage::Fragment,
    };

    let mut entries = module.entry_points.iter().filter(|ep| ep.stage == wanted);
    let Some(entry) = entries.next() else {
        return Err(format!("no @{kind} entry point found"));
    };
    if entries.next().is_some() {
        return Err(format!(
            "more than one @{kind} entry point found; a stage source holds exactly one"
        ));
    }

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    inputs.sort_unstable();
    inputs.dedup();
    outputs.sort_unstable();
    outputs.dedup();

    Ok(StageInterface {
        entry_point: entry.name.clone(),
        inputs,
        outputs,
    })
}

/// Checks that every fragment input is written by the vertex stage.
pub(crate) fn link_stages(
    vertex: &StageInterface,
    fragment: &StageInterface,
) -> Result<(), String> {
    let missing: Vec<u32> = fragment
        .inputs
        .iter()
        .copied()
        .filter(|loc| !vertex.outputs.contains(loc))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "fragment entry point '{}' reads location(s) {:?} that vertex entry point '{}' \
             does not write",
            fragment.entry_point, missing, vertex.entry_point
        ))
    }
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(*location),
        Some(_) => {}
        // Unbound arguments/results are structs whose members carry the bindings.
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(Binding::Location { location, .. }) = &member.binding {
                        out.push(*location);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = vec4<f32>(pos, 1.0);
    out.color = color;
    return out;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

    #[test]
    fn vertex_interface_is_extracted() {
        let iface = compile_stage(StageKind::Vertex, VS).unwrap();
        assert_eq!(iface.entry_point, "vs_main");
        assert_eq!(iface.inputs, vec![0, 1]);
        assert_eq!(iface.outputs, vec![0]);
    }

    #[test]
    fn syntax_error_produces_diagnostics() {
        let err = compile_stage(StageKind::Fragment, "@fragment fn fs_main( {").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn type_error_fails_validation() {
        let src = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(x);
}
"#;
        assert!(compile_stage(StageKind::Fragment, src).is_err());
    }

    #[test]
    fn wrong_stage_kind_is_rejected() {
        let err = compile_stage(StageKind::Vertex, FS).unwrap_err();
        assert!(err.contains("no @vertex entry point"));
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(compile_stage(StageKind::Vertex, "  \n").is_err());
    }

    #[test]
    fn matching_interfaces_link() {
        let vs = compile_stage(StageKind::Vertex, VS).unwrap();
        let fs = compile_stage(StageKind::Fragment, FS).unwrap();
        assert!(link_stages(&vs, &fs).is_ok());
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let fs_src = r#"
@fragment
fn fs_main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
"#;
        let vs = compile_stage(StageKind::Vertex, VS).unwrap();
        let fs = compile_stage(StageKind::Fragment, fs_src).unwrap();
        let err = link_stages(&vs, &fs).unwrap_err();
        assert!(err.contains("[3]"));
    }
}
