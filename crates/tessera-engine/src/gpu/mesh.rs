use bytemuck::{Pod, Zeroable};

use crate::error::EngineError;

use super::backend::{BufferId, BufferTarget, GraphicsBackend, VertexArrayId, VertexAttribute};
use super::shader::ShaderProgram;

/// Interleaved position + color vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Attribute slots and their layout inside a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub attributes: &'static [(u32, VertexAttribute)],
}

const VERTEX_STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

impl VertexLayout {
    /// Slot 0: 3 × f32 position at byte 0. Slot 1: 4 × f32 color at byte 12.
    pub const POSITION_COLOR: VertexLayout = VertexLayout {
        attributes: &[
            (
                0,
                VertexAttribute {
                    components: 3,
                    stride: VERTEX_STRIDE,
                    offset: 0,
                },
            ),
            (
                1,
                VertexAttribute {
                    components: 4,
                    stride: VERTEX_STRIDE,
                    offset: 3 * 4,
                },
            ),
        ],
    };

    pub fn stride(&self) -> u32 {
        self.attributes.first().map_or(0, |(_, a)| a.stride)
    }

    fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.attributes.iter().map(|(slot, _)| *slot)
    }
}

/// Indexed triangle geometry resident on the GPU.
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    vao: VertexArrayId,
    vbo: BufferId,
    ebo: BufferId,
    index_count: u32,
    layout: VertexLayout,
}

impl Mesh {
    /// Uploads `vertices` and `indices` with the position/color layout.
    ///
    /// Every index must reference an existing vertex. The vertex array is
    /// left unbound on return.
    pub fn upload(
        gfx: &mut dyn GraphicsBackend,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, EngineError> {
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(EngineError::InvalidMesh {
                index,
                position,
                vertex_count: vertices.len(),
            });
        }

        let layout = VertexLayout::POSITION_COLOR;

        let vao = gfx.create_vertex_array();
        gfx.bind_vertex_array(Some(vao));

        let vbo = gfx.create_buffer();
        gfx.bind_buffer(BufferTarget::Array, Some(vbo));
        gfx.buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices));

        let ebo = gfx.create_buffer();
        gfx.bind_buffer(BufferTarget::ElementArray, Some(ebo));
        gfx.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));

        for &(slot, attribute) in layout.attributes {
            gfx.vertex_attrib_pointer(slot, attribute);
            gfx.enable_vertex_attrib(slot);
        }

        gfx.bind_vertex_array(None);
        gfx.bind_buffer(BufferTarget::Array, None);

        let mesh = Self {
            vao,
            vbo,
            ebo,
            index_count: indices.len() as u32,
            layout,
        };

        if let Some(err) = gfx.take_error() {
            mesh.destroy(gfx);
            return Err(err.into());
        }

        log::debug!(
            "mesh uploaded: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );
        Ok(mesh)
    }

    /// Draws the whole mesh with `program`, restoring an unbound state after.
    pub fn draw(
        &self,
        gfx: &mut dyn GraphicsBackend,
        program: &ShaderProgram,
    ) -> Result<(), EngineError> {
        gfx.use_program(Some(program.id()));
        gfx.bind_vertex_array(Some(self.vao));
        for slot in self.layout.slots() {
            gfx.enable_vertex_attrib(slot);
        }

        gfx.draw_elements(self.index_count, 0);

        for slot in self.layout.slots() {
            gfx.disable_vertex_attrib(slot);
        }
        gfx.bind_vertex_array(None);
        gfx.use_program(None);

        match gfx.take_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vao
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vbo
    }

    pub fn element_buffer(&self) -> BufferId {
        self.ebo
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn destroy(self, gfx: &mut dyn GraphicsBackend) {
        gfx.delete_vertex_array(self.vao);
        gfx.delete_buffer(self.vbo);
        gfx.delete_buffer(self.ebo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::HeadlessBackend;

    const VS: &str = include_str!("../scene/shaders/position_color.vert.wgsl");
    const FS: &str = include_str!("../scene/shaders/position_color.frag.wgsl");

    fn triangle() -> [Vertex; 3] {
        [
            Vertex::new([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
        ]
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn position_color_layout_matches_vertex() {
        let layout = VertexLayout::POSITION_COLOR;
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(layout.stride(), 28);
        assert_eq!(layout.attributes[0].1.components, 3);
        assert_eq!(layout.attributes[1].1.offset, 12);
    }

    // ── upload ────────────────────────────────────────────────────────────

    #[test]
    fn upload_stores_exact_bytes() {
        let mut gfx = HeadlessBackend::new();
        let vertices = triangle();
        let indices = [0u32, 1, 2];
        let mesh = Mesh::upload(&mut gfx, &vertices, &indices).unwrap();

        let vbytes = gfx.read_buffer(mesh.vertex_buffer()).unwrap();
        let ibytes = gfx.read_buffer(mesh.element_buffer()).unwrap();
        assert_eq!(vbytes, bytemuck::cast_slice::<Vertex, u8>(&vertices));
        assert_eq!(ibytes, bytemuck::cast_slice::<u32, u8>(&indices));
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn out_of_range_index_is_rejected_before_upload() {
        let mut gfx = HeadlessBackend::new();
        let err = Mesh::upload(&mut gfx, &triangle(), &[0, 1, 3]).unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidMesh {
                index: 3,
                position: 2,
                vertex_count: 3
            }
        );
        assert_eq!(gfx.buffer_count(), 0);
    }

    #[test]
    fn empty_mesh_uploads() {
        let mut gfx = HeadlessBackend::new();
        let mesh = Mesh::upload(&mut gfx, &[], &[]).unwrap();
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(gfx.read_buffer(mesh.element_buffer()), Some(Vec::new()));
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_issues_one_indexed_call() {
        let mut gfx = HeadlessBackend::new();
        let program = ShaderProgram::build(&mut gfx, "tri", VS, FS).unwrap();
        let mesh = Mesh::upload(&mut gfx, &triangle(), &[0, 1, 2]).unwrap();

        mesh.draw(&mut gfx, &program).unwrap();

        let draws = gfx.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, 3);
        assert_eq!(draws[0].slots, vec![0, 1]);
        assert_eq!(draws[0].vertex_array, mesh.vertex_array());
    }

    #[test]
    fn draw_after_destroy_fails() {
        let mut gfx = HeadlessBackend::new();
        let program = ShaderProgram::build(&mut gfx, "tri", VS, FS).unwrap();
        let mesh = Mesh::upload(&mut gfx, &triangle(), &[0, 1, 2]).unwrap();
        let stale = mesh_copy(&mesh);
        mesh.destroy(&mut gfx);

        assert!(matches!(stale.draw(&mut gfx, &program), Err(EngineError::Backend(_))));
    }

    #[test]
    fn disabled_attribute_makes_draw_fail() {
        let mut gfx = HeadlessBackend::new();
        let program = ShaderProgram::build(&mut gfx, "tri", VS, FS).unwrap();
        let mesh = Mesh::upload(&mut gfx, &triangle(), &[0, 1, 2]).unwrap();

        // Draw by hand without enabling slot 1.
        gfx.use_program(Some(program.id()));
        gfx.bind_vertex_array(Some(mesh.vertex_array()));
        gfx.disable_vertex_attrib(1);
        gfx.draw_elements(3, 0);

        assert!(matches!(gfx.take_error(), Some(crate::error::BackendError::InvalidOperation(_))));
        assert!(gfx.draws().is_empty());
    }

    fn mesh_copy(mesh: &Mesh) -> Mesh {
        Mesh {
            vao: mesh.vao,
            vbo: mesh.vbo,
            ebo: mesh.ebo,
            index_count: mesh.index_count,
            layout: mesh.layout,
        }
    }
}
