use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::color::Rgba;
use crate::error::BackendError;
use crate::gpu::{
    truncate_log, AttributeBinding, BufferId, BufferTarget, GlState, GraphicsBackend,
    LinkedProgram, ProgramId, StageId, StageKind, VertexArrayId, VertexAttribute,
};

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Defaults with FIFO presentation when `vsync` is set, immediate-ish otherwise.
    pub fn with_vsync(vsync: bool) -> Self {
        Self {
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Represents a single acquired frame.
///
/// Holding the surface texture prevents acquisition of subsequent frames, so a
/// frame lives from the first `clear` of an iteration until `present`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM).
    Fatal,
}

/// Shader modules of a linked program, created from its link-time snapshot.
struct ProgramModules {
    vertex: wgpu::ShaderModule,
    vertex_entry: String,
    fragment: wgpu::ShaderModule,
    fragment_entry: String,
}

/// One vertex buffer slot of a draw: attributes sharing a buffer and stride.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BufferGroup {
    buffer: BufferId,
    stride: u32,
    /// `(shader location, components, offset)`
    attributes: Vec<(u32, u8, u32)>,
}

/// Pipelines are cached per program and vertex input layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramId,
    layout: Vec<(u32, Vec<(u32, u8, u32)>)>,
}

impl PipelineKey {
    fn new(program: ProgramId, groups: &[BufferGroup]) -> Self {
        Self {
            program,
            layout: groups
                .iter()
                .map(|g| (g.stride, g.attributes.clone()))
                .collect(),
        }
    }
}

/// Errors wgpu reports outside any error scope.
///
/// Installed as the device's uncaptured-error handler so a validation failure
/// becomes a queued [`BackendError::Device`] instead of a panic.
#[derive(Debug, Clone, Default)]
struct DeviceErrors {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl DeviceErrors {
    fn push(&self, message: String) {
        log::error!("wgpu: {message}");
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message);
    }

    fn pop(&self) -> Option<BackendError> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .map(BackendError::Device)
    }

    fn install(&self, device: &wgpu::Device) {
        let sink = self.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| sink.push(err.to_string())));
    }
}

/// wgpu implementation of [`GraphicsBackend`].
///
/// Object bookkeeping and validation live in [`GlState`]; this type mirrors
/// buffers and linked programs as device objects and records frame commands.
/// Render pipelines are built lazily the first time a program is drawn with a
/// given vertex layout.
pub struct Gpu {
    /// Surface bound to the window. The `Arc<Window>` keeps the window alive.
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    gl: GlState,
    device_errors: DeviceErrors,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    programs: HashMap<ProgramId, ProgramModules>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    frame: Option<GpuFrame>,
    /// Frame acquisition failed transiently; draws until `present` are dropped.
    frame_skipped: bool,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let device_errors = DeviceErrors::default();
        device_errors.install(&device);

        let surface_caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = init
            .alpha_mode
            .filter(|m| surface_caps.alpha_modes.contains(m))
            .unwrap_or_else(|| {
                surface_caps
                    .alpha_modes
                    .first()
                    .copied()
                    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
            });

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::debug!("surface configured: {format:?} {}x{}", config.width, config.height);

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
            gl: GlState::new(),
            device_errors,
            buffers: HashMap::new(),
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            frame: None,
            frame_skipped: false,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 surface cannot be configured; configuration is deferred until the
    /// window has an area again.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    fn create_program_modules(&self, program: ProgramId, linked: &LinkedProgram) -> ProgramModules {
        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("tessera program {} vertex", program.raw())),
            source: wgpu::ShaderSource::Wgsl(linked.vertex_source.as_str().into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("tessera program {} fragment", program.raw())),
            source: wgpu::ShaderSource::Wgsl(linked.fragment_source.as_str().into()),
        });

        ProgramModules {
            vertex,
            vertex_entry: linked.vertex_entry.clone(),
            fragment,
            fragment_entry: linked.fragment_entry.clone(),
        }
    }

    fn ensure_pipeline(
        &mut self,
        key: &PipelineKey,
        groups: &[BufferGroup],
    ) -> Result<(), BackendError> {
        if self.pipelines.contains_key(key) {
            return Ok(());
        }

        let modules = self.programs.get(&key.program).ok_or_else(|| {
            BackendError::InvalidOperation(format!(
                "program {} has no device modules",
                key.program.raw()
            ))
        })?;

        let attributes = groups
            .iter()
            .map(|g| {
                g.attributes
                    .iter()
                    .map(|&(location, components, offset)| {
                        Ok(wgpu::VertexAttribute {
                            format: vertex_format(components)?,
                            offset: u64::from(offset),
                            shader_location: location,
                        })
                    })
                    .collect::<Result<Vec<_>, BackendError>>()
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = groups
            .iter()
            .zip(&attributes)
            .map(|(g, attrs)| wgpu::VertexBufferLayout {
                array_stride: u64::from(g.stride),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tessera pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &modules.vertex,
                entry_point: Some(modules.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &modules.fragment,
                entry_point: Some(modules.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("pipeline built for program {}", key.program.raw());
        self.pipelines.insert(key.clone(), pipeline);
        Ok(())
    }
}

impl GraphicsBackend for Gpu {
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
        if self.gl.check(r).is_none() {
            return;
        }

        self.pipelines.retain(|k, _| k.program != program);
        let linked = self.gl.program(program).and_then(|p| p.linked.clone());
        match linked {
            Some(linked) => {
                let modules = self.create_program_modules(program, &linked);
                self.programs.insert(program, modules);
            }
            None => {
                self.programs.remove(&program);
            }
        }
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
        if self.gl.check(r).is_some() {
            self.programs.remove(&program);
            self.pipelines.retain(|k, _| k.program != program);
        }
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
        self.gl.create_buffer()
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        let r = self.gl.bind_buffer(target, buffer);
        self.gl.check(r);
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        let r = self.gl.buffer_data(target, data.len());
        let Some(id) = self.gl.check(r) else {
            return;
        };

        // wgpu cannot slice an empty buffer; empty storage has no device object.
        if data.is_empty() {
            self.buffers.remove(&id);
            return;
        }

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("tessera buffer {}", id.raw())),
            contents: data,
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::INDEX
                | wgpu::BufferUsages::COPY_DST,
        });
        self.buffers.insert(id, buffer);
    }

    fn read_buffer(&self, _buffer: BufferId) -> Option<Vec<u8>> {
        None
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        let r = self.gl.delete_buffer(buffer);
        if self.gl.check(r).is_some() {
            self.buffers.remove(&buffer);
        }
    }

    fn clear(&mut self, color: Rgba) {
        if self.frame.is_none() {
            if self.frame_skipped {
                return;
            }
            match self.begin_frame() {
                Ok(frame) => self.frame = Some(frame),
                Err(err) => {
                    let msg = err.to_string();
                    match self.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => {
                            self.gl.report(BackendError::Device(format!(
                                "frame acquisition failed: {msg}"
                            )));
                        }
                        action => log::warn!("frame skipped ({msg}, {action:?})"),
                    }
                    self.frame_skipped = true;
                    return;
                }
            }
        }

        let Some(frame) = self.frame.as_mut() else {
            return;
        };

        let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(color.r),
                        g: f64::from(color.g),
                        b: f64::from(color.b),
                        a: f64::from(color.a),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn draw_elements(&mut self, index_count: u32, first_index: u32) {
        let r = self.gl.prepare_draw(index_count, first_index);
        let Some(setup) = self.gl.check(r) else {
            return;
        };

        if self.frame.is_none() {
            if !self.frame_skipped {
                self.gl.report(BackendError::InvalidOperation(
                    "draw_elements: no frame in progress (clear starts one)".into(),
                ));
            }
            return;
        }
        if index_count == 0 {
            return;
        }

        let groups = group_attributes(&setup.attributes);
        for group in &groups {
            if !self.buffers.contains_key(&group.buffer) {
                self.gl.report(BackendError::InvalidOperation(format!(
                    "draw_elements: vertex buffer {} has no storage",
                    group.buffer.raw()
                )));
                return;
            }
        }

        let key = PipelineKey::new(setup.program, &groups);
        let r = self.ensure_pipeline(&key, &groups);
        if self.gl.check(r).is_none() {
            return;
        }

        let (Some(frame), Some(pipeline), Some(index_buffer)) = (
            self.frame.as_mut(),
            self.pipelines.get(&key),
            self.buffers.get(&setup.element_buffer),
        ) else {
            return;
        };

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera draw"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        for (slot, group) in groups.iter().enumerate() {
            if let Some(buffer) = self.buffers.get(&group.buffer) {
                rpass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
        }
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(first_index..first_index + index_count, 0, 0..1);
    }

    fn present(&mut self) {
        self.frame_skipped = false;
        let Some(frame) = self.frame.take() else {
            return;
        };

        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    fn take_error(&mut self) -> Option<BackendError> {
        self.gl.take_error().or_else(|| self.device_errors.pop())
    }
}

/// Groups enabled attributes into vertex buffer slots by `(buffer, stride)`.
fn group_attributes(attributes: &[(u32, AttributeBinding)]) -> Vec<BufferGroup> {
    let mut groups: BTreeMap<(BufferId, u32), Vec<(u32, u8, u32)>> = BTreeMap::new();
    for (slot, binding) in attributes {
        groups
            .entry((binding.buffer, binding.attribute.stride))
            .or_default()
            .push((*slot, binding.attribute.components, binding.attribute.offset));
    }

    groups
        .into_iter()
        .map(|((buffer, stride), attributes)| BufferGroup {
            buffer,
            stride,
            attributes,
        })
        .collect()
}

fn vertex_format(components: u8) -> Result<wgpu::VertexFormat, BackendError> {
    match components {
        1 => Ok(wgpu::VertexFormat::Float32),
        2 => Ok(wgpu::VertexFormat::Float32x2),
        3 => Ok(wgpu::VertexFormat::Float32x3),
        4 => Ok(wgpu::VertexFormat::Float32x4),
        n => Err(BackendError::InvalidValue(format!("{n} vertex components"))),
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(buffer: u32, components: u8, stride: u32, offset: u32) -> AttributeBinding {
        AttributeBinding {
            attribute: VertexAttribute {
                components,
                stride,
                offset,
            },
            buffer: BufferId(buffer),
        }
    }

    #[test]
    fn interleaved_attributes_share_one_slot() {
        let groups = group_attributes(&[(0, binding(7, 3, 28, 0)), (1, binding(7, 4, 28, 12))]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].stride, 28);
        assert_eq!(groups[0].attributes, vec![(0, 3, 0), (1, 4, 12)]);
    }

    #[test]
    fn separate_buffers_get_separate_slots() {
        let groups = group_attributes(&[(0, binding(3, 3, 12, 0)), (1, binding(4, 4, 16, 0))]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].buffer, BufferId(3));
        assert_eq!(groups[1].buffer, BufferId(4));
    }

    #[test]
    fn pipeline_key_tracks_layout() {
        let a = group_attributes(&[(0, binding(1, 3, 28, 0))]);
        let b = group_attributes(&[(0, binding(2, 3, 28, 0))]);
        let c = group_attributes(&[(0, binding(1, 2, 28, 0))]);
        // Same layout in a different buffer reuses the pipeline.
        assert_eq!(PipelineKey::new(ProgramId(9), &a), PipelineKey::new(ProgramId(9), &b));
        assert_ne!(PipelineKey::new(ProgramId(9), &a), PipelineKey::new(ProgramId(9), &c));
    }

    #[test]
    fn vertex_format_covers_float_vectors() {
        assert_eq!(vertex_format(3).unwrap(), wgpu::VertexFormat::Float32x3);
        assert!(vertex_format(5).is_err());
    }

    #[test]
    fn device_errors_queue_in_order() {
        let errors = DeviceErrors::default();
        let handler_side = errors.clone();
        handler_side.push("shader uses an unsupported capability".to_owned());
        handler_side.push("second".to_owned());

        assert_eq!(
            errors.pop(),
            Some(BackendError::Device(
                "shader uses an unsupported capability".to_owned()
            ))
        );
        assert_eq!(errors.pop(), Some(BackendError::Device("second".to_owned())));
        assert_eq!(errors.pop(), None);
    }

    #[test]
    fn vsync_selects_present_mode() {
        assert_eq!(GpuInit::with_vsync(true).present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(
            GpuInit::with_vsync(false).present_mode,
            wgpu::PresentMode::AutoNoVsync
        );
    }
}
