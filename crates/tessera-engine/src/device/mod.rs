//! wgpu device backend.
//!
//! [`Gpu`] owns the wgpu device, queue and window surface and implements
//! [`GraphicsBackend`](crate::gpu::GraphicsBackend) on top of them.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
