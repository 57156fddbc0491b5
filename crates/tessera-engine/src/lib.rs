//! Tessera engine crate.
//!
//! A minimal real-time 2D renderer: a scene state machine driven by a
//! variable-timestep loop, a shader/mesh resource pipeline over a GL-style
//! [`GraphicsBackend`](gpu::GraphicsBackend), and explicit input state fed by
//! the windowing platform.

pub mod color;
pub mod core;
pub mod device;
pub mod error;
pub mod gpu;
pub mod input;
pub mod logging;
pub mod scene;
pub mod time;
pub mod window;

pub use crate::color::Rgba;
pub use crate::core::{Engine, EngineConfig, FrameCtx, FrameStats, WindowConfig};
pub use crate::error::{BackendError, EngineError};
