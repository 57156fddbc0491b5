//! Engine runner and its configuration.

mod config;
mod ctx;
mod engine;

pub use config::{EngineConfig, WindowConfig};
pub use ctx::FrameCtx;
pub use engine::{Engine, FrameStats};
