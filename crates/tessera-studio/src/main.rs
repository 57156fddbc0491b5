//! Tessera studio: command-line launcher for the engine.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tessera_engine::device::Gpu;
use tessera_engine::gpu::HeadlessBackend;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{DesktopPlatform, HeadlessPlatform};
use tessera_engine::{Engine, EngineConfig};

/// Tessera studio
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a window on the in-memory backend
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless mode only, where it is required)
    #[arg(long)]
    frames: Option<u64>,

    /// Initial scene id (overrides the config file)
    #[arg(long)]
    scene: Option<i32>,

    /// Log filter, env_logger syntax (e.g. "debug,wgpu_core=warn")
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; the config carries the filter.
            eprintln!("tessera-studio: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(LoggingConfig {
        env_filter: args.log.clone().or_else(|| config.log_filter.clone()),
        ..LoggingConfig::default()
    });

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.initial_scene = scene;
    }
    Ok(config)
}

fn run(args: &Args, config: EngineConfig) -> Result<()> {
    if args.headless {
        let frames = args
            .frames
            .context("--headless needs --frames to know when to stop")?;
        log::info!("running headless for {frames} frames");

        let mut engine = Engine::new(
            config,
            HeadlessPlatform::with_frame_limit(frames),
            HeadlessBackend::new(),
        );
        engine.run()?;
        log::info!("{:?}", engine.stats());
        return Ok(());
    }

    let (platform, gpu): (DesktopPlatform, Gpu) =
        DesktopPlatform::open(&config.window, config.vsync)?;
    let mut engine = Engine::new(config, platform, gpu);
    engine.run()?;
    Ok(())
}
