use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::core::WindowConfig;
use crate::device::{Gpu, GpuInit};
use crate::gpu::GraphicsBackend;
use crate::input::{InputHandler, Modifiers};

use super::translate::translate_window_event;
use super::Platform;

/// Pump attempts allowed for the platform to deliver `resumed` while opening.
const MAX_OPEN_PUMPS: usize = 16;

/// Desktop window driven by a pumped winit event loop.
///
/// The engine owns the frame loop; each `poll_events` call drains whatever
/// the OS has queued and returns immediately.
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    modifiers: Modifiers,
    close_requested: bool,
}

impl DesktopPlatform {
    /// Opens the window and creates the wgpu backend bound to it.
    pub fn open(config: &WindowConfig, vsync: bool) -> Result<(Self, Gpu)> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut opener = Opener {
            config,
            window: None,
        };

        // Windows can only be created once the loop is active.
        for _ in 0..MAX_OPEN_PUMPS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut opener)
            {
                anyhow::bail!("event loop exited with code {code} while opening the window");
            }
            if opener.window.is_some() {
                break;
            }
        }

        let window = opener
            .window
            .take()
            .context("platform never resumed the event loop")?
            .context("failed to create window")?;
        let window = Arc::new(window);

        log::info!(
            "window '{}' opened at {}x{}",
            config.title,
            config.width,
            config.height
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), GpuInit::with_vsync(vsync)))
            .context("GPU initialization failed")?;

        Ok((
            Self {
                event_loop,
                window,
                modifiers: Modifiers::default(),
                close_requested: false,
            },
            gpu,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Platform for DesktopPlatform {
    type Graphics = Gpu;

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn poll_events(&mut self, gfx: &mut Gpu, input: &mut dyn InputHandler) {
        let mut pump = Pump {
            window: &self.window,
            gpu: gfx,
            input,
            modifiers: &mut self.modifiers,
            close_requested: &mut self.close_requested,
        };

        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump)
        {
            log::debug!("event loop exited with code {code}");
            self.close_requested = true;
        }
    }

    fn swap_buffers(&mut self, gfx: &mut Gpu) {
        self.window.pre_present_notify();
        gfx.present();
    }

    fn shutdown(&mut self, _gfx: &mut Gpu) {
        self.window.set_visible(false);
        log::info!("window closed");
    }
}

/// Handler used only while opening: creates the window on `resumed`.
struct Opener<'a> {
    config: &'a WindowConfig,
    window: Option<Result<Window, winit::error::OsError>>,
}

impl ApplicationHandler for Opener<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.width),
                f64::from(self.config.height),
            ));

        self.window = Some(event_loop.create_window(attrs));
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}
}

/// Per-poll handler borrowing the engine's input sink and backend.
struct Pump<'a> {
    window: &'a Window,
    gpu: &'a mut Gpu,
    input: &'a mut dyn InputHandler,
    modifiers: &'a mut Modifiers,
    close_requested: &'a mut bool,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if id != self.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                *self.close_requested = true;
            }
            WindowEvent::Resized(size) => self.gpu.resize(size),
            other => {
                if let Some(ev) = translate_window_event(self.window, self.modifiers, &other) {
                    ev.dispatch(&mut *self.input);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presents_through<P: Platform>() {}

    #[test]
    fn desktop_platform_drives_the_wgpu_backend() {
        // `Gpu` presents through the backend trait.
        presents_through::<DesktopPlatform>();
        let _: fn(&mut Gpu) = |gpu| GraphicsBackend::present(gpu);
    }
}
