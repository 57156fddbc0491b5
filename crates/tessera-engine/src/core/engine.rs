use crate::color::Rgba;
use crate::error::EngineError;
use crate::gpu::GraphicsBackend;
use crate::input::InputContext;
use crate::scene::{Scene, SceneControl, SceneId};
use crate::time::{Clock, FrameClock, MonotonicClock};
use crate::window::Platform;

use super::config::EngineConfig;
use super::ctx::FrameCtx;

/// Loop counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Completed loop iterations (one per presented frame).
    pub iterations: u64,
    /// Scene `update` calls. One less than `iterations` in a fresh run.
    pub scene_updates: u64,
    /// Scene replacements after the initial selection.
    pub scene_switches: u64,
}

struct ActiveScene {
    id: SceneId,
    scene: Box<dyn Scene>,
}

/// Engine runner: owns the platform, the graphics backend, input state and
/// the active scene, and drives the frame loop.
///
/// One iteration is: poll events, clear, update the scene (skipped until a
/// delta exists), swap buffers, end the input frame, tick the clock, then
/// apply the scene's control directive.
pub struct Engine<P: Platform, C: Clock = MonotonicClock> {
    config: EngineConfig,
    platform: P,
    gfx: P::Graphics,
    input: InputContext,
    clock: FrameClock<C>,

    scene: Option<ActiveScene>,
    clear_color: Rgba,

    stats: FrameStats,
    exit_requested: bool,
}

impl<P: Platform> Engine<P, MonotonicClock> {
    pub fn new(config: EngineConfig, platform: P, gfx: P::Graphics) -> Self {
        Self::with_clock(config, platform, gfx, MonotonicClock::new())
    }
}

impl<P: Platform, C: Clock> Engine<P, C> {
    pub fn with_clock(config: EngineConfig, platform: P, gfx: P::Graphics, clock: C) -> Self {
        let clear_color = config.clear_color;
        Self {
            config,
            platform,
            gfx,
            input: InputContext::new(),
            clock: FrameClock::new(clock),
            scene: None,
            clear_color,
            stats: FrameStats::default(),
            exit_requested: false,
        }
    }

    /// Replaces the active scene.
    ///
    /// The id is resolved before anything is torn down, so an unknown id
    /// leaves the current scene in place. The previous scene is torn down
    /// before the new one is initialized.
    pub fn set_scene(&mut self, id: i32) -> Result<(), EngineError> {
        let id = SceneId::try_from(id)?;

        let had_previous = match self.scene.take() {
            Some(mut active) => {
                log::info!("leaving scene '{}'", active.scene.name());
                active.scene.teardown(&mut self.gfx);
                true
            }
            None => false,
        };

        let mut scene = id.instantiate();
        scene.init(&mut self.gfx, &mut self.clear_color)?;
        log::info!("scene '{}' ({}) active", scene.name(), i32::from(id));

        self.scene = Some(ActiveScene { id, scene });
        if had_previous {
            self.stats.scene_switches += 1;
        }
        Ok(())
    }

    /// Runs the loop until the platform closes or a scene exits.
    ///
    /// Errors are logged here and returned; the engine is shut down either way.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let result = self.run_loop();
        if let Err(e) = &result {
            log::error!("engine stopped: {e}");
        }
        self.shutdown();
        result
    }

    fn run_loop(&mut self) -> Result<(), EngineError> {
        self.set_scene(self.config.initial_scene)?;
        self.clock.restart();

        while !self.platform.should_close() && !self.exit_requested {
            self.iterate()?;
        }
        Ok(())
    }

    /// Runs one loop iteration.
    pub fn iterate(&mut self) -> Result<(), EngineError> {
        self.platform.poll_events(&mut self.gfx, &mut self.input);

        self.gfx.clear(self.clear_color);

        let mut control = SceneControl::Continue;
        if let (Some(time), Some(active)) = (self.clock.frame_time(), self.scene.as_mut()) {
            let mut ctx = FrameCtx {
                gfx: &mut self.gfx,
                input: &self.input,
                frame_index: time.frame_index,
                clear_color: &mut self.clear_color,
            };
            control = active.scene.update(time.dt, &mut ctx)?;
            self.stats.scene_updates += 1;
        }

        self.platform.swap_buffers(&mut self.gfx);
        self.input.end_frame();

        let time = self.clock.tick();
        self.stats.iterations += 1;
        log::trace!("frame {} took {:.4}s", time.frame_index, time.dt);

        if let Some(err) = self.gfx.take_error() {
            return Err(err.into());
        }

        match control {
            SceneControl::Continue => {}
            SceneControl::SwitchTo(id) => self.set_scene(id.into())?,
            SceneControl::Exit => {
                log::info!("scene requested exit");
                self.exit_requested = true;
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut active) = self.scene.take() {
            active.scene.teardown(&mut self.gfx);
        }
        self.platform.shutdown(&mut self.gfx);
        log::info!(
            "engine shut down after {} frames ({} scene updates)",
            self.stats.iterations,
            self.stats.scene_updates
        );
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.scene.as_ref().map(|a| a.id)
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn input(&self) -> &InputContext {
        &self.input
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn graphics(&self) -> &P::Graphics {
        &self.gfx
    }

    pub fn graphics_mut(&mut self) -> &mut P::Graphics {
        &mut self.gfx
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};
    use crate::time::FixedStepClock;
    use crate::window::HeadlessPlatform;

    fn engine(platform: HeadlessPlatform) -> Engine<HeadlessPlatform, FixedStepClock> {
        engine_with(EngineConfig::default(), platform)
    }

    fn engine_with(
        config: EngineConfig,
        platform: HeadlessPlatform,
    ) -> Engine<HeadlessPlatform, FixedStepClock> {
        Engine::with_clock(
            config,
            platform,
            crate::gpu::HeadlessBackend::new(),
            FixedStepClock::new(Duration::from_millis(500)),
        )
    }

    // ── delta sentinel ────────────────────────────────────────────────────

    #[test]
    fn first_iteration_never_updates() {
        let mut engine = engine(HeadlessPlatform::new());
        engine.set_scene(0).unwrap();
        engine.iterate().unwrap();

        assert_eq!(engine.stats().iterations, 1);
        assert_eq!(engine.stats().scene_updates, 0);
    }

    #[test]
    fn n_iterations_give_n_minus_one_updates() {
        for n in 2..=6u64 {
            let mut engine = engine(HeadlessPlatform::with_frame_limit(n));
            engine.run().unwrap();

            assert_eq!(engine.stats().iterations, n);
            assert_eq!(engine.stats().scene_updates, n - 1);
        }
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn three_frames_of_the_quad() {
        let mut engine = engine(HeadlessPlatform::with_frame_limit(3));
        engine.run().unwrap();

        assert_eq!(engine.stats().scene_updates, 2);
        assert_eq!(engine.platform().swaps(), 3);
        assert_eq!(engine.graphics().frames_presented(), 3);
        assert_eq!(engine.graphics().draws().len(), 2);
        assert_eq!(engine.graphics().clears().len(), 3);
    }

    #[test]
    fn shutdown_tears_down_the_active_scene() {
        let mut engine = engine(HeadlessPlatform::with_frame_limit(2));
        engine.run().unwrap();

        assert_eq!(engine.active_scene(), None);
        assert_eq!(engine.graphics().buffer_count(), 0);
    }

    #[test]
    fn closed_platform_runs_no_iterations() {
        let mut platform = HeadlessPlatform::new();
        platform.request_close();
        let mut engine = engine(platform);
        engine.run().unwrap();

        assert_eq!(engine.stats().iterations, 0);
    }

    // ── scene selection ───────────────────────────────────────────────────

    #[test]
    fn unknown_scene_ids_are_fatal() {
        for id in [-1, 2, 3, 100, i32::MAX] {
            let mut engine = engine(HeadlessPlatform::new());
            assert_eq!(engine.set_scene(id), Err(EngineError::UnknownScene(id)));
        }
    }

    #[test]
    fn unknown_scene_keeps_the_current_one() {
        let mut engine = engine(HeadlessPlatform::new());
        engine.set_scene(0).unwrap();
        assert!(engine.set_scene(9).is_err());
        assert_eq!(engine.active_scene(), Some(SceneId::Editor));
    }

    #[test]
    fn unknown_initial_scene_stops_run() {
        let config = EngineConfig {
            initial_scene: 7,
            ..EngineConfig::default()
        };
        let mut engine = engine_with(config, HeadlessPlatform::with_frame_limit(3));

        assert_eq!(engine.run(), Err(EngineError::UnknownScene(7)));
        assert_eq!(engine.stats().iterations, 0);
    }

    #[test]
    fn switching_releases_previous_scene() {
        let mut engine = engine(HeadlessPlatform::new());
        engine.set_scene(0).unwrap();
        assert_eq!(engine.graphics().buffer_count(), 2);

        engine.set_scene(1).unwrap();
        assert_eq!(engine.graphics().buffer_count(), 0);
        assert_eq!(engine.stats().scene_switches, 1);
    }

    // ── input ─────────────────────────────────────────────────────────────

    #[test]
    fn button_latch_survives_frames() {
        let press = InputEvent::MouseButton {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            modifiers: Modifiers::default(),
        };
        let mut engine = engine(HeadlessPlatform::with_frame_limit(5).script(0, press));
        engine.run().unwrap();

        assert!(engine.input().mouse.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn space_fades_editor_into_level() {
        let space = InputEvent::Key {
            key: Key::Space,
            code: 57,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let mut engine = engine(HeadlessPlatform::with_frame_limit(8).script(0, space));
        engine.set_scene(0).unwrap();
        for _ in 0..8 {
            engine.iterate().unwrap();
        }

        assert_eq!(engine.active_scene(), Some(SceneId::Level));
        assert_eq!(engine.stats().scene_switches, 1);

        let clears = engine.graphics().clears();
        assert_ne!(clears[2], Rgba::white());
        assert_eq!(engine.graphics().last_clear(), Some(Rgba::white()));
    }
}
