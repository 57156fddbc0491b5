use std::collections::BTreeMap;

use crate::gpu::{GraphicsBackend, HeadlessBackend};
use crate::input::{InputEvent, InputHandler};

use super::Platform;

/// Window-less platform driving a [`HeadlessBackend`].
///
/// Closes after an optional number of presented frames and replays scripted
/// input at fixed loop iterations.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    frame_limit: Option<u64>,
    script: BTreeMap<u64, Vec<InputEvent>>,
    close_requested: bool,

    polls: u64,
    swaps: u64,
}

impl HeadlessPlatform {
    /// A platform that never closes on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests close once `frames` frames have been presented.
    pub fn with_frame_limit(frames: u64) -> Self {
        Self {
            frame_limit: Some(frames),
            ..Self::default()
        }
    }

    /// Delivers `event` during the poll of loop iteration `iteration` (0-based).
    pub fn script(mut self, iteration: u64, event: InputEvent) -> Self {
        self.script.entry(iteration).or_default().push(event);
        self
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }
}

impl Platform for HeadlessPlatform {
    type Graphics = HeadlessBackend;

    fn should_close(&self) -> bool {
        self.close_requested || self.frame_limit.is_some_and(|limit| self.swaps >= limit)
    }

    fn poll_events(&mut self, _gfx: &mut HeadlessBackend, input: &mut dyn InputHandler) {
        if let Some(events) = self.script.remove(&self.polls) {
            for event in &events {
                event.dispatch(input);
            }
        }
        self.polls += 1;
    }

    fn swap_buffers(&mut self, gfx: &mut HeadlessBackend) {
        gfx.present();
        self.swaps += 1;
    }

    fn shutdown(&mut self, _gfx: &mut HeadlessBackend) {
        log::debug!(
            "headless platform shut down after {} polls, {} swaps",
            self.polls,
            self.swaps
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputContext, Key, KeyState, Modifiers};

    #[test]
    fn frame_limit_closes_after_swaps() {
        let mut platform = HeadlessPlatform::with_frame_limit(2);
        let mut gfx = HeadlessBackend::new();

        assert!(!platform.should_close());
        platform.swap_buffers(&mut gfx);
        assert!(!platform.should_close());
        platform.swap_buffers(&mut gfx);
        assert!(platform.should_close());
        assert_eq!(gfx.frames_presented(), 2);
    }

    #[test]
    fn scripted_events_arrive_on_their_iteration() {
        let space = InputEvent::Key {
            key: Key::Space,
            code: 57,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let mut platform = HeadlessPlatform::new().script(1, space);
        let mut gfx = HeadlessBackend::new();
        let mut input = InputContext::new();

        platform.poll_events(&mut gfx, &mut input);
        assert!(!input.keyboard.is_key_pressed(Key::Space));

        platform.poll_events(&mut gfx, &mut input);
        assert!(input.keyboard.is_key_pressed(Key::Space));
        assert_eq!(platform.polls(), 2);
    }

    #[test]
    fn request_close_is_immediate() {
        let mut platform = HeadlessPlatform::new();
        platform.request_close();
        assert!(platform.should_close());
    }
}
