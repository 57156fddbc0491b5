use std::time::Duration;

use super::clock::{Clock, MonotonicClock};

/// Delta value in place before the first loop iteration has completed.
///
/// Any negative delta means "no valid delta yet"; scenes are never updated
/// with it.
pub const UNSET_DELTA: f32 = -1.0;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed between the starts of the previous and current iterations, in seconds.
    pub dt: f32,

    /// Number of completed iterations when the snapshot was taken.
    pub frame_index: u64,
}

/// Loop-local frame timer.
///
/// Keeps the begin timestamp of the running iteration and the delta computed
/// at the end of the previous one. The delta starts at [`UNSET_DELTA`] so the
/// first iteration has nothing to hand to the scene.
///
/// Unlike a game-simulation clock, deltas are not clamped: the scene sees
/// exactly `end - begin`.
#[derive(Debug, Clone)]
pub struct FrameClock<C: Clock = MonotonicClock> {
    clock: C,
    begin: Duration,
    dt: f32,
    frame_index: u64,
}

impl<C: Clock> FrameClock<C> {
    pub fn new(clock: C) -> Self {
        let begin = clock.now();
        Self {
            clock,
            begin,
            dt: UNSET_DELTA,
            frame_index: 0,
        }
    }

    /// Resets the baseline to "now" and restores the sentinel delta.
    pub fn restart(&mut self) {
        self.begin = self.clock.now();
        self.dt = UNSET_DELTA;
        self.frame_index = 0;
    }

    /// Returns the delta for the current iteration, or `None` before the first
    /// iteration has completed.
    pub fn delta(&self) -> Option<f32> {
        (self.dt >= 0.0).then_some(self.dt)
    }

    /// Frame snapshot for the current iteration, if a delta exists.
    pub fn frame_time(&self) -> Option<FrameTime> {
        self.delta().map(|dt| FrameTime {
            dt,
            frame_index: self.frame_index,
        })
    }

    /// Ends the current iteration: `dt = now - begin`, then `begin = now`.
    pub fn tick(&mut self) -> FrameTime {
        let end = self.clock.now();
        self.dt = end.saturating_sub(self.begin).as_secs_f32();
        self.begin = end;
        self.frame_index = self.frame_index.wrapping_add(1);

        FrameTime {
            dt: self.dt,
            frame_index: self.frame_index,
        }
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl Default for FrameClock<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::new())
    }
}
