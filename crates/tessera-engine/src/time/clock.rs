use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
///
/// `now()` is measured from the clock's own epoch and never decreases.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock monotonic time backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Deterministic clock: every read returns the current value, then advances
/// it by `step`.
///
/// Used by headless runs and tests that need reproducible delta times.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    next: Cell<Duration>,
    step: Duration,
}

impl FixedStepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            next: Cell::new(Duration::ZERO),
            step,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> Duration {
        let now = self.next.get();
        self.next.set(now.saturating_add(self.step));
        now
    }
}
