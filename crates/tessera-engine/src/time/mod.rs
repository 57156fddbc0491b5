//! Time subsystem.
//!
//! Provides a monotonic clock abstraction and the loop-local frame timer.
//! Intended usage:
//! - one `FrameClock` per main loop
//! - `delta()` before the scene update, `tick()` once per presented frame

mod clock;
mod frame_clock;

pub use clock::{Clock, FixedStepClock, MonotonicClock};
pub use frame_clock::{FrameClock, FrameTime, UNSET_DELTA};
