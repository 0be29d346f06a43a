//! Time subsystem.
//!
//! The render loop reads elapsed seconds through [`TimeSource`] so that a tick
//! can be driven by the real monotonic clock or by a fixed value.

mod clock;

pub use clock::{FixedClock, MonotonicClock, TimeSource};
