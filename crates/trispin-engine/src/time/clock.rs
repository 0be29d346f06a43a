use std::time::{Duration, Instant};

/// Source of elapsed time, in seconds, since the render loop started.
pub trait TimeSource {
    fn elapsed_secs(&self) -> f64;
}

/// Monotonic clock anchored at construction (or the last [`reset`]).
///
/// [`reset`]: MonotonicClock::reset
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
    ticks: u64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            ticks: 0,
        }
    }

    /// Re-anchors the clock at "now" and clears the tick counter.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.ticks = 0;
    }

    /// Elapsed time since the anchor.
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start)
    }

    /// Records one presented frame and returns its index.
    pub fn tick(&mut self) -> u64 {
        let index = self.ticks;
        self.ticks = self.ticks.wrapping_add(1);
        index
    }

    /// Number of frames recorded since the anchor.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Time source frozen at a given number of seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedClock(pub f64);

impl TimeSource for FixedClock {
    fn elapsed_secs(&self) -> f64 {
        self.0
    }
}
