//! Access to the host's raw clock counter.
//!
//! The host owns a counter of real-time milliseconds elapsed since its last
//! tick. It resets to (near) zero whenever a tick elapses. The controller
//! reads that counter once per world update through [`ClockSource`],
//! pairs it with the previous reading in a [`ClockSample`], and writes the
//! rewritten value back.
//!
//! [`ClockTracker`] keeps the one reading that must survive between
//! updates. The baseline is taken *after* write-back, so a frozen clock
//! that undid a tick starts the next update from zero.

use timeflow_types::Location;

/// Default real-time length of one tick in milliseconds, before any
/// per-location extra time.
pub const BASE_TICK_INTERVAL_MS: i64 = 7000;

/// The host clock the controller reads and rewrites.
pub trait ClockSource {
    /// Raw milliseconds elapsed since the last tick.
    fn elapsed_ms(&self) -> i64;

    /// Overwrite the raw elapsed milliseconds.
    fn set_elapsed_ms(&mut self, value: i64);

    /// The unmodified real-time length of one tick at `location`.
    fn reference_interval_ms(&self, location: &Location) -> i64;
}

/// Two consecutive readings of the raw counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    /// Reading at the previous update (after write-back).
    pub previous: i64,
    /// Reading at this update.
    pub current: i64,
}

impl ClockSample {
    /// Pair two readings.
    pub const fn new(previous: i64, current: i64) -> Self {
        Self { previous, current }
    }

    /// Whether the counter wrapped, meaning a tick elapsed in between.
    pub const fn boundary_crossed(&self) -> bool {
        self.current < self.previous
    }

    /// Signed difference between the readings.
    pub const fn delta(&self) -> i64 {
        self.current.saturating_sub(self.previous)
    }
}

/// Remembers the previous raw reading between world updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTracker {
    previous: i64,
}

impl ClockTracker {
    /// Create a tracker with a zero baseline.
    pub const fn new() -> Self {
        Self { previous: 0 }
    }

    /// The baseline the next sample will be compared with.
    pub const fn previous(&self) -> i64 {
        self.previous
    }

    /// Read the clock and return a sample if the counter moved.
    pub fn poll(&self, clock: &dyn ClockSource) -> Option<ClockSample> {
        let current = clock.elapsed_ms();
        (current != self.previous).then_some(ClockSample::new(self.previous, current))
    }

    /// Record the clock's current value as the next baseline.
    pub fn commit(&mut self, clock: &dyn ClockSource) {
        self.previous = clock.elapsed_ms();
    }

    /// Forget the baseline, e.g. when a new session starts.
    pub const fn reset(&mut self) {
        self.previous = 0;
    }
}
