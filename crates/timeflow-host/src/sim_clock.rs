//! Simulated host clock.
//!
//! Mimics a game loop that accumulates real milliseconds into a raw
//! counter and, once the counter passes the reference interval for the
//! current location, advances the time of day by ten minutes and resets
//! the counter to zero. The controller sees it through [`ClockSource`].

use std::collections::BTreeMap;

use timeflow_core::clock::{BASE_TICK_INTERVAL_MS, ClockSource};
use timeflow_types::{ClockTime, Location};

/// A tick counter plus the time of day it drives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedClock {
    elapsed_ms: i64,
    time: ClockTime,
    extra_ms_per_minute: BTreeMap<String, i64>,
}

impl SimulatedClock {
    /// Create a clock at the start of a day.
    ///
    /// `extra_ms_per_minute` lengthens the reference tick at the named
    /// locations, by ten times the value since a tick is ten minutes.
    pub const fn new(extra_ms_per_minute: BTreeMap<String, i64>) -> Self {
        Self {
            elapsed_ms: 0,
            time: ClockTime::DAY_START,
            extra_ms_per_minute,
        }
    }

    /// Reset for a new day.
    pub const fn start_day(&mut self) {
        self.elapsed_ms = 0;
        self.time = ClockTime::DAY_START;
    }

    /// Current time of day.
    pub const fn time(&self) -> ClockTime {
        self.time
    }

    /// Advance one frame by `ms` real milliseconds at `location`.
    ///
    /// Returns the new time of day when a ten-minute tick completed. The
    /// clock stops at [`ClockTime::DAY_END`].
    pub fn advance(&mut self, ms: i64, location: &Location) -> Option<ClockTime> {
        if self.time >= ClockTime::DAY_END {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
        if self.elapsed_ms <= self.reference_interval_ms(location) {
            return None;
        }
        self.elapsed_ms = 0;
        self.time = self.time.add_ten_minutes();
        Some(self.time)
    }
}

impl ClockSource for SimulatedClock {
    fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    fn set_elapsed_ms(&mut self, value: i64) {
        self.elapsed_ms = value;
    }

    fn reference_interval_ms(&self, location: &Location) -> i64 {
        let extra = self
            .extra_ms_per_minute
            .get(&location.name)
            .copied()
            .unwrap_or(0);
        BASE_TICK_INTERVAL_MS.saturating_add(extra.saturating_mul(10))
    }
}
