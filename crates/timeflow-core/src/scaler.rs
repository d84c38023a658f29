//! Rate scaling of the external clock's raw elapsed-time counter.
//!
//! The host clock advances one tick (ten in-game minutes) whenever its raw
//! elapsed-time counter reaches the location's *reference interval*. To
//! make a tick last [`RateScaler::target_interval_ms`] of real time
//! instead, every observed increment is multiplied by
//! `reference / target` before it is written back.
//!
//! Scaling the increment rather than the absolute value keeps progress that
//! already accumulated when the target changes mid-countdown; only the rate
//! of future progress changes.
//!
//! # Design Principles
//!
//! - Integer arithmetic only. Products are formed in `i128` and rounded
//!   half-to-even, so results are exact and reproducible.
//! - Total over its inputs: negative intervals clamp to zero and a zero
//!   target falls back to [`FALLBACK_TARGET_INTERVAL_MS`].

use crate::clock::ClockSample;

/// Target used when rescaling is requested with a zero target interval.
pub const FALLBACK_TARGET_INTERVAL_MS: i64 = 1000;

/// Rewrites raw clock progress so one tick spans the target interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateScaler {
    /// Milliseconds of real time per tick. Never negative.
    target_interval_ms: i64,
}

impl RateScaler {
    /// Create a scaler with the given target, clamped at zero.
    pub const fn new(target_interval_ms: i64) -> Self {
        Self {
            target_interval_ms: clamp_interval(target_interval_ms),
        }
    }

    /// Current target interval in milliseconds.
    pub const fn target_interval_ms(&self) -> i64 {
        self.target_interval_ms
    }

    /// Set the target interval, clamping negative values to zero.
    ///
    /// Returns the previous target.
    pub const fn set_target_interval(&mut self, ms: i64) -> i64 {
        let previous = self.target_interval_ms;
        self.target_interval_ms = clamp_interval(ms);
        previous
    }

    /// Compute the raw elapsed value to write back for one clock sample.
    ///
    /// - Frozen: `0` if the tick boundary was crossed (the tick is undone),
    ///   otherwise the previous reading, so no progress is made but the
    ///   baseline stays intact for when time resumes.
    /// - Not rescaling: the current reading unchanged.
    /// - Rescaling: the increment since the previous reading (or the whole
    ///   reading after a boundary) scaled by `reference / target`.
    ///
    /// A zero target is replaced by [`FALLBACK_TARGET_INTERVAL_MS`] before
    /// dividing, and the replacement is kept.
    pub fn on_clock_sample(
        &mut self,
        sample: ClockSample,
        reference_interval_ms: i64,
        frozen: bool,
        rescale_enabled: bool,
    ) -> i64 {
        if frozen {
            return if sample.boundary_crossed() {
                0
            } else {
                sample.previous
            };
        }
        if !rescale_enabled {
            return sample.current;
        }
        if self.target_interval_ms == 0 {
            self.target_interval_ms = FALLBACK_TARGET_INTERVAL_MS;
        }

        if sample.boundary_crossed() {
            self.scale(sample.current, reference_interval_ms)
        } else {
            sample
                .previous
                .saturating_add(self.scale(sample.delta(), reference_interval_ms))
        }
    }

    /// Add `delta` to the target interval and return the new value.
    ///
    /// Increases are unbounded. A decrease never takes the interval below
    /// `min(target, |delta|)`, so it cannot reach zero from a positive
    /// target.
    pub const fn change_interval(&mut self, delta: i64) -> i64 {
        let current = self.target_interval_ms;
        let magnitude = delta.saturating_abs();
        let min_allowed = if current < magnitude { current } else { magnitude };
        let proposed = current.saturating_add(delta);
        self.target_interval_ms = if proposed > min_allowed {
            proposed
        } else {
            min_allowed
        };
        self.target_interval_ms
    }

    /// `round(amount * reference / target)` with half-to-even rounding.
    fn scale(&self, amount: i64, reference_interval_ms: i64) -> i64 {
        let numerator = i128::from(amount).saturating_mul(i128::from(reference_interval_ms));
        let denominator = i128::from(self.target_interval_ms.max(1));
        let rounded = div_round_half_even(numerator, denominator);
        i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
    }
}

const fn clamp_interval(ms: i64) -> i64 {
    if ms < 0 { 0 } else { ms }
}

/// Divide and round to the nearest integer, ties to even.
///
/// `denominator` must be positive.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    let twice = remainder.saturating_mul(2);
    let round_up = twice > denominator || (twice == denominator && quotient.rem_euclid(2) == 1);
    if round_up {
        quotient.saturating_add(1)
    } else {
        quotient
    }
}
