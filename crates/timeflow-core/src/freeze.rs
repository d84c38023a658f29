//! Freeze verdict from the automatic cause and the player's override.
//!
//! [`FreezeDecision`] holds two independent inputs:
//!
//! - the [`AutoFreezeCause`], recomputed from policy whenever the location
//!   or time of day changes, and
//! - the [`ManualOverride`], set by the player and cleared at day start or
//!   once no automatic cause remains to override.
//!
//! Time is frozen when the player froze it, or when an automatic cause
//! applies and the player has not explicitly resumed. Every mutator returns
//! a [`FreezeTransition`] so the caller can log or announce what changed;
//! this module performs no I/O.

use timeflow_types::{AutoFreezeCause, ManualOverride, StateChange};

/// Old and new values of the freeze fields touched by one mutation.
///
/// Each field is `Some((from, to))` only when the value actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeTransition {
    /// Change to the automatic cause.
    pub auto: Option<(AutoFreezeCause, AutoFreezeCause)>,
    /// Change to the manual override.
    pub manual: Option<(ManualOverride, ManualOverride)>,
}

impl FreezeTransition {
    /// Whether nothing changed.
    pub const fn is_empty(&self) -> bool {
        self.auto.is_none() && self.manual.is_none()
    }

    /// Combine two transitions applied in sequence.
    ///
    /// The earliest `from` and the latest `to` are kept per field; a field
    /// that ends where it started is dropped.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            auto: chain(self.auto, next.auto),
            manual: chain(self.manual, next.manual),
        }
    }

    /// The transition as [`StateChange`] events, cause first.
    pub fn changes(&self) -> impl Iterator<Item = StateChange> {
        let auto = self
            .auto
            .map(|(from, to)| StateChange::AutoFreezeCause { from, to });
        let manual = self
            .manual
            .map(|(from, to)| StateChange::ManualOverride { from, to });
        auto.into_iter().chain(manual)
    }
}

fn chain<T: PartialEq + Copy>(first: Option<(T, T)>, second: Option<(T, T)>) -> Option<(T, T)> {
    match (first, second) {
        (Some((from, _)), Some((_, to))) => (from != to).then_some((from, to)),
        (Some(change), None) | (None, Some(change)) => Some(change),
        (None, None) => None,
    }
}

/// Combines automatic and manual freeze triggers into one verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeDecision {
    auto: AutoFreezeCause,
    manual: ManualOverride,
}

impl FreezeDecision {
    /// Create a decision with no cause and no override.
    pub const fn new() -> Self {
        Self {
            auto: AutoFreezeCause::None,
            manual: ManualOverride::Unset,
        }
    }

    /// Derive the automatic cause from the two policy predicates.
    ///
    /// The location rule is checked first and wins when both hold.
    pub const fn recompute_auto(
        location_rule_present: bool,
        time_of_day_rule_present: bool,
    ) -> AutoFreezeCause {
        if location_rule_present {
            AutoFreezeCause::LocationRule
        } else if time_of_day_rule_present {
            AutoFreezeCause::TimeOfDayRule
        } else {
            AutoFreezeCause::None
        }
    }

    /// Current automatic cause.
    pub const fn auto_cause(&self) -> AutoFreezeCause {
        self.auto
    }

    /// Current manual override.
    pub const fn manual_override(&self) -> ManualOverride {
        self.manual
    }

    /// Whether time is frozen.
    pub const fn is_frozen(&self) -> bool {
        matches!(self.manual, ManualOverride::Frozen)
            || (self.auto.is_active() && !matches!(self.manual, ManualOverride::Unfrozen))
    }

    /// Set or clear (`None`) the manual override.
    pub fn set_manual_override(&mut self, value: Option<bool>) -> FreezeTransition {
        self.replace_manual(ManualOverride::from_option(value))
    }

    /// Recompute the automatic cause from the policy predicates.
    ///
    /// A manual unfreeze only means something while an automatic freeze is
    /// active. When the cause disappears, an `Unfrozen` override is cleared
    /// so it cannot cancel the next automatic freeze.
    pub fn apply_auto_freeze_update(
        &mut self,
        location_rule_present: bool,
        time_of_day_rule_present: bool,
    ) -> FreezeTransition {
        let cause = Self::recompute_auto(location_rule_present, time_of_day_rule_present);
        let auto = self.replace_auto(cause);
        let manual = if cause == AutoFreezeCause::None && self.manual == ManualOverride::Unfrozen {
            self.replace_manual(ManualOverride::Unset)
        } else {
            FreezeTransition::default()
        };
        auto.then(manual)
    }

    /// Flip the verdict by player input: freeze when running, resume when
    /// frozen.
    pub fn toggle(&mut self) -> FreezeTransition {
        let next = if self.is_frozen() {
            ManualOverride::Unfrozen
        } else {
            ManualOverride::Frozen
        };
        self.replace_manual(next)
    }

    /// Clear the manual override and recompute the automatic cause.
    pub fn reset(
        &mut self,
        location_rule_present: bool,
        time_of_day_rule_present: bool,
    ) -> FreezeTransition {
        let cleared = self.set_manual_override(None);
        cleared.then(self.apply_auto_freeze_update(location_rule_present, time_of_day_rule_present))
    }

    fn replace_auto(&mut self, cause: AutoFreezeCause) -> FreezeTransition {
        let from = std::mem::replace(&mut self.auto, cause);
        FreezeTransition {
            auto: (from != cause).then_some((from, cause)),
            manual: None,
        }
    }

    fn replace_manual(&mut self, value: ManualOverride) -> FreezeTransition {
        let from = std::mem::replace(&mut self.manual, value);
        FreezeTransition {
            auto: None,
            manual: (from != value).then_some((from, value)),
        }
    }
}
