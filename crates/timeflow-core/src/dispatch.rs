//! Host events and the table of recompute steps they trigger.
//!
//! Many host callbacks funnel into a handful of recompute entry points. The
//! mapping lives in one place, [`plan`], as an ordered list of [`Step`]s
//! per [`Trigger`]. The controller executes the steps in order.
//!
//! Ordering rule: every plan refreshes the automatic freeze cause and the
//! target interval before any notice step, so a notice never describes a
//! new location with a stale interval.

use timeflow_types::{ClockTime, GameDate, Location};

/// Something the host reports to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A save finished loading; a new session begins.
    SessionLoaded,
    /// A new day started.
    DayStarted {
        /// Today's date.
        date: GameDate,
        /// Where the player wakes up.
        location: Location,
    },
    /// The local player moved to another location.
    LocationChanged {
        /// The new location.
        location: Location,
    },
    /// The in-game time of day advanced.
    TimeChanged {
        /// The new time.
        time: ClockTime,
    },
    /// The configuration was reloaded and should be re-applied.
    ConfigReloaded,
}

impl HostEvent {
    /// The trigger this event maps to, if it has a recompute plan.
    pub const fn trigger(&self) -> Option<Trigger> {
        match self {
            Self::SessionLoaded => None,
            Self::DayStarted { .. } => Some(Trigger::DayStarted),
            Self::LocationChanged { .. } => Some(Trigger::LocationChanged),
            Self::TimeChanged { .. } => Some(Trigger::TimeChanged),
            Self::ConfigReloaded => Some(Trigger::ConfigReloaded),
        }
    }
}

/// Kinds of occurrence with a recompute plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A new day started.
    DayStarted,
    /// The player changed location.
    LocationChanged,
    /// The time of day advanced.
    TimeChanged,
    /// The configuration was reloaded.
    ConfigReloaded,
    /// The player asked to reset freeze settings to defaults.
    FreezeReset,
}

/// One recompute or notification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Clear the manual override and recompute the automatic cause.
    ResetFreeze,
    /// Re-derive whether rescaling applies today.
    RescaleForDay,
    /// Recompute the automatic freeze cause.
    AutoFreeze,
    /// Recompute the cause and announce if time just became frozen.
    AutoFreezeAnnounced,
    /// Re-derive the target interval for the current location.
    TargetInterval,
    /// Summarise the time settings at the current location, if enabled.
    LocationNotice,
    /// Announce the configuration reload.
    ConfigReloadedNotice,
}

impl Step {
    /// Whether this step only emits a notice.
    pub const fn is_notice(self) -> bool {
        matches!(self, Self::LocationNotice | Self::ConfigReloadedNotice)
    }
}

const DAY_STARTED: &[Step] = &[
    Step::ResetFreeze,
    Step::RescaleForDay,
    Step::TargetInterval,
    Step::LocationNotice,
];

const LOCATION_CHANGED: &[Step] = &[Step::AutoFreeze, Step::TargetInterval, Step::LocationNotice];

const TIME_CHANGED: &[Step] = &[Step::AutoFreezeAnnounced];

const CONFIG_RELOADED: &[Step] = &[
    Step::RescaleForDay,
    Step::AutoFreeze,
    Step::TargetInterval,
    Step::LocationNotice,
    Step::ConfigReloadedNotice,
];

const FREEZE_RESET: &[Step] = &[Step::ResetFreeze, Step::TargetInterval, Step::LocationNotice];

/// The ordered steps to run for a trigger.
pub const fn plan(trigger: Trigger) -> &'static [Step] {
    match trigger {
        Trigger::DayStarted => DAY_STARTED,
        Trigger::LocationChanged => LOCATION_CHANGED,
        Trigger::TimeChanged => TIME_CHANGED,
        Trigger::ConfigReloaded => CONFIG_RELOADED,
        Trigger::FreezeReset => FREEZE_RESET,
    }
}
