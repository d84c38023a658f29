//! Value structs shared between the controller core and its hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{AutoFreezeCause, LocationKind, ManualOverride, NoticeDuration, NoticeKind, Season};

// ---------------------------------------------------------------------------
// Calendar and clock
// ---------------------------------------------------------------------------

/// A calendar date in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameDate {
    /// The current season.
    pub season: Season,
    /// Day of the month, starting at 1.
    pub day: u8,
}

impl GameDate {
    /// Create a date.
    pub const fn new(season: Season, day: u8) -> Self {
        Self { season, day }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.day)
    }
}

/// In-game time of day in `HHMM` form.
///
/// `600` is 6:00 in the morning and `2600` is 2:00 the next morning; the
/// value keeps counting past midnight so it stays monotonic within a day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClockTime(pub u32);

impl ClockTime {
    /// Time at which a new day starts.
    pub const DAY_START: Self = Self(600);

    /// Latest time a day can reach.
    pub const DAY_END: Self = Self(2600);

    /// Advance by ten in-game minutes, rolling the minutes into the hour.
    #[must_use]
    pub const fn add_ten_minutes(self) -> Self {
        let next = self.0.saturating_add(10);
        if next % 100 >= 60 {
            Self(next.saturating_add(40))
        } else {
            Self(next)
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::DAY_START
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 100, self.0 % 100)
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A named place the player can be in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Unique location name as reported by the host.
    pub name: String,
    /// General category of the location.
    pub kind: LocationKind,
}

impl Location {
    /// Create a location.
    pub fn new(name: impl Into<String>, kind: LocationKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Observability
// ---------------------------------------------------------------------------

/// A transition of one stateful controller field.
///
/// Emitted only when the value actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum StateChange {
    /// The automatic freeze cause changed.
    AutoFreezeCause {
        /// Previous cause.
        from: AutoFreezeCause,
        /// New cause.
        to: AutoFreezeCause,
    },
    /// The player's manual override changed.
    ManualOverride {
        /// Previous override.
        from: ManualOverride,
        /// New override.
        to: ManualOverride,
    },
    /// The target interval (milliseconds per ten in-game minutes) changed.
    TargetInterval {
        /// Previous interval.
        from: i64,
        /// New interval.
        to: i64,
    },
    /// Whether rescaling applies today changed.
    RescaleEnabled {
        /// Previous flag.
        from: bool,
        /// New flag.
        to: bool,
    },
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoFreezeCause { from, to } => {
                write!(f, "auto freeze changed from {from} to {to}")
            }
            Self::ManualOverride { from, to } => {
                write!(f, "manual freeze changed from {from} to {to}")
            }
            Self::TargetInterval { from, to } => {
                write!(f, "clock interval changed from {from} to {to}")
            }
            Self::RescaleEnabled { from, to } => {
                write!(f, "time scaling changed from {from} to {to}")
            }
        }
    }
}

/// A short human-readable message for the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// What the notice reports.
    pub kind: NoticeKind,
    /// Text to display.
    pub message: String,
    /// How long the host should display it.
    pub duration: NoticeDuration,
}

impl Notice {
    /// A one-second notice answering direct player input.
    pub fn quick(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: NoticeDuration::Quick,
        }
    }

    /// A two-second notice for contextual changes.
    pub fn short(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: NoticeDuration::Short,
        }
    }
}
