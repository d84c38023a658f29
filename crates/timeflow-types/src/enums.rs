//! Enumeration types for the Timeflow controller.
//!
//! Calendar seasons, location categories, and the two halves of the
//! freeze verdict: the player's manual override and the automatic cause.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// A season of the host calendar.
///
/// Deserialization goes through [`FromStr`], so names are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Season {
    /// First season of the year.
    Spring,
    /// Second season of the year.
    Summer,
    /// Third season of the year. Also accepted as `autumn`.
    Fall,
    /// Last season of the year.
    Winter,
}

impl Season {
    /// Lowercase name used in configuration and log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a season name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeason(pub String);

impl fmt::Display for UnknownSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown season: {}", self.0)
    }
}

impl std::error::Error for UnknownSeason {}

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            "winter" => Ok(Self::Winter),
            other => Err(UnknownSeason(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Season {
    type Error = UnknownSeason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// General category of a location, used to pick default speed and freeze
/// rules when no per-name rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// Inside a building.
    Indoors,
    /// Outside.
    Outdoors,
    /// The regular mines.
    Mine,
    /// The deep cavern below the desert.
    SkullCavern,
    /// The volcano dungeon.
    VolcanoDungeon,
}

// ---------------------------------------------------------------------------
// Freeze state
// ---------------------------------------------------------------------------

/// The player's explicit freeze choice.
///
/// `Unset` never freezes time on its own; it only fails to cancel an
/// automatic freeze.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ManualOverride {
    /// The player froze time.
    Frozen,
    /// The player resumed time while an automatic freeze applied.
    Unfrozen,
    /// No explicit choice; automatic rules decide.
    #[default]
    Unset,
}

impl ManualOverride {
    /// Build from an optional boolean (`Some(true)` = frozen).
    pub const fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Frozen,
            Some(false) => Self::Unfrozen,
            None => Self::Unset,
        }
    }
}

impl fmt::Display for ManualOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Frozen => "frozen",
            Self::Unfrozen => "unfrozen",
            Self::Unset => "unset",
        })
    }
}

/// Why time would be frozen automatically, ignoring the player's override.
///
/// The causes are mutually exclusive. A location rule outranks a
/// time-of-day rule when both apply.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AutoFreezeCause {
    /// No automatic freeze applies.
    #[default]
    None,
    /// The current location is configured to freeze time.
    LocationRule,
    /// The current time of day is at or past the global freeze time.
    TimeOfDayRule,
}

impl AutoFreezeCause {
    /// Whether an automatic freeze applies.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for AutoFreezeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::LocationRule => "location_rule",
            Self::TimeOfDayRule => "time_of_day_rule",
        })
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// What a [`Notice`](crate::Notice) reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The player froze time.
    FreezeEngaged,
    /// The player resumed time.
    FreezeReleased,
    /// The target interval was changed by the player.
    IntervalChanged,
    /// Summary of the time settings after arriving somewhere.
    LocationSummary,
    /// Time froze automatically because of the time of day.
    AutoFreezeEngaged,
    /// The configuration was reloaded.
    ConfigReloaded,
}

/// How long a notice should stay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeDuration {
    /// One second, for direct responses to player input.
    Quick,
    /// Two seconds, for contextual changes.
    Short,
}

impl NoticeDuration {
    /// Display time in milliseconds.
    pub const fn millis(self) -> u32 {
        match self {
            Self::Quick => 1000,
            Self::Short => 2000,
        }
    }
}
