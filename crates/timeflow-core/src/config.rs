//! Configuration loading and typed config structures for the Timeflow controller.
//!
//! The configuration lives in `timeflow-config.yaml` next to the host. This
//! module defines strongly-typed structs that mirror the YAML structure and
//! a loader that reads and validates the file. Every section is optional;
//! missing values fall back to the defaults below.
//!
//! The policy decisions derived from these values (freeze rules, tick
//! lengths, festival days) live in [`crate::policy`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use timeflow_types::{ClockTime, GameDate, LocationKind, Season};

/// Environment variable that overrides [`TimeflowConfig::location_notify`].
pub const LOCATION_NOTIFY_ENV: &str = "TIMEFLOW_LOCATION_NOTIFY";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but are not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeflowConfig {
    /// Whether time scaling also applies on festival days.
    #[serde(default)]
    pub enable_on_festival_days: bool,

    /// Whether to show a summary notice after every location change.
    #[serde(default)]
    pub location_notify: bool,

    /// Base amount in milliseconds for the increase/decrease actions.
    #[serde(default = "default_interval_step_ms")]
    pub interval_step_ms: i64,

    /// Real seconds per in-game minute, by location.
    #[serde(default)]
    pub seconds_per_minute: SecondsPerMinuteConfig,

    /// When and where time freezes automatically.
    #[serde(default)]
    pub freeze_time: FreezeTimeConfig,

    /// Dates on which scaling is off unless `enable_on_festival_days`.
    #[serde(default = "default_festival_days")]
    pub festival_days: BTreeSet<GameDate>,

    /// Logging configuration for the host.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TimeflowConfig {
    fn default() -> Self {
        Self {
            enable_on_festival_days: false,
            location_notify: false,
            interval_step_ms: default_interval_step_ms(),
            seconds_per_minute: SecondsPerMinuteConfig::default(),
            freeze_time: FreezeTimeConfig::default(),
            festival_days: default_festival_days(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TimeflowConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `TIMEFLOW_LOCATION_NOTIFY` (`true`/`false`) overrides
    /// `location_notify` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-positive step, a
    /// non-finite or non-positive seconds value, or a festival day of 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_step_ms <= 0 {
            return Err(ConfigError::Invalid {
                reason: "interval_step_ms must be at least 1".to_owned(),
            });
        }
        for (name, seconds) in self.seconds_per_minute.entries() {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("seconds_per_minute.{name} must be a positive number"),
                });
            }
        }
        if let Some(date) = self.festival_days.iter().find(|date| date.day == 0) {
            return Err(ConfigError::Invalid {
                reason: format!("festival day {} {} is out of range", date.season, date.day),
            });
        }
        Ok(())
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOCATION_NOTIFY_ENV) {
            match val.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.location_notify = true,
                "0" | "false" | "no" => self.location_notify = false,
                other => tracing::warn!(
                    value = other,
                    "ignoring unrecognised {LOCATION_NOTIFY_ENV} value"
                ),
            }
        }
    }
}

/// Real seconds per in-game minute.
///
/// One tick is ten in-game minutes, so the tick length in milliseconds is
/// `seconds * 1000 * 10`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondsPerMinuteConfig {
    /// Inside buildings.
    #[serde(default = "default_seconds_regular")]
    pub indoors: f64,

    /// Outside.
    #[serde(default = "default_seconds_regular")]
    pub outdoors: f64,

    /// In the regular mines.
    #[serde(default = "default_seconds_regular")]
    pub mines: f64,

    /// In the skull cavern.
    #[serde(default = "default_seconds_skull_cavern")]
    pub skull_cavern: f64,

    /// In the volcano dungeon.
    #[serde(default = "default_seconds_volcano_dungeon")]
    pub volcano_dungeon: f64,

    /// Per-location overrides, keyed by exact location name.
    #[serde(default)]
    pub by_location_name: BTreeMap<String, f64>,
}

impl SecondsPerMinuteConfig {
    /// Seconds for a location kind, ignoring name overrides.
    pub const fn for_kind(&self, kind: LocationKind) -> f64 {
        match kind {
            LocationKind::Indoors => self.indoors,
            LocationKind::Outdoors => self.outdoors,
            LocationKind::Mine => self.mines,
            LocationKind::SkullCavern => self.skull_cavern,
            LocationKind::VolcanoDungeon => self.volcano_dungeon,
        }
    }

    /// All configured values with their YAML key, for validation.
    fn entries(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        [
            ("indoors", self.indoors),
            ("outdoors", self.outdoors),
            ("mines", self.mines),
            ("skull_cavern", self.skull_cavern),
            ("volcano_dungeon", self.volcano_dungeon),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .chain(
            self.by_location_name
                .iter()
                .map(|(name, value)| (format!("by_location_name.{name}"), *value)),
        )
    }
}

impl Default for SecondsPerMinuteConfig {
    fn default() -> Self {
        Self {
            indoors: default_seconds_regular(),
            outdoors: default_seconds_regular(),
            mines: default_seconds_regular(),
            skull_cavern: default_seconds_skull_cavern(),
            volcano_dungeon: default_seconds_volcano_dungeon(),
            by_location_name: BTreeMap::new(),
        }
    }
}

/// Automatic freeze rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeTimeConfig {
    /// Freeze everywhere once the time of day reaches this value.
    #[serde(default)]
    pub anywhere_at_time: Option<ClockTime>,

    /// Freeze inside buildings.
    #[serde(default)]
    pub indoors: bool,

    /// Freeze outside.
    #[serde(default)]
    pub outdoors: bool,

    /// Freeze in the regular mines.
    #[serde(default)]
    pub mines: bool,

    /// Freeze in the skull cavern.
    #[serde(default)]
    pub skull_cavern: bool,

    /// Freeze in the volcano dungeon.
    #[serde(default)]
    pub volcano_dungeon: bool,

    /// Locations that always freeze, by exact name.
    #[serde(default)]
    pub by_location_name: BTreeSet<String>,

    /// Locations that never freeze by location rules, by exact name.
    /// Takes precedence over every other location rule.
    #[serde(default)]
    pub except_location_names: BTreeSet<String>,
}

impl FreezeTimeConfig {
    /// Whether locations of this kind freeze, ignoring name rules.
    pub const fn for_kind(&self, kind: LocationKind) -> bool {
        match kind {
            LocationKind::Indoors => self.indoors,
            LocationKind::Outdoors => self.outdoors,
            LocationKind::Mine => self.mines,
            LocationKind::SkullCavern => self.skull_cavern,
            LocationKind::VolcanoDungeon => self.volcano_dungeon,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_interval_step_ms() -> i64 {
    1000
}

const fn default_seconds_regular() -> f64 {
    1.4
}

const fn default_seconds_skull_cavern() -> f64 {
    0.9
}

const fn default_seconds_volcano_dungeon() -> f64 {
    0.7
}

fn default_festival_days() -> BTreeSet<GameDate> {
    [
        GameDate::new(Season::Spring, 13),
        GameDate::new(Season::Spring, 24),
        GameDate::new(Season::Summer, 11),
        GameDate::new(Season::Summer, 28),
        GameDate::new(Season::Fall, 16),
        GameDate::new(Season::Fall, 27),
        GameDate::new(Season::Winter, 8),
        GameDate::new(Season::Winter, 25),
    ]
    .into_iter()
    .collect()
}

fn default_log_level() -> String {
    "info".to_owned()
}
