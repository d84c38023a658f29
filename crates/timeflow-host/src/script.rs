//! Session scripts: a replayable sequence of host events and frames.
//!
//! ```yaml
//! frame_interval_ms: 0
//! steps:
//!   - day_started:
//!       date: { season: spring, day: 1 }
//!       location: { name: Farm, kind: outdoors }
//!   - frames: { count: 500, advance_ms: 16 }
//!   - warp: { name: FarmHouse, kind: indoors }
//!   - action: { action: toggle_freeze }
//!   - reload_config
//! ```
//!
//! A session load is implied before the first step.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use timeflow_core::control::{ControlAction, StepModifier};
use timeflow_types::{GameDate, Location};

use crate::error::HostError;

/// A full session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Real milliseconds between frames; `0` replays as fast as possible.
    #[serde(default)]
    pub frame_interval_ms: u64,

    /// Whether this session owns the clock.
    #[serde(default = "default_authoritative")]
    pub authoritative: bool,

    /// Extra reference milliseconds per in-game minute, by location name.
    #[serde(default)]
    pub extra_ms_per_minute: BTreeMap<String, i64>,

    /// What happens, in order. Each step is a single-key map.
    #[serde(with = "serde_yml::with::singleton_map_recursive")]
    pub steps: Vec<ScriptStep>,
}

/// One scripted occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// A new day starts at `location`.
    DayStarted {
        /// Today's date.
        date: GameDate,
        /// Where the player wakes up.
        location: Location,
    },
    /// Run world updates.
    Frames {
        /// Number of updates.
        count: u32,
        /// Real milliseconds each update adds to the host counter.
        advance_ms: i64,
    },
    /// The player moves to another location.
    Warp(Location),
    /// The player triggers a control action.
    Action {
        /// What the player does.
        action: ControlAction,
        /// Held modifier keys.
        #[serde(default)]
        modifier: StepModifier,
    },
    /// The player enters (`false`) or leaves (`true`) a blocking state.
    SetPlayerFree(bool),
    /// A scripted event starts (`true`) or ends (`false`).
    SetEventUp(bool),
    /// Re-read the configuration file.
    ReloadConfig,
}

impl Script {
    /// Load a script from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Io`] if the file cannot be read or
    /// [`HostError::Script`] if it is not a valid script.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a script from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Script`] if the string is not a valid script.
    pub fn parse(yaml: &str) -> Result<Self, HostError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

const fn default_authoritative() -> bool {
    true
}
