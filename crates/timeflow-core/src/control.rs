//! Player-facing control actions.
//!
//! The host binds these to keys or buttons; the controller only sees the
//! logical action and, for interval changes, how far to step.

use serde::{Deserialize, Serialize};

/// An action the player can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Freeze time if it runs, resume it if it is frozen.
    ToggleFreeze,
    /// Make ticks longer (time runs slower).
    IncreaseInterval,
    /// Make ticks shorter (time runs faster).
    DecreaseInterval,
    /// Drop the manual override and re-apply the configured defaults.
    ResetToDefaults,
}

/// Scale applied to the configured interval step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepModifier {
    /// The configured step.
    #[default]
    None,
    /// A tenth of the step.
    Fine,
    /// Ten times the step.
    Coarse,
    /// A hundred times the step.
    Huge,
}

impl StepModifier {
    /// The step in milliseconds for a base step.
    pub const fn apply(self, base_ms: i64) -> i64 {
        match self {
            Self::None => base_ms,
            Self::Fine => base_ms / 10,
            Self::Coarse => base_ms.saturating_mul(10),
            Self::Huge => base_ms.saturating_mul(100),
        }
    }
}
