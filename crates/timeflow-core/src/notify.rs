//! Notifier trait and the messages the controller produces.
//!
//! Two streams leave the controller through one observer:
//!
//! - [`Notice`]s: short human-readable messages for the player, and
//! - [`StateChange`]s: structured "field X went from A to B" events for
//!   logging and tooling.
//!
//! Hosts implement [`Notifier`] to put notices on screen. The
//! [`TracingNotifier`] and [`RecordingNotifier`] cover logging and tests.

use timeflow_types::{Notice, NoticeKind, StateChange};
use tracing::{debug, info};

/// Receives the controller's notices and state changes.
pub trait Notifier {
    /// Display a message to the player.
    fn notify(&mut self, notice: &Notice);

    /// Observe a state transition. Ignored by default.
    fn state_changed(&mut self, _change: &StateChange) {}
}

/// Notifier that writes everything to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: &Notice) {
        info!(
            kind = ?notice.kind,
            duration_ms = notice.duration.millis(),
            "{}",
            notice.message
        );
    }

    fn state_changed(&mut self, change: &StateChange) {
        debug!(change = ?change, "{change}");
    }
}

/// Notifier that keeps everything in memory, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotifier {
    /// Notices received so far.
    pub notices: Vec<Notice>,
    /// State changes received so far.
    pub changes: Vec<StateChange>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self {
            notices: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Messages of all notices received, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.message.as_str()).collect()
    }

    /// Take and clear everything recorded so far.
    pub fn drain(&mut self) -> (Vec<Notice>, Vec<StateChange>) {
        (
            std::mem::take(&mut self.notices),
            std::mem::take(&mut self.changes),
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn state_changed(&mut self, change: &StateChange) {
        self.changes.push(*change);
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// The player froze time.
pub fn time_stopped() -> Notice {
    Notice::quick(NoticeKind::FreezeEngaged, "Time stopped.")
}

/// The player resumed time.
pub fn time_resumed() -> Notice {
    Notice::quick(NoticeKind::FreezeReleased, "Time resumed.")
}

/// The player changed the tick length.
pub fn speed_changed(interval_ms: i64) -> Notice {
    Notice::quick(
        NoticeKind::IntervalChanged,
        format!(
            "Time speed set to {} seconds per 10 minutes.",
            format_seconds(interval_ms)
        ),
    )
}

/// Time froze because the clock reached the global freeze time.
pub fn time_stopped_at_time() -> Notice {
    Notice::short(
        NoticeKind::AutoFreezeEngaged,
        "Time stopped automatically.",
    )
}

/// Arrived somewhere time is frozen by the time-of-day rule.
pub fn time_stopped_globally() -> Notice {
    Notice::short(NoticeKind::LocationSummary, "Time is stopped globally.")
}

/// Arrived somewhere time is frozen by a location rule.
pub fn time_stopped_here() -> Notice {
    Notice::short(NoticeKind::LocationSummary, "Time is stopped here.")
}

/// Arrived somewhere time runs.
pub fn time_speed_here(interval_ms: i64) -> Notice {
    Notice::short(
        NoticeKind::LocationSummary,
        format!(
            "Time is now {} seconds per 10 minutes here.",
            format_seconds(interval_ms)
        ),
    )
}

/// The configuration file was read again.
pub fn config_reloaded() -> Notice {
    Notice::short(NoticeKind::ConfigReloaded, "Configuration reloaded.")
}

/// Format milliseconds as seconds with at most two decimals.
///
/// Trailing zeros are dropped: `14000` -> `"14"`, `1500` -> `"1.5"`,
/// `1234` -> `"1.23"`. Halves round away from zero.
pub fn format_seconds(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let hundredths = ms.unsigned_abs().saturating_add(5) / 10;
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    if frac == 0 {
        format!("{sign}{whole}")
    } else if frac % 10 == 0 {
        format!("{sign}{whole}.{}", frac / 10)
    } else {
        format!("{sign}{whole}.{frac:02}")
    }
}
