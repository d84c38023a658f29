//! Console notifier for the host.
//!
//! Prints every notice as a line of text and logs state changes through
//! [`TracingNotifier`]. In JSON mode, notices and state changes are printed
//! as JSON lines instead so a session can be diffed or post-processed.

use std::io::Write;

use serde::Serialize;
use timeflow_core::notify::{Notifier, TracingNotifier};
use timeflow_types::{Notice, StateChange};
use tracing::warn;

/// One line of JSON output.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputLine<'a> {
    Notice(&'a Notice),
    StateChange(&'a StateChange),
}

/// Notifier that writes to any [`Write`] sink.
#[derive(Debug)]
pub struct ConsoleNotifier<W> {
    out: W,
    json: bool,
    log: TracingNotifier,
}

impl<W: Write> ConsoleNotifier<W> {
    /// Create a notifier writing to `out`.
    pub const fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            log: TracingNotifier,
        }
    }

    /// Consume the notifier and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json(&mut self, line: &OutputLine<'_>) {
        let result = serde_json::to_writer(&mut self.out, line)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = result {
            warn!(error = %e, "failed to write output line");
        }
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&mut self, notice: &Notice) {
        if self.json {
            self.write_json(&OutputLine::Notice(notice));
        } else if let Err(e) = writeln!(self.out, "{}", notice.message) {
            warn!(error = %e, "failed to write notice");
        }
    }

    fn state_changed(&mut self, change: &StateChange) {
        if self.json {
            self.write_json(&OutputLine::StateChange(change));
        } else {
            self.log.state_changed(change);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use timeflow_core::notify;
    use timeflow_types::ManualOverride;

    use super::*;

    #[test]
    fn text_mode_prints_messages_only() {
        let mut notifier = ConsoleNotifier::new(Vec::new(), false);
        notifier.notify(&notify::time_stopped());
        notifier.state_changed(&StateChange::ManualOverride {
            from: ManualOverride::Unset,
            to: ManualOverride::Frozen,
        });
        let out = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(out, "Time stopped.\n");
    }

    #[test]
    fn json_mode_prints_tagged_lines() {
        let mut notifier = ConsoleNotifier::new(Vec::new(), true);
        notifier.notify(&notify::time_resumed());
        notifier.state_changed(&StateChange::TargetInterval {
            from: 14_000,
            to: 15_000,
        });
        let out = String::from_utf8(notifier.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "notice");
        assert_eq!(lines[0]["message"], "Time resumed.");
        assert_eq!(lines[1]["type"], "state_change");
        assert_eq!(lines[1]["field"], "target_interval");
        assert_eq!(lines[1]["to"], 15_000);
    }
}
