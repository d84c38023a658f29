//! Script replay: feeds a [`Script`] through a [`TimeController`].
//!
//! Each frame mirrors one world update of a real host: the simulated clock
//! accumulates real milliseconds (completing a ten-minute tick when it
//! passes the reference interval), a completed tick is reported as a
//! time-of-day change, and then the controller gets its per-update chance
//! to gate or rescale the counter.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use timeflow_core::config::TimeflowConfig;
use timeflow_core::controller::TimeController;
use timeflow_core::dispatch::HostEvent;
use timeflow_core::session::SessionContext;
use timeflow_types::{ClockTime, Location};
use tracing::{info, warn};

use crate::output::ConsoleNotifier;
use crate::script::{Script, ScriptStep};
use crate::sim_clock::SimulatedClock;

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// World updates executed.
    pub frames: u64,
    /// Time of day at the end.
    pub time: ClockTime,
    /// Whether time was frozen at the end.
    pub frozen: bool,
    /// Target interval at the end.
    pub target_interval_ms: i64,
}

/// A simulated host session.
pub struct Host<W> {
    controller: TimeController,
    clock: SimulatedClock,
    location: Option<Location>,
    notifier: ConsoleNotifier<W>,
    config_path: PathBuf,
    frames: u64,
}

impl<W: Write> Host<W> {
    /// Create a host and load the session described by `script`.
    pub fn new(
        config: TimeflowConfig,
        config_path: PathBuf,
        script: &Script,
        notifier: ConsoleNotifier<W>,
    ) -> Self {
        let mut controller = TimeController::from_config(config);
        controller.set_session(SessionContext {
            authoritative: script.authoritative,
            ..SessionContext::default()
        });

        let mut host = Self {
            controller,
            clock: SimulatedClock::new(script.extra_ms_per_minute.clone()),
            location: None,
            notifier,
            config_path,
            frames: 0,
        };
        host.controller
            .handle_event(HostEvent::SessionLoaded, &mut host.notifier);
        host
    }

    /// The controller being driven.
    pub const fn controller(&self) -> &TimeController {
        &self.controller
    }

    /// Consume the host and return its notifier.
    pub fn into_notifier(self) -> ConsoleNotifier<W> {
        self.notifier
    }

    /// Replay every step of `script`.
    ///
    /// With a non-zero `frame_interval_ms`, frames are paced in real time.
    pub async fn run(&mut self, script: &Script) -> RunSummary {
        let mut pacer = (script.frame_interval_ms > 0)
            .then(|| tokio::time::interval(Duration::from_millis(script.frame_interval_ms)));

        for step in &script.steps {
            match (step, pacer.as_mut()) {
                (ScriptStep::Frames { count, advance_ms }, Some(pacer)) => {
                    for _ in 0..*count {
                        pacer.tick().await;
                        self.frame(*advance_ms);
                    }
                }
                _ => self.apply(step),
            }
        }

        let summary = self.summary();
        info!(
            frames = summary.frames,
            time = %summary.time,
            frozen = summary.frozen,
            target_interval_ms = summary.target_interval_ms,
            "Script finished"
        );
        summary
    }

    /// Current outcome.
    pub const fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frames,
            time: self.clock.time(),
            frozen: self.controller.is_frozen(),
            target_interval_ms: self.controller.target_interval_ms(),
        }
    }

    /// Run one world update.
    fn frame(&mut self, advance_ms: i64) {
        self.frames = self.frames.saturating_add(1);
        let ticked = self
            .location
            .as_ref()
            .and_then(|location| self.clock.advance(advance_ms, location));
        if let Some(time) = ticked {
            self.controller
                .handle_event(HostEvent::TimeChanged { time }, &mut self.notifier);
        }
        self.controller
            .update_tick(&mut self.clock, &mut self.notifier);
    }

    /// Apply one step without pacing.
    pub fn apply(&mut self, step: &ScriptStep) {
        match step {
            ScriptStep::DayStarted { date, location } => {
                self.clock.start_day();
                self.location = Some(location.clone());
                info!(date = %date, location = %location.name, "Day started");
                self.controller.handle_event(
                    HostEvent::DayStarted {
                        date: *date,
                        location: location.clone(),
                    },
                    &mut self.notifier,
                );
            }
            ScriptStep::Warp(location) => {
                self.location = Some(location.clone());
                info!(location = %location.name, kind = ?location.kind, "Warped");
                self.controller.handle_event(
                    HostEvent::LocationChanged {
                        location: location.clone(),
                    },
                    &mut self.notifier,
                );
            }
            ScriptStep::Action { action, modifier } => {
                self.controller
                    .perform(*action, *modifier, &mut self.notifier);
            }
            ScriptStep::SetPlayerFree(free) => {
                let mut session = self.controller.session();
                session.player_free = *free;
                self.controller.set_session(session);
            }
            ScriptStep::SetEventUp(up) => {
                let mut session = self.controller.session();
                session.event_up = *up;
                self.controller.set_session(session);
            }
            ScriptStep::ReloadConfig => self.reload_config(),
            ScriptStep::Frames { count, advance_ms } => {
                for _ in 0..*count {
                    self.frame(*advance_ms);
                }
            }
        }
    }

    fn reload_config(&mut self) {
        match TimeflowConfig::from_file(&self.config_path) {
            Ok(config) => self.controller.reload_config(config, &mut self.notifier),
            Err(e) => warn!(
                path = %self.config_path.display(),
                error = %e,
                "failed to reload config, keeping current settings"
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn host(script: &Script, json: bool) -> Host<Vec<u8>> {
        Host::new(
            TimeflowConfig::default(),
            PathBuf::from("does-not-exist.yaml"),
            script,
            ConsoleNotifier::new(Vec::new(), json),
        )
    }

    #[tokio::test]
    async fn half_speed_day_then_freeze() {
        let script = Script::parse(
            r"
steps:
  - day_started:
      date: { season: summer, day: 1 }
      location: { name: Farm, kind: outdoors }
  - frames: { count: 1000, advance_ms: 16 }
  - action: { action: toggle_freeze }
  - frames: { count: 1000, advance_ms: 16 }
",
        )
        .unwrap();
        let mut host = host(&script, false);
        let summary = host.run(&script).await;

        // 14 s per tick against a 7 s reference: one tick in 2000 frames of
        // 16 ms, because the second half was frozen.
        assert_eq!(summary.frames, 2000);
        assert_eq!(summary.time, ClockTime(610));
        assert!(summary.frozen);
        assert_eq!(summary.target_interval_ms, 14_000);

        let out = String::from_utf8(host.into_notifier().into_inner()).unwrap();
        assert_eq!(out, "Time stopped.\n");
    }

    #[tokio::test]
    async fn paced_frames_and_blocked_input() {
        let script = Script::parse(
            r"
frame_interval_ms: 1
steps:
  - day_started:
      date: { season: spring, day: 2 }
      location: { name: Farm, kind: outdoors }
  - set_player_free: false
  - action: { action: toggle_freeze }
  - frames: { count: 3, advance_ms: 16 }
",
        )
        .unwrap();
        let mut host = host(&script, false);
        let summary = host.run(&script).await;

        assert_eq!(summary.frames, 3);
        assert!(!summary.frozen);
    }

    #[tokio::test]
    async fn event_allows_input_while_player_busy() {
        let script = Script::parse(
            r"
steps:
  - day_started:
      date: { season: spring, day: 2 }
      location: { name: Farm, kind: outdoors }
  - set_player_free: false
  - set_event_up: true
  - action: { action: toggle_freeze }
",
        )
        .unwrap();
        let mut host = host(&script, false);
        let summary = host.run(&script).await;

        assert!(summary.frozen);
        let out = String::from_utf8(host.into_notifier().into_inner()).unwrap();
        assert_eq!(out, "Time stopped.\n");
    }

    #[tokio::test]
    async fn failed_reload_keeps_settings() {
        let script = Script::parse(
            r"
steps:
  - day_started:
      date: { season: spring, day: 2 }
      location: { name: Farm, kind: outdoors }
  - action: { action: increase_interval }
  - reload_config
",
        )
        .unwrap();
        let mut host = host(&script, true);
        let summary = host.run(&script).await;

        assert_eq!(summary.target_interval_ms, 15_000);
        let out = String::from_utf8(host.into_notifier().into_inner()).unwrap();
        assert!(!out.contains("Configuration reloaded."));
    }

    #[tokio::test]
    async fn non_authoritative_host_runs_at_native_speed() {
        let script = Script::parse(
            r"
authoritative: false
steps:
  - day_started:
      date: { season: spring, day: 2 }
      location: { name: Farm, kind: outdoors }
  - frames: { count: 440, advance_ms: 16 }
",
        )
        .unwrap();
        let mut host = host(&script, false);
        let summary = host.run(&script).await;

        // The host clock runs at its own pace; the controller stays out.
        assert_eq!(summary.time, ClockTime(610));
        assert!(host.controller().location().is_none());
        assert_eq!(host.controller().target_interval_ms(), 0);
    }
}
