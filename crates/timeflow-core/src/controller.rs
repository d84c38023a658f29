//! The time-flow controller: one instance per player session.
//!
//! [`TimeController`] owns the freeze decision, the rate scaler, the clock
//! baseline and the current world context (location, time of day, date).
//! The host drives it through three entry points:
//!
//! - [`handle_event`](TimeController::handle_event) for day, location,
//!   time-of-day and config changes, executed through the
//!   [dispatch table](crate::dispatch);
//! - [`perform`](TimeController::perform) for player actions;
//! - [`update_tick`](TimeController::update_tick) once per world update, to
//!   gate or rescale the host clock.
//!
//! All calls are synchronous and must be serialized by the host. Nothing
//! here is fallible; a session that may not act is a logged no-op.

use timeflow_types::{AutoFreezeCause, ClockTime, GameDate, Location, ManualOverride, StateChange};
use tracing::{debug, info, warn};

use crate::clock::{BASE_TICK_INTERVAL_MS, ClockSource, ClockTracker};
use crate::config::TimeflowConfig;
use crate::control::{ControlAction, StepModifier};
use crate::dispatch::{self, HostEvent, Step, Trigger};
use crate::freeze::{FreezeDecision, FreezeTransition};
use crate::notify::{self, Notifier};
use crate::policy::PolicyProvider;
use crate::scaler::RateScaler;
use crate::session::SessionContext;

/// Controller settings that are not policy questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Announce the time settings after location-driven recomputes.
    pub location_notify: bool,
    /// Base step in milliseconds for interval changes.
    pub interval_step_ms: i64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&TimeflowConfig::default())
    }
}

impl From<&TimeflowConfig> for ControllerSettings {
    fn from(config: &TimeflowConfig) -> Self {
        Self {
            location_notify: config.location_notify,
            interval_step_ms: config.interval_step_ms,
        }
    }
}

/// Decides tick by tick whether the host clock advances, freezes, or
/// advances at a rescaled rate.
#[derive(Debug, Clone)]
pub struct TimeController<P = TimeflowConfig> {
    policy: P,
    settings: ControllerSettings,
    session: SessionContext,
    freeze: FreezeDecision,
    scaler: RateScaler,
    tracker: ClockTracker,
    rescale_enabled: bool,
    location: Option<Location>,
    time: ClockTime,
    date: Option<GameDate>,
}

impl TimeController<TimeflowConfig> {
    /// Create a controller answering policy questions from `config`.
    pub fn from_config(config: TimeflowConfig) -> Self {
        let settings = ControllerSettings::from(&config);
        Self::new(config, settings)
    }

    /// Swap in a freshly loaded configuration and re-apply it.
    pub fn reload_config(&mut self, config: TimeflowConfig, notifier: &mut dyn Notifier) {
        let settings = ControllerSettings::from(&config);
        self.reload(config, settings, notifier);
    }
}

impl<P: PolicyProvider> TimeController<P> {
    /// Create a controller for a session that has not loaded yet.
    pub fn new(policy: P, settings: ControllerSettings) -> Self {
        Self {
            policy,
            settings,
            session: SessionContext::default(),
            freeze: FreezeDecision::new(),
            scaler: RateScaler::default(),
            tracker: ClockTracker::new(),
            rescale_enabled: false,
            location: None,
            time: ClockTime::DAY_START,
            date: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Whether time is currently frozen.
    pub const fn is_frozen(&self) -> bool {
        self.freeze.is_frozen()
    }

    /// Current automatic freeze cause.
    pub const fn auto_cause(&self) -> AutoFreezeCause {
        self.freeze.auto_cause()
    }

    /// Current manual override.
    pub const fn manual_override(&self) -> ManualOverride {
        self.freeze.manual_override()
    }

    /// Target real-time milliseconds per tick.
    pub const fn target_interval_ms(&self) -> i64 {
        self.scaler.target_interval_ms()
    }

    /// Whether rescaling applies today.
    pub const fn rescale_enabled(&self) -> bool {
        self.rescale_enabled
    }

    /// The player's current location, once known.
    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// The current time of day.
    pub const fn time(&self) -> ClockTime {
        self.time
    }

    /// Today's date, once a day has started.
    pub const fn date(&self) -> Option<GameDate> {
        self.date
    }

    /// The policy provider.
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// The non-policy settings.
    pub const fn settings(&self) -> ControllerSettings {
        self.settings
    }

    /// Host-reported session facts.
    pub const fn session(&self) -> SessionContext {
        self.session
    }

    /// Update the host-reported session facts.
    pub const fn set_session(&mut self, session: SessionContext) {
        self.session = session;
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// React to a host event.
    pub fn handle_event(&mut self, event: HostEvent, notifier: &mut dyn Notifier) {
        if matches!(event, HostEvent::SessionLoaded) {
            self.begin_session();
            return;
        }
        if !self.session.should_enable(false) {
            return;
        }

        let Some(trigger) = event.trigger() else {
            return;
        };
        match event {
            HostEvent::DayStarted { date, location } => {
                self.date = Some(date);
                self.location = Some(location);
                self.time = ClockTime::DAY_START;
            }
            HostEvent::LocationChanged { location } => self.location = Some(location),
            HostEvent::TimeChanged { time } => self.time = time,
            HostEvent::SessionLoaded | HostEvent::ConfigReloaded => {}
        }
        self.run_plan(trigger, notifier);
    }

    /// Swap the policy and settings, then re-apply them to the current
    /// context.
    pub fn reload(&mut self, policy: P, settings: ControllerSettings, notifier: &mut dyn Notifier) {
        self.policy = policy;
        self.settings = settings;
        self.handle_event(HostEvent::ConfigReloaded, notifier);
    }

    /// Perform a player action.
    pub fn perform(
        &mut self,
        action: ControlAction,
        modifier: StepModifier,
        notifier: &mut dyn Notifier,
    ) {
        if !self.session.should_enable(true) {
            debug!(?action, "ignoring control action while input is disabled");
            return;
        }

        match action {
            ControlAction::ToggleFreeze => self.toggle_freeze(notifier),
            ControlAction::IncreaseInterval => {
                self.change_interval(modifier.apply(self.settings.interval_step_ms), notifier);
            }
            ControlAction::DecreaseInterval => {
                let step = modifier.apply(self.settings.interval_step_ms);
                self.change_interval(step.saturating_neg(), notifier);
            }
            ControlAction::ResetToDefaults => {
                self.run_plan(Trigger::FreezeReset, notifier);
                info!(location = self.location_name(), "Time flow reset");
            }
        }
    }

    /// Gate or rescale the host clock for one world update.
    ///
    /// Reads the raw counter; if it moved since the last update, writes back
    /// the frozen or rescaled value, then records the written value as the
    /// next baseline.
    pub fn update_tick(&mut self, clock: &mut dyn ClockSource, notifier: &mut dyn Notifier) {
        if !self.session.should_enable(false) {
            return;
        }

        if let Some(sample) = self.tracker.poll(clock) {
            let reference = self
                .location
                .as_ref()
                .map_or(BASE_TICK_INTERVAL_MS, |location| {
                    clock.reference_interval_ms(location)
                });
            let before = self.scaler.target_interval_ms();
            let value = self.scaler.on_clock_sample(
                sample,
                reference,
                self.freeze.is_frozen(),
                self.rescale_enabled,
            );
            self.report_interval(before, notifier);
            clock.set_elapsed_ms(value);
        }
        self.tracker.commit(clock);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn begin_session(&mut self) {
        self.freeze = FreezeDecision::new();
        self.tracker.reset();
        self.location = None;
        self.date = None;
        self.time = ClockTime::DAY_START;
        self.session.world_ready = true;
        if !self.session.authoritative {
            warn!("Disabled time control; only the authoritative session can change time");
        }
    }

    fn run_plan(&mut self, trigger: Trigger, notifier: &mut dyn Notifier) {
        debug!(?trigger, "running recompute plan");
        for step in dispatch::plan(trigger) {
            self.run_step(*step, notifier);
        }
    }

    fn run_step(&mut self, step: Step, notifier: &mut dyn Notifier) {
        match step {
            Step::ResetFreeze => {
                let (location_rule, time_rule) = self.freeze_rules();
                let transition = self.freeze.reset(location_rule, time_rule);
                report(transition, notifier);
            }
            Step::RescaleForDay => {
                if let Some(date) = self.date {
                    let enabled = self.policy.should_rescale(date);
                    if enabled != self.rescale_enabled {
                        notifier.state_changed(&StateChange::RescaleEnabled {
                            from: self.rescale_enabled,
                            to: enabled,
                        });
                        self.rescale_enabled = enabled;
                    }
                }
            }
            Step::AutoFreeze => {
                self.update_auto_freeze(notifier);
            }
            Step::AutoFreezeAnnounced => {
                let was_frozen = self.freeze.is_frozen();
                self.update_auto_freeze(notifier);
                if !was_frozen && self.freeze.is_frozen() {
                    notifier.notify(&notify::time_stopped_at_time());
                    info!(time = %self.time, "Time automatically set to frozen");
                }
            }
            Step::TargetInterval => {
                if let Some(location) = &self.location {
                    let ms = self.policy.milliseconds_per_unit(location);
                    let before = self.scaler.set_target_interval(ms);
                    self.report_interval(before, notifier);
                }
            }
            Step::LocationNotice => {
                if self.settings.location_notify && self.location.is_some() {
                    notifier.notify(&self.location_summary());
                }
            }
            Step::ConfigReloadedNotice => {
                notifier.notify(&notify::config_reloaded());
                info!("Configuration reloaded");
            }
        }
    }

    /// Whether the location rule and the time-of-day rule apply right now.
    fn freeze_rules(&self) -> (bool, bool) {
        let location_rule = self
            .location
            .as_ref()
            .is_some_and(|location| self.policy.should_freeze_at_location(location));
        (location_rule, self.policy.should_freeze_at_time(self.time))
    }

    fn update_auto_freeze(&mut self, notifier: &mut dyn Notifier) {
        let (location_rule, time_rule) = self.freeze_rules();
        let transition = self.freeze.apply_auto_freeze_update(location_rule, time_rule);
        report(transition, notifier);
    }

    fn toggle_freeze(&mut self, notifier: &mut dyn Notifier) {
        let transition = self.freeze.toggle();
        report(transition, notifier);
        if self.freeze.is_frozen() {
            notifier.notify(&notify::time_stopped());
            info!("Time is frozen globally");
        } else {
            notifier.notify(&notify::time_resumed());
            info!(location = self.location_name(), "Time is resumed");
        }
    }

    fn change_interval(&mut self, delta: i64, notifier: &mut dyn Notifier) {
        let before = self.scaler.target_interval_ms();
        let interval = self.scaler.change_interval(delta);
        self.report_interval(before, notifier);
        notifier.notify(&notify::speed_changed(interval));
        info!(
            interval_ms = interval,
            "Clock interval set to {} seconds",
            notify::format_seconds(interval)
        );
    }

    fn report_interval(&self, before: i64, notifier: &mut dyn Notifier) {
        let after = self.scaler.target_interval_ms();
        if before != after {
            notifier.state_changed(&StateChange::TargetInterval {
                from: before,
                to: after,
            });
        }
    }

    fn location_summary(&self) -> timeflow_types::Notice {
        match self.freeze.auto_cause() {
            AutoFreezeCause::TimeOfDayRule if self.freeze.is_frozen() => {
                notify::time_stopped_globally()
            }
            AutoFreezeCause::LocationRule if self.freeze.is_frozen() => {
                notify::time_stopped_here()
            }
            _ => notify::time_speed_here(self.scaler.target_interval_ms()),
        }
    }

    fn location_name(&self) -> &str {
        self.location.as_ref().map_or("", |location| location.name.as_str())
    }
}

fn report(transition: FreezeTransition, notifier: &mut dyn Notifier) {
    for change in transition.changes() {
        notifier.state_changed(&change);
    }
}

#[cfg(test)]
mod tests {
    use timeflow_types::{LocationKind, NoticeKind, Season};

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::test_log::LogCapture;

    struct TestClock {
        elapsed: i64,
    }

    impl ClockSource for TestClock {
        fn elapsed_ms(&self) -> i64 {
            self.elapsed
        }

        fn set_elapsed_ms(&mut self, value: i64) {
            self.elapsed = value;
        }

        fn reference_interval_ms(&self, _location: &Location) -> i64 {
            BASE_TICK_INTERVAL_MS
        }
    }

    fn farm() -> Location {
        Location::new("Farm", LocationKind::Outdoors)
    }

    fn started(config: TimeflowConfig) -> (TimeController, RecordingNotifier) {
        let mut controller = TimeController::from_config(config);
        let mut notifier = RecordingNotifier::new();
        controller.set_session(SessionContext::ready());
        controller.handle_event(HostEvent::SessionLoaded, &mut notifier);
        controller.handle_event(
            HostEvent::DayStarted {
                date: GameDate::new(Season::Spring, 1),
                location: farm(),
            },
            &mut notifier,
        );
        (controller, notifier)
    }

    #[test]
    fn day_start_applies_location_interval() {
        let (controller, notifier) = started(TimeflowConfig::default());
        assert_eq!(controller.target_interval_ms(), 14_000);
        assert!(controller.rescale_enabled());
        assert!(!controller.is_frozen());
        assert!(notifier.changes.contains(&StateChange::TargetInterval {
            from: 0,
            to: 14_000
        }));
        // location_notify is off by default
        assert!(notifier.notices.is_empty());
    }

    #[test]
    fn events_ignored_before_session_loads() {
        let mut controller = TimeController::from_config(TimeflowConfig::default());
        let mut notifier = RecordingNotifier::new();
        controller.handle_event(HostEvent::LocationChanged { location: farm() }, &mut notifier);
        assert!(controller.location().is_none());
        assert_eq!(controller.target_interval_ms(), 0);
    }

    #[test]
    fn non_authoritative_session_is_inert() {
        let mut controller = TimeController::from_config(TimeflowConfig::default());
        let mut notifier = RecordingNotifier::new();
        controller.set_session(SessionContext {
            authoritative: false,
            ..SessionContext::ready()
        });
        controller.handle_event(HostEvent::SessionLoaded, &mut notifier);
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert!(!controller.is_frozen());

        let mut clock = TestClock { elapsed: 100 };
        controller.update_tick(&mut clock, &mut notifier);
        assert_eq!(clock.elapsed, 100);
    }

    #[test]
    fn every_non_authoritative_load_warns() {
        let mut controller = TimeController::from_config(TimeflowConfig::default());
        let mut notifier = RecordingNotifier::new();
        controller.set_session(SessionContext {
            authoritative: false,
            ..SessionContext::ready()
        });

        let log = LogCapture::default();
        log.capture(|| {
            controller.handle_event(HostEvent::SessionLoaded, &mut notifier);
            controller.handle_event(HostEvent::SessionLoaded, &mut notifier);
        });

        let warnings = log.contents().matches("Disabled time control").count();
        assert_eq!(warnings, 2);
        assert!(notifier.notices.is_empty());
    }

    #[test]
    fn toggle_notifies_and_gates_clock() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        notifier.drain();

        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert!(controller.is_frozen());
        assert_eq!(notifier.messages(), vec!["Time stopped."]);

        let mut clock = TestClock { elapsed: 0 };
        controller.update_tick(&mut clock, &mut notifier);
        clock.elapsed = 16;
        controller.update_tick(&mut clock, &mut notifier);
        assert_eq!(clock.elapsed, 0);

        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert!(!controller.is_frozen());
        assert_eq!(notifier.messages(), vec!["Time stopped.", "Time resumed."]);
    }

    #[test]
    fn busy_player_cannot_toggle() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        controller.set_session(SessionContext {
            player_free: false,
            ..SessionContext::ready()
        });
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert!(!controller.is_frozen());
    }

    #[test]
    fn busy_player_can_toggle_during_event() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        controller.set_session(SessionContext {
            player_free: false,
            event_up: true,
            ..SessionContext::ready()
        });
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert!(controller.is_frozen());
    }

    #[test]
    fn interval_actions_use_step_and_modifier() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        notifier.drain();

        controller.perform(ControlAction::IncreaseInterval, StepModifier::None, &mut notifier);
        assert_eq!(controller.target_interval_ms(), 15_000);
        // A decrease stops at the size of the step.
        controller.perform(ControlAction::DecreaseInterval, StepModifier::Coarse, &mut notifier);
        assert_eq!(controller.target_interval_ms(), 10_000);
        controller.perform(ControlAction::DecreaseInterval, StepModifier::Fine, &mut notifier);
        assert_eq!(controller.target_interval_ms(), 9_900);

        assert_eq!(
            notifier.messages().last().copied(),
            Some("Time speed set to 9.9 seconds per 10 minutes.")
        );
        assert_eq!(notifier.changes.len(), 3);
    }

    #[test]
    fn rescaled_tick_progress() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        let mut clock = TestClock { elapsed: 0 };
        controller.update_tick(&mut clock, &mut notifier);

        // 14 s per tick against a 7 s reference: progress is halved.
        clock.elapsed = 16;
        controller.update_tick(&mut clock, &mut notifier);
        assert_eq!(clock.elapsed, 8);
        clock.elapsed = 24;
        controller.update_tick(&mut clock, &mut notifier);
        assert_eq!(clock.elapsed, 16);
    }

    #[test]
    fn festival_day_passes_clock_through() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        controller.handle_event(
            HostEvent::DayStarted {
                date: GameDate::new(Season::Spring, 13),
                location: farm(),
            },
            &mut notifier,
        );
        assert!(!controller.rescale_enabled());

        let mut clock = TestClock { elapsed: 0 };
        controller.update_tick(&mut clock, &mut notifier);
        clock.elapsed = 16;
        controller.update_tick(&mut clock, &mut notifier);
        assert_eq!(clock.elapsed, 16);
    }

    #[test]
    fn time_rule_freezes_and_announces_once() {
        let mut config = TimeflowConfig::default();
        config.freeze_time.anywhere_at_time = Some(ClockTime(2200));
        let (mut controller, mut notifier) = started(config);
        notifier.drain();

        controller.handle_event(HostEvent::TimeChanged { time: ClockTime(2150) }, &mut notifier);
        assert!(!controller.is_frozen());
        controller.handle_event(HostEvent::TimeChanged { time: ClockTime(2200) }, &mut notifier);
        assert!(controller.is_frozen());
        assert_eq!(controller.auto_cause(), AutoFreezeCause::TimeOfDayRule);
        controller.handle_event(HostEvent::TimeChanged { time: ClockTime(2210) }, &mut notifier);

        let announced: Vec<_> = notifier
            .notices
            .iter()
            .filter(|n| n.kind == NoticeKind::AutoFreezeEngaged)
            .collect();
        assert_eq!(announced.len(), 1);
    }

    #[test]
    fn location_notice_reports_fresh_state() {
        let mut config = TimeflowConfig::default();
        config.location_notify = true;
        config.freeze_time.indoors = true;
        let (mut controller, mut notifier) = started(config);
        notifier.drain();

        controller.handle_event(
            HostEvent::LocationChanged {
                location: Location::new("FarmHouse", LocationKind::Indoors),
            },
            &mut notifier,
        );
        assert_eq!(notifier.messages(), vec!["Time is stopped here."]);

        controller.handle_event(
            HostEvent::LocationChanged {
                location: Location::new("SkullCave", LocationKind::SkullCavern),
            },
            &mut notifier,
        );
        assert_eq!(
            notifier.messages().last().copied(),
            Some("Time is now 9 seconds per 10 minutes here.")
        );
        // Cause and interval changes were reported before the notice.
        assert!(notifier.changes.contains(&StateChange::TargetInterval {
            from: 14_000,
            to: 9_000
        }));
    }

    #[test]
    fn day_start_clears_manual_override() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert_eq!(controller.manual_override(), ManualOverride::Frozen);

        controller.handle_event(
            HostEvent::DayStarted {
                date: GameDate::new(Season::Spring, 2),
                location: farm(),
            },
            &mut notifier,
        );
        assert_eq!(controller.manual_override(), ManualOverride::Unset);
        assert!(!controller.is_frozen());
        assert_eq!(controller.time(), ClockTime::DAY_START);
    }

    #[test]
    fn reset_restores_configured_interval() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        controller.perform(ControlAction::IncreaseInterval, StepModifier::Huge, &mut notifier);
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);

        controller.perform(ControlAction::ResetToDefaults, StepModifier::None, &mut notifier);
        assert_eq!(controller.target_interval_ms(), 14_000);
        assert_eq!(controller.manual_override(), ManualOverride::Unset);
        assert!(!controller.is_frozen());
    }

    #[test]
    fn reset_reinstates_location_freeze() {
        let mut config = TimeflowConfig::default();
        config.freeze_time.indoors = true;
        let (mut controller, mut notifier) = started(config);
        controller.handle_event(
            HostEvent::LocationChanged {
                location: Location::new("FarmHouse", LocationKind::Indoors),
            },
            &mut notifier,
        );
        controller.perform(ControlAction::ToggleFreeze, StepModifier::None, &mut notifier);
        assert_eq!(controller.manual_override(), ManualOverride::Unfrozen);
        assert!(!controller.is_frozen());
        notifier.drain();

        controller.perform(ControlAction::ResetToDefaults, StepModifier::None, &mut notifier);
        assert_eq!(controller.auto_cause(), AutoFreezeCause::LocationRule);
        assert!(controller.is_frozen());
        assert_eq!(
            notifier.changes,
            vec![StateChange::ManualOverride {
                from: ManualOverride::Unfrozen,
                to: ManualOverride::Unset,
            }]
        );
    }

    #[test]
    fn reload_swaps_policy_and_announces() {
        let (mut controller, mut notifier) = started(TimeflowConfig::default());
        notifier.drain();

        let mut config = TimeflowConfig::default();
        config.seconds_per_minute.outdoors = 0.7;
        controller.reload_config(config, &mut notifier);

        assert_eq!(controller.target_interval_ms(), 7_000);
        assert_eq!(notifier.messages(), vec!["Configuration reloaded."]);
    }
}
