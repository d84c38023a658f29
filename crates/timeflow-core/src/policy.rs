//! Policy provider trait and the configuration-backed implementation.
//!
//! The controller never decides on its own where or when time freezes or
//! how long a tick should last. It asks a [`PolicyProvider`]. The default
//! provider is [`TimeflowConfig`], which answers from the YAML settings.

use timeflow_types::{ClockTime, GameDate, Location};

use crate::config::TimeflowConfig;

/// Answers the controller's policy questions.
pub trait PolicyProvider {
    /// Whether time freezes automatically at `location`.
    fn should_freeze_at_location(&self, location: &Location) -> bool;

    /// Whether time freezes automatically at `time` anywhere.
    fn should_freeze_at_time(&self, time: ClockTime) -> bool;

    /// Target real-time milliseconds per tick (ten in-game minutes) at
    /// `location`.
    fn milliseconds_per_unit(&self, location: &Location) -> i64;

    /// Whether tick rescaling applies on `date`.
    fn should_rescale(&self, date: GameDate) -> bool;
}

impl PolicyProvider for TimeflowConfig {
    fn should_freeze_at_location(&self, location: &Location) -> bool {
        let rules = &self.freeze_time;
        if rules.except_location_names.contains(&location.name) {
            return false;
        }
        rules.by_location_name.contains(&location.name) || rules.for_kind(location.kind)
    }

    fn should_freeze_at_time(&self, time: ClockTime) -> bool {
        self.freeze_time
            .anywhere_at_time
            .is_some_and(|threshold| time >= threshold)
    }

    fn milliseconds_per_unit(&self, location: &Location) -> i64 {
        let speeds = &self.seconds_per_minute;
        let seconds = speeds
            .by_location_name
            .get(&location.name)
            .copied()
            .unwrap_or_else(|| speeds.for_kind(location.kind));
        seconds_to_millis(seconds).saturating_mul(10)
    }

    fn should_rescale(&self, date: GameDate) -> bool {
        self.enable_on_festival_days || !self.festival_days.contains(&date)
    }
}

/// Convert seconds to whole milliseconds, rounding to nearest.
///
/// Non-finite or negative inputs map to zero.
#[allow(clippy::cast_possible_truncation)]
fn seconds_to_millis(seconds: f64) -> i64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    // `as` saturates at i64::MAX for out-of-range floats.
    (seconds * 1000.0).round() as i64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use timeflow_types::{LocationKind, Season};

    use super::*;

    fn farm() -> Location {
        Location::new("Farm", LocationKind::Outdoors)
    }

    fn cavern() -> Location {
        Location::new("SkullCave", LocationKind::SkullCavern)
    }

    #[test]
    fn default_tick_lengths_by_kind() {
        let config = TimeflowConfig::default();
        assert_eq!(config.milliseconds_per_unit(&farm()), 14_000);
        assert_eq!(config.milliseconds_per_unit(&cavern()), 9_000);
        assert_eq!(
            config.milliseconds_per_unit(&Location::new("VolcanoDungeon0", LocationKind::VolcanoDungeon)),
            7_000
        );
    }

    #[test]
    fn name_override_beats_kind() {
        let mut config = TimeflowConfig::default();
        config
            .seconds_per_minute
            .by_location_name
            .insert("Farm".to_owned(), 2.5);
        assert_eq!(config.milliseconds_per_unit(&farm()), 25_000);
        assert_eq!(
            config.milliseconds_per_unit(&Location::new("Town", LocationKind::Outdoors)),
            14_000
        );
    }

    #[test]
    fn location_freeze_rules() {
        let mut config = TimeflowConfig::default();
        assert!(!config.should_freeze_at_location(&farm()));

        config.freeze_time.outdoors = true;
        assert!(config.should_freeze_at_location(&farm()));

        config
            .freeze_time
            .except_location_names
            .insert("Farm".to_owned());
        assert!(!config.should_freeze_at_location(&farm()));

        config
            .freeze_time
            .by_location_name
            .insert("SkullCave".to_owned());
        assert!(config.should_freeze_at_location(&cavern()));
    }

    #[test]
    fn time_freeze_threshold_is_inclusive() {
        let mut config = TimeflowConfig::default();
        assert!(!config.should_freeze_at_time(ClockTime(2550)));

        config.freeze_time.anywhere_at_time = Some(ClockTime(2200));
        assert!(!config.should_freeze_at_time(ClockTime(2150)));
        assert!(config.should_freeze_at_time(ClockTime(2200)));
        assert!(config.should_freeze_at_time(ClockTime(2400)));
    }

    #[test]
    fn festival_days_disable_rescale() {
        let mut config = TimeflowConfig::default();
        let egg_festival = GameDate::new(Season::Spring, 13);
        assert!(!config.should_rescale(egg_festival));
        assert!(config.should_rescale(GameDate::new(Season::Spring, 12)));

        config.enable_on_festival_days = true;
        assert!(config.should_rescale(egg_festival));
    }

    #[test]
    fn seconds_conversion_rounds() {
        assert_eq!(seconds_to_millis(1.4), 1400);
        assert_eq!(seconds_to_millis(0.0005), 1);
        assert_eq!(seconds_to_millis(-2.0), 0);
        assert_eq!(seconds_to_millis(f64::NAN), 0);
    }
}
