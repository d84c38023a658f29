//! Whether the controller may act in the current session.
//!
//! Only the authoritative session (the host player in multiplayer) may
//! change time, and only once the world is loaded. Player input is further
//! restricted to moments when the player is free to act or a scripted event
//! is running. A closed gate is a silent no-op, not an error.

/// Host-reported facts about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// A save is loaded and the world is running.
    pub world_ready: bool,
    /// This session owns the clock.
    pub authoritative: bool,
    /// The player is not in a menu, cutscene, or other blocking state.
    pub player_free: bool,
    /// A scripted event is playing. Input stays enabled during events even
    /// though the player is not free.
    pub event_up: bool,
}

impl SessionContext {
    /// A loaded, authoritative session with a free player.
    pub const fn ready() -> Self {
        Self {
            world_ready: true,
            authoritative: true,
            player_free: true,
            event_up: false,
        }
    }

    /// Whether time features should run.
    ///
    /// With `for_input`, also require the player to be free or an event to
    /// be playing.
    pub const fn should_enable(&self, for_input: bool) -> bool {
        if !self.world_ready || !self.authoritative {
            return false;
        }
        !for_input || self.player_free || self.event_up
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            world_ready: false,
            authoritative: true,
            player_free: true,
            event_up: false,
        }
    }
}
