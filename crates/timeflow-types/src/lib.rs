//! Shared type definitions for the Timeflow controller.
//!
//! This crate holds the plain values that cross the boundary between the
//! controller core and the host that embeds it: calendar and clock values,
//! locations, the freeze state enums, and the observability payloads
//! ([`StateChange`] and [`Notice`]).
//!
//! # Modules
//!
//! - [`enums`] -- Seasons, location kinds, freeze override and cause, notice tags
//! - [`structs`] -- Dates, clock times, locations, state changes, notices

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AutoFreezeCause, LocationKind, ManualOverride, NoticeDuration, NoticeKind, Season,
    UnknownSeason,
};
pub use structs::{ClockTime, GameDate, Location, Notice, StateChange};
