//! Deterministic time-flow control for a tick-driven game clock.
//!
//! This crate decides, every world update, whether the host clock advances
//! normally, stays frozen, or advances at a rescaled rate, and reacts to
//! host events (new day, location change, time-of-day change, config
//! reload) and player actions.
//!
//! # Modules
//!
//! - [`clock`] -- [`ClockSource`] trait over the host's tick counter and
//!   the per-update sample tracker.
//! - [`config`] -- Configuration loading from `timeflow-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Player actions and step modifiers.
//! - [`controller`] -- [`TimeController`], the per-session orchestrator.
//! - [`dispatch`] -- Host events and the table of recompute steps they run.
//! - [`freeze`] -- The freeze verdict from automatic cause and manual
//!   override.
//! - [`notify`] -- [`Notifier`] trait and player-facing messages.
//! - [`policy`] -- [`PolicyProvider`] trait, implemented by the config.
//! - [`scaler`] -- Target interval and tick rescaling arithmetic.
//! - [`session`] -- Whether the current session may act.
//!
//! [`ClockSource`]: clock::ClockSource
//! [`TimeController`]: controller::TimeController
//! [`Notifier`]: notify::Notifier
//! [`PolicyProvider`]: policy::PolicyProvider

pub mod clock;
pub mod config;
pub mod control;
pub mod controller;
pub mod dispatch;
pub mod freeze;
pub mod notify;
pub mod policy;
pub mod scaler;
pub mod session;

#[cfg(test)]
mod test_log;
