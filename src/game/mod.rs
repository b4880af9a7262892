//! The distance race.
//!
//! Players are caged at the start point for a ten second countdown, then
//! have five minutes to get as far from it as they can. Distance is scored
//! live on the sidebar until the final minute, when the board is hidden.

pub mod arena;
pub mod messages;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod timers;
pub mod trigger;

pub use arena::Cage;
pub use messages::{Locale, MessageOverrides, Messages};
pub use scoring::{ScoringTracker, Winner};
pub use session::{Phase, Session, SessionEvent};
pub use timers::{TimerKind, Timers};
pub use trigger::{Actor, IgnoreReason, ScriptEvent, TriggerOutcome, dispatch};
