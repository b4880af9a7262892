//! Fixed round parameters.
//!
//! These values are part of the external contract with the game-side
//! adapter and with players. None of them is configurable.

/// Script event id that starts a round.
pub const START_EVENT_ID: &str = "game:start";

/// Seconds between the start trigger and the cage opening.
pub const COUNTDOWN_SECONDS: u32 = 10;

/// Seconds of active play.
pub const ROUND_SECONDS: u32 = 5 * 60;

/// Health every player is set to at round start (two hearts).
pub const LOW_HEALTH: u32 = 4;

/// Remaining seconds at which the live scoreboard is hidden.
pub const WARNING_THRESHOLD_SECONDS: u32 = 60;

/// Horizontal distance from the origin block to each cage wall.
pub const CAGE_HALF_EXTENT: i32 = 2;

/// Height of the cage walls above the origin block.
pub const CAGE_HEIGHT: i32 = 3;

/// Scoreboard objective holding each player's distance.
pub const OBJECTIVE_ID: &str = "distance";
