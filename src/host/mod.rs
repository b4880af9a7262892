//! Host service seams.
//!
//! The session never talks to a game world directly. Everything it needs
//! (player roster, teleports, block edits, scoreboard, chat) goes through
//! the traits in this module. Mutating calls are one-way: they return
//! nothing and the session never waits for the world to apply them.
//!
//! Two hosts ship with the crate:
//!
//! - [`memory::InMemoryHost`] records every call, used by `simulate` and tests
//! - [`crate::bridge::BridgeHost`] forwards calls as NDJSON commands to a
//!   game-side adapter over stdio

pub mod commands;
pub mod memory;
pub mod scores;

pub use commands::{FillCommand, SetScoreCommand};
pub use memory::InMemoryHost;
pub use scores::ScoreTable;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::geometry::{Position, Region};

/// Stable identifier of a player as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a new `PlayerId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one present player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Host identifier
    pub id: PlayerId,
    /// Display name, used for winner announcements
    pub name: String,
    /// Current location
    pub position: Position,
}

/// Block types the arena uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// Invisible, indestructible wall
    Barrier,
    /// Empty space
    Air,
}

impl Block {
    /// Namespaced block identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Barrier => "minecraft:barrier",
            Self::Air => "minecraft:air",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Scoreboard display slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySlot {
    /// Right-hand sidebar
    Sidebar,
    /// Tab list
    List,
    /// Under the player's name tag
    BelowName,
}

/// Sort order for a displayed objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Largest first
    Descending,
}

/// A scoreboard objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    /// Objective id used in commands
    pub id: String,
    /// Human-readable title shown above the scores
    pub display_name: String,
}

/// One participant's score under an objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Participant display name
    pub participant: String,
    /// Recorded score
    pub score: i32,
}

/// Roster, teleport, health, and per-player command execution.
pub trait PlayerService {
    /// Players currently present, in host enumeration order.
    fn players(&self) -> Vec<PlayerInfo>;

    /// Moves a player.
    fn teleport(&mut self, player: &PlayerId, to: Position);

    /// Sets where the player respawns after death.
    fn set_spawn_point(&mut self, player: &PlayerId, at: Position);

    /// Sets current health in half-heart units.
    fn set_health(&mut self, player: &PlayerId, health: u32);

    /// Runs a command in the player's own command context (`@s` = that player).
    fn run_player_command(&mut self, player: &PlayerId, command: &str);
}

/// Block edits and surface probing.
pub trait WorldEdit {
    /// Fills a region with one block type.
    fn fill(&mut self, region: Region, block: Block);

    /// Casts a ray straight down from `from` and returns the y of the first
    /// solid block hit, if any.
    fn ground_below(&self, from: Position) -> Option<i32>;
}

/// Scoreboard objectives, scores, and display slots.
pub trait Scoreboard {
    /// Looks up an objective.
    fn objective(&self, id: &str) -> Option<Objective>;

    /// Creates an objective.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveExists` if the id is taken.
    fn add_objective(&mut self, id: &str, display_name: &str) -> Result<Objective, HostError>;

    /// Removes an objective and every score recorded under it.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveNotFound` if there is nothing to remove.
    fn remove_objective(&mut self, id: &str) -> Result<(), HostError>;

    /// Binds an objective to a display slot.
    fn set_display(&mut self, slot: DisplaySlot, objective_id: &str, order: SortOrder);

    /// Clears whatever is shown in a display slot.
    fn clear_display(&mut self, slot: DisplaySlot);

    /// Scores under an objective, in host enumeration order.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveNotFound` if the objective does not exist.
    fn scores(&self, objective_id: &str) -> Result<Vec<ScoreEntry>, HostError>;
}

/// Chat and on-screen text.
pub trait Messaging {
    /// Sends a chat line to every player.
    fn broadcast(&mut self, text: &str);

    /// Replaces one player's action-bar overlay.
    fn action_bar(&mut self, player: &PlayerId, text: &str);
}

/// State pushed by the host between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum HostUpdate {
    /// Full roster with current positions
    Players(Vec<PlayerInfo>),
    /// Top solid block of a column
    Ground {
        /// Column x
        x: i32,
        /// Column z
        z: i32,
        /// Block y
        y: i32,
    },
}

/// Everything a session needs from its environment.
pub trait Host: PlayerService + WorldEdit + Scoreboard + Messaging {
    /// Applies a state update pushed by the host.
    ///
    /// Hosts that query the world live can ignore updates.
    fn apply(&mut self, _update: HostUpdate) {}
}
