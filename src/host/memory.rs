//! Recording in-memory host.
//!
//! Keeps a roster, a per-column ground map, and a scoreboard, and appends
//! every mutating call to an ordered log. Per-player `scoreboard players set`
//! commands are interpreted so scores behave the way a real world would.

use std::collections::HashMap;

use crate::error::HostError;
use crate::geometry::{Position, Region};

use super::scores::ScoreTable;
use super::{
    Block, DisplaySlot, FillCommand, Host, HostUpdate, Messaging, Objective, PlayerId, PlayerInfo,
    PlayerService, ScoreEntry, Scoreboard, SetScoreCommand, SortOrder, WorldEdit,
};

/// Default health for newly added players (ten hearts).
pub const FULL_HEALTH: u32 = 20;

/// One call made against the host, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// Chat line to everyone
    Broadcast(String),
    /// Action-bar text for one player
    ActionBar {
        /// Target player
        player: PlayerId,
        /// Overlay text
        text: String,
    },
    /// Player moved
    Teleport {
        /// Target player
        player: PlayerId,
        /// Destination
        to: Position,
    },
    /// Respawn point changed
    SetSpawnPoint {
        /// Target player
        player: PlayerId,
        /// New respawn point
        at: Position,
    },
    /// Health changed
    SetHealth {
        /// Target player
        player: PlayerId,
        /// New health in half hearts
        health: u32,
    },
    /// Bulk block edit
    Fill(FillCommand),
    /// Command run as a player
    PlayerCommand {
        /// Executing player
        player: PlayerId,
        /// Raw command text
        command: String,
    },
    /// Objective created
    AddObjective(String),
    /// Objective removed
    RemoveObjective(String),
    /// Display slot bound
    SetDisplay {
        /// Slot
        slot: DisplaySlot,
        /// Objective shown
        objective: String,
        /// Sort order
        order: SortOrder,
    },
    /// Display slot cleared
    ClearDisplay(DisplaySlot),
}

/// Player state tracked beyond the public snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPlayer {
    /// Public snapshot
    pub info: PlayerInfo,
    /// Current health in half hearts
    pub health: u32,
    /// Respawn point, if one was set
    pub spawn_point: Option<Position>,
    /// Last action-bar text shown
    pub action_bar: Option<String>,
}

/// A display binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBinding {
    /// Objective shown
    pub objective: String,
    /// Sort order
    pub order: SortOrder,
}

/// In-memory [`Host`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    players: Vec<MemoryPlayer>,
    ground: HashMap<(i32, i32), i32>,
    default_ground: Option<i32>,
    scores: ScoreTable,
    displays: HashMap<DisplaySlot, DisplayBinding>,
    log: Vec<HostCall>,
}

impl InMemoryHost {
    /// Creates an empty world with no players and no ground.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player at full health and returns its id.
    pub fn add_player(&mut self, name: impl Into<String>, position: Position) -> PlayerId {
        let name = name.into();
        let id = PlayerId::new(format!("player-{}", self.players.len() + 1));
        self.players.push(MemoryPlayer {
            info: PlayerInfo {
                id: id.clone(),
                name,
                position,
            },
            health: FULL_HEALTH,
            spawn_point: None,
            action_bar: None,
        });
        id
    }

    /// Moves a player without recording a teleport (the player walked).
    pub fn move_player(&mut self, id: &PlayerId, position: Position) {
        if let Some(p) = self.player_mut(id) {
            p.info.position = position;
        }
    }

    /// Sets the top solid block of one column.
    pub fn set_ground(&mut self, x: i32, z: i32, y: i32) {
        self.ground.insert((x, z), y);
    }

    /// Sets a flat ground height for every column without an explicit entry.
    pub const fn set_default_ground(&mut self, y: Option<i32>) {
        self.default_ground = y;
    }

    /// Returns a player's full state.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&MemoryPlayer> {
        self.players.iter().find(|p| &p.info.id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut MemoryPlayer> {
        self.players.iter_mut().find(|p| &p.info.id == id)
    }

    /// Every call in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.log
    }

    /// Chat lines in order.
    #[must_use]
    pub fn broadcasts(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|c| match c {
                HostCall::Broadcast(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Fill commands in order.
    #[must_use]
    pub fn fills(&self) -> Vec<FillCommand> {
        self.log
            .iter()
            .filter_map(|c| match c {
                HostCall::Fill(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Current binding of a display slot.
    #[must_use]
    pub fn display(&self, slot: DisplaySlot) -> Option<&DisplayBinding> {
        self.displays.get(&slot)
    }

    /// Score of one player under an objective.
    #[must_use]
    pub fn score_of(&self, objective: &str, player: &PlayerId) -> Option<i32> {
        self.scores.score_of(objective, player)
    }

    fn record(&mut self, call: HostCall) {
        self.log.push(call);
    }

    fn apply_player_command(&mut self, player: &PlayerId, command: &str) {
        let Some(set) = SetScoreCommand::parse(command) else {
            tracing::debug!(%player, command, "unrecognized player command ignored");
            return;
        };
        let Some(name) = self.player(player).map(|p| p.info.name.clone()) else {
            return;
        };
        // Like the real command, setting a score under a missing objective fails quietly.
        self.scores.apply(player, &name, &set);
    }
}

impl PlayerService for InMemoryHost {
    fn players(&self) -> Vec<PlayerInfo> {
        self.players.iter().map(|p| p.info.clone()).collect()
    }

    fn teleport(&mut self, player: &PlayerId, to: Position) {
        self.record(HostCall::Teleport {
            player: player.clone(),
            to,
        });
        if let Some(p) = self.player_mut(player) {
            p.info.position = to;
        }
    }

    fn set_spawn_point(&mut self, player: &PlayerId, at: Position) {
        self.record(HostCall::SetSpawnPoint {
            player: player.clone(),
            at,
        });
        if let Some(p) = self.player_mut(player) {
            p.spawn_point = Some(at);
        }
    }

    fn set_health(&mut self, player: &PlayerId, health: u32) {
        self.record(HostCall::SetHealth {
            player: player.clone(),
            health,
        });
        if let Some(p) = self.player_mut(player) {
            p.health = health;
        }
    }

    fn run_player_command(&mut self, player: &PlayerId, command: &str) {
        self.record(HostCall::PlayerCommand {
            player: player.clone(),
            command: command.to_string(),
        });
        self.apply_player_command(player, command);
    }
}

impl WorldEdit for InMemoryHost {
    fn fill(&mut self, region: Region, block: Block) {
        self.record(HostCall::Fill(FillCommand::new(region, block)));
    }

    fn ground_below(&self, from: Position) -> Option<i32> {
        let column = from.block();
        self.ground
            .get(&(column.x, column.z))
            .copied()
            .or(self.default_ground)
            .filter(|&y| f64::from(y) < from.y)
    }
}

impl Scoreboard for InMemoryHost {
    fn objective(&self, id: &str) -> Option<Objective> {
        self.scores.objective(id)
    }

    fn add_objective(&mut self, id: &str, display_name: &str) -> Result<Objective, HostError> {
        let objective = self.scores.add(id, display_name)?;
        self.record(HostCall::AddObjective(id.to_string()));
        Ok(objective)
    }

    fn remove_objective(&mut self, id: &str) -> Result<(), HostError> {
        self.scores.remove(id)?;
        self.record(HostCall::RemoveObjective(id.to_string()));
        self.displays.retain(|_, binding| binding.objective != id);
        Ok(())
    }

    fn set_display(&mut self, slot: DisplaySlot, objective_id: &str, order: SortOrder) {
        self.record(HostCall::SetDisplay {
            slot,
            objective: objective_id.to_string(),
            order,
        });
        if self.scores.contains(objective_id) {
            self.displays.insert(
                slot,
                DisplayBinding {
                    objective: objective_id.to_string(),
                    order,
                },
            );
        }
    }

    fn clear_display(&mut self, slot: DisplaySlot) {
        self.record(HostCall::ClearDisplay(slot));
        self.displays.remove(&slot);
    }

    fn scores(&self, objective_id: &str) -> Result<Vec<ScoreEntry>, HostError> {
        self.scores.scores(objective_id)
    }
}

impl Messaging for InMemoryHost {
    fn broadcast(&mut self, text: &str) {
        self.record(HostCall::Broadcast(text.to_string()));
    }

    fn action_bar(&mut self, player: &PlayerId, text: &str) {
        self.record(HostCall::ActionBar {
            player: player.clone(),
            text: text.to_string(),
        });
        if let Some(p) = self.player_mut(player) {
            p.action_bar = Some(text.to_string());
        }
    }
}

impl Host for InMemoryHost {
    fn apply(&mut self, update: HostUpdate) {
        match update {
            HostUpdate::Players(roster) => {
                let mut next = Vec::with_capacity(roster.len());
                for info in roster {
                    let kept = self.player(&info.id).cloned();
                    next.push(match kept {
                        Some(existing) => MemoryPlayer { info, ..existing },
                        None => MemoryPlayer {
                            info,
                            health: FULL_HEALTH,
                            spawn_point: None,
                            action_bar: None,
                        },
                    });
                }
                self.players = next;
            }
            HostUpdate::Ground { x, z, y } => self.set_ground(x, z, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_score_requires_objective() {
        let mut host = InMemoryHost::new();
        let id = host.add_player("Alex", Position::default());
        host.run_player_command(&id, "scoreboard players set @s distance 3");
        assert_eq!(host.score_of("distance", &id), None);

        host.add_objective("distance", "distance from start").unwrap();
        host.run_player_command(&id, "scoreboard players set @s distance 3");
        assert_eq!(host.score_of("distance", &id), Some(3));
    }

    #[test]
    fn test_set_score_overwrites() {
        let mut host = InMemoryHost::new();
        let id = host.add_player("Alex", Position::default());
        host.add_objective("distance", "d").unwrap();
        host.run_player_command(&id, "scoreboard players set @s distance 9");
        host.run_player_command(&id, "scoreboard players set @s distance 4");
        let scores = host.scores("distance").unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 4);
    }

    #[test]
    fn test_remove_missing_objective_errors() {
        let mut host = InMemoryHost::new();
        assert_eq!(
            host.remove_objective("distance"),
            Err(HostError::ObjectiveNotFound("distance".to_string()))
        );
    }

    #[test]
    fn test_remove_objective_clears_display() {
        let mut host = InMemoryHost::new();
        host.add_objective("distance", "d").unwrap();
        host.set_display(DisplaySlot::Sidebar, "distance", SortOrder::Descending);
        assert!(host.display(DisplaySlot::Sidebar).is_some());
        host.remove_objective("distance").unwrap();
        assert!(host.display(DisplaySlot::Sidebar).is_none());
    }

    #[test]
    fn test_ground_probe_only_below() {
        let mut host = InMemoryHost::new();
        host.set_ground(0, 0, 63);
        assert_eq!(host.ground_below(Position::new(0.5, 64.0, 0.5)), Some(63));
        assert_eq!(host.ground_below(Position::new(0.5, 60.0, 0.5)), None);
        assert_eq!(host.ground_below(Position::new(5.0, 64.0, 5.0)), None);
        host.set_default_ground(Some(10));
        assert_eq!(host.ground_below(Position::new(5.0, 64.0, 5.0)), Some(10));
    }

    #[test]
    fn test_roster_update_keeps_player_state() {
        let mut host = InMemoryHost::new();
        let id = host.add_player("Alex", Position::default());
        host.set_health(&id, 4);
        host.apply(HostUpdate::Players(vec![PlayerInfo {
            id: id.clone(),
            name: "Alex".to_string(),
            position: Position::new(9.0, 64.0, 0.0),
        }]));
        let player = host.player(&id).unwrap();
        assert_eq!(player.health, 4);
        assert_eq!(player.info.position, Position::new(9.0, 64.0, 0.0));
    }

    #[test]
    fn test_scores_follow_first_set_order() {
        let mut host = InMemoryHost::new();
        let a = host.add_player("A", Position::default());
        let b = host.add_player("B", Position::default());
        host.add_objective("distance", "d").unwrap();
        host.run_player_command(&b, "scoreboard players set @s distance 1");
        host.run_player_command(&a, "scoreboard players set @s distance 2");
        host.run_player_command(&b, "scoreboard players set @s distance 3");
        let names: Vec<String> = host
            .scores("distance")
            .unwrap()
            .into_iter()
            .map(|e| e.participant)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
