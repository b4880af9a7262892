//! [`Host`] implementation that forwards calls to the adapter.
//!
//! Mutating calls become [`OutboundCommand`]s on an unbounded channel and
//! return immediately. Queries are answered from local state: the roster
//! and ground columns pushed by the adapter, and a scoreboard mirrored from
//! the commands this host has sent.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::HostError;
use crate::geometry::{Position, Region};
use crate::host::{
    Block, DisplaySlot, FillCommand, Host, HostUpdate, Messaging, Objective, PlayerId, PlayerInfo,
    PlayerService, ScoreEntry, ScoreTable, Scoreboard, SetScoreCommand, SortOrder, WorldEdit,
};

use super::protocol::{CommandTarget, OutboundCommand};

/// Host backed by the NDJSON bridge.
#[derive(Debug)]
pub struct BridgeHost {
    players: Vec<PlayerInfo>,
    ground: HashMap<(i32, i32), i32>,
    scores: ScoreTable,
    dimension: String,
    outbound: mpsc::UnboundedSender<OutboundCommand>,
}

impl BridgeHost {
    /// Creates a host sending commands for `dimension` into `outbound`.
    #[must_use]
    pub fn new(dimension: impl Into<String>, outbound: mpsc::UnboundedSender<OutboundCommand>) -> Self {
        Self {
            players: Vec::new(),
            ground: HashMap::new(),
            scores: ScoreTable::new(),
            dimension: dimension.into(),
            outbound,
        }
    }

    /// Dimension commands run in.
    #[must_use]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    fn send(&self, command: OutboundCommand) {
        if self.outbound.send(command).is_err() {
            debug!("bridge writer closed, dropping command");
        }
    }

    fn player_name(&self, id: &PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
    }
}

impl PlayerService for BridgeHost {
    fn players(&self) -> Vec<PlayerInfo> {
        self.players.clone()
    }

    fn teleport(&mut self, player: &PlayerId, to: Position) {
        if let Some(p) = self.players.iter_mut().find(|p| &p.id == player) {
            p.position = to;
        }
        self.send(OutboundCommand::Teleport {
            player: player.clone(),
            position: to,
            dimension: self.dimension.clone(),
        });
    }

    fn set_spawn_point(&mut self, player: &PlayerId, at: Position) {
        self.send(OutboundCommand::SetSpawnPoint {
            player: player.clone(),
            position: at,
            dimension: self.dimension.clone(),
        });
    }

    fn set_health(&mut self, player: &PlayerId, health: u32) {
        self.send(OutboundCommand::SetHealth {
            player: player.clone(),
            health,
        });
    }

    fn run_player_command(&mut self, player: &PlayerId, command: &str) {
        if let Some(set) = SetScoreCommand::parse(command) {
            let name = self
                .player_name(player)
                .map_or_else(|| player.to_string(), str::to_string);
            self.scores.apply(player, &name, &set);
        }
        self.send(OutboundCommand::RunCommand {
            target: CommandTarget::Player(player.clone()),
            command: command.to_string(),
        });
    }
}

impl WorldEdit for BridgeHost {
    fn fill(&mut self, region: Region, block: Block) {
        self.send(OutboundCommand::RunCommand {
            target: CommandTarget::Dimension(self.dimension.clone()),
            command: FillCommand::new(region, block).to_string(),
        });
    }

    fn ground_below(&self, from: Position) -> Option<i32> {
        let column = from.block();
        self.ground
            .get(&(column.x, column.z))
            .copied()
            .filter(|&y| f64::from(y) < from.y)
    }
}

impl Scoreboard for BridgeHost {
    fn objective(&self, id: &str) -> Option<Objective> {
        self.scores.objective(id)
    }

    fn add_objective(&mut self, id: &str, display_name: &str) -> Result<Objective, HostError> {
        let objective = self.scores.add(id, display_name)?;
        self.send(OutboundCommand::AddObjective {
            id: id.to_string(),
            display_name: display_name.to_string(),
        });
        Ok(objective)
    }

    fn remove_objective(&mut self, id: &str) -> Result<(), HostError> {
        // The world may hold an objective left by an earlier process.
        self.send(OutboundCommand::RemoveObjective { id: id.to_string() });
        self.scores.remove(id)
    }

    fn set_display(&mut self, slot: DisplaySlot, objective_id: &str, order: SortOrder) {
        self.send(OutboundCommand::SetDisplay {
            slot,
            objective: objective_id.to_string(),
            order,
        });
    }

    fn clear_display(&mut self, slot: DisplaySlot) {
        self.send(OutboundCommand::ClearDisplay { slot });
    }

    fn scores(&self, objective_id: &str) -> Result<Vec<ScoreEntry>, HostError> {
        self.scores.scores(objective_id)
    }
}

impl Messaging for BridgeHost {
    fn broadcast(&mut self, text: &str) {
        self.send(OutboundCommand::Broadcast {
            text: text.to_string(),
        });
    }

    fn action_bar(&mut self, player: &PlayerId, text: &str) {
        self.send(OutboundCommand::ActionBar {
            player: player.clone(),
            text: text.to_string(),
        });
    }
}

impl Host for BridgeHost {
    fn apply(&mut self, update: HostUpdate) {
        match update {
            HostUpdate::Players(players) => self.players = players,
            HostUpdate::Ground { x, z, y } => {
                self.ground.insert((x, z), y);
            }
        }
    }
}
