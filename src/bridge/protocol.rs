//! Wire format between the session and the game-side adapter.
//!
//! One JSON object per line in each direction, tagged by `type`.
//!
//! Inbound (adapter → session):
//!
//! ```json
//! {"type":"script_event","id":"game:start","source":{"name":"Alex","position":{"x":0.5,"y":64.0,"z":0.5}}}
//! {"type":"players","players":[{"id":"a1","name":"Alex","position":{"x":0.5,"y":64.0,"z":0.5}}]}
//! {"type":"ground","x":0,"z":0,"y":63}
//! ```
//!
//! Outbound (session → adapter):
//!
//! ```json
//! {"type":"broadcast","text":"Game start!"}
//! {"type":"run_command","target":{"scope":"dimension","id":"overworld"},"command":"fill -2 64 -2 2 67 -2 minecraft:barrier"}
//! {"type":"run_command","target":{"scope":"player","id":"a1"},"command":"scoreboard players set @s distance 5"}
//! ```

use serde::{Deserialize, Serialize};

use crate::driver::DriverInput;
use crate::game::ScriptEvent;
use crate::geometry::Position;
use crate::host::{DisplaySlot, HostUpdate, PlayerId, PlayerInfo, SortOrder};

/// Messages the adapter sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// A script event fired in the world
    ScriptEvent(ScriptEvent),
    /// Full roster snapshot
    Players {
        /// Every present player
        players: Vec<PlayerInfo>,
    },
    /// Top solid block of one column
    Ground {
        /// Column x
        x: i32,
        /// Column z
        z: i32,
        /// Block y
        y: i32,
    },
}

impl From<InboundMessage> for DriverInput {
    fn from(message: InboundMessage) -> Self {
        match message {
            InboundMessage::ScriptEvent(event) => Self::Event(event),
            InboundMessage::Players { players } => Self::Host(HostUpdate::Players(players)),
            InboundMessage::Ground { x, z, y } => Self::Host(HostUpdate::Ground { x, z, y }),
        }
    }
}

/// Where a raw command runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum CommandTarget {
    /// Dimension context (no `@s`)
    Dimension(String),
    /// As the given player
    Player(PlayerId),
}

/// Commands the session sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundCommand {
    /// Chat line to every player
    Broadcast {
        /// Text
        text: String,
    },
    /// Action-bar overlay for one player
    ActionBar {
        /// Target
        player: PlayerId,
        /// Text
        text: String,
    },
    /// Move a player
    Teleport {
        /// Target
        player: PlayerId,
        /// Destination
        position: Position,
        /// Destination dimension
        dimension: String,
    },
    /// Set a player's respawn point
    SetSpawnPoint {
        /// Target
        player: PlayerId,
        /// Respawn location
        position: Position,
        /// Respawn dimension
        dimension: String,
    },
    /// Set a player's health
    SetHealth {
        /// Target
        player: PlayerId,
        /// Half hearts
        health: u32,
    },
    /// Run raw command text
    RunCommand {
        /// Execution context
        target: CommandTarget,
        /// Command without leading slash
        command: String,
    },
    /// Create an objective
    AddObjective {
        /// Objective id
        id: String,
        /// Title
        display_name: String,
    },
    /// Remove an objective
    RemoveObjective {
        /// Objective id
        id: String,
    },
    /// Show an objective in a slot
    SetDisplay {
        /// Slot
        slot: DisplaySlot,
        /// Objective id
        objective: String,
        /// Sort order
        order: SortOrder,
    },
    /// Empty a slot
    ClearDisplay {
        /// Slot
        slot: DisplaySlot,
    },
}

/// Parses one inbound line.
///
/// # Errors
///
/// Returns the JSON error for malformed lines or unknown `type` tags.
pub fn parse_inbound(line: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Serializes one outbound command without a trailing newline.
///
/// # Errors
///
/// Returns the JSON error if serialization fails.
pub fn encode_outbound(command: &OutboundCommand) -> Result<String, serde_json::Error> {
    serde_json::to_string(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_event_with_source() {
        let line = r#"{"type":"script_event","id":"game:start","source":{"name":"Alex","position":{"x":1.5,"y":64.0,"z":-2.5}}}"#;
        let InboundMessage::ScriptEvent(event) = parse_inbound(line).unwrap() else {
            panic!("expected script_event");
        };
        assert_eq!(event.id, "game:start");
        let source = event.source.unwrap();
        assert_eq!(source.name, "Alex");
        assert_eq!(source.position, Position::new(1.5, 64.0, -2.5));
    }

    #[test]
    fn parses_script_event_without_source() {
        let message = parse_inbound(r#"{"type":"script_event","id":"game:start"}"#).unwrap();
        assert_eq!(
            DriverInput::from(message),
            DriverInput::Event(ScriptEvent {
                id: "game:start".to_string(),
                source: None
            })
        );
    }

    #[test]
    fn parses_roster_and_ground() {
        let roster = parse_inbound(
            r#"{"type":"players","players":[{"id":"a1","name":"Alex","position":{"x":0.0,"y":64.0,"z":0.0}}]}"#,
        )
        .unwrap();
        let DriverInput::Host(HostUpdate::Players(players)) = DriverInput::from(roster) else {
            panic!("expected roster");
        };
        assert_eq!(players[0].id, PlayerId::new("a1"));

        let ground = parse_inbound(r#"{"type":"ground","x":3,"z":-4,"y":62}"#).unwrap();
        assert_eq!(ground, InboundMessage::Ground { x: 3, z: -4, y: 62 });
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(parse_inbound(r#"{"type":"explode"}"#).is_err());
        assert!(parse_inbound("not json").is_err());
    }

    #[test]
    fn run_command_target_shape() {
        let command = OutboundCommand::RunCommand {
            target: CommandTarget::Player(PlayerId::new("a1")),
            command: "scoreboard players set @s distance 5".to_string(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&encode_outbound(&command).unwrap()).unwrap();
        assert_eq!(value["type"], "run_command");
        assert_eq!(value["target"]["scope"], "player");
        assert_eq!(value["target"]["id"], "a1");
    }

    #[test]
    fn set_display_uses_snake_case() {
        let command = OutboundCommand::SetDisplay {
            slot: DisplaySlot::Sidebar,
            objective: "distance".to_string(),
            order: SortOrder::Descending,
        };
        let value: serde_json::Value =
            serde_json::from_str(&encode_outbound(&command).unwrap()).unwrap();
        assert_eq!(value["slot"], "sidebar");
        assert_eq!(value["order"], "descending");
    }
}
