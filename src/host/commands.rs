//! Command text for hosts that take commands rather than typed calls.
//!
//! Only two commands cross this boundary: the bulk `fill` used by the arena
//! and the per-player `scoreboard players set` used by scoring.

use std::fmt;

use crate::geometry::Region;

use super::Block;

/// `fill <x1> <y1> <z1> <x2> <y2> <z2> <block>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillCommand {
    /// Inclusive region to fill
    pub region: Region,
    /// Block placed in every cell
    pub block: Block,
}

impl FillCommand {
    /// Creates a fill command.
    #[must_use]
    pub const fn new(region: Region, block: Block) -> Self {
        Self { region, block }
    }
}

impl fmt::Display for FillCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fill {} {} {}",
            self.region.min, self.region.max, self.block
        )
    }
}

/// `scoreboard players set @s <objective> <score>`
///
/// Runs in the target player's command context, so `@s` resolves to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetScoreCommand {
    /// Objective id
    pub objective: String,
    /// Score to set (replaces, never adds)
    pub score: i32,
}

impl SetScoreCommand {
    /// Creates a set-score command.
    #[must_use]
    pub fn new(objective: impl Into<String>, score: i32) -> Self {
        Self {
            objective: objective.into(),
            score,
        }
    }

    /// Parses the command text produced by [`fmt::Display`].
    ///
    /// Returns `None` for any other command.
    #[must_use]
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let head: Vec<&str> = parts.by_ref().take(4).collect();
        if head != ["scoreboard", "players", "set", "@s"] {
            return None;
        }
        let objective = parts.next()?;
        let score = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(objective, score))
    }
}

impl fmt::Display for SetScoreCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scoreboard players set @s {} {}", self.objective, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BlockPos;

    #[test]
    fn test_fill_command_text() {
        let region = Region::new(BlockPos::new(-2, 64, -2), BlockPos::new(2, 67, -2));
        let cmd = FillCommand::new(region, Block::Barrier);
        assert_eq!(cmd.to_string(), "fill -2 64 -2 2 67 -2 minecraft:barrier");
    }

    #[test]
    fn test_set_score_text() {
        let cmd = SetScoreCommand::new("distance", 17);
        assert_eq!(cmd.to_string(), "scoreboard players set @s distance 17");
    }

    #[test]
    fn test_set_score_parse() {
        let parsed = SetScoreCommand::parse("scoreboard players set @s distance 42").unwrap();
        assert_eq!(parsed, SetScoreCommand::new("distance", 42));
    }

    #[test]
    fn test_set_score_parse_rejects_other_commands() {
        assert!(SetScoreCommand::parse("scoreboard players add @s distance 1").is_none());
        assert!(SetScoreCommand::parse("scoreboard players set @a distance 1").is_none());
        assert!(SetScoreCommand::parse("scoreboard players set @s distance x").is_none());
        assert!(SetScoreCommand::parse("scoreboard players set @s distance 1 extra").is_none());
        assert!(SetScoreCommand::parse("fill 0 0 0 1 1 1 minecraft:air").is_none());
    }
}
