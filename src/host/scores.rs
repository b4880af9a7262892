//! Local scoreboard state.
//!
//! Shared by hosts that keep the scoreboard themselves: the in-memory host
//! owns it outright, the bridge host mirrors what it has told the game side.

use indexmap::IndexMap;

use crate::error::HostError;

use super::{Objective, PlayerId, ScoreEntry, SetScoreCommand};

#[derive(Debug, Clone)]
struct TableObjective {
    display_name: String,
    /// Keyed by player; value is (display name, score). Insertion order is
    /// the host's enumeration order.
    scores: IndexMap<PlayerId, (String, i32)>,
}

/// Objectives and the scores recorded under them.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    objectives: IndexMap<String, TableObjective>,
}

impl ScoreTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an objective exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.objectives.contains_key(id)
    }

    /// Looks up an objective.
    #[must_use]
    pub fn objective(&self, id: &str) -> Option<Objective> {
        self.objectives.get(id).map(|o| Objective {
            id: id.to_string(),
            display_name: o.display_name.clone(),
        })
    }

    /// Creates an objective.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveExists` if the id is taken.
    pub fn add(&mut self, id: &str, display_name: &str) -> Result<Objective, HostError> {
        if self.objectives.contains_key(id) {
            return Err(HostError::ObjectiveExists(id.to_string()));
        }
        self.objectives.insert(
            id.to_string(),
            TableObjective {
                display_name: display_name.to_string(),
                scores: IndexMap::new(),
            },
        );
        Ok(Objective {
            id: id.to_string(),
            display_name: display_name.to_string(),
        })
    }

    /// Removes an objective and its scores.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveNotFound` if it does not exist.
    pub fn remove(&mut self, id: &str) -> Result<(), HostError> {
        self.objectives
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| HostError::ObjectiveNotFound(id.to_string()))
    }

    /// Applies a set-score command issued as `player`. Returns `false` when
    /// the objective does not exist, which the real command also ignores.
    pub fn apply(&mut self, player: &PlayerId, name: &str, command: &SetScoreCommand) -> bool {
        let Some(objective) = self.objectives.get_mut(&command.objective) else {
            return false;
        };
        objective
            .scores
            .insert(player.clone(), (name.to_string(), command.score));
        true
    }

    /// Scores under an objective in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ObjectiveNotFound` if it does not exist.
    pub fn scores(&self, id: &str) -> Result<Vec<ScoreEntry>, HostError> {
        let objective = self
            .objectives
            .get(id)
            .ok_or_else(|| HostError::ObjectiveNotFound(id.to_string()))?;
        Ok(objective
            .scores
            .values()
            .map(|(name, score)| ScoreEntry {
                participant: name.clone(),
                score: *score,
            })
            .collect())
    }

    /// One player's score.
    #[must_use]
    pub fn score_of(&self, id: &str, player: &PlayerId) -> Option<i32> {
        self.objectives
            .get(id)
            .and_then(|o| o.scores.get(player))
            .map(|(_, score)| *score)
    }
}
