//! Distance-from-start scoring.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::HostError;
use crate::geometry::Position;
use crate::host::{DisplaySlot, PlayerService, ScoreEntry, Scoreboard, SetScoreCommand, SortOrder};

/// Winning participant of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Participant display name
    pub name: String,
    /// Final distance score
    pub score: i32,
}

/// Picks the highest score. Ties go to the earliest entry.
#[must_use]
pub fn pick_winner(entries: &[ScoreEntry]) -> Option<Winner> {
    let mut best: Option<&ScoreEntry> = None;
    for entry in entries {
        match best {
            Some(current) if entry.score <= current.score => {}
            _ => best = Some(entry),
        }
    }
    best.map(|entry| Winner {
        name: entry.participant.clone(),
        score: entry.score,
    })
}

/// Owns the `distance` objective and its sidebar binding.
#[derive(Debug, Clone)]
pub struct ScoringTracker {
    objective_id: String,
    title: String,
}

impl ScoringTracker {
    /// Creates a tracker for one objective.
    #[must_use]
    pub fn new(objective_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            objective_id: objective_id.into(),
            title: title.into(),
        }
    }

    /// Objective id used in commands.
    #[must_use]
    pub fn objective_id(&self) -> &str {
        &self.objective_id
    }

    /// Drops the objective and every score under it.
    ///
    /// A missing objective is the normal state before the first round.
    pub fn reset<H: Scoreboard + ?Sized>(&self, host: &mut H) {
        match host.remove_objective(&self.objective_id) {
            Ok(()) => debug!(objective = %self.objective_id, "objective removed"),
            Err(HostError::ObjectiveNotFound(_)) => {
                debug!(objective = %self.objective_id, "no objective to remove");
            }
            Err(e) => warn!(objective = %self.objective_id, error = %e, "objective removal failed"),
        }
    }

    /// Creates the objective if needed and shows it in the sidebar, largest first.
    pub fn activate<H: Scoreboard + ?Sized>(&self, host: &mut H) {
        self.ensure_objective(host);
        host.set_display(DisplaySlot::Sidebar, &self.objective_id, SortOrder::Descending);
    }

    /// Sets every present player's score to their whole-block distance from
    /// `origin`. Returns the number of players scored.
    pub fn update<H: PlayerService + Scoreboard + ?Sized>(
        &self,
        host: &mut H,
        origin: &Position,
    ) -> usize {
        self.ensure_objective(host);
        let players = host.players();
        for player in &players {
            let command = SetScoreCommand::new(
                self.objective_id.clone(),
                player.position.block_distance_to(origin),
            );
            host.run_player_command(&player.id, &command.to_string());
        }
        players.len()
    }

    /// Clears the sidebar. Scores stay recorded.
    pub fn hide<H: Scoreboard + ?Sized>(&self, host: &mut H) {
        host.clear_display(DisplaySlot::Sidebar);
    }

    /// Current leader, if the objective exists and has any scores.
    #[must_use]
    pub fn winner<H: Scoreboard + ?Sized>(&self, host: &H) -> Option<Winner> {
        match host.scores(&self.objective_id) {
            Ok(entries) => pick_winner(&entries),
            Err(e) => {
                debug!(objective = %self.objective_id, error = %e, "no scores to rank");
                None
            }
        }
    }

    fn ensure_objective<H: Scoreboard + ?Sized>(&self, host: &mut H) {
        if host.objective(&self.objective_id).is_some() {
            return;
        }
        match host.add_objective(&self.objective_id, &self.title) {
            Ok(_) | Err(HostError::ObjectiveExists(_)) => {}
            Err(e) => warn!(objective = %self.objective_id, error = %e, "objective creation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use proptest::prelude::*;

    fn entries(pairs: &[(&str, i32)]) -> Vec<ScoreEntry> {
        pairs
            .iter()
            .map(|(name, score)| ScoreEntry {
                participant: (*name).to_string(),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn test_winner_is_maximum() {
        let winner = pick_winner(&entries(&[("A", 12), ("B", 34), ("C", 9)])).unwrap();
        assert_eq!(
            winner,
            Winner {
                name: "B".to_string(),
                score: 34
            }
        );
    }

    #[test]
    fn test_tie_goes_to_first() {
        let winner = pick_winner(&entries(&[("A", 20), ("B", 20)])).unwrap();
        assert_eq!(winner.name, "A");
    }

    #[test]
    fn test_no_entries_no_winner() {
        assert!(pick_winner(&[]).is_none());
    }

    #[test]
    fn test_update_sets_floor_distance() {
        let mut host = InMemoryHost::new();
        let origin = Position::new(0.0, 64.0, 0.0);
        let near = host.add_player("Near", origin);
        let far = host.add_player("Far", Position::new(3.0, 64.0, 4.0));
        let tracker = ScoringTracker::new("distance", "distance from start");

        assert_eq!(tracker.update(&mut host, &origin), 2);
        assert_eq!(host.score_of("distance", &near), Some(0));
        assert_eq!(host.score_of("distance", &far), Some(5));
    }

    #[test]
    fn test_update_sets_rather_than_adds() {
        let mut host = InMemoryHost::new();
        let origin = Position::new(0.0, 64.0, 0.0);
        let id = host.add_player("Alex", Position::new(3.0, 64.0, 4.0));
        let tracker = ScoringTracker::new("distance", "d");
        tracker.update(&mut host, &origin);
        tracker.update(&mut host, &origin);
        assert_eq!(host.score_of("distance", &id), Some(5));
    }

    #[test]
    fn test_reset_without_objective_is_quiet() {
        let mut host = InMemoryHost::new();
        let tracker = ScoringTracker::new("distance", "d");
        tracker.reset(&mut host);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_activate_binds_sidebar_descending() {
        let mut host = InMemoryHost::new();
        let tracker = ScoringTracker::new("distance", "d");
        tracker.activate(&mut host);
        let binding = host.display(DisplaySlot::Sidebar).unwrap();
        assert_eq!(binding.objective, "distance");
        assert_eq!(binding.order, SortOrder::Descending);

        tracker.hide(&mut host);
        assert!(host.display(DisplaySlot::Sidebar).is_none());
    }

    #[test]
    fn test_winner_without_objective_is_none() {
        let host = InMemoryHost::new();
        let tracker = ScoringTracker::new("distance", "d");
        assert!(tracker.winner(&host).is_none());
    }

    proptest! {
        #[test]
        fn prop_winner_score_is_max_and_first(scores in proptest::collection::vec(0i32..50, 1..12)) {
            let named: Vec<ScoreEntry> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| ScoreEntry { participant: format!("p{i}"), score: *s })
                .collect();
            let winner = pick_winner(&named).unwrap();
            let max = *scores.iter().max().unwrap();
            let first = scores.iter().position(|s| *s == max).unwrap();
            prop_assert_eq!(winner.score, max);
            prop_assert_eq!(winner.name, format!("p{first}"));
        }
    }
}
