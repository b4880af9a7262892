//! Bot players for `simulate`.
//!
//! Each bot picks a heading once and walks roughly along it, turning a
//! little every step, so some bots drift far and others circle back.

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::prelude::*;

use crate::game::Phase;
use crate::geometry::Position;
use crate::host::{InMemoryHost, PlayerId, PlayerService};

const NAMES: [&str; 8] = [
    "Alex", "Steve", "Kai", "Noor", "Sunny", "Zuri", "Makena", "Efe",
];

/// Largest heading change per step, in radians.
const MAX_TURN: f64 = 0.6;

/// Random-walk movement for a set of bot players.
#[derive(Debug)]
pub struct Wanderers {
    rng: StdRng,
    headings: HashMap<PlayerId, f64>,
    max_step: f64,
}

impl Wanderers {
    /// Creates a walker. `Some(seed)` makes every walk reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>, max_step: f64) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            rng,
            headings: HashMap::new(),
            max_step: max_step.max(0.0),
        }
    }

    /// Adds `count` bots standing at `at`. Names repeat with a suffix past
    /// the built-in list.
    pub fn populate(&mut self, host: &mut InMemoryHost, count: usize, at: Position) -> Vec<PlayerId> {
        (0..count)
            .map(|i| {
                let base = NAMES[i % NAMES.len()];
                let name = if i < NAMES.len() {
                    base.to_string()
                } else {
                    format!("{base}{}", i / NAMES.len() + 1)
                };
                let id = host.add_player(name, at);
                let heading = self.rng.random_range(0.0..TAU);
                self.headings.insert(id.clone(), heading);
                id
            })
            .collect()
    }

    /// Moves every bot one step. Bots stand still unless the round is active,
    /// since the cage holds them during the countdown.
    pub fn step(&mut self, phase: Phase, host: &mut InMemoryHost) {
        if phase != Phase::Active {
            return;
        }
        for player in host.players() {
            let heading = self
                .headings
                .entry(player.id.clone())
                .or_insert_with(|| self.rng.random_range(0.0..TAU));
            *heading += self.rng.random_range(-MAX_TURN..=MAX_TURN);
            let distance = self.rng.random_range(0.0..=self.max_step);
            let to = Position::new(
                heading.cos().mul_add(distance, player.position.x),
                player.position.y,
                heading.sin().mul_add(distance, player.position.z),
            );
            host.move_player(&player.id, to);
        }
    }
}
