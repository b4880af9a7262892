//! Round lifecycle state machine.
//!
//! A [`Session`] owns its host and is mutated only through [`Session::start`]
//! and [`Session::tick`]. Both return the [`SessionEvent`]s they produced so
//! the driver can log, count, and emit them without the session knowing
//! about any of that.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::geometry::Position;
use crate::host::Host;

use super::arena::Cage;
use super::messages::Messages;
use super::rules::{COUNTDOWN_SECONDS, LOW_HEALTH, OBJECTIVE_ID, ROUND_SECONDS, WARNING_THRESHOLD_SECONDS};
use super::scoring::{ScoringTracker, Winner};
use super::timers::{TimerKind, Timers};

/// Where a session is in its round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No round has started yet
    #[default]
    Idle,
    /// Players are caged, the countdown is running
    CountingDown,
    /// Cage open, distances are scored
    Active,
    /// Round resolved, waiting for the next start
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CountingDown => write!(f, "counting_down"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Something that happened inside a session call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A round was (re)started
    CountdownStarted {
        /// Round number, starting at 1
        round: u64,
        /// Round origin
        origin: Position,
        /// Where players were placed
        spawn: Position,
        /// Players present at start
        participants: usize,
    },
    /// One countdown second elapsed and was announced
    Countdown {
        /// Seconds left before the cage opens
        remaining: u32,
    },
    /// The cage opened
    RoundActive {
        /// Round number
        round: u64,
    },
    /// Per-second round bookkeeping ran
    RoundTick {
        /// Seconds left in the round
        remaining: u32,
        /// Players present
        participants: usize,
    },
    /// The sidebar was hidden for the final minute
    ScoreboardHidden {
        /// Round number
        round: u64,
        /// Seconds left when it was hidden
        remaining: u32,
    },
    /// The round was resolved
    RoundEnded {
        /// Round number
        round: u64,
        /// Highest score, if anyone scored
        winner: Option<Winner>,
    },
}

/// A single distance-race session bound to one host.
#[derive(Debug)]
pub struct Session<H: Host> {
    host: H,
    messages: Messages,
    phase: Phase,
    round: u64,
    countdown_remaining: u32,
    round_remaining: u32,
    origin: Position,
    timers: Timers,
    scoring: ScoringTracker,
    /// Cage currently standing, if any
    cage: Option<Cage>,
}

impl<H: Host> Session<H> {
    /// Creates an idle session.
    #[must_use]
    pub fn new(host: H, messages: Messages) -> Self {
        let scoring = ScoringTracker::new(OBJECTIVE_ID, messages.objective_title.clone());
        Self {
            host,
            messages,
            phase: Phase::Idle,
            round: 0,
            countdown_remaining: 0,
            round_remaining: 0,
            origin: Position::default(),
            timers: Timers::new(),
            scoring,
            cage: None,
        }
    }

    /// The host this session drives.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for pushing updates between ticks.
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the session and returns its host.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Message catalog in use.
    #[must_use]
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of rounds started so far.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Countdown seconds left.
    #[must_use]
    pub const fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    /// Round seconds left.
    #[must_use]
    pub const fn round_remaining(&self) -> u32 {
        self.round_remaining
    }

    /// Origin of the current or last round.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Armed timers.
    #[must_use]
    pub const fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Starts a fresh round at `origin`, abandoning any round in progress.
    pub fn start(&mut self, origin: Position) -> Vec<SessionEvent> {
        let cancelled = self.timers.cancel_all();
        if !cancelled.is_empty() {
            debug!(round = self.round, ?cancelled, "abandoning round in progress");
        }
        if let Some(stale) = self.cage.take() {
            stale.clear(&mut self.host);
        }
        self.scoring.reset(&mut self.host);

        self.round += 1;
        self.countdown_remaining = COUNTDOWN_SECONDS;
        self.round_remaining = ROUND_SECONDS;
        self.origin = origin;

        let cage = Cage::around(&origin);
        cage.build(&mut self.host);
        self.cage = Some(cage);

        let spawn = self.spawn_point();
        let players = self.host.players();
        for player in &players {
            self.host.teleport(&player.id, spawn);
            self.host.set_spawn_point(&player.id, spawn);
            self.host.set_health(&player.id, LOW_HEALTH);
        }

        let line = self.messages.countdown(self.countdown_remaining);
        self.host.broadcast(&line);
        self.timers.arm(TimerKind::GameClock);
        self.phase = Phase::CountingDown;

        info!(
            round = self.round,
            %origin,
            %spawn,
            participants = players.len(),
            "round started"
        );
        vec![SessionEvent::CountdownStarted {
            round: self.round,
            origin,
            spawn,
            participants: players.len(),
        }]
    }

    /// Advances the session by one second.
    ///
    /// Does nothing unless the game clock is armed.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if !self.timers.is_armed(TimerKind::GameClock) {
            return Vec::new();
        }
        match self.phase {
            Phase::CountingDown => self.tick_countdown(),
            Phase::Active => self.tick_round(),
            Phase::Idle | Phase::Ended => Vec::new(),
        }
    }

    fn tick_countdown(&mut self) -> Vec<SessionEvent> {
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining > 0 {
            let line = self.messages.countdown(self.countdown_remaining);
            self.host.broadcast(&line);
            return vec![SessionEvent::Countdown {
                remaining: self.countdown_remaining,
            }];
        }
        self.enter_active()
    }

    fn enter_active(&mut self) -> Vec<SessionEvent> {
        if let Some(cage) = self.cage.take() {
            cage.clear(&mut self.host);
        }
        self.host.broadcast(&self.messages.round_start);
        self.phase = Phase::Active;
        self.scoring.activate(&mut self.host);
        self.timers.arm(TimerKind::ActionBar);
        self.timers.arm(TimerKind::ScoreboardUpdate);

        info!(round = self.round, "round active");
        vec![SessionEvent::RoundActive { round: self.round }]
    }

    fn tick_round(&mut self) -> Vec<SessionEvent> {
        self.round_remaining = self.round_remaining.saturating_sub(1);
        if self.round_remaining == 0 {
            return self.end_round();
        }

        let mut events = Vec::new();
        let players = self.host.players();

        if self.timers.is_armed(TimerKind::ActionBar) {
            let text = self.messages.time_remaining(self.round_remaining);
            for player in &players {
                self.host.action_bar(&player.id, &text);
            }
        }

        if self.timers.is_armed(TimerKind::ScoreboardUpdate) {
            if self.round_remaining <= WARNING_THRESHOLD_SECONDS {
                self.host.broadcast(&self.messages.one_minute_warning);
                self.scoring.hide(&mut self.host);
                self.timers.cancel(TimerKind::ScoreboardUpdate);
                info!(
                    round = self.round,
                    remaining = self.round_remaining,
                    "scoreboard hidden"
                );
                events.push(SessionEvent::ScoreboardHidden {
                    round: self.round,
                    remaining: self.round_remaining,
                });
            } else {
                self.scoring.update(&mut self.host, &self.origin);
            }
        }

        events.push(SessionEvent::RoundTick {
            remaining: self.round_remaining,
            participants: players.len(),
        });
        events
    }

    fn end_round(&mut self) -> Vec<SessionEvent> {
        self.timers.cancel_all();
        self.host.broadcast(&self.messages.round_end);
        for player in self.host.players() {
            self.host.teleport(&player.id, self.origin);
        }

        let winner = self.scoring.winner(&self.host);
        if let Some(winner) = &winner {
            let line = self.messages.winner(&winner.name, winner.score);
            self.host.broadcast(&line);
        }
        self.phase = Phase::Ended;

        info!(
            round = self.round,
            winner = winner.as_ref().map_or("none", |w| w.name.as_str()),
            score = winner.as_ref().map(|w| w.score),
            "round ended"
        );
        vec![SessionEvent::RoundEnded {
            round: self.round,
            winner,
        }]
    }

    /// One block above the ground under the origin, or the origin itself
    /// when nothing solid is below it.
    fn spawn_point(&self) -> Position {
        match self.host.ground_below(self.origin) {
            Some(ground) => self.origin.with_y(f64::from(ground) + 1.0),
            None => {
                debug!(origin = %self.origin, "no ground below origin");
                self.origin
            }
        }
    }
}
