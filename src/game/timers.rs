//! Registry of the session's recurring callbacks.
//!
//! All three callbacks run off the driver's single tick; a timer being
//! "armed" means the session runs that callback on the next tick. At most
//! one of each kind is armed, and a restart cancels before it re-arms.

use std::fmt;

/// Recurring callbacks owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Advances the countdown, then the round clock
    GameClock,
    /// Refreshes each player's remaining-time overlay
    ActionBar,
    /// Refreshes scores until the one-minute warning
    ScoreboardUpdate,
}

impl TimerKind {
    /// Every timer kind, in tick order.
    pub const ALL: [Self; 3] = [Self::GameClock, Self::ActionBar, Self::ScoreboardUpdate];

    const fn index(self) -> usize {
        match self {
            Self::GameClock => 0,
            Self::ActionBar => 1,
            Self::ScoreboardUpdate => 2,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameClock => write!(f, "game_clock"),
            Self::ActionBar => write!(f, "action_bar"),
            Self::ScoreboardUpdate => write!(f, "scoreboard_update"),
        }
    }
}

/// Armed/disarmed state per [`TimerKind`].
///
/// A kind is either armed once or not at all; there is no way to hold two
/// copies of the same callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    armed: [bool; 3],
}

impl Timers {
    /// Creates a registry with nothing armed.
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: [false; 3] }
    }

    /// Arms a timer. Returns `false` if it was already armed.
    pub const fn arm(&mut self, kind: TimerKind) -> bool {
        let was = self.armed[kind.index()];
        self.armed[kind.index()] = true;
        !was
    }

    /// Cancels a timer. Returns `false` if it was not armed.
    pub const fn cancel(&mut self, kind: TimerKind) -> bool {
        let was = self.armed[kind.index()];
        self.armed[kind.index()] = false;
        was
    }

    /// Cancels everything and returns what was armed.
    pub fn cancel_all(&mut self) -> Vec<TimerKind> {
        let cancelled = self.armed_kinds();
        self.armed = [false; 3];
        cancelled
    }

    /// Returns whether a timer is armed.
    #[must_use]
    pub const fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed[kind.index()]
    }

    /// Armed timers in tick order.
    #[must_use]
    pub fn armed_kinds(&self) -> Vec<TimerKind> {
        TimerKind::ALL
            .into_iter()
            .filter(|kind| self.is_armed(*kind))
            .collect()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.armed.iter().filter(|a| **a).count()
    }
}
