//! `farthest` - a timed distance-race minigame session.
//!
//! A script event starts a round: players are caged at the start point for
//! a countdown, then race to get as far from it as possible before time
//! runs out. The game logic in [`game`] talks to the world only through the
//! [`host`] traits, so it runs the same against the stdio [`bridge`] and the
//! in-memory host used by `simulate` and the tests.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod geometry;
pub mod host;
pub mod observability;
pub mod sim;
