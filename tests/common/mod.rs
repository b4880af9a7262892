//! Shared integration-test helpers: world setup for the in-memory host and
//! spawning the `farthest` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use farthest::game::rules::START_EVENT_ID;
use farthest::game::{Actor, Messages, ScriptEvent, Session};
use farthest::geometry::Position;
use farthest::host::{InMemoryHost, PlayerId};

/// Where every test round starts.
pub const ORIGIN: Position = Position::new(0.5, 64.0, 0.5);

/// Flat ground height under [`ORIGIN`].
pub const GROUND_Y: i32 = 63;

/// Default timeout for reading from a spawned process.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// An idle session over flat ground with the given players standing at
/// [`ORIGIN`].
pub fn session_with(names: &[&str]) -> (Session<InMemoryHost>, Vec<PlayerId>) {
    let mut host = InMemoryHost::new();
    host.set_default_ground(Some(GROUND_Y));
    let ids = names
        .iter()
        .map(|name| host.add_player(*name, ORIGIN))
        .collect();
    (Session::new(host, Messages::default()), ids)
}

/// The start event raised by `name` standing at [`ORIGIN`].
pub fn start_event(name: &str) -> ScriptEvent {
    ScriptEvent::from_actor(
        START_EVENT_ID,
        Actor {
            name: name.to_string(),
            position: ORIGIN,
        },
    )
}

/// A point `distance` blocks east of [`ORIGIN`].
pub fn east_of_origin(distance: f64) -> Position {
    Position::new(ORIGIN.x + distance, ORIGIN.y, ORIGIN.z)
}

/// Ticks `session` `n` times.
pub fn tick_n(session: &mut Session<InMemoryHost>, n: u32) {
    for _ in 0..n {
        session.tick();
    }
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs the binary to completion and returns its output.
pub fn run_farthest(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_farthest"))
        .args(args)
        .output()
        .expect("failed to spawn farthest")
}
