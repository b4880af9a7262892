//! `simulate` command: one full round against bot players.
//!
//! Prints every broadcast line followed by the result. Nothing else goes
//! to stdout, so the transcript can be diffed between seeds and locales.

use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::config::load_or_default;
use crate::driver::{DriverInput, DriverOptions, DriverReport, SessionDriver};
use crate::error::FarthestError;
use crate::game::rules::START_EVENT_ID;
use crate::game::{Actor, Phase, ScriptEvent, Session};
use crate::geometry::Position;
use crate::host::{InMemoryHost, PlayerService};
use crate::observability::StopReason;
use crate::sim::Wanderers;

use super::{open_events, parse_tick};

/// Where the start event is raised.
const ORIGIN: Position = Position::new(0.5, 64.0, 0.5);

/// Flat ground under the whole simulated world.
const GROUND_Y: i32 = 63;

/// Play one round and print the transcript.
///
/// # Errors
///
/// Returns an error if configuration or `--tick` is invalid, or the event
/// log cannot be opened.
pub async fn run(args: &SimulateArgs, cancel: CancellationToken) -> Result<(), FarthestError> {
    if args.players == 0 {
        return Err(FarthestError::Usage(
            "--players must be at least 1".to_string(),
        ));
    }

    let loaded = load_or_default(args.config.as_deref())?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    let mut config = (*loaded.config).clone();
    if let Some(locale) = args.locale {
        config.session.locale = locale;
    }
    let tick_interval = parse_tick(&args.tick)?;
    let events = open_events(args.events_file.as_deref())?;

    let mut host = InMemoryHost::new();
    host.set_default_ground(Some(GROUND_Y));
    let mut wanderers = Wanderers::new(args.seed, args.max_step);
    wanderers.populate(&mut host, args.players, ORIGIN);

    let trigger = host
        .players()
        .first()
        .map(|p| Actor {
            name: p.name.clone(),
            position: ORIGIN,
        })
        .ok_or_else(|| FarthestError::Usage("no simulated players".to_string()))?;

    let session = Session::new(host, config.messages());
    let options = DriverOptions {
        tick_interval,
        exit_after_round: true,
        host_label: "memory".to_string(),
    };

    // The sender stays alive for the whole run; closing it would stop the
    // driver before the round finishes.
    let (input_tx, input_rx) = mpsc::channel(1);
    input_tx
        .send(DriverInput::Event(ScriptEvent::from_actor(
            START_EVENT_ID,
            trigger,
        )))
        .await
        .map_err(|e| FarthestError::Usage(format!("driver input closed: {e}")))?;

    info!(
        players = args.players,
        seed = ?args.seed,
        tick = ?tick_interval,
        "simulating round"
    );
    let report = SessionDriver::new(session, options, events, cancel)
        .with_tick_hook(Box::new(move |phase: Phase, host: &mut InMemoryHost| {
            wanderers.step(phase, host);
        }))
        .run(input_rx)
        .await;
    drop(input_tx);

    print_transcript(&report, args.format);
    Ok(())
}

fn print_transcript(report: &DriverReport<InMemoryHost>, format: OutputFormat) {
    let broadcasts = report.session.host().broadcasts();
    let winner = report.summary.last_winner.as_ref();
    let completed = report.stop_reason == StopReason::RoundComplete;

    match format {
        OutputFormat::Human => {
            for line in &broadcasts {
                println!("{line}");
            }
            println!("---");
            match (completed, winner) {
                (false, _) => println!("result: interrupted ({})", report.stop_reason),
                (true, Some(w)) => println!("result: {} with {} blocks", w.name, w.score),
                (true, None) => println!("result: no winner"),
            }
        }
        OutputFormat::Json => {
            let value = json!({
                "stop_reason": report.stop_reason,
                "summary": report.summary,
                "broadcasts": broadcasts,
                "winner": winner,
            });
            println!("{value}");
        }
    }
}
