//! `run` command: drive a session over the stdio bridge.
//!
//! stdin carries adapter messages in, stdout carries host commands out.
//! The driver stops when stdin closes or on shutdown.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bridge::{BridgeHost, run_reader, run_writer};
use crate::cli::args::RunArgs;
use crate::config::{FarthestConfig, load_or_default};
use crate::driver::{DriverOptions, SessionDriver};
use crate::error::FarthestError;
use crate::game::Session;
use crate::observability::init_metrics;

use super::{open_events, parse_tick};

/// Bound on inbound messages waiting for the driver.
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// Run the session against the stdio bridge until stdin closes or `cancel` fires.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the event log or metrics
/// listener cannot be opened, or the bridge fails.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), FarthestError> {
    let loaded = load_or_default(args.config.as_deref())?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let mut config = FarthestConfig::clone(&*loaded.config);
    if let Some(dimension) = &args.dimension {
        config.session.dimension.clone_from(dimension);
    }
    if let Some(locale) = args.locale {
        config.session.locale = locale;
    }
    let tick_interval = match &args.tick {
        Some(tick) => parse_tick(tick)?,
        None => config.session.tick_interval()?,
    };

    let metrics_port = args.metrics_port.or(config.observability.metrics_port);
    if let Some(port) = metrics_port {
        init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    let events_file = args
        .events_file
        .as_deref()
        .or(config.observability.events_file.as_deref());
    let events = open_events(events_file)?;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let host = BridgeHost::new(config.session.dimension.clone(), outbound_tx);
    let session = Session::new(host, config.messages());

    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let reader_cancel = cancel.child_token();
    let reader = tokio::spawn(run_reader(
        tokio::io::stdin(),
        config.bridge.max_message_size,
        input_tx,
        reader_cancel.clone(),
    ));
    let writer = tokio::spawn(run_writer(tokio::io::stdout(), outbound_rx));

    info!(
        dimension = %config.session.dimension,
        locale = %config.session.locale,
        tick = ?tick_interval,
        "waiting for script events"
    );

    let options = DriverOptions {
        tick_interval,
        exit_after_round: false,
        host_label: "bridge".to_string(),
    };
    let report = SessionDriver::new(session, options, events, cancel)
        .run(input_rx)
        .await;

    // Dropping the session drops the host and its command sender, which
    // lets the writer drain and finish.
    reader_cancel.cancel();
    drop(report.session);

    let written = join(writer).await??;
    let stats = join(reader).await??;
    info!(
        reason = %report.stop_reason,
        summary = %report.summary,
        forwarded = stats.forwarded,
        skipped = stats.skipped,
        written,
        "bridge closed"
    );
    Ok(())
}

async fn join<T>(handle: tokio::task::JoinHandle<T>) -> Result<T, FarthestError> {
    handle
        .await
        .map_err(|e| FarthestError::Io(std::io::Error::other(e.to_string())))
}
