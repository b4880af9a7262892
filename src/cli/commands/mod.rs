//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod run;
pub mod simulate;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::schema::parse_duration;
use crate::config::validation::{MAX_TICK_INTERVAL, MIN_TICK_INTERVAL};
use crate::error::{ConfigError, FarthestError};
use crate::observability::EventEmitter;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), FarthestError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cancel).await,
        Commands::Simulate(args) => simulate::run(&args, cancel).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Parses a `--tick` value and applies the same range as the config file.
fn parse_tick(value: &str) -> Result<Duration, ConfigError> {
    let interval = parse_duration("--tick", value)?;
    if (MIN_TICK_INTERVAL..=MAX_TICK_INTERVAL).contains(&interval) {
        Ok(interval)
    } else {
        Err(ConfigError::InvalidValue {
            field: "--tick".to_string(),
            value: value.to_string(),
            expected: "a duration between 10ms and 60s".to_string(),
        })
    }
}

/// Opens the event log, or a sink when none was requested.
fn open_events(path: Option<&Path>) -> Result<Arc<EventEmitter>, FarthestError> {
    let emitter = match path {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };
    Ok(Arc::new(emitter))
}
