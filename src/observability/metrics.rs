//! Prometheus-compatible round metrics.
//!
//! All recording functions are no-ops until [`init_metrics`] installs a
//! recorder, so the session driver can call them unconditionally.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::FarthestError;
use crate::game::rules::START_EVENT_ID;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Event ids recorded under their own label. Everything else is bucketed
/// as `"__other__"`; ids come from the game-side script and are unbounded.
const KNOWN_EVENTS: [&str; 1] = [START_EVENT_ID];

/// Maps a script event id onto a bounded label set.
#[must_use]
pub fn sanitize_event_label(id: &str) -> &str {
    if KNOWN_EVENTS.contains(&id) {
        id
    } else {
        "__other__"
    }
}

/// Installs the global metrics recorder.
///
/// With `Some(port)` a Prometheus listener is bound on `127.0.0.1:<port>`;
/// with `None` metrics are recorded but not exposed.
///
/// # Errors
///
/// Returns `FarthestError::Io` if the recorder or listener cannot be
/// installed (e.g. port in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), FarthestError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| FarthestError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!("farthest_rounds_started_total", "Rounds started, restarts included");
    describe_counter!(
        "farthest_rounds_completed_total",
        "Rounds that ran to the end"
    );
    describe_counter!(
        "farthest_triggers_total",
        "Script events received, by event id"
    );
    describe_gauge!(
        "farthest_round_remaining_seconds",
        "Seconds left in the active round"
    );
    describe_gauge!("farthest_participants", "Players present at the last tick");
}

/// Records a round start.
pub fn record_round_started() {
    counter!("farthest_rounds_started_total").increment(1);
}

/// Records a round reaching its end.
pub fn record_round_completed(had_winner: bool) {
    let outcome = if had_winner { "winner" } else { "no_winner" };
    counter!("farthest_rounds_completed_total", "outcome" => outcome).increment(1);
}

/// Records a received script event.
pub fn record_trigger(id: &str, accepted: bool) {
    let label = sanitize_event_label(id);
    let status = if accepted { "accepted" } else { "ignored" };
    counter!(
        "farthest_triggers_total",
        "event" => label.to_owned(),
        "status" => status,
    )
    .increment(1);
}

/// Sets the remaining-seconds gauge.
pub fn set_round_remaining(seconds: u32) {
    gauge!("farthest_round_remaining_seconds").set(f64::from(seconds));
}

/// Sets the participant gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_participants(count: usize) {
    gauge!("farthest_participants").set(count as f64);
}
