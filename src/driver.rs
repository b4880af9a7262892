//! Session driver.
//!
//! Owns the [`Session`] and is the only thing that mutates it. One task
//! `select!`s over cancellation, the tick interval, and the input channel,
//! so session calls never overlap and the session needs no lock.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::game::{Phase, ScriptEvent, Session, SessionEvent, TriggerOutcome, dispatch};
use crate::host::{Host, HostUpdate};
use crate::observability::events::{Event, EventEmitter, RunSummary, StopReason};
use crate::observability::metrics;

/// Anything the driver can receive between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverInput {
    /// Script event from the game side
    Event(ScriptEvent),
    /// Host state push
    Host(HostUpdate),
}

/// Driver settings.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Length of one game second
    pub tick_interval: Duration,
    /// Stop once a round has ended
    pub exit_after_round: bool,
    /// Host kind reported in events
    pub host_label: String,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            exit_after_round: false,
            host_label: "memory".to_string(),
        }
    }
}

/// Called before every tick with the current phase and the host.
pub type TickHook<H> = Box<dyn FnMut(Phase, &mut H) + Send>;

/// What the driver hands back when it stops.
pub struct DriverReport<H: Host> {
    /// The session, with its host
    pub session: Session<H>,
    /// Totals
    pub summary: RunSummary,
    /// Why the loop exited
    pub stop_reason: StopReason,
}

impl<H: Host> fmt::Debug for DriverReport<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverReport")
            .field("summary", &self.summary)
            .field("stop_reason", &self.stop_reason)
            .finish_non_exhaustive()
    }
}

/// Runs one session against a tick clock and an input channel.
pub struct SessionDriver<H: Host> {
    session: Session<H>,
    options: DriverOptions,
    events: Arc<EventEmitter>,
    cancel: CancellationToken,
    tick_hook: Option<TickHook<H>>,
    summary: RunSummary,
}

impl<H: Host> SessionDriver<H> {
    /// Creates a driver.
    #[must_use]
    pub fn new(
        session: Session<H>,
        options: DriverOptions,
        events: Arc<EventEmitter>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            options,
            events,
            cancel,
            tick_hook: None,
            summary: RunSummary {
                ticks: 0,
                rounds_started: 0,
                rounds_completed: 0,
                last_winner: None,
            },
        }
    }

    /// Installs a hook that runs before every tick.
    #[must_use]
    pub fn with_tick_hook(mut self, hook: TickHook<H>) -> Self {
        self.tick_hook = Some(hook);
        self
    }

    /// Drives the session until cancelled, the input closes, or (with
    /// `exit_after_round`) a round ends.
    pub async fn run(mut self, mut input: mpsc::Receiver<DriverInput>) -> DriverReport<H> {
        let tick_interval_ms =
            u64::try_from(self.options.tick_interval.as_millis()).unwrap_or(u64::MAX);
        self.events.emit(Event::DriverStarted {
            timestamp: Utc::now(),
            host: self.options.host_label.clone(),
            tick_interval_ms,
        });
        info!(
            host = %self.options.host_label,
            tick_interval_ms,
            "session driver started"
        );

        let mut interval = tokio::time::interval(self.options.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        let stop_reason = loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("session driver cancelled");
                    break StopReason::Cancelled;
                }
                _ = interval.tick() => {
                    if self.on_tick() {
                        break StopReason::RoundComplete;
                    }
                }
                received = input.recv() => {
                    let Some(received) = received else {
                        debug!("input channel closed");
                        break StopReason::InputClosed;
                    };
                    let started_before = self.summary.rounds_started;
                    if self.on_input(received) {
                        break StopReason::RoundComplete;
                    }
                    if self.summary.rounds_started > started_before {
                        // First countdown step lands a full tick after the start
                        interval.reset();
                    }
                }
            }
        };

        info!(reason = %stop_reason, summary = %self.summary, "session driver stopped");
        self.events.emit(Event::DriverStopped {
            timestamp: Utc::now(),
            reason: stop_reason,
            summary: Some(self.summary.clone()),
        });
        self.events.flush();

        DriverReport {
            session: self.session,
            summary: self.summary,
            stop_reason,
        }
    }

    /// Returns `true` when the driver should stop.
    fn on_tick(&mut self) -> bool {
        if let Some(hook) = self.tick_hook.as_mut() {
            hook(self.session.phase(), self.session.host_mut());
        }
        self.summary.ticks += 1;
        let events = self.session.tick();
        self.record(events)
    }

    /// Returns `true` when the driver should stop.
    fn on_input(&mut self, input: DriverInput) -> bool {
        match input {
            DriverInput::Event(event) => {
                let outcome = dispatch(&mut self.session, &event);
                let (accepted, ignored) = match &outcome {
                    TriggerOutcome::Started(_) => (true, None),
                    TriggerOutcome::Ignored(reason) => (false, Some(reason.to_string())),
                };
                metrics::record_trigger(&event.id, accepted);
                self.events.emit(Event::TriggerReceived {
                    timestamp: Utc::now(),
                    id: event.id.clone(),
                    accepted,
                    ignored,
                });
                match outcome {
                    TriggerOutcome::Started(events) => self.record(events),
                    TriggerOutcome::Ignored(_) => false,
                }
            }
            DriverInput::Host(update) => {
                trace!(?update, "host update");
                self.session.host_mut().apply(update);
                false
            }
        }
    }

    /// Turns session events into metrics and structured events. Returns
    /// `true` when a round ended and the driver should stop.
    fn record(&mut self, events: Vec<SessionEvent>) -> bool {
        let mut stop = false;
        for event in events {
            match event {
                SessionEvent::CountdownStarted {
                    round,
                    origin,
                    spawn,
                    participants,
                } => {
                    self.summary.rounds_started += 1;
                    metrics::record_round_started();
                    metrics::set_participants(participants);
                    self.events.emit(Event::RoundStarted {
                        timestamp: Utc::now(),
                        round,
                        origin,
                        spawn,
                        participants,
                    });
                }
                SessionEvent::Countdown { remaining } => {
                    debug!(remaining, "countdown");
                }
                SessionEvent::RoundActive { round } => {
                    metrics::set_round_remaining(self.session.round_remaining());
                    self.events.emit(Event::RoundActive {
                        timestamp: Utc::now(),
                        round,
                    });
                }
                SessionEvent::RoundTick {
                    remaining,
                    participants,
                } => {
                    trace!(remaining, participants, "round tick");
                    metrics::set_round_remaining(remaining);
                    metrics::set_participants(participants);
                }
                SessionEvent::ScoreboardHidden { round, remaining } => {
                    self.events.emit(Event::ScoreboardHidden {
                        timestamp: Utc::now(),
                        round,
                        remaining,
                    });
                }
                SessionEvent::RoundEnded { round, winner } => {
                    self.summary.rounds_completed += 1;
                    metrics::record_round_completed(winner.is_some());
                    metrics::set_round_remaining(0);
                    self.summary.last_winner.clone_from(&winner);
                    self.events.emit(Event::RoundEnded {
                        timestamp: Utc::now(),
                        round,
                        winner,
                    });
                    stop = stop || self.options.exit_after_round;
                }
            }
        }
        stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Actor, Messages};
    use crate::geometry::Position;
    use crate::host::InMemoryHost;

    fn driver(options: DriverOptions) -> (SessionDriver<InMemoryHost>, CancellationToken) {
        let cancel = CancellationToken::new();
        let session = Session::new(InMemoryHost::new(), Messages::default());
        let driver = SessionDriver::new(
            session,
            options,
            Arc::new(EventEmitter::noop()),
            cancel.clone(),
        );
        (driver, cancel)
    }

    fn start_event() -> DriverInput {
        DriverInput::Event(ScriptEvent::from_actor(
            "game:start",
            Actor {
                name: "Alex".to_string(),
                position: Position::new(0.0, 64.0, 0.0),
            },
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_input_closes() {
        let (driver, _cancel) = driver(DriverOptions::default());
        let (tx, rx) = mpsc::channel(4);
        drop(tx);
        let report = driver.run(rx).await;
        assert_eq!(report.stop_reason, StopReason::InputClosed);
        assert_eq!(report.summary.rounds_started, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_cancelled() {
        let (driver, cancel) = driver(DriverOptions::default());
        let (_tx, rx) = mpsc::channel(4);
        cancel.cancel();
        let report = driver.run(rx).await;
        assert_eq!(report.stop_reason, StopReason::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_one_full_round() {
        let (driver, _cancel) = driver(DriverOptions {
            exit_after_round: true,
            ..DriverOptions::default()
        });
        let (tx, rx) = mpsc::channel(4);
        tx.send(start_event()).await.unwrap();

        let report = driver.run(rx).await;
        assert_eq!(report.stop_reason, StopReason::RoundComplete);
        assert_eq!(report.summary.rounds_started, 1);
        assert_eq!(report.summary.rounds_completed, 1);
        assert_eq!(report.summary.ticks, 310);
        assert_eq!(report.session.phase(), Phase::Ended);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_waits_a_full_tick_after_start() {
        let (driver, _cancel) = driver(DriverOptions {
            exit_after_round: true,
            ..DriverOptions::default()
        });
        let countdown_ticks = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = Arc::clone(&countdown_ticks);
        let driver = driver.with_tick_hook(Box::new(move |phase: Phase, _: &mut InMemoryHost| {
            if phase == Phase::CountingDown {
                recorded.lock().unwrap().push(tokio::time::Instant::now());
            }
        }));
        let (tx, rx) = mpsc::channel(4);
        let sender = tx.clone();

        let (report, started_at) = tokio::join!(driver.run(rx), async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let started_at = tokio::time::Instant::now();
            sender.send(start_event()).await.unwrap();
            started_at
        });

        assert_eq!(report.stop_reason, StopReason::RoundComplete);
        let ticks = countdown_ticks.lock().unwrap();
        assert_eq!(ticks.len(), 10);
        assert!(ticks[0] >= started_at + Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_hook_sees_each_tick() {
        let (driver, _cancel) = driver(DriverOptions {
            exit_after_round: true,
            ..DriverOptions::default()
        });
        let seen = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let counter = Arc::clone(&seen);
        let driver = driver.with_tick_hook(Box::new(move |_: Phase, _: &mut InMemoryHost| {
            counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }));
        let (tx, rx) = mpsc::channel(4);
        tx.send(start_event()).await.unwrap();

        let report = driver.run(rx).await;
        assert_eq!(
            seen.load(std::sync::atomic::Ordering::Relaxed),
            report.summary.ticks
        );
    }
}
