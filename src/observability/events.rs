//! Structured event stream.
//!
//! Round lifecycle events serialized as newline-delimited JSON, each with
//! a monotonically increasing sequence number. Consumers dispatch on the
//! `type` field.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::Winner;
use crate::geometry::Position;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Why the session driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Shutdown was requested (signal or caller).
    Cancelled,
    /// The input channel closed; the host went away.
    InputClosed,
    /// A round ended and the driver was asked to stop after one.
    RoundComplete,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::InputClosed => write!(f, "input_closed"),
            Self::RoundComplete => write!(f, "round_complete"),
        }
    }
}

/// Totals reported when the driver stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Clock ticks processed.
    pub ticks: u64,
    /// Rounds started, restarts included.
    pub rounds_started: u64,
    /// Rounds that ran to the end.
    pub rounds_completed: u64,
    /// Winner of the most recently completed round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_winner: Option<Winner>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ticks={} started={} completed={}",
            self.ticks, self.rounds_started, self.rounds_completed,
        )?;
        if let Some(winner) = &self.last_winner {
            write!(f, " winner={}({})", winner.name, winner.score)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted while a session is being driven.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The driver is running and accepting input.
    DriverStarted {
        /// When the driver started.
        timestamp: DateTime<Utc>,
        /// Host kind (`"bridge"`, `"memory"`).
        host: String,
        /// Tick period in milliseconds.
        tick_interval_ms: u64,
    },

    /// The driver has stopped.
    DriverStopped {
        /// When the driver stopped.
        timestamp: DateTime<Utc>,
        /// Why it stopped.
        reason: StopReason,
        /// Run totals.
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<RunSummary>,
    },

    /// A script event arrived.
    TriggerReceived {
        /// When it arrived.
        timestamp: DateTime<Utc>,
        /// Script event id.
        id: String,
        /// Whether it started a round.
        accepted: bool,
        /// Why it was ignored.
        #[serde(skip_serializing_if = "Option::is_none")]
        ignored: Option<String>,
    },

    /// A round began its countdown.
    RoundStarted {
        /// When the round started.
        timestamp: DateTime<Utc>,
        /// Round number.
        round: u64,
        /// Start point.
        origin: Position,
        /// Where players were placed.
        spawn: Position,
        /// Players present.
        participants: usize,
    },

    /// The cage opened.
    RoundActive {
        /// When play began.
        timestamp: DateTime<Utc>,
        /// Round number.
        round: u64,
    },

    /// The sidebar was hidden for the last minute.
    ScoreboardHidden {
        /// When it was hidden.
        timestamp: DateTime<Utc>,
        /// Round number.
        round: u64,
        /// Seconds left.
        remaining: u32,
    },

    /// A round was resolved.
    RoundEnded {
        /// When it ended.
        timestamp: DateTime<Utc>,
        /// Round number.
        round: u64,
        /// Highest scorer, if anyone scored.
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Winner>,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each [`emit`](Self::emit) takes the next sequence number, writes one
/// line, and flushes. Serialization and I/O failures are dropped.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    ///
    /// Only for `simulate`; `run` uses stdout for host commands.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope { sequence, event };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Flushes the underlying writer.
    pub fn flush(&self) {
        if let Ok(mut w) = self.writer.lock() {
            let _ = w.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn round_ended_serializes_winner() {
        let event = Event::RoundEnded {
            timestamp: Utc::now(),
            round: 3,
            winner: Some(Winner {
                name: "Alex".to_owned(),
                score: 41,
            }),
        };
        let parsed = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed["type"], "RoundEnded");
        assert_eq!(parsed["round"], 3);
        assert_eq!(parsed["winner"]["name"], "Alex");
        assert_eq!(parsed["winner"]["score"], 41);
    }

    #[test]
    fn round_ended_without_winner_omits_field() {
        let event = Event::RoundEnded {
            timestamp: Utc::now(),
            round: 1,
            winner: None,
        };
        let parsed = serde_json::to_value(&event).unwrap();
        assert!(parsed.get("winner").is_none());
    }

    #[test]
    fn emitter_sequences_flat_lines() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::RoundActive {
            timestamp: Utc::now(),
            round: 1,
        });
        emitter.emit(Event::DriverStopped {
            timestamp: Utc::now(),
            reason: StopReason::InputClosed,
            summary: None,
        });

        assert_eq!(emitter.event_count(), 2);
        let lines = tw.lines();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "RoundActive");
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["reason"], "input_closed");
        assert!(lines[1].get("event").is_none());
    }

    #[test]
    fn round_started_carries_positions() {
        let event = Event::RoundStarted {
            timestamp: Utc::now(),
            round: 1,
            origin: Position::new(1.0, 64.0, 2.0),
            spawn: Position::new(1.0, 65.0, 2.0),
            participants: 2,
        };
        let parsed = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed["spawn"]["y"], 65.0);
        assert_eq!(parsed["participants"], 2);
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            ticks: 310,
            rounds_started: 1,
            rounds_completed: 1,
            last_winner: Some(Winner {
                name: "B".to_owned(),
                score: 34,
            }),
        };
        assert_eq!(
            summary.to_string(),
            "ticks=310 started=1 completed=1 winner=B(34)"
        );
    }
}
