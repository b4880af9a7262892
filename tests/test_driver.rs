mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{session_with, start_event};
use farthest::driver::{DriverInput, DriverOptions, SessionDriver};
use farthest::game::Phase;
use farthest::host::HostUpdate;
use farthest::observability::{EventEmitter, StopReason};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn events(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

fn options() -> DriverOptions {
    DriverOptions {
        tick_interval: Duration::from_secs(1),
        exit_after_round: true,
        host_label: "memory".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn restart_over_the_channel_counts_two_starts_one_finish() {
    let (session, _) = session_with(&["Alex", "Steve"]);
    let capture = Capture::default();
    let events = Arc::new(EventEmitter::new(Box::new(capture.clone())));
    let (tx, rx) = mpsc::channel(8);
    tx.send(DriverInput::Event(start_event("Alex"))).await.unwrap();

    let driver = SessionDriver::new(session, options(), events, CancellationToken::new());
    let handle = tokio::spawn(driver.run(rx));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    tx.send(DriverInput::Event(start_event("Steve"))).await.unwrap();

    let report = handle.await.unwrap();
    assert_eq!(report.stop_reason, StopReason::RoundComplete);
    assert_eq!(report.summary.rounds_started, 2);
    assert_eq!(report.summary.rounds_completed, 1);
    assert_eq!(report.session.round(), 2);
    assert_eq!(report.session.phase(), Phase::Ended);

    let types: Vec<String> = capture
        .events()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types.first().map(String::as_str), Some("DriverStarted"));
    assert_eq!(types.last().map(String::as_str), Some("DriverStopped"));
    assert_eq!(types.iter().filter(|t| *t == "RoundStarted").count(), 2);
    assert_eq!(types.iter().filter(|t| *t == "TriggerReceived").count(), 2);
    assert_eq!(types.iter().filter(|t| *t == "RoundEnded").count(), 1);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn sequence_numbers_are_contiguous() {
    let (session, _) = session_with(&["Alex"]);
    let capture = Capture::default();
    let events = Arc::new(EventEmitter::new(Box::new(capture.clone())));
    let (tx, rx) = mpsc::channel(8);
    tx.send(DriverInput::Event(start_event("Alex"))).await.unwrap();

    let report = SessionDriver::new(session, options(), events, CancellationToken::new())
        .run(rx)
        .await;
    assert_eq!(report.summary.ticks, 310);

    let sequences: Vec<u64> = capture
        .events()
        .iter()
        .map(|e| e["sequence"].as_u64().unwrap())
        .collect();
    let expected: Vec<u64> = (0..sequences.len() as u64).collect();
    assert_eq!(sequences, expected);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn ignored_events_do_not_start_rounds() {
    let (session, _) = session_with(&["Alex"]);
    let capture = Capture::default();
    let events = Arc::new(EventEmitter::new(Box::new(capture.clone())));
    let (tx, rx) = mpsc::channel(8);

    let mut unknown = start_event("Alex");
    unknown.id = "game:other".to_string();
    let mut sourceless = start_event("Alex");
    sourceless.source = None;
    tx.send(DriverInput::Event(unknown)).await.unwrap();
    tx.send(DriverInput::Event(sourceless)).await.unwrap();
    drop(tx);

    let report = SessionDriver::new(session, options(), events, CancellationToken::new())
        .run(rx)
        .await;
    assert_eq!(report.stop_reason, StopReason::InputClosed);
    assert_eq!(report.summary.rounds_started, 0);
    assert_eq!(
        report.session.host().broadcasts(),
        vec!["received: game:other", "received: game:start"]
    );

    let triggers: Vec<Value> = capture
        .events()
        .into_iter()
        .filter(|e| e["type"] == "TriggerReceived")
        .collect();
    assert_eq!(triggers.len(), 2);
    assert!(triggers.iter().all(|e| e["accepted"] == false));
}

#[tokio::test(start_paused = true)]
async fn host_updates_reach_the_host() {
    let (session, ids) = session_with(&["Alex"]);
    let (tx, rx) = mpsc::channel(8);
    tx.send(DriverInput::Host(HostUpdate::Ground { x: 0, z: 0, y: 60 }))
        .await
        .unwrap();
    tx.send(DriverInput::Event(start_event("Alex"))).await.unwrap();
    drop(tx);

    let report = SessionDriver::new(
        session,
        options(),
        Arc::new(EventEmitter::noop()),
        CancellationToken::new(),
    )
    .run(rx)
    .await;

    // The reported column beats the flat default ground at 63.
    let player = report.session.host().player(&ids[0]).unwrap();
    assert_eq!(player.info.position.y, 61.0);
    assert_eq!(report.stop_reason, StopReason::InputClosed);
}
