// tests/runtime_ticks.rs

mod common;
use crate::common::{core_with, init_tracing, subtask, FakeSource, LABEL};

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use procwatch::engine::{
    ChangeHub, MonitorEvent, MonitorOptions, Runtime, ViewChange, ViewTopic,
};
use procwatch::errors::MonitorError;
use procwatch::fs::mock::MockFileSystem;
use procwatch::types::LifecycleState;
use procwatch_test_utils::with_timeout;
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

fn fast_options(exit_when_sealed: bool) -> MonitorOptions {
    MonitorOptions {
        poll_interval: Duration::from_millis(10),
        window_lines: 3,
        exit_when_sealed,
    }
}

/// Hub that records every published change.
fn recording_hub() -> (ChangeHub, Arc<Mutex<Vec<ViewChange>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut hub = ChangeHub::new();
    let sink = Arc::clone(&seen);
    hub.subscribe_all(move |change| sink.lock().unwrap().push(change.clone()));
    (hub, seen)
}

fn last_raw_log(seen: &Mutex<Vec<ViewChange>>) -> Option<String> {
    seen.lock().unwrap().iter().rev().find_map(|c| match c {
        ViewChange::RawLog(text) => Some(text.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn ticks_tail_output_until_the_process_is_sealed() -> TestResult {
    init_tracing();

    let source = FakeSource::new();
    source.add_process(11, LABEL, "2024-05-01");
    source.set_state(11, Some(LifecycleState::Running));
    source.set_subtasks(11, vec![subtask(3, "/scratch/3")]);
    let fs = MockFileSystem::new();
    fs.add_file("/scratch/3/aiida.out", "a\n");

    let core = core_with(&source, &fs, fast_options(true));
    let (tx, rx) = mpsc::channel(8);
    tx.send(MonitorEvent::RefreshRequested).await?;
    tx.send(MonitorEvent::SelectionRequested(Some(11))).await?;

    let (hub, seen) = recording_hub();
    let handle = tokio::spawn(Runtime::new(core, rx, hub).run());

    with_timeout(async {
        while last_raw_log(&seen).as_deref() != Some("a") {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    fs.append_file("/scratch/3/aiida.out", "b\n");
    source.seal(11, LifecycleState::Finished);

    with_timeout(handle).await??;
    drop(tx);

    assert_eq!(last_raw_log(&seen).as_deref(), Some("a\nb"));

    let seen = seen.lock().unwrap();
    // Options first, then the selection; both before any tick output.
    let topics: Vec<ViewTopic> = seen.iter().map(ViewChange::topic).collect();
    assert_eq!(topics[0], ViewTopic::Options);
    assert_eq!(topics[1], ViewTopic::Selection);
    assert!(seen.contains(&ViewChange::Selection(Some(11))));
    let final_progress = seen.iter().rev().find_map(|c| match c {
        ViewChange::Progress(view) => Some(view.label.clone()),
        _ => None,
    });
    assert_eq!(final_progress.as_deref(), Some("Finished"));
    Ok(())
}

#[tokio::test]
async fn closing_the_event_channel_stops_the_runtime() -> TestResult {
    init_tracing();

    let source = FakeSource::new();
    let fs = MockFileSystem::new();
    let core = core_with(&source, &fs, fast_options(false));
    let (tx, rx) = mpsc::channel(1);
    drop(tx);

    with_timeout(Runtime::new(core, rx, ChangeHub::new()).run()).await?;
    Ok(())
}

#[tokio::test]
async fn shutdown_event_stops_the_runtime() -> TestResult {
    init_tracing();

    let source = FakeSource::new();
    let fs = MockFileSystem::new();
    let core = core_with(&source, &fs, fast_options(false));
    let (tx, rx) = mpsc::channel(1);
    tx.send(MonitorEvent::ShutdownRequested).await?;

    let (hub, seen) = recording_hub();
    with_timeout(Runtime::new(core, rx, hub).run()).await?;

    assert!(seen.lock().unwrap().is_empty());
    drop(tx);
    Ok(())
}

#[tokio::test]
async fn failing_step_ends_the_runtime_with_the_error() {
    init_tracing();

    let source = FakeSource::new();
    let fs = MockFileSystem::new();
    let core = core_with(&source, &fs, fast_options(false));
    let (tx, rx) = mpsc::channel(1);
    tx.send(MonitorEvent::SelectionRequested(Some(404)))
        .await
        .expect("channel open");

    let result = with_timeout(Runtime::new(core, rx, ChangeHub::new()).run()).await;
    assert!(matches!(result, Err(MonitorError::ProcessNotFound(404))));
    drop(tx);
}
