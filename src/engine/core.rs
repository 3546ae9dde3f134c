// src/engine/core.rs

//! Pure core monitor state machine.
//!
//! [`CoreMonitor`] consumes [`MonitorEvent`]s and returns a [`CoreStep`]:
//! the coalesced view changes for that event and whether to keep running.
//! It performs IO only through the injected [`ProcessSource`] and
//! [`FileSystem`]; there are no channels or timers here, so it can be driven
//! step by step in tests.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::monitor::{ProgressView, WatchSession};
use crate::process::ProcessSource;
use crate::selector::{ProcessSelector, SelectionOutcome};
use crate::types::Pk;

use super::observe::{ChangeBatch, ViewChange};
use super::{MonitorEvent, MonitorOptions};

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    /// At most one change per topic.
    pub changes: ChangeBatch,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(changes: ChangeBatch) -> Self {
        Self {
            changes,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct CoreMonitor {
    selector: ProcessSelector,
    source: Arc<dyn ProcessSource>,
    fs: Arc<dyn FileSystem>,
    options: MonitorOptions,
    session: Option<WatchSession>,
}

impl CoreMonitor {
    pub fn new(
        selector: ProcessSelector,
        source: Arc<dyn ProcessSource>,
        fs: Arc<dyn FileSystem>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            selector,
            source,
            fs,
            options,
            session: None,
        }
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    pub fn selector(&self) -> &ProcessSelector {
        &self.selector
    }

    /// The session for the watched process, if any.
    pub fn session(&self) -> Option<&WatchSession> {
        self.session.as_ref()
    }

    pub fn watched(&self) -> Option<Pk> {
        self.session.as_ref().map(WatchSession::pk)
    }

    /// Handle one event.
    pub fn step(&mut self, event: MonitorEvent) -> Result<CoreStep> {
        match event {
            MonitorEvent::PollTick => self.handle_tick(),
            MonitorEvent::ProcessChanged => self.handle_process_changed(),
            MonitorEvent::SelectionRequested(pk) => self.handle_selection(pk),
            MonitorEvent::RefreshRequested => self.handle_refresh(),
            MonitorEvent::ShutdownRequested => Ok(CoreStep::default()),
        }
    }

    fn handle_tick(&mut self) -> Result<CoreStep> {
        let Some(session) = self.session.as_mut() else {
            return Ok(CoreStep::running(ChangeBatch::new()));
        };

        let tick = session.tick(self.source.as_ref())?;
        let mut changes = ChangeBatch::new();

        if let Some(progress) = tick.progress {
            changes.push(ViewChange::Progress(progress));
        }
        if !tick.new_lines.is_empty() {
            changes.push(ViewChange::LogWindow(session.buffer().rendered_window()));
            changes.push(ViewChange::RawLog(session.buffer().raw_text()));
            let history = session.buffer().full_history();
            let appended = history[history.len() - tick.new_lines.len()..].to_vec();
            changes.push(ViewChange::LogAppend(appended));
        }

        let keep_running = !(tick.finished && self.options.exit_when_sealed);
        if !keep_running {
            info!(pk = session.pk(), "watched process sealed; exiting");
        }

        Ok(CoreStep {
            changes,
            keep_running,
        })
    }

    fn handle_process_changed(&mut self) -> Result<CoreStep> {
        let mut changes = ChangeBatch::new();
        if let Some(session) = self.session.as_mut() {
            let snapshot = self.source.snapshot(session.pk())?;
            if let Some(progress) = session.observe(snapshot) {
                changes.push(ViewChange::Progress(progress));
            }
        }
        Ok(CoreStep::running(changes))
    }

    fn handle_refresh(&mut self) -> Result<CoreStep> {
        let options = self.selector.refresh()?.to_vec();
        let mut changes = ChangeBatch::new();
        changes.push(ViewChange::Options(options));
        Ok(CoreStep::running(changes))
    }

    fn handle_selection(&mut self, requested: Option<Pk>) -> Result<CoreStep> {
        let (previous, current, refreshed) = match self.selector.resolve_selection(requested)? {
            SelectionOutcome::Unchanged => return Ok(CoreStep::running(ChangeBatch::new())),
            SelectionOutcome::Changed {
                previous,
                current,
                refreshed,
            } => (previous, current, refreshed),
        };

        let watch_changes = match self.watch(current) {
            Ok(changes) => changes,
            Err(err) => {
                // Selection and session must keep pointing at the same process.
                self.selector.restore_selection(previous);
                return Err(err);
            }
        };

        let mut changes = ChangeBatch::new();
        if refreshed {
            changes.push(ViewChange::Options(self.selector.options().to_vec()));
        }
        changes.push(ViewChange::Selection(current));
        changes.extend(watch_changes);

        Ok(CoreStep::running(changes))
    }

    /// Replace the watch session. All tailer and buffer state of the
    /// previous process is dropped, but only once the new process could be
    /// snapshotted.
    fn watch(&mut self, pk: Option<Pk>) -> Result<ChangeBatch> {
        let snapshot = pk.map(|pk| self.source.snapshot(pk)).transpose()?;

        if let Some(old) = self.session.take() {
            debug!(pk = old.pk(), lines = old.buffer().len(), "discarding watch session");
        }

        let mut changes = ChangeBatch::new();
        let (Some(pk), Some(snapshot)) = (pk, snapshot) else {
            changes.push(ViewChange::Process {
                pk: None,
                description: String::new(),
            });
            changes.push(ViewChange::Progress(ProgressView::idle()));
            changes.extend(empty_log_changes(self.options.window_lines));
            return Ok(changes);
        };

        let mut session = WatchSession::new(pk, Arc::clone(&self.fs), self.options.window_lines);
        let description = snapshot.to_string();
        session.observe(snapshot);
        info!(pk, %description, "watching process");

        changes.push(ViewChange::Process {
            pk: Some(pk),
            description,
        });
        changes.push(ViewChange::Progress(session.progress().clone()));
        changes.push(ViewChange::LogWindow(session.buffer().rendered_window()));
        changes.push(ViewChange::RawLog(session.buffer().raw_text()));

        self.session = Some(session);
        Ok(changes)
    }
}

fn empty_log_changes(window_lines: usize) -> [ViewChange; 2] {
    let empty = crate::monitor::LogBuffer::new(window_lines);
    [
        ViewChange::LogWindow(empty.rendered_window()),
        ViewChange::RawLog(empty.raw_text()),
    ]
}
