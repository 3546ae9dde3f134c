// src/monitor/session.rs

//! Everything the monitor keeps about the one process it is watching.

use std::sync::Arc;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::process::{ProcessSnapshot, ProcessSource};
use crate::types::Pk;

use super::buffer::LogBuffer;
use super::classify::{classify, state_label, ProgressState};
use super::tailer::LogTailer;

/// Progress bar contents: ordinal + severity + label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub progress: ProgressState,
    pub label: String,
}

impl ProgressView {
    pub fn from_snapshot(snapshot: Option<&ProcessSnapshot>) -> Self {
        let state = snapshot.and_then(|s| s.state);
        Self {
            progress: classify(state),
            label: state_label(state),
        }
    }

    /// What the bar shows when nothing is being watched.
    pub fn idle() -> Self {
        Self::from_snapshot(None)
    }
}

/// Result of one tick against the watched process.
#[derive(Debug, Default)]
pub struct SessionTick {
    /// Set when the progress view differs from the previous tick.
    pub progress: Option<ProgressView>,
    pub new_lines: Vec<String>,
    /// The tailer stopped during this tick.
    pub finished: bool,
}

/// Tailer + buffer + last observed progress for a single process.
///
/// Switching to another process means building a new session; nothing is
/// carried over.
#[derive(Debug)]
pub struct WatchSession {
    pk: Pk,
    tailer: LogTailer,
    buffer: LogBuffer,
    snapshot: Option<ProcessSnapshot>,
    progress: ProgressView,
}

impl WatchSession {
    pub fn new(pk: Pk, fs: Arc<dyn FileSystem>, window_lines: usize) -> Self {
        Self {
            pk,
            tailer: LogTailer::new(fs),
            buffer: LogBuffer::new(window_lines),
            snapshot: None,
            progress: ProgressView::idle(),
        }
    }

    pub fn pk(&self) -> Pk {
        self.pk
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn tailer(&self) -> &LogTailer {
        &self.tailer
    }

    pub fn snapshot(&self) -> Option<&ProcessSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn progress(&self) -> &ProgressView {
        &self.progress
    }

    /// Re-classify from a fresh snapshot. Returns the new view if it changed.
    pub fn observe(&mut self, snapshot: ProcessSnapshot) -> Option<ProgressView> {
        let view = ProgressView::from_snapshot(Some(&snapshot));
        self.snapshot = Some(snapshot);
        if view != self.progress {
            self.progress = view.clone();
            Some(view)
        } else {
            None
        }
    }

    /// Snapshot once, then feed the same snapshot to the classifier and the
    /// tailer.
    pub fn tick(&mut self, source: &dyn ProcessSource) -> Result<SessionTick> {
        let was_finished = self.tailer.is_finished();
        let snapshot = source.snapshot(self.pk)?;
        let new_lines = self.tailer.poll(source, &snapshot)?;
        let progress = self.observe(snapshot);

        self.buffer.extend(&new_lines);

        Ok(SessionTick {
            progress,
            new_lines,
            finished: !was_finished && self.tailer.is_finished(),
        })
    }
}
