use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use procwatch::errors::{MonitorError, Result};
use procwatch::process::{ProcessSnapshot, ProcessSource, SubTask};
use procwatch::selector::{CandidateQuery, CandidateRow};
use procwatch::types::{LifecycleState, Pk};

#[derive(Debug, Clone)]
struct FakeProcess {
    label: String,
    ctime: String,
    state: Option<LifecycleState>,
    sealed: bool,
    formula: Option<String>,
    subtasks: Vec<SubTask>,
}

/// In-memory orchestrator: a [`ProcessSource`] and [`CandidateQuery`] whose
/// processes tests mutate between ticks.
///
/// Clones share state, so a test can keep one handle while the monitor owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    processes: Arc<Mutex<BTreeMap<Pk, FakeProcess>>>,
    queries: Arc<AtomicUsize>,
    snapshots: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process with the given label and creation time, state
    /// `created`, a formula, and no sub-tasks.
    pub fn add_process(&self, pk: Pk, label: &str, ctime: &str) -> &Self {
        self.processes.lock().unwrap().insert(
            pk,
            FakeProcess {
                label: label.to_string(),
                ctime: ctime.to_string(),
                state: Some(LifecycleState::Created),
                sealed: false,
                formula: Some(format!("Formula{pk}")),
                subtasks: Vec::new(),
            },
        );
        self
    }

    pub fn remove_process(&self, pk: Pk) {
        self.processes.lock().unwrap().remove(&pk);
    }

    fn update(&self, pk: Pk, f: impl FnOnce(&mut FakeProcess)) {
        let mut guard = self.processes.lock().unwrap();
        let process = guard
            .get_mut(&pk)
            .unwrap_or_else(|| panic!("fake process {pk} not registered"));
        f(process);
    }

    pub fn set_state(&self, pk: Pk, state: Option<LifecycleState>) {
        self.update(pk, |p| p.state = state);
    }

    /// Mark sealed and clear the active sub-tasks, as an orchestrator does
    /// when a process terminates.
    pub fn seal(&self, pk: Pk, state: LifecycleState) {
        self.update(pk, |p| {
            p.sealed = true;
            p.state = Some(state);
            p.subtasks.clear();
        });
    }

    pub fn clear_formula(&self, pk: Pk) {
        self.update(pk, |p| p.formula = None);
    }

    /// Replace the active sub-tasks of `pk`.
    pub fn set_subtasks(&self, pk: Pk, subtasks: Vec<SubTask>) {
        self.update(pk, |p| p.subtasks = subtasks);
    }

    /// Number of `CandidateQuery::query` calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of `ProcessSource::snapshot` calls so far.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

/// A sub-task writing `<dir>/aiida.out`.
pub fn subtask(id: u64, dir: &str) -> SubTask {
    SubTask {
        id,
        remote_workdir: Some(PathBuf::from(dir)),
        output_filename: Some("aiida.out".to_string()),
    }
}

impl ProcessSource for FakeSource {
    fn snapshot(&self, pk: Pk) -> Result<ProcessSnapshot> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        let guard = self.processes.lock().unwrap();
        let p = guard.get(&pk).ok_or(MonitorError::ProcessNotFound(pk))?;
        Ok(ProcessSnapshot {
            pk,
            label: Some(p.label.clone()),
            sealed: p.sealed,
            state: p.state,
        })
    }

    fn active_subtasks(&self, pk: Pk) -> Result<Vec<SubTask>> {
        let guard = self.processes.lock().unwrap();
        let p = guard.get(&pk).ok_or(MonitorError::ProcessNotFound(pk))?;
        Ok(p.subtasks.clone())
    }
}

impl CandidateQuery for FakeSource {
    fn query(&self, process_label: &str) -> Result<Vec<CandidateRow>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let guard = self.processes.lock().unwrap();
        let mut rows: Vec<CandidateRow> = guard
            .iter()
            .filter(|(_, p)| p.label == process_label)
            .map(|(pk, p)| CandidateRow {
                pk: *pk,
                ctime: p.ctime.clone(),
                state: p.state.map(|s| s.to_string()).unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| b.ctime.cmp(&a.ctime).then(b.pk.cmp(&a.pk)));
        Ok(rows)
    }

    fn formula(&self, pk: Pk) -> Result<String> {
        let guard = self.processes.lock().unwrap();
        let p = guard.get(&pk).ok_or(MonitorError::ProcessNotFound(pk))?;
        p.formula.clone().ok_or_else(|| MonitorError::DataIntegrity {
            pk,
            reason: "no formula".to_string(),
        })
    }
}
