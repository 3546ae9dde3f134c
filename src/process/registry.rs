// src/process/registry.rs

//! File-backed process source.
//!
//! The orchestrator (or a small exporter next to it) keeps a TOML file
//! describing the processes it manages. The registry re-reads that file on
//! every call, so each snapshot reflects whatever the orchestrator last
//! wrote.
//!
//! ```toml
//! [[process]]
//! pk = 12
//! label = "PwBandsWorkChain"
//! ctime = "2026-10-01 10:00"
//! state = "running"
//! sealed = false
//! formula = "Si2"
//!
//! [[process.subtask]]
//! id = 101
//! remote_workdir = "/scratch/run-101"
//! output_filename = "aiida.out"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::trace;

use crate::errors::{MonitorError, Result};
use crate::fs::FileSystem;
use crate::selector::{CandidateQuery, CandidateRow};
use crate::types::{LifecycleState, Pk};

use super::{ProcessSnapshot, ProcessSource, SubTask};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegistryFile {
    #[serde(default)]
    pub process: Vec<ProcessEntry>,
}

/// One `[[process]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessEntry {
    pub pk: Pk,

    #[serde(default)]
    pub label: Option<String>,

    /// Creation time as written by the exporter. Candidates are ordered by
    /// this string, so exporters should write a sortable format.
    #[serde(default)]
    pub ctime: String,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub sealed: bool,

    /// Chemical formula of the input structure. Missing is a data-integrity
    /// problem, reported when the candidate is listed.
    #[serde(default)]
    pub formula: Option<String>,

    #[serde(default)]
    pub subtask: Vec<SubTaskEntry>,
}

/// One `[[process.subtask]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SubTaskEntry {
    pub id: u64,

    #[serde(default)]
    pub remote_workdir: Option<PathBuf>,

    #[serde(default)]
    pub output_filename: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<&SubTaskEntry> for SubTask {
    fn from(entry: &SubTaskEntry) -> Self {
        SubTask {
            id: entry.id,
            remote_workdir: entry.remote_workdir.clone(),
            output_filename: entry.output_filename.clone(),
        }
    }
}

/// Parse and sanity-check registry contents.
pub fn parse_registry(contents: &str) -> Result<RegistryFile> {
    let file: RegistryFile = toml::from_str(contents)?;

    let mut seen = HashSet::new();
    for entry in &file.process {
        if !seen.insert(entry.pk) {
            return Err(MonitorError::RegistryError(format!(
                "duplicate process pk {} in registry",
                entry.pk
            )));
        }
    }

    Ok(file)
}

/// [`ProcessSource`] and [`CandidateQuery`] over a registry file.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ProcessRegistry {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RegistryFile> {
        trace!(path = ?self.path, "reading process registry");
        let contents = self.fs.read_to_string(&self.path)?;
        parse_registry(&contents)
    }

    fn with_entry<T>(&self, pk: Pk, f: impl FnOnce(&ProcessEntry) -> Result<T>) -> Result<T> {
        let file = self.load()?;
        let entry = file
            .process
            .iter()
            .find(|p| p.pk == pk)
            .ok_or(MonitorError::ProcessNotFound(pk))?;
        f(entry)
    }
}

impl ProcessSource for ProcessRegistry {
    fn snapshot(&self, pk: Pk) -> Result<ProcessSnapshot> {
        self.with_entry(pk, |entry| {
            Ok(ProcessSnapshot {
                pk,
                label: entry.label.clone(),
                sealed: entry.sealed,
                state: entry.state.as_deref().and_then(LifecycleState::parse_lenient),
            })
        })
    }

    fn active_subtasks(&self, pk: Pk) -> Result<Vec<SubTask>> {
        self.with_entry(pk, |entry| {
            Ok(entry
                .subtask
                .iter()
                .filter(|s| s.active)
                .map(SubTask::from)
                .collect())
        })
    }
}

impl CandidateQuery for ProcessRegistry {
    fn query(&self, process_label: &str) -> Result<Vec<CandidateRow>> {
        let file = self.load()?;
        let mut rows: Vec<CandidateRow> = file
            .process
            .iter()
            .filter(|p| p.label.as_deref() == Some(process_label))
            .map(|p| CandidateRow {
                pk: p.pk,
                ctime: p.ctime.clone(),
                state: p.state.clone().unwrap_or_default(),
            })
            .collect();

        // Newest first; pk breaks ties between identical timestamps.
        rows.sort_by(|a, b| b.ctime.cmp(&a.ctime).then(b.pk.cmp(&a.pk)));
        Ok(rows)
    }

    fn formula(&self, pk: Pk) -> Result<String> {
        self.with_entry(pk, |entry| match &entry.formula {
            Some(formula) => Ok(formula.clone()),
            None => Err(MonitorError::DataIntegrity {
                pk,
                reason: "input structure has no formula".to_string(),
            }),
        })
    }
}
