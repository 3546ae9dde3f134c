// src/process/mod.rs

//! Read-only view of the external orchestration system.
//!
//! The monitor never owns a process. It asks a [`ProcessSource`] for a
//! fresh [`ProcessSnapshot`] on every tick and for the sub-tasks that are
//! active right now. [`registry`] provides a file-backed source.

use std::fmt::{self, Debug};
use std::path::PathBuf;

use crate::errors::Result;
use crate::types::{LifecycleState, Pk};

pub mod registry;

pub use registry::ProcessRegistry;

/// Consistent read of a process's sealed flag and lifecycle state.
///
/// Both fields come from a single source call, so the tailer and the
/// classifier never disagree about where the process is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pk: Pk,
    /// Process-type label (e.g. `PwBandsWorkChain`), when known.
    pub label: Option<String>,
    pub sealed: bool,
    /// `None` when the source reports no state or one we don't recognise.
    pub state: Option<LifecycleState>,
}

impl fmt::Display for ProcessSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}<{}>", label, self.pk),
            None => write!(f, "Process<{}>", self.pk),
        }
    }
}

/// A child execution step of a process. Only valid for the tick it was
/// listed in; the next enumeration may return a different one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTask {
    pub id: u64,
    pub remote_workdir: Option<PathBuf>,
    pub output_filename: Option<String>,
}

impl SubTask {
    /// `<remote_workdir>/<output_filename>`, if the sub-task has both.
    pub fn output_path(&self) -> Option<PathBuf> {
        match (&self.remote_workdir, &self.output_filename) {
            (Some(dir), Some(name)) if !name.is_empty() => Some(dir.join(name)),
            _ => None,
        }
    }
}

/// Source of process state, owned by the orchestration system.
pub trait ProcessSource: Send + Sync + Debug {
    /// Read `sealed` and `state` for `pk` in one go.
    fn snapshot(&self, pk: Pk) -> Result<ProcessSnapshot>;

    /// Sub-tasks of `pk` that are currently running, in the order the
    /// orchestrator lists them (oldest first).
    fn active_subtasks(&self, pk: Pk) -> Result<Vec<SubTask>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_requires_dir_and_name() {
        let mut sub = SubTask {
            id: 1,
            remote_workdir: Some(PathBuf::from("/scratch/1")),
            output_filename: Some("aiida.out".to_string()),
        };
        assert_eq!(sub.output_path(), Some(PathBuf::from("/scratch/1/aiida.out")));

        sub.output_filename = Some(String::new());
        assert_eq!(sub.output_path(), None);

        sub.output_filename = Some("aiida.out".to_string());
        sub.remote_workdir = None;
        assert_eq!(sub.output_path(), None);
    }

    #[test]
    fn snapshot_display_uses_label_and_pk() {
        let snap = ProcessSnapshot {
            pk: 12,
            label: Some("PwBandsWorkChain".to_string()),
            sealed: false,
            state: Some(LifecycleState::Running),
        };
        assert_eq!(snap.to_string(), "PwBandsWorkChain<12>");

        let bare = ProcessSnapshot { label: None, ..snap };
        assert_eq!(bare.to_string(), "Process<12>");
    }
}
