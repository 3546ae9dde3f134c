// src/selector/mod.rs

//! Choosing which process to watch.
//!
//! The selector keeps two things apart: the list of candidates (refreshed
//! from a [`CandidateQuery`]) and the current selection. A refresh never
//! touches the selection, and selecting a pk the list doesn't know about
//! triggers exactly one refresh before the pk is accepted.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::Pk;

/// Label of the "nothing selected yet" option, always listed first.
pub const NEW_CALCULATION_LABEL: &str = "New calculation...";

/// Process type listed by default.
pub const DEFAULT_PROCESS_LABEL: &str = "PwBandsWorkChain";

/// Raw row returned by the candidate query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub pk: Pk,
    pub ctime: String,
    pub state: String,
}

/// Read-only query over the orchestrator's processes.
pub trait CandidateQuery: Send + Sync + Debug {
    /// Processes with the given type label, newest first.
    fn query(&self, process_label: &str) -> Result<Vec<CandidateRow>>;

    /// Formula of the input structure of `pk`.
    fn formula(&self, pk: Pk) -> Result<String>;
}

/// A process the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchCandidate {
    pub pk: Pk,
    pub ctime: String,
    pub state: String,
    pub formula: String,
}

impl WatchCandidate {
    pub fn option_label(&self) -> String {
        format!(
            "{:6}{:>10}\t{:<16}\t{}",
            self.pk, self.ctime, self.state, self.formula
        )
    }
}

/// One entry of the dropdown: display label and the pk it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: String,
    pub value: Option<Pk>,
}

impl SelectorOption {
    pub fn new_calculation() -> Self {
        Self {
            label: NEW_CALCULATION_LABEL.to_string(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Requested value equals the current one.
    Unchanged,
    Changed {
        previous: Option<Pk>,
        current: Option<Pk>,
        /// A refresh ran because the pk was not listed.
        refreshed: bool,
    },
}

#[derive(Debug)]
pub struct ProcessSelector {
    query: Arc<dyn CandidateQuery>,
    process_label: String,
    candidates: Vec<WatchCandidate>,
    options: Vec<SelectorOption>,
    selection: Option<Pk>,
}

impl ProcessSelector {
    /// Start with only the "new calculation" option; call
    /// [`ProcessSelector::refresh`] to populate.
    pub fn new(query: Arc<dyn CandidateQuery>, process_label: impl Into<String>) -> Self {
        Self {
            query,
            process_label: process_label.into(),
            candidates: Vec::new(),
            options: vec![SelectorOption::new_calculation()],
            selection: None,
        }
    }

    pub fn process_label(&self) -> &str {
        &self.process_label
    }

    pub fn selection(&self) -> Option<Pk> {
        self.selection
    }

    pub fn options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn candidates(&self) -> &[WatchCandidate] {
        &self.candidates
    }

    /// `None` is always listed.
    pub fn is_listed(&self, value: Option<Pk>) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Query candidates and resolve each one's formula.
    ///
    /// Fails as a whole if any formula can't be resolved.
    pub fn list_candidates(&self) -> Result<Vec<WatchCandidate>> {
        let rows = self.query.query(&self.process_label)?;
        rows.into_iter()
            .map(|row| {
                let formula = self.query.formula(row.pk)?;
                Ok(WatchCandidate {
                    pk: row.pk,
                    ctime: row.ctime,
                    state: row.state,
                    formula,
                })
            })
            .collect()
    }

    /// Re-query and rebuild the options. On error the previous options stay.
    pub fn refresh(&mut self) -> Result<&[SelectorOption]> {
        let candidates = self.list_candidates()?;

        let mut options = Vec::with_capacity(candidates.len() + 1);
        options.push(SelectorOption::new_calculation());
        options.extend(candidates.iter().map(|c| SelectorOption {
            label: c.option_label(),
            value: Some(c.pk),
        }));

        debug!(
            label = %self.process_label,
            candidates = candidates.len(),
            "refreshed watch candidates"
        );

        self.candidates = candidates;
        self.options = options;

        if !self.is_listed(self.selection) {
            warn!(selection = ?self.selection, "selected process is no longer listed");
        }

        Ok(&self.options)
    }

    /// Resolve a selection request to the effective selection.
    pub fn resolve_selection(&mut self, requested: Option<Pk>) -> Result<SelectionOutcome> {
        if requested == self.selection {
            return Ok(SelectionOutcome::Unchanged);
        }

        let mut refreshed = false;
        if !self.is_listed(requested) {
            self.refresh()?;
            refreshed = true;
            if !self.is_listed(requested) {
                warn!(pk = ?requested, "selecting a process missing from the candidate list");
            }
        }

        let previous = std::mem::replace(&mut self.selection, requested);
        Ok(SelectionOutcome::Changed {
            previous,
            current: requested,
            refreshed,
        })
    }

    /// Put back a selection returned as `previous` by
    /// [`ProcessSelector::resolve_selection`] when acting on the new one
    /// failed.
    pub fn restore_selection(&mut self, previous: Option<Pk>) {
        debug!(from = ?self.selection, to = ?previous, "restoring previous selection");
        self.selection = previous;
    }
}
