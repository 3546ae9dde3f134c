// src/monitor/classify.rs

//! Lifecycle state to progress mapping.

use crate::types::{LifecycleState, Severity};

/// Lower bound of the progress ordinal.
pub const PROGRESS_MIN: u8 = 0;
/// Upper bound of the progress ordinal.
pub const PROGRESS_MAX: u8 = 2;

/// Label shown when a process has no state (or there is no process).
pub const NOT_AVAILABLE: &str = "N/A";

/// Three-point progress value plus the severity used to colour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub ordinal: u8,
    pub severity: Severity,
}

impl ProgressState {
    pub const fn new(ordinal: u8, severity: Severity) -> Self {
        Self { ordinal, severity }
    }
}

/// Map a lifecycle state onto the progress bar.
///
/// Total over every state; `None` stands for null or unknown.
pub fn classify(state: Option<LifecycleState>) -> ProgressState {
    match state {
        None => ProgressState::new(0, Severity::Warning),
        Some(LifecycleState::Created) => ProgressState::new(0, Severity::Info),
        Some(LifecycleState::Running) | Some(LifecycleState::Waiting) => {
            ProgressState::new(1, Severity::Info)
        }
        Some(LifecycleState::Killed) | Some(LifecycleState::Excepted) => {
            ProgressState::new(2, Severity::Danger)
        }
        Some(LifecycleState::Finished) => ProgressState::new(2, Severity::Success),
    }
}

/// Human-readable label: `"Running"`, `"Finished"`, ... or `"N/A"`.
pub fn state_label(state: Option<LifecycleState>) -> String {
    match state {
        None => NOT_AVAILABLE.to_string(),
        Some(state) => capitalize(state.as_str()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_table() {
        let cases = [
            (None, 0, Severity::Warning),
            (Some(LifecycleState::Created), 0, Severity::Info),
            (Some(LifecycleState::Running), 1, Severity::Info),
            (Some(LifecycleState::Waiting), 1, Severity::Info),
            (Some(LifecycleState::Killed), 2, Severity::Danger),
            (Some(LifecycleState::Excepted), 2, Severity::Danger),
            (Some(LifecycleState::Finished), 2, Severity::Success),
        ];
        for (state, ordinal, severity) in cases {
            assert_eq!(classify(state), ProgressState::new(ordinal, severity), "{state:?}");
        }
    }

    #[test]
    fn ordinal_stays_in_bounds_and_is_stable() {
        let states = std::iter::once(None).chain(LifecycleState::ALL.into_iter().map(Some));
        for state in states {
            let first = classify(state);
            assert!((PROGRESS_MIN..=PROGRESS_MAX).contains(&first.ordinal));
            assert_eq!(first, classify(state));
        }
    }

    #[test]
    fn labels() {
        assert_eq!(state_label(None), "N/A");
        assert_eq!(state_label(Some(LifecycleState::Excepted)), "Excepted");
        assert_eq!(state_label(Some(LifecycleState::Running)), "Running");
    }
}
