// src/present.rs

//! Plain-terminal presentation of monitor changes.
//!
//! The terminal can't redraw a window in place, so instead of the rolling
//! window it prints each appended line once.

use crate::engine::ViewChange;
use crate::monitor::PROGRESS_MAX;
use crate::selector::SelectorOption;
use crate::types::Pk;

#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    title: String,
    selection: Option<Pk>,
}

impl TerminalPresenter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            selection: None,
        }
    }

    /// Lines to print for one change.
    pub fn render(&mut self, change: &ViewChange) -> Vec<String> {
        match change {
            ViewChange::Process { pk: Some(_), description } => {
                vec![format!("Process: {description}"), self.title.clone()]
            }
            ViewChange::Process { pk: None, .. } => vec!["Process: (none)".to_string()],
            ViewChange::Progress(view) => vec![format!(
                "Calculation state: {} [{}/{}] ({})",
                view.label, view.progress.ordinal, PROGRESS_MAX, view.progress.severity
            )],
            ViewChange::Options(options) => format_options(options, self.selection),
            ViewChange::LogAppend(lines) => lines.clone(),
            ViewChange::Selection(pk) => {
                self.selection = *pk;
                Vec::new()
            }
            ViewChange::LogWindow(_) | ViewChange::RawLog(_) => Vec::new(),
        }
    }
}

/// Dropdown contents as text, marking the selected entry.
pub fn format_options(options: &[SelectorOption], selection: Option<Pk>) -> Vec<String> {
    options
        .iter()
        .map(|o| {
            let marker = if o.value == selection { '*' } else { ' ' };
            format!("{marker} {}", o.label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::ProgressView;

    #[test]
    fn appended_lines_are_printed_and_raw_log_is_not() {
        let mut p = TerminalPresenter::new("Output:");
        assert!(p.render(&ViewChange::RawLog("a\nb".into())).is_empty());
        assert_eq!(
            p.render(&ViewChange::LogAppend(vec!["a".into(), "b".into()])),
            vec!["a", "b"]
        );
    }

    #[test]
    fn process_header_includes_title() {
        let mut p = TerminalPresenter::new("Output:");
        let header = p.render(&ViewChange::Process {
            pk: Some(3),
            description: "PwBandsWorkChain<3>".into(),
        });
        assert_eq!(header, vec!["Process: PwBandsWorkChain<3>", "Output:"]);
    }

    #[test]
    fn options_follow_the_last_selection() {
        let mut p = TerminalPresenter::new("Output:");
        let options = vec![
            SelectorOption::new_calculation(),
            SelectorOption { label: "x".into(), value: Some(7) },
        ];
        assert!(p.render(&ViewChange::Selection(Some(7))).is_empty());
        assert_eq!(
            p.render(&ViewChange::Options(options)),
            vec!["  New calculation...", "* x"]
        );
    }

    #[test]
    fn progress_line() {
        let mut p = TerminalPresenter::new("Output:");
        let lines = p.render(&ViewChange::Progress(ProgressView::idle()));
        assert_eq!(lines, vec!["Calculation state: N/A [0/2] (warning)"]);
    }

    #[test]
    fn options_mark_selection() {
        let options = vec![
            SelectorOption::new_calculation(),
            SelectorOption { label: "x".into(), value: Some(7) },
        ];
        assert_eq!(format_options(&options, Some(7)), vec!["  New calculation...", "* x"]);
    }
}
