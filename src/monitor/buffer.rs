// src/monitor/buffer.rs

//! Accumulated log lines plus a rolling window of the latest few.

use std::collections::VecDeque;

/// Default number of lines kept in the rolling window.
pub const DEFAULT_WINDOW_LINES: usize = 3;

/// Entry used to pad the window while fewer than `capacity` lines exist.
const BLANK_ENTRY: &str = " ";

/// Opening tag of the styled block that wraps the rolling window.
const WINDOW_OPEN: &str = r#"<pre style="background-color: #1f1f2e; color: white;">"#;
const WINDOW_CLOSE: &str = "</pre>";

/// Log lines for one watch session.
///
/// `history` holds every line since the last [`LogBuffer::clear`]; the window
/// holds the most recent `capacity` lines, each prefixed with its 1-based
/// index in `history`.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    history: Vec<String>,
    window: VecDeque<String>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_LINES)
    }
}

impl LogBuffer {
    /// A zero capacity is bumped to one; config validation rejects it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: Vec::new(),
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Append one line. Surrounding whitespace (including the newline) is
    /// trimmed before storing.
    pub fn append(&mut self, line: &str) {
        let line = line.trim();
        self.history.push(line.to_string());

        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window
            .push_back(format!("{:03}: {}", self.history.len(), line));
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append(line.as_ref());
        }
    }

    /// Drop everything. Calling it twice is the same as calling it once.
    pub fn clear(&mut self) {
        self.history.clear();
        self.window.clear();
    }

    pub fn full_history(&self) -> &[String] {
        &self.history
    }

    /// The full history as one newline-joined blob.
    pub fn raw_text(&self) -> String {
        self.history.join("\n")
    }

    /// Window entries oldest-first, padded with blanks to `capacity`.
    pub fn window_entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = self.window.iter().cloned().collect();
        entries.resize(self.capacity, BLANK_ENTRY.to_string());
        entries
    }

    /// The window wrapped in its display block.
    pub fn rendered_window(&self) -> String {
        format!("{}{}{}", WINDOW_OPEN, self.window_entries().join("\n"), WINDOW_CLOSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_window_is_blank_padded_after_real_lines() {
        let mut buf = LogBuffer::new(3);
        buf.append("first\n");

        assert_eq!(buf.window_entries(), vec!["001: first", " ", " "]);
        assert_eq!(buf.full_history(), &["first".to_string()]);
    }

    #[test]
    fn full_window_keeps_last_n_oldest_first() {
        let mut buf = LogBuffer::new(3);
        buf.extend(["a", "b", "c", "d", "e"]);

        assert_eq!(buf.window_entries(), vec!["003: c", "004: d", "005: e"]);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn index_prefix_widens_past_three_digits() {
        let mut buf = LogBuffer::new(1);
        for i in 0..1000 {
            buf.append(&format!("line {i}"));
        }
        assert_eq!(buf.window_entries(), vec!["1000: line 999"]);
    }

    #[test]
    fn rendered_window_is_wrapped_and_raw_text_is_not() {
        let mut buf = LogBuffer::new(2);
        buf.extend(["x", "y"]);

        assert_eq!(
            buf.rendered_window(),
            "<pre style=\"background-color: #1f1f2e; color: white;\">001: x\n002: y</pre>"
        );
        assert_eq!(buf.raw_text(), "x\ny");
    }

    #[test]
    fn clear_matches_fresh_buffer_and_is_idempotent() {
        let fresh = LogBuffer::new(3);
        let mut buf = LogBuffer::new(3);
        buf.extend(["a", "b", "c", "d"]);

        buf.clear();
        buf.clear();

        assert_eq!(buf.full_history(), fresh.full_history());
        assert_eq!(buf.window_entries(), fresh.window_entries());
        assert_eq!(buf.rendered_window(), fresh.rendered_window());
        assert_eq!(buf.raw_text(), fresh.raw_text());
    }

    #[test]
    fn indices_restart_after_clear() {
        let mut buf = LogBuffer::new(2);
        buf.extend(["a", "b"]);
        buf.clear();
        buf.append("c");
        assert_eq!(buf.window_entries(), vec!["001: c", " "]);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut buf = LogBuffer::new(0);
        buf.extend(["a", "b"]);
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.window_entries(), vec!["002: b"]);
    }
}
