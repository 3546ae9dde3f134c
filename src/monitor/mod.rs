// src/monitor/mod.rs

//! Live monitoring of a single process.
//!
//! - [`tailer`] pulls new output lines from the active sub-task.
//! - [`classify`] maps the lifecycle state onto a progress value.
//! - [`buffer`] accumulates lines and renders the rolling window.
//! - [`session`] bundles the three for the process being watched.

pub mod buffer;
pub mod classify;
pub mod session;
pub mod tailer;

pub use buffer::{LogBuffer, DEFAULT_WINDOW_LINES};
pub use classify::{classify, state_label, ProgressState, NOT_AVAILABLE, PROGRESS_MAX, PROGRESS_MIN};
pub use session::{ProgressView, SessionTick, WatchSession};
pub use tailer::{poll_new_lines, select_subtask, LogTailer, TailCursor};
