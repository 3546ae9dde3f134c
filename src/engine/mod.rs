// src/engine/mod.rs

//! Monitoring engine.
//!
//! The pure state machine lives in [`core`]; [`runtime`] is the async shell
//! that turns a timer into poll ticks and hands the resulting changes to the
//! subscribers registered in an [`observe::ChangeHub`].

use std::time::Duration;

use crate::monitor::DEFAULT_WINDOW_LINES;
use crate::types::Pk;

/// Default period between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Events flowing into the monitor from the host and the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Periodic tick: snapshot, classify, tail.
    PollTick,
    /// The host was told the watched process was updated; re-classify.
    ProcessChanged,
    /// The user picked a process (`None` = new calculation).
    SelectionRequested(Option<Pk>),
    /// Re-query the candidate list.
    RefreshRequested,
    ShutdownRequested,
}

/// Options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub poll_interval: Duration,
    /// Capacity of the rolling log window.
    pub window_lines: usize,
    /// Stop once the watched process is sealed and drained (`--once`).
    pub exit_when_sealed: bool,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            window_lines: DEFAULT_WINDOW_LINES,
            exit_when_sealed: false,
        }
    }
}

pub mod core;
pub mod observe;
pub mod runtime;

pub use core::{CoreMonitor, CoreStep};
pub use observe::{ChangeBatch, ChangeHub, SubscriptionId, ViewChange, ViewTopic};
pub use runtime::Runtime;
