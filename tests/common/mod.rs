#![allow(dead_code)]

use std::sync::Arc;

use procwatch::engine::{CoreMonitor, MonitorOptions};
use procwatch::fs::mock::MockFileSystem;
use procwatch::selector::{ProcessSelector, DEFAULT_PROCESS_LABEL};

pub use procwatch_test_utils::builders;
pub use procwatch_test_utils::fake_source::{subtask, FakeSource};
pub use procwatch_test_utils::init_tracing;

pub const LABEL: &str = DEFAULT_PROCESS_LABEL;

/// Core monitor over a fake orchestrator and an in-memory filesystem.
pub fn core_with(source: &FakeSource, fs: &MockFileSystem, options: MonitorOptions) -> CoreMonitor {
    let selector = ProcessSelector::new(Arc::new(source.clone()), LABEL);
    CoreMonitor::new(selector, Arc::new(source.clone()), Arc::new(fs.clone()), options)
}
