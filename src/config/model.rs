// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::MonitorOptions;
use crate::monitor::DEFAULT_WINDOW_LINES;
use crate::selector::DEFAULT_PROCESS_LABEL;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [monitor]
/// poll_interval = "2s"
/// window_lines = 3
/// title = "Output:"
///
/// [query]
/// process_label = "PwBandsWorkChain"
///
/// [source]
/// registry = "processes.toml"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub query: QuerySection,

    #[serde(default)]
    pub source: SourceSection,
}

/// `[monitor]` section, as written.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSection {
    /// Duration string: `500ms`, `2s`, `1m`, `1h`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Lines kept in the rolling window.
    #[serde(default = "default_window_lines")]
    pub window_lines: usize,

    /// Heading printed above the tailed output.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_poll_interval() -> String {
    "2s".to_string()
}

fn default_window_lines() -> usize {
    DEFAULT_WINDOW_LINES
}

fn default_title() -> String {
    "Output:".to_string()
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            window_lines: default_window_lines(),
            title: default_title(),
        }
    }
}

/// `[query]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySection {
    /// Only processes with this type label are offered for selection.
    #[serde(default = "default_process_label")]
    pub process_label: String,
}

fn default_process_label() -> String {
    DEFAULT_PROCESS_LABEL.to_string()
}

impl Default for QuerySection {
    fn default() -> Self {
        Self {
            process_label: default_process_label(),
        }
    }
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    /// Registry file, relative to the config file's directory unless
    /// absolute.
    #[serde(default = "default_registry")]
    pub registry: PathBuf,
}

fn default_registry() -> PathBuf {
    PathBuf::from("processes.toml")
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

/// `[monitor]` after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub window_lines: usize,
    pub title: String,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub monitor: MonitorConfig,
    pub query: QuerySection,
    pub source: SourceSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        monitor: MonitorConfig,
        query: QuerySection,
        source: SourceSection,
    ) -> Self {
        Self {
            monitor,
            query,
            source,
        }
    }

    /// Engine options derived from `[monitor]`.
    pub fn monitor_options(&self, exit_when_sealed: bool) -> MonitorOptions {
        MonitorOptions {
            poll_interval: self.monitor.poll_interval,
            window_lines: self.monitor.window_lines,
            exit_when_sealed,
        }
    }
}
