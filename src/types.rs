use std::fmt;
use std::str::FromStr;

/// Primary key of a process in the orchestration system.
pub type Pk = u64;

/// Lifecycle state reported by the orchestration system for a process.
///
/// A missing or unrecognised state is represented as `Option::None` by
/// callers rather than as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    Running,
    Waiting,
    Killed,
    Excepted,
    Finished,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Created,
        LifecycleState::Running,
        LifecycleState::Waiting,
        LifecycleState::Killed,
        LifecycleState::Excepted,
        LifecycleState::Finished,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Created => "created",
            LifecycleState::Running => "running",
            LifecycleState::Waiting => "waiting",
            LifecycleState::Killed => "killed",
            LifecycleState::Excepted => "excepted",
            LifecycleState::Finished => "finished",
        }
    }

    /// Lenient parse used for data coming from the process source: anything
    /// unrecognised (including an empty string) is "no state".
    pub fn parse_lenient(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(LifecycleState::Created),
            "running" => Ok(LifecycleState::Running),
            "waiting" => Ok(LifecycleState::Waiting),
            "killed" => Ok(LifecycleState::Killed),
            "excepted" => Ok(LifecycleState::Excepted),
            "finished" => Ok(LifecycleState::Finished),
            other => Err(format!("invalid lifecycle state: {other}")),
        }
    }
}

/// Visual severity attached to a progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Danger,
    Success,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
