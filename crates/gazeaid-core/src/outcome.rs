//! Launch outcomes reported by the supervisor.

use serde::{Deserialize, Serialize};

/// What happened when a task launch was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchOutcome {
    /// An instance was already live; nothing was spawned.
    AlreadyRunning,

    /// Spawned and still alive at the end of the grace period.
    StartedRunning { pid: u32 },

    /// Spawned and exited with status 0 inside the grace period.
    StartedAndExitedOk { pid: u32 },

    /// Spawned and exited unsuccessfully inside the grace period.
    StartedAndExitedError {
        pid: u32,
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        stderr_tail: String,
    },
}

impl LaunchOutcome {
    /// Returns true unless the process failed immediately.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::StartedAndExitedError { .. })
    }

    /// Process identifier, when a process was spawned.
    pub fn pid(&self) -> Option<u32> {
        match self {
            Self::AlreadyRunning => None,
            Self::StartedRunning { pid }
            | Self::StartedAndExitedOk { pid }
            | Self::StartedAndExitedError { pid, .. } => Some(*pid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_classification() {
        assert!(LaunchOutcome::AlreadyRunning.is_success());
        assert!(LaunchOutcome::StartedRunning { pid: 7 }.is_success());
        assert!(LaunchOutcome::StartedAndExitedOk { pid: 7 }.is_success());
        assert!(!LaunchOutcome::StartedAndExitedError {
            pid: 7,
            exit_code: Some(1),
            stderr_tail: "boom".to_string(),
        }
        .is_success());
    }

    #[test]
    fn test_pid() {
        assert_eq!(LaunchOutcome::AlreadyRunning.pid(), None);
        assert_eq!(LaunchOutcome::StartedRunning { pid: 42 }.pid(), Some(42));
    }
}
