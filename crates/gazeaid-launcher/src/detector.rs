//! Duplicate-launch detection.
//!
//! A task counts as running when some live process was started by the
//! configured interpreter (or anything that looks like the generic
//! interpreter) and carries the task's full script path as one of its
//! arguments. The table is re-read on every query.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gazeaid_core::TaskDescriptor;
use tracing::{debug, warn};

use crate::error::ProcessTableError;
use crate::process_table::{ProcessEntry, ProcessTable};

/// What to report when the process table cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectionFailurePolicy {
    /// Report "not running" and allow a possible duplicate launch.
    #[default]
    AssumeNotRunning,
    /// Report "running" and refuse to launch until the table is readable.
    AssumeRunning,
}

impl DetectionFailurePolicy {
    /// The answer `is_running` gives under this policy when enumeration fails.
    pub fn resolve(self) -> bool {
        match self {
            Self::AssumeNotRunning => false,
            Self::AssumeRunning => true,
        }
    }
}

/// Finds live instances of a task in the OS process table.
#[derive(Clone)]
pub struct DuplicateDetector {
    table: Arc<dyn ProcessTable>,
    interpreter: PathBuf,
    generic_name: String,
    policy: DetectionFailurePolicy,
}

impl DuplicateDetector {
    pub fn new(
        table: Arc<dyn ProcessTable>,
        interpreter: impl Into<PathBuf>,
        generic_name: impl Into<String>,
        policy: DetectionFailurePolicy,
    ) -> Self {
        Self {
            table,
            interpreter: interpreter.into(),
            generic_name: generic_name.into().to_lowercase(),
            policy,
        }
    }

    /// Whether an instance of `task` is live right now.
    ///
    /// Enumeration failures are logged and answered according to the
    /// configured [`DetectionFailurePolicy`].
    pub fn is_running(&self, task: &TaskDescriptor) -> bool {
        match self.matching_pids(task) {
            Ok(pids) => !pids.is_empty(),
            Err(e) => self.enumeration_failed(task, &e),
        }
    }

    /// Pids of every live process that matches `task`.
    pub fn matching_pids(&self, task: &TaskDescriptor) -> Result<Vec<u32>, ProcessTableError> {
        let script = task.script_arg();
        let pids = self
            .table
            .snapshot()?
            .iter()
            .filter(|entry| self.matches(entry, &script))
            .inspect(|entry| {
                debug!(
                    task = %task.name,
                    pid = entry.pid,
                    cmdline = %entry.cmdline.join(" "),
                    "Found running instance"
                );
            })
            .map(|entry| entry.pid)
            .collect();
        Ok(pids)
    }

    /// Apply the failure policy, logging the reason.
    pub(crate) fn enumeration_failed(
        &self,
        task: &TaskDescriptor,
        error: &ProcessTableError,
    ) -> bool {
        let running = self.policy.resolve();
        warn!(
            task = %task.name,
            error = %error,
            policy = ?self.policy,
            assume_running = running,
            "Could not read process table"
        );
        running
    }

    fn matches(&self, entry: &ProcessEntry, script: &str) -> bool {
        // Unreadable processes are skipped.
        let Some(argv0) = entry.cmdline.first() else {
            return false;
        };

        let interpreter = self.interpreter.to_string_lossy();
        let by_interpreter = entry.cmdline.iter().any(|arg| arg.as_str() == interpreter.as_ref())
            || entry.exe.as_deref() == Some(self.interpreter.as_path())
            || self.looks_generic(argv0);

        by_interpreter && entry.cmdline.iter().any(|arg| arg == script)
    }

    fn looks_generic(&self, argv0: &str) -> bool {
        if self.generic_name.is_empty() {
            return false;
        }
        Path::new(argv0)
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase().contains(&self.generic_name))
            .unwrap_or(false)
    }
}
