//! Fail-fast background launcher.
//!
//! This module provides the [`Supervisor`], which turns a task name into at
//! most one running OS process and reports what happened during the first
//! moments of its life.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use gazeaid_core::{LaunchOutcome, TaskDescriptor, TaskRegistry};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::detector::{DetectionFailurePolicy, DuplicateDetector};
use crate::error::{LaunchError, ProcessTableError};
use crate::process_table::{ProcessTable, SystemProcessTable};

/// How long a new process is watched for an immediate exit.
pub const GRACE_PERIOD: Duration = Duration::from_millis(750);

/// Bytes of stderr kept when a process fails immediately.
const STDERR_TAIL_BYTES: usize = 4096;

const NO_STDERR: &str = "No specific error output captured on immediate exit.";

/// Windows `CREATE_NO_WINDOW` process creation flag.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Everything the supervisor needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Interpreter used to run every task.
    pub interpreter: PathBuf,

    /// Working directory for spawned tasks.
    pub working_dir: PathBuf,

    /// The allow-list.
    pub tasks: TaskRegistry,

    /// Executable name fragment that also counts as "the interpreter" when
    /// scanning for duplicates.
    pub generic_interpreter_name: String,

    /// Answer to give when the process table cannot be read.
    pub detection_policy: DetectionFailurePolicy,
}

impl SupervisorConfig {
    pub fn new(
        interpreter: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        tasks: TaskRegistry,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            working_dir: working_dir.into(),
            tasks,
            generic_interpreter_name: "python".to_string(),
            detection_policy: DetectionFailurePolicy::default(),
        }
    }

    /// Set the detection failure policy.
    pub fn with_detection_policy(mut self, policy: DetectionFailurePolicy) -> Self {
        self.detection_policy = policy;
        self
    }

    /// Set the generic interpreter name fragment.
    pub fn with_generic_interpreter_name(mut self, name: impl Into<String>) -> Self {
        self.generic_interpreter_name = name.into();
        self
    }
}

/// Launches allow-listed tasks, at most one live instance each.
///
/// The check for an existing instance and the spawn are not atomic: two
/// concurrent launches of the same task can both start a process.
#[derive(Clone)]
pub struct Supervisor {
    config: Arc<SupervisorConfig>,
    detector: DuplicateDetector,
}

impl Supervisor {
    /// Create a supervisor reading the real OS process table.
    pub fn new(config: SupervisorConfig) -> Self {
        Self::with_process_table(config, Arc::new(SystemProcessTable))
    }

    /// Create a supervisor with a custom process table.
    pub fn with_process_table(config: SupervisorConfig, table: Arc<dyn ProcessTable>) -> Self {
        let detector = DuplicateDetector::new(
            table,
            config.interpreter.clone(),
            config.generic_interpreter_name.clone(),
            config.detection_policy,
        );
        Self {
            config: Arc::new(config),
            detector,
        }
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.config.tasks
    }

    pub fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    /// Check whether `task` is live, off the async runtime.
    pub async fn is_running(&self, task: &TaskDescriptor) -> bool {
        let detector = self.detector.clone();
        let owned = task.clone();
        match tokio::task::spawn_blocking(move || detector.is_running(&owned)).await {
            Ok(running) => running,
            Err(e) => self
                .detector
                .enumeration_failed(task, &ProcessTableError::Enumeration(e.to_string())),
        }
    }

    /// Launch the named task unless an instance is already live.
    ///
    /// Blocks the calling task for up to [`GRACE_PERIOD`] while the new
    /// process is watched. After that the process is left to the OS.
    pub async fn launch(&self, name: &str) -> Result<LaunchOutcome, LaunchError> {
        let task = self
            .config
            .tasks
            .get(name)
            .map_err(|_| LaunchError::UnknownTask(name.to_string()))?;

        if !task.script_path.is_file() {
            error!(task = %task.name, path = %task.script_path.display(), "Script file not found");
            return Err(LaunchError::ScriptNotFound {
                task: task.name.clone(),
                path: task.script_path.clone(),
            });
        }

        if self.is_running(task).await {
            info!(task = %task.name, "Task already running");
            return Ok(LaunchOutcome::AlreadyRunning);
        }

        self.spawn_and_observe(task).await
    }

    async fn spawn_and_observe(&self, task: &TaskDescriptor) -> Result<LaunchOutcome, LaunchError> {
        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&task.script_path)
            .args(&task.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .current_dir(&self.config.working_dir);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        info!(
            task = %task.name,
            interpreter = %self.config.interpreter.display(),
            working_dir = %self.config.working_dir.display(),
            args = ?task.extra_args,
            "Starting task"
        );
        debug!("Full command: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| {
            error!(task = %task.name, error = %e, "Failed to spawn task");
            LaunchError::from_spawn(&task.name, self.config.interpreter.clone(), e)
        })?;

        let pid = child.id().ok_or_else(|| LaunchError::Unexpected {
            task: task.name.clone(),
            message: "spawned process has no pid".to_string(),
        })?;

        // Dropping the child on timeout detaches it; tokio reaps it later.
        let output = match timeout(GRACE_PERIOD, child.wait_with_output()).await {
            Err(_) => {
                info!(task = %task.name, pid, "Task started in background");
                return Ok(LaunchOutcome::StartedRunning { pid });
            }
            Ok(Err(e)) => {
                error!(task = %task.name, pid, error = %e, "Failed while observing task");
                return Err(LaunchError::Unexpected {
                    task: task.name.clone(),
                    message: e.to_string(),
                });
            }
            Ok(Ok(output)) => output,
        };

        if output.status.success() {
            warn!(task = %task.name, pid, "Task finished almost immediately");
            return Ok(LaunchOutcome::StartedAndExitedOk { pid });
        }

        let stderr_tail = stderr_tail(&output.stderr);
        error!(
            task = %task.name,
            pid,
            exit_code = ?output.status.code(),
            stderr = %stderr_tail,
            "Task failed immediately on launch"
        );
        Ok(LaunchOutcome::StartedAndExitedError {
            pid,
            exit_code: output.status.code(),
            stderr_tail,
        })
    }
}

/// Last few KiB of a stderr capture, trimmed, or a placeholder when empty.
fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    let tail = String::from_utf8_lossy(&stderr[start..]).trim().to_string();
    if tail.is_empty() {
        NO_STDERR.to_string()
    } else {
        tail
    }
}
