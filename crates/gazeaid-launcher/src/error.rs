//! Error types for the launch supervisor.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while launching a task.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Task name is not on the allow-list.
    #[error("Invalid script name: {0}")]
    UnknownTask(String),

    /// The task's script file does not exist.
    #[error("Script '{task}' not found at {}", path.display())]
    ScriptNotFound { task: String, path: PathBuf },

    /// The interpreter could not be found.
    #[error("Interpreter '{}' not found", interpreter.display())]
    InterpreterNotFound {
        interpreter: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused to start the process (permissions, resource limits).
    #[error("OS error starting '{task}': {source}")]
    Spawn {
        task: String,
        #[source]
        source: io::Error,
    },

    /// Anything else that went wrong around the spawn.
    #[error("Unexpected error starting '{task}': {message}")]
    Unexpected { task: String, message: String },
}

impl LaunchError {
    /// Classify an error returned by `Command::spawn`.
    pub(crate) fn from_spawn(task: &str, interpreter: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::InterpreterNotFound {
                interpreter,
                source,
            }
        } else {
            Self::Spawn {
                task: task.to_string(),
                source,
            }
        }
    }
}

/// Errors reading the OS process table.
#[derive(Debug, Error)]
pub enum ProcessTableError {
    /// Process enumeration is not available on this platform.
    #[error("Process enumeration is not supported on this platform")]
    Unsupported,

    /// Enumeration returned no processes at all.
    #[error("Process table snapshot was empty")]
    Empty,

    /// The enumeration worker failed.
    #[error("Process enumeration failed: {0}")]
    Enumeration(String),
}
