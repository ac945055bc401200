//! Core domain errors.

use thiserror::Error;

/// Core domain errors for GazeAid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Task name is not on the allow-list.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// Two descriptors registered under the same name.
    #[error("Duplicate task name: {0}")]
    DuplicateTask(String),

    /// Role string is neither patient nor doctor.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
