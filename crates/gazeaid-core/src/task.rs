//! Task descriptors and the launch allow-list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A background script that may be launched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Allow-list name, e.g. `eyetracking.py`.
    pub name: String,

    /// Fully resolved path of the script handed to the interpreter.
    pub script_path: PathBuf,

    /// Flags appended after the script path.
    pub extra_args: Vec<String>,
}

impl TaskDescriptor {
    /// Create a descriptor with no extra arguments.
    pub fn new(name: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script_path: script_path.into(),
            extra_args: Vec::new(),
        }
    }

    /// Create a descriptor whose script lives directly under `base_dir`
    /// with the task name as its file name.
    pub fn in_dir(name: impl Into<String>, base_dir: &Path) -> Self {
        let name = name.into();
        let script_path = base_dir.join(&name);
        Self::new(name, script_path)
    }

    /// Builder method to append an argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Script path as it appears on a command line.
    pub fn script_arg(&self) -> String {
        self.script_path.to_string_lossy().into_owned()
    }
}

/// The fixed set of tasks the supervisor will ever agree to launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: Vec<TaskDescriptor>,
}

impl TaskRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(tasks: impl IntoIterator<Item = TaskDescriptor>) -> Result<Self, CoreError> {
        let mut registry = Self::default();
        for task in tasks {
            if registry.contains(&task.name) {
                return Err(CoreError::DuplicateTask(task.name));
            }
            registry.tasks.push(task);
        }
        Ok(registry)
    }

    /// Look up a task by name.
    pub fn get(&self, name: &str) -> Result<&TaskDescriptor, CoreError> {
        self.tasks
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CoreError::UnknownTask(name.to_string()))
    }

    /// Check whether a name is on the allow-list.
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }

    /// Allow-listed names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }
}
