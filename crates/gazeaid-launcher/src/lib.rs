//! Script launch supervisor for GazeAid
//!
//! This crate starts allow-listed scripts as background OS processes. Each
//! launch first checks the live process table for an existing instance, then
//! spawns the script under the configured interpreter and watches it for a
//! short grace period to catch immediate failures.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use gazeaid_core::{TaskDescriptor, TaskRegistry};
//! use gazeaid_launcher::{Supervisor, SupervisorConfig};
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = Path::new("/srv/gazeaid");
//!     let tasks = TaskRegistry::new([
//!         TaskDescriptor::in_dir("eyetracking.py", base).with_arg("--headless"),
//!     ])?;
//!
//!     let supervisor = Supervisor::new(SupervisorConfig::new("python3", base, tasks));
//!     let outcome = supervisor.launch("eyetracking.py").await?;
//!
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod detector;
mod error;
mod launcher;
mod process_table;

// Re-export main types
pub use detector::{DetectionFailurePolicy, DuplicateDetector};
pub use error::{LaunchError, ProcessTableError};
pub use launcher::{Supervisor, SupervisorConfig, GRACE_PERIOD};
pub use process_table::{ProcessEntry, ProcessTable, SystemProcessTable};
