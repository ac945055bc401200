//! GazeAid Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Process spawning
//! - Network/HTTP
//! - Runtime specifics
//!
//! All types here represent the core business domain of GazeAid: the
//! launchable task allow-list, launch outcomes, user roles, and the grid
//! game driven by landmark tracking.

pub mod error;
pub mod game;
pub mod outcome;
pub mod task;
pub mod user;

// Re-export commonly used types
pub use error::CoreError;
pub use game::{cell_for_landmarks, Cell, GameMetrics, GridGame, Landmark, Observation};
pub use outcome::LaunchOutcome;
pub use task::{TaskDescriptor, TaskRegistry};
pub use user::Role;
