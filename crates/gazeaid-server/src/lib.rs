//! GazeAid Server Library
//!
//! This crate provides the web backend for GazeAid: patient/doctor login,
//! role-gated pages, and the API that launches training games through the
//! script launch supervisor.

pub mod auth;
pub mod config;
pub mod http;
pub mod state;

pub use config::{Cli, Config};
pub use state::AppState;
