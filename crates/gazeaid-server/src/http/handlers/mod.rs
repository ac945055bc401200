//! HTTP request handlers.

mod auth;
mod health;
mod pages;
mod scripts;

pub use auth::{check_auth, login, logout, register};
pub use health::health_check;
pub use pages::{auth_page, doctor_dashboard, landing_page, patient_home};
pub use scripts::run_script;
