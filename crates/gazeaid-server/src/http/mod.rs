//! HTTP server for GazeAid.
//!
//! Provides endpoints for:
//! - Pages (`/`, `/auth`, `/home`, `/doctor/dashboard`, `/static/*`)
//! - Auth API (`/api/login`, `/api/register`, `/api/logout`, `/api/check-auth`)
//! - Script launching (`/api/run-script`)
//! - Health check (`/health`)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ConfigError;
use crate::state::AppState;

mod handlers;
pub mod responses;

#[cfg(test)]
mod tests;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let origins = state
        .config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Browser pages send the session cookie cross-origin during development
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let static_files = ServeDir::new(state.config.static_dir());

    let router = Router::new()
        // Page routes
        .route("/", get(handlers::landing_page))
        .route("/auth", get(handlers::auth_page))
        .route("/home", get(handlers::patient_home))
        .route("/doctor/dashboard", get(handlers::doctor_dashboard))
        .nest_service("/static", static_files)
        // API routes
        .route("/api/login", post(handlers::login))
        .route("/api/register", post(handlers::register))
        .route("/api/logout", post(handlers::logout))
        .route("/api/check-auth", get(handlers::check_auth))
        .route("/api/run-script", post(handlers::run_script))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}
