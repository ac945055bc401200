//! Page handlers.
//!
//! Page bodies are static files under the templates directory; these
//! handlers only decide who sees which page.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use gazeaid_core::Role;
use tracing::{debug, error, warn};

use crate::auth::{AuthSession, DoctorSession};
use crate::state::AppState;

const LANDING_PAGE: &str = "landing.html";
const AUTH_PAGE: &str = "login_register.html";
const PATIENT_PAGE: &str = "index.html";
const DOCTOR_PAGE: &str = "doctor_dashboard.html";

/// Landing page; logged-in users go straight to their home page.
pub async fn landing_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(auth) = state.current_session(&headers).await {
        debug!(
            user = %auth.session.email,
            role = %auth.session.role,
            "Already logged in, redirecting from landing"
        );
        return Redirect::to(home_for(auth.session.role)).into_response();
    }
    serve_page(&state, LANDING_PAGE).await
}

/// Combined login/register page.
pub async fn auth_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(auth) = state.current_session(&headers).await {
        debug!(user = %auth.session.email, "Already logged in, redirecting from auth page");
        return Redirect::to(home_for(auth.session.role)).into_response();
    }

    // The page reads its tab from the query, so hand it a canonical role.
    if let Some(raw) = params.get("role") {
        let role = Role::parse_or_patient(raw);
        if raw != role.as_str() {
            debug!(requested = %raw, role = %role, "Normalizing auth page role");
            return Redirect::to(&format!("/auth?role={}", role)).into_response();
        }
    }
    debug!("Serving auth page");
    serve_page(&state, AUTH_PAGE).await
}

/// Patient home page.
pub async fn patient_home(State(state): State<Arc<AppState>>, auth: AuthSession) -> Response {
    if auth.session.role != Role::Patient {
        warn!(user = %auth.session.email, "Non-patient tried to access /home, redirecting");
        return Redirect::to("/").into_response();
    }
    debug!(user = %auth.session.email, "Serving patient home page");
    serve_page(&state, PATIENT_PAGE).await
}

/// Doctor dashboard.
pub async fn doctor_dashboard(
    State(state): State<Arc<AppState>>,
    DoctorSession(auth): DoctorSession,
) -> Response {
    debug!(user = %auth.session.email, "Serving doctor dashboard");
    serve_page(&state, DOCTOR_PAGE).await
}

fn home_for(role: Role) -> &'static str {
    match role {
        Role::Doctor => "/doctor/dashboard",
        Role::Patient => "/home",
    }
}

async fn serve_page(state: &AppState, page: &str) -> Response {
    let path = state.config.templates_dir().join(page);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read page");
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Page '{}' not found", page),
            )
                .into_response()
        }
    }
}
