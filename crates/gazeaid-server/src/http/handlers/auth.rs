//! Login, registration and session handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use crate::auth::{expired_cookie, token_from_headers, AuthError, AuthSession, NewUser};
use crate::http::responses::{
    CheckAuthResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
};
use crate::state::AppState;

/// Log a user in and set the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let (Some(email), Some(password)) = (
        req.email.filter(|e| !e.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::MissingCredentials);
    };

    info!(email = %email, "Login attempt");
    let user = state.users.authenticate(&email, &password).await.map_err(|e| {
        warn!(email = %email, "Login failed");
        e
    })?;

    let token = state.sessions.create(&user).await;
    info!(email = %user.email, role = %user.role, "Login successful");

    Ok((
        [(header::SET_COOKIE, state.sessions.cookie(&token))],
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            name: user.name,
            role: user.role,
        }),
    )
        .into_response())
}

/// Register a new account. The user logs in separately afterwards.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    info!(
        email = ?req.email,
        name = ?req.name,
        role = ?req.role,
        "Registration attempt"
    );

    state
        .users
        .register(NewUser {
            email: req.email,
            password: req.password,
            name: req.name,
            role: req.role,
        })
        .await?;

    Ok(Json(MessageResponse::ok(
        "Registration successful. Please log in.",
    )))
}

/// End the current session.
pub async fn logout(State(state): State<Arc<AppState>>, auth: AuthSession) -> impl IntoResponse {
    state.sessions.remove(&auth.token).await;
    info!(email = %auth.session.email, "User logged out");

    (
        [(header::SET_COOKIE, expired_cookie())],
        Json(MessageResponse::ok("Logged out successfully")),
    )
}

/// Report whether the request carries a live session.
pub async fn check_auth(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(auth) = state.current_session(&headers).await {
        debug!(email = %auth.session.email, "Auth check successful");
        return Json(CheckAuthResponse {
            authenticated: true,
            name: Some(auth.session.name),
            role: Some(auth.session.role),
        })
        .into_response();
    }

    let body = Json(CheckAuthResponse {
        authenticated: false,
        name: None,
        role: None,
    });

    if token_from_headers(&headers).is_some() {
        warn!("Unknown or expired session cookie during auth check, clearing");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::SET_COOKIE, expired_cookie())],
            body,
        )
            .into_response();
    }

    debug!("Auth check failed: not authenticated");
    (StatusCode::UNAUTHORIZED, body).into_response()
}
