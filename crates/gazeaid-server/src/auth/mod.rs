//! Authentication: credential store, sessions and request extractors.

mod session;
mod users;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use gazeaid_core::Role;
use thiserror::Error;
use tracing::{info, warn};

use crate::http::responses::ErrorResponse;
use crate::state::AppState;

pub use session::{expired_cookie, token_from_headers, Session, SessionStore, SESSION_COOKIE};
pub use users::{NewUser, UserRecord, UserStore, MIN_PASSWORD_LEN};

/// Login and registration failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid role specified")]
    InvalidRole,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// The session of a logged-in user. Rejects with a redirect to the landing
/// page when there is none.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match state.current_session(&parts.headers).await {
            Some(auth) => Ok(auth),
            None => {
                info!(path = %parts.uri.path(), "Login required, redirecting to landing");
                Err(Redirect::to("/"))
            }
        }
    }
}

/// A logged-in doctor. Everyone else is redirected to the landing page.
#[derive(Debug, Clone)]
pub struct DoctorSession(pub AuthSession);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for DoctorSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state).await?;
        if auth.session.role != Role::Doctor {
            warn!(
                path = %parts.uri.path(),
                user = %auth.session.email,
                role = %auth.session.role,
                "Doctor role required, redirecting"
            );
            return Err(Redirect::to("/"));
        }
        Ok(Self(auth))
    }
}
