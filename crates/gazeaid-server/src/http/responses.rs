//! HTTP request and response types.

use axum::http::StatusCode;
use gazeaid_core::{LaunchOutcome, Role};
use gazeaid_launcher::LaunchError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth types
// ============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub name: String,
    /// Lets the client pick where to redirect.
    pub role: Role,
}

/// Request body for the register endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Plain success response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response body for the check-auth endpoint.
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ============================================================================
// Script launch types
// ============================================================================

/// Request body for the run-script endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RunScriptRequest {
    pub script: Option<String>,
}

/// Response body for the run-script endpoint.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunScriptResponse {
    pub success: bool,
    pub already_running: bool,
    /// Human-readable summary; repeats `error` on failure.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RunScriptResponse {
    fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            message: error.clone(),
            error: Some(error),
            ..Self::default()
        }
    }

    /// Rejection for a request that named no script.
    pub fn no_script() -> (StatusCode, Self) {
        (StatusCode::BAD_REQUEST, Self::failure("No script specified"))
    }

    /// Map a launch outcome to its status code and body.
    pub fn from_outcome(script: &str, outcome: LaunchOutcome) -> (StatusCode, Self) {
        match outcome {
            LaunchOutcome::AlreadyRunning => (
                StatusCode::OK,
                Self {
                    success: true,
                    already_running: true,
                    message: format!("{} is already running.", script),
                    ..Self::default()
                },
            ),
            LaunchOutcome::StartedRunning { pid } => (
                StatusCode::OK,
                Self {
                    success: true,
                    message: format!("{} started successfully.", script),
                    pid: Some(pid),
                    ..Self::default()
                },
            ),
            LaunchOutcome::StartedAndExitedOk { pid } => (
                StatusCode::OK,
                Self {
                    success: true,
                    message: format!("{} started (and finished almost immediately).", script),
                    pid: Some(pid),
                    ..Self::default()
                },
            ),
            LaunchOutcome::StartedAndExitedError { stderr_tail, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Self {
                    details: Some(stderr_tail),
                    ..Self::failure(format!("{} failed to start properly.", script))
                },
            ),
        }
    }

    /// Map a launch error to its status code and body.
    pub fn from_error(script: &str, error: &LaunchError) -> (StatusCode, Self) {
        match error {
            LaunchError::UnknownTask(_) => {
                (StatusCode::BAD_REQUEST, Self::failure("Invalid script name"))
            }
            LaunchError::ScriptNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Self::failure(format!("Script '{}' not found on server.", script)),
            ),
            LaunchError::InterpreterNotFound { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Self::failure("Server configuration error: Failed to find the script interpreter."),
            ),
            LaunchError::Spawn { source, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Self::failure(format!("Server OS error prevented script start: {}", source)),
            ),
            LaunchError::Unexpected { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Self::failure(format!("An unexpected server error occurred: {}", message)),
            ),
        }
    }
}
