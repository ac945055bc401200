//! Script launch handler.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{info, warn};

use crate::auth::AuthSession;
use crate::http::responses::{RunScriptRequest, RunScriptResponse};
use crate::state::AppState;

/// Start an allow-listed game script in the background.
pub async fn run_script(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Json(req): Json<RunScriptRequest>,
) -> impl IntoResponse {
    let user = &auth.session.email;

    let Some(script) = req.script.filter(|s| !s.is_empty()) else {
        warn!(user = %user, "run-script: no script specified");
        let (status, body) = RunScriptResponse::no_script();
        return (status, Json(body));
    };

    info!(user = %user, script = %script, "run-script requested");

    let (status, body) = match state.supervisor.launch(&script).await {
        Ok(outcome) => {
            info!(
                user = %user,
                script = %script,
                success = outcome.is_success(),
                pid = ?outcome.pid(),
                "run-script finished"
            );
            RunScriptResponse::from_outcome(&script, outcome)
        }
        Err(e) => {
            warn!(user = %user, script = %script, error = %e, "run-script rejected");
            RunScriptResponse::from_error(&script, &e)
        }
    };
    (status, Json(body))
}
