//! Shared application state.

use std::sync::Arc;

use axum::http::HeaderMap;
use gazeaid_launcher::Supervisor;

use crate::auth::{token_from_headers, AuthSession, SessionStore, UserStore};
use crate::config::{Config, ConfigError};

/// Shared application state.
pub struct AppState {
    /// Configuration the server was started with.
    pub config: Config,

    /// Script launch supervisor.
    pub supervisor: Supervisor,

    /// Registered users indexed by email.
    pub users: UserStore,

    /// Login sessions.
    pub sessions: SessionStore,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(config: Config) -> Result<Arc<Self>, ConfigError> {
        let supervisor = Supervisor::new(config.supervisor_config()?);
        Ok(Self::with_supervisor(config, supervisor))
    }

    /// Create a new AppState around an existing supervisor.
    pub fn with_supervisor(config: Config, supervisor: Supervisor) -> Arc<Self> {
        Arc::new(Self {
            users: UserStore::with_seed(&config.seed_users),
            sessions: SessionStore::new(config.session_ttl_hours),
            supervisor,
            config,
        })
    }

    /// The session named by the request's cookie, if it is live.
    pub async fn current_session(&self, headers: &HeaderMap) -> Option<AuthSession> {
        let token = token_from_headers(headers)?;
        let session = self.sessions.get(&token).await?;
        Some(AuthSession { token, session })
    }
}
