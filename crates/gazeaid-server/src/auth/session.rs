//! Cookie-backed login sessions.
//!
//! The browser holds a random token; the store only keeps its SHA-256 hash.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use gazeaid_core::Role;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::users::UserRecord;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gazeaid_session";

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Sessions indexed by token hash.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Start a session for `user`, returning the plaintext token.
    ///
    /// Expired sessions are pruned on every login.
    pub async fn create(&self, user: &UserRecord) -> String {
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let token = URL_SAFE_NO_PAD.encode(token_bytes);

        let session = Session {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            expires_at: Utc::now() + self.ttl,
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(hash_token(&token), session);
        token
    }

    /// Resolve a token to a live session. Expired sessions are dropped.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let key = hash_token(token);
        let session = self.sessions.read().await.get(&key).cloned()?;
        if session.is_expired() {
            self.sessions.write().await.remove(&key);
            return None;
        }
        Some(session)
    }

    /// End a session. Returns the removed session, if any.
    pub async fn remove(&self, token: &str) -> Option<Session> {
        self.sessions.write().await.remove(&hash_token(token))
    }

    /// `Set-Cookie` value carrying a new session token.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl.num_seconds()
        )
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extract the session token from a request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// Hash a token using SHA-256.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
