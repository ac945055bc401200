//! In-memory credential store.
//!
//! Passwords are never stored in the clear: each record keeps a random salt
//! and the SHA-256 of salt + password.

use std::collections::HashMap;

use gazeaid_core::Role;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::AuthError;
use crate::config::SeedUser;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub role: Role,
    salt: String,
    password_hash: String,
}

impl UserRecord {
    fn new(email: String, name: String, role: Role, password: &str) -> Self {
        let mut salt_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let password_hash = hash_password(&salt, password);

        Self {
            email,
            name,
            role,
            salt,
            password_hash,
        }
    }

    /// Check a candidate password.
    pub fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.password_hash
    }
}

/// Hash a password with its salt using SHA-256.
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Registration form after deserialization.
#[derive(Debug, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Users indexed by email.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    /// Create a store holding the seed accounts.
    pub fn with_seed(seed: &[SeedUser]) -> Self {
        let users = seed
            .iter()
            .map(|u| {
                let record = UserRecord::new(u.email.clone(), u.name.clone(), u.role, &u.password);
                (u.email.clone(), record)
            })
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Look up a user by email and check the password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        let users = self.users.read().await;
        match users.get(email) {
            Some(user) if user.verify(password) => Ok(user.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Validate and store a new account.
    pub async fn register(&self, form: NewUser) -> Result<UserRecord, AuthError> {
        let (Some(email), Some(password), Some(name), Some(role)) = (
            non_empty(form.email),
            non_empty(form.password),
            non_empty(form.name),
            non_empty(form.role),
        ) else {
            warn!("Registration failed: missing required fields");
            return Err(AuthError::MissingFields);
        };

        // Exact match: registration does not lowercase the role.
        let role = match role.as_str() {
            "patient" => Role::Patient,
            "doctor" => Role::Doctor,
            _ => {
                warn!(role = %role, "Registration failed: invalid role");
                return Err(AuthError::InvalidRole);
            }
        };

        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            warn!(email = %email, "Registration failed: email already exists");
            return Err(AuthError::EmailTaken);
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            warn!(email = %email, "Registration failed: password too short");
            return Err(AuthError::PasswordTooShort);
        }

        let record = UserRecord::new(email.clone(), name, role, &password);
        users.insert(email, record.clone());
        info!(email = %record.email, role = %record.role, "Registration successful");
        Ok(record)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
