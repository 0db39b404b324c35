//! AuthProvider trait — the contract for authentication strategies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authentication strategy.
///
/// The lifecycle is: `initialize()` once at startup, then any number of
/// `authenticate()` / `verify_token()` calls.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Prepare the provider (load keys, connect to an identity service, ...).
    async fn initialize(&self) -> Result<(), AuthError>;

    /// Authenticate a user from opaque credentials.
    ///
    /// Fails with [`AuthError::InvalidCredentials`] when the credentials are
    /// rejected.
    async fn authenticate(&self, credentials: &Value) -> Result<AuthOutcome, AuthError>;

    /// Resolve a token to its user. `Ok(None)` when the token is not valid.
    async fn verify_token(&self, token: &str) -> Result<Option<Value>, AuthError>;
}

/// Result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub user: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthOutcome {
    pub fn new(user: Value) -> Self {
        Self { user, token: None }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth provider not initialized")]
    NotInitialized,

    #[error("Auth backend unavailable: {0}")]
    Unavailable(String),
}
