//! In-memory session validation for development and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Session validator backed by a static token table.
///
/// Tokens map directly to users; anything not in the table is rejected as
/// invalid. Stands in for the surrounding application's session service in
/// the development server and in tests.
///
/// # Example
///
/// ```ignore
/// let validator = StaticSessionValidator::new()
///     .with_user("alice-token", AuthenticatedUser::new(
///         UserId::new("u-alice")?,
///         "alice@example.com",
///     ));
/// assert!(validator.validate("alice-token").await.is_ok());
/// ```
#[derive(Debug, Default)]
pub struct StaticSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl StaticSessionValidator {
    /// Creates an empty validator that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Registers a token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for StaticSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
