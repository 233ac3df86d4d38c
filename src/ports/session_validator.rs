//! SessionValidator port - token validation behind the auth boundary.

use async_trait::async_trait;

use crate::domain::{AuthError, AuthenticatedUser};

/// Port for validating a caller's session token.
///
/// The session mechanism itself is owned by the surrounding application;
/// this subsystem only needs "token in, authenticated user out" before it
/// will open a stream.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates a Bearer token and returns the authenticated caller.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
