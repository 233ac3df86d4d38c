//! Authentication types shared with the session-validation port.
//!
//! These types represent an authenticated caller as seen by this subsystem.
//! They have no provider dependencies; whatever session mechanism the
//! surrounding application runs (OIDC, opaque cookies, ...) populates them
//! through the `SessionValidator` port.

use thiserror::Error;

use super::UserId;

/// Authenticated caller extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the session service.
    pub id: UserId,

    /// User's email address from the session claims.
    pub email: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Authentication errors surfaced during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The session service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_holds_identity() {
        let user = AuthenticatedUser::new(UserId::new("u-1").unwrap(), "alice@example.com");
        assert_eq!(user.id.as_str(), "u-1");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn auth_error_messages() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
        assert!(AuthError::ServiceUnavailable("down".into())
            .to_string()
            .contains("down"));
    }
}
