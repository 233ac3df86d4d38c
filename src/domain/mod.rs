//! Domain types for workspace event distribution.
//!
//! Value objects and pure logic only - no IO and no framework types beyond
//! `serde_json::Value` for opaque payloads.

mod auth;
mod authorization;
mod errors;
mod event;
mod ids;

pub use auth::{AuthError, AuthenticatedUser};
pub use authorization::{role_guard, role_permissions, Permission, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use event::WorkspaceEvent;
pub use ids::{SubscriberId, UserId, WorkspaceId};
