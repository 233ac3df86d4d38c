//! MembershipResolver port - workspace membership lookup.

use async_trait::async_trait;

use crate::domain::{DomainError, Role, UserId, WorkspaceId};

/// Port for resolving the role a user holds within a workspace.
///
/// Membership records are owned by the surrounding application's workspace
/// module; the subscribe path only needs the caller's role to run the
/// permission guard before a handle is registered.
#[async_trait]
pub trait MembershipResolver: Send + Sync {
    /// Returns the caller's role in the workspace, `None` when the caller
    /// is not a member.
    async fn role_in_workspace(
        &self,
        user_id: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<Role>, DomainError>;
}
