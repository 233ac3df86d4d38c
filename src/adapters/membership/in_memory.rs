//! In-memory workspace membership directory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, Role, UserId, WorkspaceId};
use crate::ports::MembershipResolver;

/// Membership directory backed by an in-memory role table.
#[derive(Debug, Default)]
pub struct InMemoryMembershipDirectory {
    roles: RwLock<HashMap<(UserId, WorkspaceId), Role>>,
}

impl InMemoryMembershipDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to a user within a workspace.
    pub fn grant(&self, user_id: UserId, workspace_id: WorkspaceId, role: Role) {
        self.roles
            .write()
            .unwrap()
            .insert((user_id, workspace_id), role);
    }

    /// Revokes a user's membership in a workspace.
    pub fn revoke(&self, user_id: &UserId, workspace_id: &WorkspaceId) {
        self.roles
            .write()
            .unwrap()
            .remove(&(user_id.clone(), workspace_id.clone()));
    }
}

#[async_trait]
impl MembershipResolver for InMemoryMembershipDirectory {
    async fn role_in_workspace(
        &self,
        user_id: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<Role>, DomainError> {
        Ok(self
            .roles
            .read()
            .unwrap()
            .get(&(user_id.clone(), workspace_id.clone()))
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn workspace(id: &str) -> WorkspaceId {
        WorkspaceId::new(id).unwrap()
    }

    #[tokio::test]
    async fn granted_role_resolves() {
        let directory = InMemoryMembershipDirectory::new();
        directory.grant(user("u-1"), workspace("w1"), Role::Admin);

        let role = directory
            .role_in_workspace(&user("u-1"), &workspace("w1"))
            .await
            .unwrap();
        assert_eq!(role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn unknown_user_is_not_a_member() {
        let directory = InMemoryMembershipDirectory::new();

        let role = directory
            .role_in_workspace(&user("u-1"), &workspace("w1"))
            .await
            .unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn revoked_membership_stops_resolving() {
        let directory = InMemoryMembershipDirectory::new();
        directory.grant(user("u-1"), workspace("w1"), Role::Member);
        directory.revoke(&user("u-1"), &workspace("w1"));

        let role = directory
            .role_in_workspace(&user("u-1"), &workspace("w1"))
            .await
            .unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn memberships_are_per_workspace() {
        let directory = InMemoryMembershipDirectory::new();
        directory.grant(user("u-1"), workspace("w1"), Role::Owner);

        let elsewhere = directory
            .role_in_workspace(&user("u-1"), &workspace("w2"))
            .await
            .unwrap();
        assert_eq!(elsewhere, None);
    }
}
