//! Role-based permission checks for workspace access.
//!
//! The surrounding application resolves which role a caller holds inside a
//! workspace; this module owns the static role to permission table and the
//! superset check that gates an operation on the permissions it requires.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::DomainError;

/// A member's role within one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

/// Workspace-scoped permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ViewOnly,
    CreateProject,
    EditProject,
    DeleteProject,
    CreateTask,
    EditTask,
    DeleteTask,
    AddMember,
    ChangeMemberRole,
    RemoveMember,
    EditWorkspace,
    DeleteWorkspace,
    ManageWorkspaceSettings,
}

const OWNER_PERMISSIONS: &[Permission] = &[
    Permission::ViewOnly,
    Permission::CreateProject,
    Permission::EditProject,
    Permission::DeleteProject,
    Permission::CreateTask,
    Permission::EditTask,
    Permission::DeleteTask,
    Permission::AddMember,
    Permission::ChangeMemberRole,
    Permission::RemoveMember,
    Permission::EditWorkspace,
    Permission::DeleteWorkspace,
    Permission::ManageWorkspaceSettings,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewOnly,
    Permission::CreateProject,
    Permission::EditProject,
    Permission::DeleteProject,
    Permission::CreateTask,
    Permission::EditTask,
    Permission::DeleteTask,
    Permission::AddMember,
    Permission::ManageWorkspaceSettings,
];

const MEMBER_PERMISSIONS: &[Permission] = &[
    Permission::ViewOnly,
    Permission::CreateTask,
    Permission::EditTask,
];

static ROLE_PERMISSIONS: Lazy<HashMap<Role, &'static [Permission]>> = Lazy::new(|| {
    HashMap::from([
        (Role::Owner, OWNER_PERMISSIONS),
        (Role::Admin, ADMIN_PERMISSIONS),
        (Role::Member, MEMBER_PERMISSIONS),
    ])
});

const PERMISSION_DENIED_MESSAGE: &str =
    "You do not have the necessary permissions to perform this action";

/// Returns the permission set granted to a role.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    ROLE_PERMISSIONS.get(&role).copied().unwrap_or(&[])
}

/// Checks that `role` grants every permission in `required`.
///
/// Fails with an `Unauthorized` error when the role has no entry in the
/// permission table or any required permission is missing from its set.
pub fn role_guard(role: Role, required: &[Permission]) -> Result<(), DomainError> {
    let granted = ROLE_PERMISSIONS
        .get(&role)
        .ok_or_else(|| DomainError::unauthorized(PERMISSION_DENIED_MESSAGE))?;

    let has_permission = required.iter().all(|permission| granted.contains(permission));
    if !has_permission {
        return Err(DomainError::unauthorized(PERMISSION_DENIED_MESSAGE));
    }

    Ok(())
}
