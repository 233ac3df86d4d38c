//! WorkspaceBroadcaster port - broadcast entry point for business logic.

use async_trait::async_trait;

use crate::domain::{WorkspaceEvent, WorkspaceId};

/// Port business-logic operations call after mutating workspace state.
///
/// Delivery is best-effort and fire-and-forget. The call never fails and
/// returns no per-subscriber report, so a slow or disconnected viewer can
/// never slow down or fail the producing operation. Broadcasting to a
/// workspace with no subscribers is a normal outcome.
#[async_trait]
pub trait WorkspaceBroadcaster: Send + Sync {
    /// Pushes `event` to every live subscriber of `workspace_id`.
    async fn broadcast(&self, workspace_id: &WorkspaceId, event: WorkspaceEvent);
}
