//! Subscriber registry for workspace-scoped event streams.
//!
//! Connections are tracked per workspace, allowing targeted broadcast of
//! workspace events to exactly the clients subscribed to that workspace.
//!
//! ```text
//! workspace w1         workspace w2
//! ├── subscriber-a     ├── subscriber-d
//! ├── subscriber-b     └── subscriber-e
//! └── subscriber-c
//! ```
//!
//! # Thread Safety
//!
//! A `RwLock` guards the workspace map since broadcast snapshots (reads)
//! vastly outnumber subscribes and unsubscribes (writes). All mutation and
//! all lookup goes through this type; nothing else touches the per-workspace
//! sets.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{SubscriberId, WorkspaceId};
use crate::ports::EventSink;

/// Tracks, per workspace, the live set of subscriber handles.
///
/// Entries are created lazily on first subscription and deleted as soon as
/// the last handle leaves, so memory stays proportional to active
/// subscriptions rather than historical ones.
pub struct SubscriberRegistry {
    workspaces: RwLock<HashMap<WorkspaceId, HashMap<SubscriberId, Arc<dyn EventSink>>>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            workspaces: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a handle to a workspace's set, creating the set if absent.
    ///
    /// Registering an id that is already present replaces its sink. Callers
    /// generate a fresh `SubscriberId` per connection, so this does not
    /// happen in normal operation.
    pub async fn register(
        &self,
        workspace_id: &WorkspaceId,
        subscriber_id: SubscriberId,
        sink: Arc<dyn EventSink>,
    ) {
        let mut workspaces = self.workspaces.write().await;
        workspaces
            .entry(workspace_id.clone())
            .or_default()
            .insert(subscriber_id, sink);
    }

    /// Removes a handle from a workspace's set.
    ///
    /// No-op when the workspace entry or the handle is already gone, so the
    /// disconnect path and the dispatcher's pruning path can race freely.
    /// Removal of the last handle deletes the workspace entry.
    pub async fn deregister(&self, workspace_id: &WorkspaceId, subscriber_id: &SubscriberId) {
        let mut workspaces = self.workspaces.write().await;
        if let Some(handles) = workspaces.get_mut(workspace_id) {
            handles.remove(subscriber_id);
            if handles.is_empty() {
                workspaces.remove(workspace_id);
            }
        }
    }

    /// Returns a copy of the current handle set for broadcast iteration.
    ///
    /// The copy is safe to iterate while registrations and deregistrations
    /// proceed concurrently; it reflects the set at the moment of the call.
    /// Empty when the workspace has no entry.
    pub async fn snapshot(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Vec<(SubscriberId, Arc<dyn EventSink>)> {
        let workspaces = self.workspaces.read().await;
        workspaces
            .get(workspace_id)
            .map(|handles| {
                handles
                    .iter()
                    .map(|(id, sink)| (*id, Arc::clone(sink)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of handles currently registered for a workspace.
    pub async fn subscriber_count(&self, workspace_id: &WorkspaceId) -> usize {
        let workspaces = self.workspaces.read().await;
        workspaces
            .get(workspace_id)
            .map(|handles| handles.len())
            .unwrap_or(0)
    }

    /// All workspace ids that currently have at least one subscriber.
    pub async fn active_workspaces(&self) -> Vec<WorkspaceId> {
        self.workspaces.read().await.keys().cloned().collect()
    }

    /// Total handles across all workspaces.
    pub async fn total_subscriber_count(&self) -> usize {
        self.workspaces
            .read()
            .await
            .values()
            .map(|handles| handles.len())
            .sum()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::ports::{EventFrame, SinkError};

    /// Sink that accepts every write. Registry tests only care about set
    /// membership, not delivery.
    struct NullSink;

    #[async_trait]
    impl EventSink for NullSink {
        async fn send(&self, _frame: EventFrame) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn workspace(id: &str) -> WorkspaceId {
        WorkspaceId::new(id).unwrap()
    }

    fn sink() -> Arc<dyn EventSink> {
        Arc::new(NullSink)
    }

    #[tokio::test]
    async fn register_creates_workspace_entry_lazily() {
        let registry = SubscriberRegistry::new();
        assert!(registry.active_workspaces().await.is_empty());

        registry.register(&workspace("w1"), SubscriberId::new(), sink()).await;

        assert_eq!(registry.active_workspaces().await, vec![workspace("w1")]);
        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
    }

    #[tokio::test]
    async fn deregister_of_last_handle_deletes_the_entry() {
        let registry = SubscriberRegistry::new();
        let id = SubscriberId::new();

        registry.register(&workspace("w1"), id, sink()).await;
        registry.deregister(&workspace("w1"), &id).await;

        assert!(registry.active_workspaces().await.is_empty());
        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 0);
    }

    #[tokio::test]
    async fn deregister_keeps_entry_while_handles_remain() {
        let registry = SubscriberRegistry::new();
        let first = SubscriberId::new();
        let second = SubscriberId::new();

        registry.register(&workspace("w1"), first, sink()).await;
        registry.register(&workspace("w1"), second, sink()).await;
        registry.deregister(&workspace("w1"), &first).await;

        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
        let snapshot = registry.snapshot(&workspace("w1")).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, second);
    }

    #[tokio::test]
    async fn deregister_tolerates_unknown_workspace_and_handle() {
        let registry = SubscriberRegistry::new();

        // Unknown workspace.
        registry.deregister(&workspace("ghost"), &SubscriberId::new()).await;

        // Known workspace, unknown handle.
        registry.register(&workspace("w1"), SubscriberId::new(), sink()).await;
        registry.deregister(&workspace("w1"), &SubscriberId::new()).await;

        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
    }

    #[tokio::test]
    async fn snapshot_of_unknown_workspace_is_empty() {
        let registry = SubscriberRegistry::new();
        assert!(registry.snapshot(&workspace("w2")).await.is_empty());
    }

    #[tokio::test]
    async fn workspaces_track_handles_independently() {
        let registry = SubscriberRegistry::new();

        registry.register(&workspace("w1"), SubscriberId::new(), sink()).await;
        registry.register(&workspace("w1"), SubscriberId::new(), sink()).await;
        registry.register(&workspace("w2"), SubscriberId::new(), sink()).await;

        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 2);
        assert_eq!(registry.subscriber_count(&workspace("w2")).await, 1);
        assert_eq!(registry.total_subscriber_count().await, 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::{HashMap as StdHashMap, HashSet};

        const WORKSPACES: usize = 3;
        const SLOTS: usize = 8;

        #[derive(Debug, Clone)]
        enum Op {
            Register { workspace: usize, slot: usize },
            Deregister { workspace: usize, slot: usize },
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..WORKSPACES, 0..SLOTS)
                    .prop_map(|(workspace, slot)| Op::Register { workspace, slot }),
                (0..WORKSPACES, 0..SLOTS)
                    .prop_map(|(workspace, slot)| Op::Deregister { workspace, slot }),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// For any sequence of register/deregister operations the
            /// registry holds exactly the not-yet-deregistered handles, and
            /// a workspace entry exists iff its set is non-empty.
            #[test]
            fn registry_matches_a_set_model(
                ops in proptest::collection::vec(op_strategy(), 0..40)
            ) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let registry = SubscriberRegistry::new();
                    let workspaces: Vec<WorkspaceId> = (0..WORKSPACES)
                        .map(|w| workspace(&format!("w{}", w)))
                        .collect();
                    // One fixed id per (workspace, slot) pair keeps every
                    // handle registered under a single workspace.
                    let ids: Vec<Vec<SubscriberId>> = (0..WORKSPACES)
                        .map(|_| (0..SLOTS).map(|_| SubscriberId::new()).collect())
                        .collect();

                    let mut model: StdHashMap<usize, HashSet<SubscriberId>> = StdHashMap::new();

                    for op in &ops {
                        match *op {
                            Op::Register { workspace: w, slot: s } => {
                                registry.register(&workspaces[w], ids[w][s], sink()).await;
                                model.entry(w).or_default().insert(ids[w][s]);
                            }
                            Op::Deregister { workspace: w, slot: s } => {
                                registry.deregister(&workspaces[w], &ids[w][s]).await;
                                if let Some(set) = model.get_mut(&w) {
                                    set.remove(&ids[w][s]);
                                    if set.is_empty() {
                                        model.remove(&w);
                                    }
                                }
                            }
                        }
                    }

                    for (w, workspace_id) in workspaces.iter().enumerate() {
                        let expected = model.get(&w).cloned().unwrap_or_default();
                        let actual: HashSet<SubscriberId> = registry
                            .snapshot(workspace_id)
                            .await
                            .into_iter()
                            .map(|(id, _)| id)
                            .collect();
                        prop_assert_eq!(&actual, &expected);
                        prop_assert_eq!(
                            registry.active_workspaces().await.contains(workspace_id),
                            !expected.is_empty()
                        );
                    }
                    Ok(())
                })?;
            }
        }
    }
}
