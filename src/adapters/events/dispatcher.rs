//! Broadcast dispatcher: best-effort fan-out of one event to one workspace.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::domain::{WorkspaceEvent, WorkspaceId};
use crate::ports::{EventFrame, WorkspaceBroadcaster};

use super::registry::SubscriberRegistry;

/// Delivers events to every live handle of a workspace.
///
/// Failure isolation is per handle: a write that errors or exceeds the
/// write bound marks that handle dead and deregisters it without touching
/// delivery to the rest of the snapshot. The operation itself never fails
/// outward; "no subscribers" and "every write failed" are both successful
/// broadcasts from the producing operation's point of view.
///
/// Each handle's writes go through that handle's own FIFO channel, so a
/// producing context that awaits its broadcast calls observes per-subscriber
/// delivery in call order.
pub struct EventDispatcher {
    registry: Arc<SubscriberRegistry>,
    write_timeout: Duration,
}

impl EventDispatcher {
    /// Creates a dispatcher over a registry with the given per-write bound.
    ///
    /// The bound keeps one stalled client from delaying delivery to the
    /// other handles sharing the same dispatch call.
    pub fn new(registry: Arc<SubscriberRegistry>, write_timeout: Duration) -> Self {
        Self {
            registry,
            write_timeout,
        }
    }
}

#[async_trait]
impl WorkspaceBroadcaster for EventDispatcher {
    async fn broadcast(&self, workspace_id: &WorkspaceId, event: WorkspaceEvent) {
        let handles = self.registry.snapshot(workspace_id).await;
        if handles.is_empty() {
            return;
        }

        // One serialization shared by every handle in this broadcast.
        let frame = EventFrame::from_event(&event);

        for (subscriber_id, sink) in handles {
            let delivered = matches!(
                timeout(self.write_timeout, sink.send(frame.clone())).await,
                Ok(Ok(()))
            );

            if !delivered {
                // A failed or stalled write is the disconnect signal; drop
                // the handle so later broadcasts skip it.
                tracing::debug!(
                    workspace_id = %workspace_id,
                    subscriber_id = %subscriber_id,
                    event_type = %event.event_type,
                    "dropping unreachable subscriber"
                );
                self.registry.deregister(workspace_id, &subscriber_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::domain::SubscriberId;
    use crate::ports::{EventSink, SinkError};

    const WRITE_TIMEOUT: Duration = Duration::from_millis(50);

    /// Sink that records every frame it accepts.
    struct RecordingSink {
        frames: Mutex<Vec<EventFrame>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                frames: Mutex::new(Vec::new()),
            })
        }

        fn frames(&self) -> Vec<EventFrame> {
            self.frames.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn send(&self, frame: EventFrame) -> Result<(), SinkError> {
            self.frames.lock().unwrap().push(frame);
            Ok(())
        }
    }

    /// Sink whose transport is already gone.
    struct ClosedSink;

    #[async_trait]
    impl EventSink for ClosedSink {
        async fn send(&self, _frame: EventFrame) -> Result<(), SinkError> {
            Err(SinkError::Closed)
        }
    }

    /// Sink that never completes a write.
    struct StalledSink;

    #[async_trait]
    impl EventSink for StalledSink {
        async fn send(&self, _frame: EventFrame) -> Result<(), SinkError> {
            futures::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn workspace(id: &str) -> WorkspaceId {
        WorkspaceId::new(id).unwrap()
    }

    fn dispatcher(registry: &Arc<SubscriberRegistry>) -> EventDispatcher {
        EventDispatcher::new(Arc::clone(registry), WRITE_TIMEOUT)
    }

    fn test_event() -> WorkspaceEvent {
        WorkspaceEvent::new("task.updated", json!({"id": "t1"}))
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_completes_silently() {
        let registry = Arc::new(SubscriberRegistry::new());
        dispatcher(&registry).broadcast(&workspace("w2"), test_event()).await;

        assert!(registry.active_workspaces().await.is_empty());
    }

    #[tokio::test]
    async fn broadcast_delivers_to_every_handle() {
        let registry = Arc::new(SubscriberRegistry::new());
        let sinks: Vec<_> = (0..3).map(|_| RecordingSink::new()).collect();
        for sink in &sinks {
            registry
                .register(&workspace("w1"), SubscriberId::new(), Arc::clone(sink))
                .await;
        }

        dispatcher(&registry).broadcast(&workspace("w1"), test_event()).await;

        for sink in &sinks {
            let frames = sink.frames();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0].event, "task.updated");
        }
    }

    #[tokio::test]
    async fn failing_handle_is_pruned_without_affecting_others() {
        let registry = Arc::new(SubscriberRegistry::new());
        let healthy = RecordingSink::new();
        let dead_id = SubscriberId::new();

        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::clone(&healthy))
            .await;
        registry.register(&workspace("w1"), dead_id, Arc::new(ClosedSink)).await;

        dispatcher(&registry).broadcast(&workspace("w1"), test_event()).await;

        assert_eq!(healthy.frames().len(), 1);
        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
        let remaining = registry.snapshot(&workspace("w1")).await;
        assert!(remaining.iter().all(|(id, _)| *id != dead_id));
    }

    #[tokio::test]
    async fn stalled_handle_is_bounded_and_pruned() {
        let registry = Arc::new(SubscriberRegistry::new());
        let healthy = RecordingSink::new();

        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::new(StalledSink))
            .await;
        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::clone(&healthy))
            .await;

        dispatcher(&registry).broadcast(&workspace("w1"), test_event()).await;

        // The stalled write hit the bound and its handle is gone; the
        // healthy handle still got the event.
        assert_eq!(healthy.frames().len(), 1);
        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
    }

    #[tokio::test]
    async fn broadcasts_stay_within_their_workspace() {
        let registry = Arc::new(SubscriberRegistry::new());
        let in_w1 = RecordingSink::new();
        let in_w2 = RecordingSink::new();

        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::clone(&in_w1))
            .await;
        registry
            .register(&workspace("w2"), SubscriberId::new(), Arc::clone(&in_w2))
            .await;

        dispatcher(&registry).broadcast(&workspace("w1"), test_event()).await;

        assert_eq!(in_w1.frames().len(), 1);
        assert!(in_w2.frames().is_empty());
    }

    #[tokio::test]
    async fn deregistered_handle_is_not_written_to() {
        let registry = Arc::new(SubscriberRegistry::new());
        let staying = RecordingSink::new();
        let leaving = RecordingSink::new();
        let leaving_id = SubscriberId::new();

        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::clone(&staying))
            .await;
        registry
            .register(&workspace("w1"), leaving_id, Arc::clone(&leaving))
            .await;

        let dispatcher = dispatcher(&registry);
        dispatcher.broadcast(&workspace("w1"), test_event()).await;

        registry.deregister(&workspace("w1"), &leaving_id).await;
        dispatcher
            .broadcast(&workspace("w1"), WorkspaceEvent::new("task.deleted", json!({"id": "t1"})))
            .await;

        assert_eq!(staying.frames().len(), 2);
        assert_eq!(leaving.frames().len(), 1);
        assert_eq!(registry.subscriber_count(&workspace("w1")).await, 1);
    }

    #[tokio::test]
    async fn one_handle_sees_broadcasts_in_call_order() {
        let registry = Arc::new(SubscriberRegistry::new());
        let sink = RecordingSink::new();
        registry
            .register(&workspace("w1"), SubscriberId::new(), Arc::clone(&sink))
            .await;

        let dispatcher = dispatcher(&registry);
        for n in 0..5 {
            dispatcher
                .broadcast(&workspace("w1"), WorkspaceEvent::new("task.updated", json!({"seq": n})))
                .await;
        }

        let payloads: Vec<String> = sink.frames().into_iter().map(|f| f.data).collect();
        let expected: Vec<String> = (0..5)
            .map(|n| format!(r#"{{"type":"task.updated","payload":{{"seq":{}}}}}"#, n))
            .collect();
        assert_eq!(payloads, expected);
    }
}
