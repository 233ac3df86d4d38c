//! EventSink port - one open push connection to a subscriber.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::WorkspaceEvent;

/// Wire form of one event, shared by every handle of a single broadcast.
///
/// Serialization happens once per broadcast; each sink receives a clone of
/// the two strings rather than re-encoding the payload. On the stream this
/// becomes an `event: <name>` line followed by a `data: <json>` line and a
/// blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    /// Event name for the `event:` line.
    pub event: String,

    /// JSON object `{"type": ..., "payload": ...}` for the `data:` line.
    pub data: String,
}

impl EventFrame {
    /// Encodes an event into its wire form.
    pub fn from_event(event: &WorkspaceEvent) -> Self {
        Self {
            event: event.event_type.clone(),
            data: serde_json::to_string(event)
                .expect("workspace event serialization should not fail"),
        }
    }
}

/// Error a sink reports for one failed write attempt.
///
/// The transport has no separate liveness signal, so the dispatcher treats
/// any sink error as a disconnect.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The subscriber's transport is gone (client disconnected).
    #[error("subscriber connection closed")]
    Closed,
}

/// Port for pushing framed events to one subscriber connection.
///
/// Implementations are held behind `Arc` in the registry and must tolerate
/// concurrent sends racing with registration changes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Attempts to deliver one frame to the subscriber.
    ///
    /// A returned error means the connection should be considered dead.
    async fn send(&self, frame: EventFrame) -> Result<(), SinkError>;
}
