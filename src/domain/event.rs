//! The event envelope pushed to workspace subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// An opaque, type-tagged event scoped to one workspace.
///
/// The subsystem never interprets the payload; producers embed whatever the
/// subscribers of a workspace need (task snapshots, member changes, ...).
/// Events are immutable once constructed and carry no identity of their own,
/// no sequence number and no timestamp. Producers that need one embed it in
/// the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEvent {
    /// Event name used for client-side routing (e.g. "task.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Arbitrary JSON payload.
    pub payload: JsonValue,
}

impl WorkspaceEvent {
    /// Creates a new event from a type tag and payload.
    pub fn new(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}
