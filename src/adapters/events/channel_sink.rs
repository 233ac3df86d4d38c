//! Channel-backed sink feeding one subscriber's response stream.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::ports::{EventFrame, EventSink, SinkError};

/// Sink half of one subscriber connection.
///
/// The paired receiver becomes the SSE response body in the HTTP adapter.
/// When the client goes away the body is dropped, the receiver closes, and
/// the next `send` reports `Closed`, which is the disconnect signal the
/// dispatcher prunes on. The channel is bounded, so a client that stops
/// reading eventually makes `send` wait and run into the dispatcher's
/// write bound instead of buffering frames without limit.
pub struct ChannelSink {
    tx: mpsc::Sender<EventFrame>,
}

impl ChannelSink {
    /// Wraps the sender half of a subscriber's frame channel.
    pub fn new(tx: mpsc::Sender<EventFrame>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&self, frame: EventFrame) -> Result<(), SinkError> {
        self.tx.send(frame).await.map_err(|_| SinkError::Closed)
    }
}
