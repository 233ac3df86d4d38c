//! Event stream tuning

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tuning for subscriber streams and broadcast writes
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// Bound on a single broadcast write to one subscriber, in milliseconds.
    /// A write that exceeds this is treated as a dead connection.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    /// Interval between SSE keep-alive comments, in seconds
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Per-subscriber frame buffer. Larger values absorb bursts for slow
    /// readers at the cost of memory per connection.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

impl StreamConfig {
    /// Write bound as a `Duration`
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Keep-alive interval as a `Duration`
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Validate stream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.write_timeout_ms == 0 {
            return Err(ValidationError::InvalidWriteTimeout);
        }
        if self.subscriber_buffer == 0 {
            return Err(ValidationError::InvalidSubscriberBuffer);
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: default_write_timeout_ms(),
            keep_alive_secs: default_keep_alive_secs(),
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

fn default_write_timeout_ms() -> u64 {
    5000
}

fn default_keep_alive_secs() -> u64 {
    15
}

fn default_subscriber_buffer() -> usize {
    64
}
