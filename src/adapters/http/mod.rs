//! HTTP adapters - the workspace stream endpoint and its middleware.

pub mod events;
pub mod middleware;

// Re-export key types for convenience
pub use events::{events_router, EventsAppState};
