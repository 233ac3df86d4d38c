//! Ports - interfaces between the event subsystem and the outside world.
//!
//! Following hexagonal architecture, ports define the contracts and adapters
//! implement them.
//!
//! - `EventSink` - one push-capable subscriber transport
//! - `WorkspaceBroadcaster` - fire-and-forget broadcast entry point for
//!   business-logic operations
//! - `SessionValidator` - session token validation (owned by the
//!   surrounding application's auth layer)
//! - `MembershipResolver` - caller's role within a workspace (owned by the
//!   surrounding application's workspace module)

mod broadcaster;
mod event_sink;
mod membership_resolver;
mod session_validator;

pub use broadcaster::WorkspaceBroadcaster;
pub use event_sink::{EventFrame, EventSink, SinkError};
pub use membership_resolver::MembershipResolver;
pub use session_validator::SessionValidator;
