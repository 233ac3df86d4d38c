//! Event distribution adapters: the subscriber registry, the broadcast
//! dispatcher, and the channel-backed sink the HTTP stream endpoint
//! registers per connection.

mod channel_sink;
mod dispatcher;
mod registry;

pub use channel_sink::ChannelSink;
pub use dispatcher::EventDispatcher;
pub use registry::SubscriberRegistry;
