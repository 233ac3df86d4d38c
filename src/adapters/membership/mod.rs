//! Membership adapters.
//!
//! Implementations of the `MembershipResolver` port:
//!
//! - `in_memory` - role table for the development server and tests;
//!   production resolution belongs to the workspace module of the
//!   surrounding application

mod in_memory;

pub use in_memory::InMemoryMembershipDirectory;
