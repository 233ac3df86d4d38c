//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `static_tokens` - in-memory token table for the development server and
//!   tests; the production session service lives in the surrounding
//!   application

mod static_tokens;

pub use static_tokens::StaticSessionValidator;
