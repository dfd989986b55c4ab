//! Session service.
//!
//! Local session lifecycle for the library UI: a durable single-slot
//! [`SessionStore`] holding the authenticated identity, and a
//! [`SessionProvider`] that owns the in-memory session state and is the only
//! writer to both.
//!
//! The store is a local stand-in for a remote credential authority: it mints
//! an opaque token instead of exchanging credentials over the network. The
//! token is stored and forwarded as-is, never verified here.

mod error;
mod provider;
mod store;

pub use error::SessionError;
pub use provider::{SessionProvider, SessionState};
pub use store::SessionStore;
