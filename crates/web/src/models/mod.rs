//! Domain models for the library UI.

pub mod identity;

pub use identity::Identity;
