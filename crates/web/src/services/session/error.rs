//! Session error types.

use thiserror::Error;

/// Errors that can occur during session operations.
///
/// A malformed slot record is deliberately *not* represented here: reads
/// treat unparseable storage as an absent identity and never fail.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login rejected (missing fields or password policy violation).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signup rejected.
    #[error("signup failed: {0}")]
    SignupFailed(String),

    /// The slot file could not be written. The prior slot content, if any,
    /// is left intact.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}
