//! Ownership-based authorization predicate.

use crate::catalog::Book;
use crate::models::Identity;

/// Whether `identity` may edit or delete `book`.
///
/// Strict ownership, default-deny:
/// - a book without an owner email (absent or empty) is managed by no one,
///   including whoever created it — ownership cannot be established;
/// - otherwise the owner email must equal the identity's email exactly,
///   case-sensitive, with no normalization.
///
/// Pure function: no side effects, no I/O, deterministic for a given pair.
#[must_use]
pub fn can_manage(book: &Book, identity: &Identity) -> bool {
    match book.owner_email.as_deref() {
        None | Some("") => false,
        Some(owner) => owner == identity.email.as_str(),
    }
}
