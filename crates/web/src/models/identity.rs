//! Authenticated-identity domain type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfside_core::Email;

/// The authenticated user.
///
/// Created by a successful login or signup, held in memory for the process
/// lifetime, and mirrored into the durable session slot. This is also the
/// exact serialized shape of the slot record.
///
/// The token is a bearer credential for the catalog API. It is an opaque
/// capability: never inspected or decoded here, only stored and forwarded.
/// Validation is the remote authority's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier.
    pub id: Uuid,
    /// Email address; the sole field used for ownership comparison.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Opaque session token.
    pub token: String,
    /// Optional photo reference.
    #[serde(rename = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}
