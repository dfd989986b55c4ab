//! Durable single-slot session store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use shelfside_core::Email;

use super::SessionError;
use crate::models::Identity;

/// Minimum password length accepted by login and signup.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Length of the minted opaque token.
const TOKEN_LENGTH: usize = 40;

/// Well-known name of the session slot file. One global slot, no per-user
/// namespacing.
pub const SLOT_FILE_NAME: &str = "session.json";

/// Durable persistence and (mock) credential exchange for identity.
///
/// The store keeps the current identity in a single JSON slot file. A real
/// system would exchange credentials with a remote authority; here the
/// identity is fabricated locally and the exchange never leaves the process.
#[derive(Debug, Clone)]
pub struct SessionStore {
    slot_path: PathBuf,
}

impl SessionStore {
    /// Create a store whose slot lives under `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            slot_path: data_dir.join(SLOT_FILE_NAME),
        }
    }

    /// Path of the slot file.
    #[must_use]
    pub fn slot_path(&self) -> &Path {
        &self.slot_path
    }

    /// Log in with email and password.
    ///
    /// Mints a fresh identity (unique token per call, display name derived
    /// from the email local part) and persists it to the slot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCredentials` if either field is missing,
    /// the email does not parse, or the password is shorter than 6
    /// characters. Nothing is written on failure.
    pub fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(SessionError::InvalidCredentials);
        }
        let email = Email::parse(email).map_err(|_| SessionError::InvalidCredentials)?;

        let identity = Identity {
            id: Uuid::new_v4(),
            name: email.local_part().to_owned(),
            email,
            token: mint_token(),
            photo_url: None,
        };

        self.persist(&identity)?;
        tracing::info!(email = %identity.email, "logged in");
        Ok(identity)
    }

    /// Sign up with display name, email, and password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SignupFailed` if the name is empty, the email
    /// does not parse, or the password is shorter than 6 characters. Nothing
    /// is written on failure.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<Identity, SessionError> {
        if name.trim().is_empty() {
            return Err(SessionError::SignupFailed(
                "display name is required".to_string(),
            ));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(SessionError::SignupFailed(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        let email =
            Email::parse(email).map_err(|e| SessionError::SignupFailed(e.to_string()))?;

        let identity = Identity {
            id: Uuid::new_v4(),
            name: name.trim().to_owned(),
            email,
            token: mint_token(),
            photo_url: None,
        };

        self.persist(&identity)?;
        tracing::info!(email = %identity.email, "signed up");
        Ok(identity)
    }

    /// Remove the durable identity record.
    ///
    /// Idempotent and infallible: a missing slot is already logged out, and
    /// any other removal failure is logged and swallowed.
    pub fn logout(&self) {
        match fs::remove_file(&self.slot_path) {
            Ok(()) => tracing::info!("logged out"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, "failed to remove session slot"),
        }
    }

    /// Synchronous read of the slot.
    ///
    /// Returns `None` if no record exists or the stored record is not
    /// well-formed. Never fails: malformed content defaults to logged-out.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        let bytes = fs::read(&self.slot_path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "malformed session record, treating as absent");
                None
            }
        }
    }

    /// Mirror a full identity to the slot.
    ///
    /// Writes to a temporary file first and renames it into place, so a
    /// failed write cannot leave a corrupt slot behind.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the slot cannot be written.
    pub fn persist(&self, identity: &Identity) -> Result<(), SessionError> {
        if let Some(parent) = self.slot_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(identity)
            .map_err(|e| SessionError::Storage(io::Error::other(e)))?;

        let tmp_path = self.slot_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.slot_path)?;
        Ok(())
    }
}

/// Mint a fresh opaque token.
///
/// The token is a capability string forwarded to the catalog API; it carries
/// no structure and is never decoded.
fn mint_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> SessionStore {
        let dir = std::env::temp_dir().join(format!("shelfside-store-{}", Uuid::new_v4()));
        SessionStore::new(&dir)
    }

    #[test]
    fn test_login_mints_and_persists_identity() {
        let store = temp_store();

        let identity = store.login("a@x.com", "secret1").unwrap();
        assert_eq!(identity.email.as_str(), "a@x.com");
        assert_eq!(identity.name, "a");
        assert!(!identity.token.is_empty());

        let restored = store.current_identity().unwrap();
        assert_eq!(restored, identity);
    }

    #[test]
    fn test_login_tokens_unique_per_call() {
        let store = temp_store();

        let first = store.login("a@x.com", "secret1").unwrap();
        let second = store.login("a@x.com", "secret1").unwrap();
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_login_short_password_rejected() {
        let store = temp_store();

        let result = store.login("a@x.com", "abc");
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        // Durable storage unchanged
        assert!(store.current_identity().is_none());
    }

    #[test]
    fn test_login_missing_fields_rejected() {
        let store = temp_store();

        assert!(matches!(
            store.login("", "secret1"),
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("a@x.com", ""),
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("not-an-email", "secret1"),
            Err(SessionError::InvalidCredentials)
        ));
        assert!(store.current_identity().is_none());
    }

    #[test]
    fn test_login_failure_preserves_prior_session() {
        let store = temp_store();
        let prior = store.login("a@x.com", "secret1").unwrap();

        let result = store.login("b@x.com", "abc");
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert_eq!(store.current_identity().unwrap(), prior);
    }

    #[test]
    fn test_signup_persists_identity() {
        let store = temp_store();

        let identity = store.signup("Ada", "ada@x.com", "secret1").unwrap();
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.email.as_str(), "ada@x.com");
        assert!(!identity.token.is_empty());
        assert_eq!(store.current_identity().unwrap(), identity);
    }

    #[test]
    fn test_signup_rejections() {
        let store = temp_store();

        assert!(matches!(
            store.signup("", "ada@x.com", "secret1"),
            Err(SessionError::SignupFailed(_))
        ));
        assert!(matches!(
            store.signup("Ada", "ada@x.com", "abc"),
            Err(SessionError::SignupFailed(_))
        ));
        assert!(matches!(
            store.signup("Ada", "not-an-email", "secret1"),
            Err(SessionError::SignupFailed(_))
        ));
        assert!(store.current_identity().is_none());
    }

    #[test]
    fn test_logout_idempotent() {
        let store = temp_store();
        store.login("a@x.com", "secret1").unwrap();

        store.logout();
        assert!(store.current_identity().is_none());

        // Second logout is a no-op
        store.logout();
        assert!(store.current_identity().is_none());
    }

    #[test]
    fn test_malformed_slot_treated_as_absent() {
        let store = temp_store();
        fs::create_dir_all(store.slot_path().parent().unwrap()).unwrap();
        fs::write(store.slot_path(), b"{ not json").unwrap();

        assert!(store.current_identity().is_none());
    }

    #[test]
    fn test_persist_mirrors_full_identity() {
        let store = temp_store();
        let mut identity = store.login("a@x.com", "secret1").unwrap();

        identity.name = "Anna".to_string();
        identity.photo_url = Some("https://img.example.com/anna.png".to_string());
        store.persist(&identity).unwrap();

        assert_eq!(store.current_identity().unwrap(), identity);
    }
}
