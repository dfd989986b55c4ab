//! In-memory session provider.

use std::sync::RwLock;

use super::{SessionError, SessionStore};
use crate::models::Identity;

/// Session lifecycle state.
///
/// `Restoring` is the initial state; the one-time transition to `Ready`
/// happens synchronously during [`SessionProvider::new`]. Within `Ready` the
/// identity may be set and cleared any number of times, but the state itself
/// never changes again.
#[derive(Debug)]
pub enum SessionState {
    /// Startup restoration has not completed yet.
    Restoring,
    /// Restoration is done; `None` means unauthenticated.
    Ready(Option<Identity>),
}

/// Single source of truth for "who is logged in".
///
/// Owns the [`SessionStore`] and the in-memory session state, and is the
/// single writer to both. Handlers receive it through the shared application
/// state rather than any ambient global, and mutate the session only through
/// its methods.
///
/// Consumers must not be reachable before construction completes: the router
/// is built from a fully-constructed state, which is the hard gate against
/// rendering identity-dependent UI before restoration.
#[derive(Debug)]
pub struct SessionProvider {
    store: SessionStore,
    state: RwLock<SessionState>,
}

impl SessionProvider {
    /// Create the provider and restore the identity from durable storage.
    ///
    /// The state starts in `Restoring` and transitions to `Ready` before this
    /// returns; restoration is synchronous and happens exactly once, whether
    /// or not an identity was found. Later changes to the slot made outside
    /// this provider are never re-read.
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        let provider = Self {
            store,
            state: RwLock::new(SessionState::Restoring),
        };
        let restored = provider.store.current_identity();
        provider.set(restored);
        provider
    }

    /// Whether restoration has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.read_state(), SessionState::Ready(_))
    }

    /// The current identity, or `None` when unauthenticated (or while
    /// restoring, which is unobservable after construction).
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        match *self.read_state() {
            SessionState::Restoring => None,
            SessionState::Ready(ref identity) => identity.clone(),
        }
    }

    /// Log in via the store and set the in-memory identity on success.
    ///
    /// # Errors
    ///
    /// Store failures propagate unchanged; the in-memory state keeps its
    /// prior value.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self.store.login(email, password)?;
        self.set(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign up via the store and set the in-memory identity on success.
    ///
    /// # Errors
    ///
    /// Store failures propagate unchanged; the in-memory state keeps its
    /// prior value.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, SessionError> {
        let identity = self.store.signup(name, email, password)?;
        self.set(Some(identity.clone()));
        Ok(identity)
    }

    /// Clear both the durable record and the in-memory identity.
    ///
    /// Never fails; calling it while logged out is a no-op.
    pub async fn logout(&self) {
        self.store.logout();
        self.set(None);
    }

    /// Replace the identity and mirror the full value to durable storage.
    ///
    /// Used when identity attributes change outside the login/signup flow.
    /// The caller supplies a complete identity; no validation is performed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the mirror write fails; the
    /// in-memory identity is left unchanged in that case.
    pub async fn update_identity(&self, identity: Identity) -> Result<(), SessionError> {
        self.store.persist(&identity)?;
        self.set(Some(identity));
        Ok(())
    }

    fn set(&self, identity: Option<Identity>) {
        *self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = SessionState::Ready(identity);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> SessionStore {
        let dir = std::env::temp_dir().join(format!("shelfside-provider-{}", Uuid::new_v4()));
        SessionStore::new(&dir)
    }

    #[test]
    fn test_restoring_state_exposes_no_identity() {
        // Mid-restoration view, unobservable through `new` but load-bearing
        // for the state machine
        let provider = SessionProvider {
            store: temp_store(),
            state: RwLock::new(SessionState::Restoring),
        };
        assert!(!provider.is_ready());
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_restores_absent_identity() {
        let provider = SessionProvider::new(temp_store());
        assert!(provider.is_ready());
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_restores_persisted_identity() {
        let store = temp_store();
        let identity = store.login("a@x.com", "secret1").unwrap();

        let provider = SessionProvider::new(store);
        assert!(provider.is_ready());
        assert_eq!(provider.current().unwrap(), identity);
    }

    #[tokio::test]
    async fn test_login_sets_in_memory_identity() {
        let provider = SessionProvider::new(temp_store());

        let identity = provider.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(provider.current().unwrap(), identity);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_prior_state() {
        let provider = SessionProvider::new(temp_store());
        let prior = provider.login("a@x.com", "secret1").await.unwrap();

        let result = provider.login("b@x.com", "abc").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert_eq!(provider.current().unwrap(), prior);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let store = temp_store();
        let slot = store.slot_path().to_path_buf();
        let provider = SessionProvider::new(store);

        provider.login("a@x.com", "secret1").await.unwrap();
        provider.logout().await;

        assert!(provider.current().is_none());
        assert!(!slot.exists());

        // Double logout is safe
        provider.logout().await;
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_external_slot_changes_not_re_read() {
        let store = temp_store();
        let provider = SessionProvider::new(store.clone());
        let identity = provider.login("a@x.com", "secret1").await.unwrap();

        // Mutate the slot behind the provider's back; restoration already
        // happened and must not be triggered again.
        let other = store.clone();
        let intruder = Identity {
            id: Uuid::new_v4(),
            email: shelfside_core::Email::parse("intruder@x.com").unwrap(),
            name: "intruder".to_string(),
            token: "stolen".to_string(),
            photo_url: None,
        };
        other.persist(&intruder).unwrap();

        assert_eq!(provider.current().unwrap(), identity);
    }

    #[tokio::test]
    async fn test_update_identity_mirrors_to_storage() {
        let store = temp_store();
        let provider = SessionProvider::new(store.clone());
        let mut identity = provider.login("a@x.com", "secret1").await.unwrap();

        identity.name = "Anna".to_string();
        provider.update_identity(identity.clone()).await.unwrap();

        assert_eq!(provider.current().unwrap(), identity);
        assert_eq!(store.current_identity().unwrap(), identity);
    }

    #[tokio::test]
    async fn test_signup_failure_propagates_unchanged() {
        let provider = SessionProvider::new(temp_store());

        let result = provider.signup("", "ada@x.com", "secret1").await;
        assert!(matches!(result, Err(SessionError::SignupFailed(_))));
        assert!(provider.current().is_none());
    }
}
