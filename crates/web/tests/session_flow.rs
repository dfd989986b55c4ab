//! End-to-end session scenarios: store, provider, and the ownership
//! predicate working together, including a simulated process restart.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use shelfside_core::{BookId, Email};
use shelfside_web::authz::can_manage;
use shelfside_web::catalog::Book;
use shelfside_web::models::Identity;
use shelfside_web::services::session::{SessionError, SessionProvider, SessionStore};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("shelfside-flow-{}", Uuid::new_v4()))
}

fn book(owner_email: Option<&str>) -> Book {
    Book {
        id: BookId::new(1),
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: None,
        description: None,
        published_year: Some(1965),
        pages: Some(412),
        owner_email: owner_email.map(str::to_owned),
        added_by: "a@x.com".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn login_session_survives_restart() {
    let dir = temp_dir();

    let provider = SessionProvider::new(SessionStore::new(&dir));
    let identity = provider.login("a@x.com", "secret1").await.unwrap();
    assert_eq!(identity.email.as_str(), "a@x.com");
    assert_eq!(identity.name, "a");
    assert!(!identity.token.is_empty());
    drop(provider);

    // A new provider over the same slot is the process-restart path
    let restarted = SessionProvider::new(SessionStore::new(&dir));
    assert!(restarted.is_ready());
    assert_eq!(restarted.current().unwrap(), identity);
}

#[tokio::test]
async fn rejected_login_leaves_prior_session_on_disk() {
    let dir = temp_dir();

    let provider = SessionProvider::new(SessionStore::new(&dir));
    let prior = provider.login("a@x.com", "secret1").await.unwrap();

    // Password length 3: rejected locally, slot untouched
    let result = provider.login("a@x.com", "abc").await;
    assert!(matches!(result, Err(SessionError::InvalidCredentials)));

    let restarted = SessionProvider::new(SessionStore::new(&dir));
    assert_eq!(restarted.current().unwrap(), prior);
}

#[tokio::test]
async fn logout_clears_slot_across_restart() {
    let dir = temp_dir();

    let provider = SessionProvider::new(SessionStore::new(&dir));
    provider.login("a@x.com", "secret1").await.unwrap();
    provider.logout().await;

    let restarted = SessionProvider::new(SessionStore::new(&dir));
    assert!(restarted.current().is_none());
}

#[tokio::test]
async fn logged_in_identity_manages_only_owned_books() {
    let provider = SessionProvider::new(SessionStore::new(&temp_dir()));
    let identity = provider.login("a@x.com", "secret1").await.unwrap();

    assert!(can_manage(&book(Some("a@x.com")), &identity));
    assert!(!can_manage(&book(Some("b@x.com")), &identity));
    assert!(!can_manage(&book(None), &identity));
}

#[tokio::test]
async fn updated_identity_changes_ownership_verdict() {
    let dir = temp_dir();
    let provider = SessionProvider::new(SessionStore::new(&dir));
    let identity = provider.login("a@x.com", "secret1").await.unwrap();
    assert!(can_manage(&book(Some("a@x.com")), &identity));

    // Replace the identity wholesale (attributes changed outside login)
    let replacement = Identity {
        id: identity.id,
        email: Email::parse("b@x.com").unwrap(),
        name: "b".to_string(),
        token: identity.token.clone(),
        photo_url: None,
    };
    provider.update_identity(replacement.clone()).await.unwrap();

    let current = provider.current().unwrap();
    assert!(!can_manage(&book(Some("a@x.com")), &current));
    assert!(can_manage(&book(Some("b@x.com")), &current));

    // The replacement was mirrored durably
    let restarted = SessionProvider::new(SessionStore::new(&dir));
    assert_eq!(restarted.current().unwrap(), replacement);
}
