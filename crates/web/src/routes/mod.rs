//! HTTP route handlers for the library UI.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the book list
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! POST /auth/logout            - Logout action
//!
//! # Books
//! GET  /books                  - Paginated/searchable book list
//! GET  /books/new              - New-book form (requires auth)
//! POST /books                  - Create book (requires auth)
//! GET  /books/{id}             - Book detail
//! GET  /books/{id}/edit        - Edit form (requires auth + ownership)
//! POST /books/{id}             - Update book (requires auth + ownership)
//! POST /books/{id}/delete      - Delete book (requires auth + ownership)
//! POST /books/{id}/ratings     - Rate a book (requires auth)
//! ```

pub mod auth;
pub mod books;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the book routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index).post(books::create))
        .route("/new", get(books::new_page))
        .route("/{id}", get(books::show).post(books::update))
        .route("/{id}/edit", get(books::edit_page))
        .route("/{id}/delete", post(books::delete))
        .route("/{id}/ratings", post(books::rate))
}

/// Create the complete application router (without state or layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/books") }))
        .nest("/auth", auth_routes())
        .nest("/books", book_routes())
}
