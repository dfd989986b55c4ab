//! Authentication route handlers.
//!
//! Handles login, signup, and logout against the local session provider.
//! There is no remote credential authority here: the provider's store mints
//! the identity, and a failure simply redirects back with an error message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_email: Option<String>,
    pub error: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub current_email: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(identity): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already logged in: nothing to do here
    if identity.is_some() {
        return Redirect::to("/books").into_response();
    }

    LoginTemplate {
        current_email: None,
        error: query.error,
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.session().login(&form.email, &form.password).await {
        Ok(_) => Redirect::to("/books").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Redirect::to("/auth/login?error=Invalid%20credentials").into_response()
        }
    }
}

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(identity): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if identity.is_some() {
        return Redirect::to("/books").into_response();
    }

    SignupTemplate {
        current_email: None,
        error: query.error,
    }
    .into_response()
}

/// Handle signup form submission.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    match state
        .session()
        .signup(&form.name, &form.email, &form.password)
        .await
    {
        Ok(_) => Redirect::to("/books").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "signup failed");
            let redirect = format!("/auth/signup?error={}", urlencoding::encode(&e.to_string()));
            Redirect::to(&redirect).into_response()
        }
    }
}

/// Handle logout.
///
/// Clears both the durable record and the in-memory identity; never fails.
pub async fn logout(State(state): State<AppState>) -> Response {
    state.session().logout().await;
    Redirect::to("/").into_response()
}
