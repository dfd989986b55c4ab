//! Book route handlers.
//!
//! Thin rendering over the remote catalog API. Listing and detail pages work
//! for anyone; create/edit/delete require a logged-in identity and, for
//! existing records, ownership established through [`crate::authz`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use shelfside_core::BookId;

use crate::authz::can_manage;
use crate::catalog::{Book, BookFields, CatalogError, Rating, RatingFields, Recommendation};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::Identity;
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

/// Books shown per list page. Matches the catalog API's default page size.
const PER_PAGE: u32 = 10;

/// Recent ratings shown on the detail page.
const RECENT_RATINGS: u32 = 5;

/// Similar-book suggestions requested for the detail page.
const SHELF_SIZE: u32 = 5;

// =============================================================================
// View Types
// =============================================================================

/// Book display data for templates.
#[derive(Clone)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub owner_email: Option<String>,
    pub added_by: String,
    /// Whether the current identity may edit/delete this record.
    pub can_manage: bool,
}

impl BookView {
    fn new(book: Book, identity: Option<&Identity>) -> Self {
        let can_manage = identity.is_some_and(|identity| can_manage(&book, identity));
        Self {
            id: book.id.as_i64(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            description: book.description,
            published_year: book.published_year,
            pages: book.pages,
            owner_email: book.owner_email,
            added_by: book.added_by,
            can_manage,
        }
    }
}

/// One rating as shown on the detail page.
#[derive(Clone)]
pub struct RatingView {
    pub score: u8,
    pub rated_on: String,
}

impl RatingView {
    fn new(rating: &Rating) -> Self {
        Self {
            score: rating.rating,
            rated_on: rating.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One similar-book suggestion as shown on the detail page.
#[derive(Clone)]
pub struct RecommendationView {
    pub title: String,
    pub author: String,
    pub year: Option<String>,
    pub predicted: Option<String>,
}

impl RecommendationView {
    fn new(rec: Recommendation) -> Self {
        Self {
            title: rec.title,
            author: rec.author,
            year: rec.year,
            predicted: rec.predicted_rating.map(|score| format!("{score:.1}")),
        }
    }
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Pagination and search query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Book form data (create and edit share the same fields).
///
/// Numeric fields arrive as strings from the HTML form; empty means absent.
#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_year: String,
    #[serde(default)]
    pub pages: String,
}

/// Rating form data.
#[derive(Debug, Deserialize)]
pub struct RatingForm {
    pub rating: String,
}

/// Validate a submitted rating against the catalog's 1-10 scale.
fn parse_rating(raw: &str) -> std::result::Result<u8, String> {
    raw.trim()
        .parse()
        .ok()
        .filter(|score| (1..=10).contains(score))
        .ok_or_else(|| "Rating must be between 1 and 10".to_string())
}

/// Validated form values, before ownership fields are attached.
struct ParsedForm {
    title: String,
    author: String,
    isbn: Option<String>,
    description: Option<String>,
    published_year: Option<i32>,
    pages: Option<i32>,
}

/// Validate the book form. Returns a user-facing message on failure.
fn parse_form(form: &BookForm) -> std::result::Result<ParsedForm, String> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    let author = form.author.trim();
    if author.is_empty() {
        return Err("Author is required".to_string());
    }

    Ok(ParsedForm {
        title: title.to_owned(),
        author: author.to_owned(),
        isbn: optional_text(&form.isbn),
        description: optional_text(&form.description),
        published_year: optional_number(&form.published_year, "Published year")?,
        pages: optional_number(&form.pages, "Pages")?,
    })
}

/// Skip count for a 1-based page number. Saturates instead of overflowing so
/// an absurd `?page=` value yields an empty page, not a panic.
fn page_offset(page: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(PER_PAGE)
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn optional_number(raw: &str, field: &str) -> std::result::Result<Option<i32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| format!("{field} must be a number"))
}

// =============================================================================
// Templates
// =============================================================================

/// Book listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksIndexTemplate {
    pub current_email: Option<String>,
    pub books: Vec<BookView>,
    pub query: Option<String>,
    pub query_suffix: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookShowTemplate {
    pub current_email: Option<String>,
    pub book: BookView,
    pub error: Option<String>,
    pub average_rating: Option<String>,
    pub total_ratings: u64,
    pub ratings: Vec<RatingView>,
    pub recommendations: Vec<RecommendationView>,
}

/// New-book form template.
#[derive(Template, WebTemplate)]
#[template(path = "books/new.html")]
pub struct BookNewTemplate {
    pub current_email: Option<String>,
    pub error: Option<String>,
}

/// Edit-book form template.
#[derive(Template, WebTemplate)]
#[template(path = "books/edit.html")]
pub struct BookEditTemplate {
    pub current_email: Option<String>,
    pub error: Option<String>,
    pub book: BookView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the paginated/searchable book list.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Query(list): Query<ListQuery>,
) -> Result<BooksIndexTemplate> {
    let token = identity.as_ref().map(|i| i.token.as_str());
    let page = list.page.unwrap_or(1).max(1);
    let offset = page_offset(page);
    let query = list.q.filter(|q| !q.trim().is_empty());

    let page_data = match &query {
        Some(q) => state.catalog().search(q, offset, PER_PAGE, token).await?,
        None => state.catalog().list(offset, PER_PAGE, token).await?,
    };

    let total_pages =
        u32::try_from(page_data.total.div_ceil(u64::from(PER_PAGE))).unwrap_or(u32::MAX).max(1);
    let books = page_data
        .items
        .into_iter()
        .map(|book| BookView::new(book, identity.as_ref()))
        .collect();
    let query_suffix = query
        .as_ref()
        .map(|q| format!("&q={}", urlencoding::encode(q)))
        .unwrap_or_default();

    Ok(BooksIndexTemplate {
        current_email: identity.map(|i| i.email.into_inner()),
        books,
        query,
        query_suffix,
        current_page: page,
        total_pages,
        prev_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
    })
}

/// Display a book's detail page: the record itself, its ratings, and a
/// similar-books shelf.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<BookShowTemplate> {
    let token = identity.as_ref().map(|i| i.token.as_str());
    let book_id = BookId::new(id);
    let book = state.catalog().get(book_id, token).await?;

    let summary = state.catalog().rating_summary(book_id, token).await?;
    let ratings = state
        .catalog()
        .book_ratings(book_id, 0, RECENT_RATINGS, token)
        .await?;

    // The shelf is additive: an unavailable or unaware engine degrades to an
    // empty shelf instead of failing the page.
    let recommendations = match state
        .catalog()
        .recommendations(&book.title, SHELF_SIZE, token)
        .await
    {
        Ok(shelf) => shelf,
        Err(CatalogError::NotFound) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "recommendation lookup failed");
            Vec::new()
        }
    };

    Ok(BookShowTemplate {
        book: BookView::new(book, identity.as_ref()),
        current_email: identity.map(|i| i.email.into_inner()),
        error: query.error,
        average_rating: summary.average_rating.map(|avg| format!("{avg:.2}")),
        total_ratings: summary.total_ratings,
        ratings: ratings.items.iter().map(RatingView::new).collect(),
        recommendations: recommendations
            .into_iter()
            .map(RecommendationView::new)
            .collect(),
    })
}

/// Handle rating form submission.
///
/// The catalog allows one rating per user and book; a repeat submission is
/// reported back on the detail page rather than surfaced as a failure page.
pub async fn rate(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<RatingForm>,
) -> Result<Response> {
    let score = match parse_rating(&form.rating) {
        Ok(score) => score,
        Err(message) => {
            let redirect = format!("/books/{id}?error={}", urlencoding::encode(&message));
            return Ok(Redirect::to(&redirect).into_response());
        }
    };

    let fields = RatingFields {
        user_id: identity.id,
        book_id: BookId::new(id),
        rating: score,
    };

    match state.catalog().rate(&fields, Some(&identity.token)).await {
        Ok(rating) => {
            tracing::info!(book_id = %rating.book_id, score, "rating submitted");
            Ok(Redirect::to(&format!("/books/{id}")).into_response())
        }
        Err(CatalogError::Api { status: 400, .. }) => {
            let redirect = format!(
                "/books/{id}?error={}",
                urlencoding::encode("You have already rated this book")
            );
            Ok(Redirect::to(&redirect).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the new-book form.
pub async fn new_page(
    RequireAuth(identity): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> BookNewTemplate {
    BookNewTemplate {
        current_email: Some(identity.email.into_inner()),
        error: query.error,
    }
}

/// Handle new-book form submission.
///
/// The created record is owned by the current identity: both `ownerEmail`
/// and `addedBy` are set to its email.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Form(form): Form<BookForm>,
) -> Result<Response> {
    let parsed = match parse_form(&form) {
        Ok(parsed) => parsed,
        Err(message) => {
            let redirect = format!("/books/new?error={}", urlencoding::encode(&message));
            return Ok(Redirect::to(&redirect).into_response());
        }
    };

    let fields = BookFields {
        title: parsed.title,
        author: parsed.author,
        isbn: parsed.isbn,
        description: parsed.description,
        published_year: parsed.published_year,
        pages: parsed.pages,
        owner_email: Some(identity.email.as_str().to_owned()),
        added_by: identity.email.as_str().to_owned(),
    };

    let book = state
        .catalog()
        .create(&fields, Some(&identity.token))
        .await?;
    tracing::info!(book_id = %book.id, "book created");

    Ok(Redirect::to(&format!("/books/{}", book.id)).into_response())
}

/// Display the edit form for an owned book.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<BookEditTemplate> {
    let book = state
        .catalog()
        .get(BookId::new(id), Some(&identity.token))
        .await?;

    if !can_manage(&book, &identity) {
        return Err(AppError::Forbidden("you do not own this book".to_string()));
    }

    Ok(BookEditTemplate {
        book: BookView::new(book, Some(&identity)),
        current_email: Some(identity.email.into_inner()),
        error: query.error,
    })
}

/// Handle edit form submission.
///
/// Ownership fields are carried through unchanged; editing never transfers
/// ownership.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> Result<Response> {
    let book_id = BookId::new(id);
    let existing = state
        .catalog()
        .get(book_id, Some(&identity.token))
        .await?;

    if !can_manage(&existing, &identity) {
        return Err(AppError::Forbidden("you do not own this book".to_string()));
    }

    let parsed = match parse_form(&form) {
        Ok(parsed) => parsed,
        Err(message) => {
            let redirect = format!("/books/{id}/edit?error={}", urlencoding::encode(&message));
            return Ok(Redirect::to(&redirect).into_response());
        }
    };

    let fields = BookFields {
        title: parsed.title,
        author: parsed.author,
        isbn: parsed.isbn,
        description: parsed.description,
        published_year: parsed.published_year,
        pages: parsed.pages,
        owner_email: existing.owner_email,
        added_by: existing.added_by,
    };

    state
        .catalog()
        .update(book_id, &fields, Some(&identity.token))
        .await?;
    tracing::info!(book_id = %book_id, "book updated");

    Ok(Redirect::to(&format!("/books/{id}")).into_response())
}

/// Handle delete form submission.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response> {
    let book_id = BookId::new(id);
    let existing = state
        .catalog()
        .get(book_id, Some(&identity.token))
        .await?;

    if !can_manage(&existing, &identity) {
        return Err(AppError::Forbidden("you do not own this book".to_string()));
    }

    state
        .catalog()
        .delete(book_id, Some(&identity.token))
        .await?;
    tracing::info!(book_id = %book_id, "book deleted");

    Ok(Redirect::to("/books").into_response())
}
