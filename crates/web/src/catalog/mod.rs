//! Remote book-catalog API client.
//!
//! Thin JSON client over the catalog service's REST endpoints. The session
//! token, when present, travels as a bearer credential; this client never
//! inspects it.

mod error;
mod types;

pub use error::CatalogError;
pub use types::{
    Book, BookFields, BookPage, Rating, RatingFields, RatingPage, RatingSummary, Recommendation,
};

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use shelfside_core::BookId;

use crate::config::CatalogConfig;

/// Client for the remote book-catalog API.
///
/// Cheaply cloneable via `Arc`. Reads are deliberately uncached so the UI
/// always reflects the data received.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    books_endpoint: String,
    ratings_endpoint: String,
    recommendations_endpoint: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let api_root = format!(
            "{}/api/{}",
            config.base_url.trim_end_matches('/'),
            config.api_version
        );

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                books_endpoint: format!("{api_root}/books"),
                ratings_endpoint: format!("{api_root}/userratings"),
                recommendations_endpoint: format!("{api_root}/recommendations"),
            }),
        }
    }

    /// List books with pagination.
    ///
    /// `offset` and `limit` are forwarded as `skip`/`limit`; the result holds
    /// at most `limit` items plus the total count for page math.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the response cannot be
    /// parsed.
    pub async fn list(
        &self,
        offset: u32,
        limit: u32,
        token: Option<&str>,
    ) -> Result<BookPage, CatalogError> {
        let url = format!(
            "{}/?skip={offset}&limit={limit}",
            self.inner.books_endpoint
        );
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Search books by title or author.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the response cannot be
    /// parsed.
    pub async fn search(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
        token: Option<&str>,
    ) -> Result<BookPage, CatalogError> {
        let url = format!(
            "{}/?skip={offset}&limit={limit}&search={}",
            self.inner.books_endpoint,
            urlencoding::encode(query)
        );
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Fetch a single book by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn get(&self, id: BookId, token: Option<&str>) -> Result<Book, CatalogError> {
        let url = format!("{}/{id}", self.inner.books_endpoint);
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Create a new book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails.
    pub async fn create(
        &self,
        fields: &BookFields,
        token: Option<&str>,
    ) -> Result<Book, CatalogError> {
        let url = format!("{}/", self.inner.books_endpoint);
        let request = self.inner.client.post(&url).json(fields);
        self.execute(request, token).await
    }

    /// Update an existing book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn update(
        &self,
        id: BookId,
        fields: &BookFields,
        token: Option<&str>,
    ) -> Result<Book, CatalogError> {
        let url = format!("{}/{id}", self.inner.books_endpoint);
        let request = self.inner.client.put(&url).json(fields);
        self.execute(request, token).await
    }

    /// Delete a book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn delete(&self, id: BookId, token: Option<&str>) -> Result<(), CatalogError> {
        let url = format!("{}/{id}", self.inner.books_endpoint);
        let request = self.inner.client.delete(&url);

        let response = with_bearer(request, token).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// List ratings for a book, paginated.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn book_ratings(
        &self,
        id: BookId,
        offset: u32,
        limit: u32,
        token: Option<&str>,
    ) -> Result<RatingPage, CatalogError> {
        let url = format!(
            "{}/book/{id}?skip={offset}&limit={limit}",
            self.inner.ratings_endpoint
        );
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Fetch a book's average rating and rating count.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn rating_summary(
        &self,
        id: BookId,
        token: Option<&str>,
    ) -> Result<RatingSummary, CatalogError> {
        let url = format!("{}/book/{id}/average", self.inner.ratings_endpoint);
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Submit a new rating.
    ///
    /// The catalog rejects a second rating for the same user/book pair with a
    /// 400, surfaced as `CatalogError::Api`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for a missing book, other
    /// `CatalogError` variants for transport or API failures.
    pub async fn rate(
        &self,
        fields: &RatingFields,
        token: Option<&str>,
    ) -> Result<Rating, CatalogError> {
        let url = format!("{}/", self.inner.ratings_endpoint);
        let request = self.inner.client.post(&url).json(fields);
        self.execute(request, token).await
    }

    /// Fetch similar-book suggestions for a title.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when the engine knows nothing about
    /// the title, other `CatalogError` variants for transport or API
    /// failures.
    pub async fn recommendations(
        &self,
        title: &str,
        top_n: u32,
        token: Option<&str>,
    ) -> Result<Vec<Recommendation>, CatalogError> {
        let url = format!(
            "{}/by-title?book_title={}&top_n={top_n}",
            self.inner.recommendations_endpoint,
            urlencoding::encode(title)
        );
        let request = self.inner.client.get(&url);
        self.execute(request, token).await
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, CatalogError> {
        let response = with_bearer(request, token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "catalog API returned an error");
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Attach the bearer token when a session is present.
fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
