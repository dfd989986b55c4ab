//! Wire types for the remote book-catalog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfside_core::BookId;

/// A book record as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    /// Owner email; absence means no identity may edit or delete this record.
    #[serde(rename = "ownerEmail", default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// Email of whoever created the record. Not an authorization key.
    #[serde(rename = "addedBy", default)]
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating or updating a book.
///
/// `ownerEmail`/`addedBy` are filled in by the UI from the current identity
/// at creation time and carried through unchanged on update.
#[derive(Debug, Clone, Serialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(rename = "ownerEmail", skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(rename = "addedBy")]
    pub added_by: String,
}

/// One page of catalog results.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPage {
    pub items: Vec<Book>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

/// A reader's rating of a book, on the catalog's 1-10 scale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: Uuid,
    pub book_id: BookId,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for submitting a new rating.
#[derive(Debug, Clone, Serialize)]
pub struct RatingFields {
    pub user_id: Uuid,
    pub book_id: BookId,
    pub rating: u8,
}

/// One page of ratings for a book.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingPage {
    pub items: Vec<Rating>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

/// Aggregate rating for a book. `average_rating` is absent until the first
/// rating lands.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingSummary {
    pub book_id: BookId,
    #[serde(default)]
    pub average_rating: Option<f64>,
    pub total_ratings: u64,
}

/// A similar-book suggestion from the catalog's recommendation engine.
///
/// Recommendations come from a separate corpus, so there is no record ID to
/// link to; the ISBN is the only stable key.
#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub predicted_rating: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_wire_shape() {
        let json = serde_json::json!({
            "id": 1,
            "title": "The Pragmatic Programmer",
            "author": "Hunt & Thomas",
            "ownerEmail": "a@x.com",
            "addedBy": "a@x.com",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-02T00:00:00Z"
        });

        let book: Book = serde_json::from_value(json).unwrap();
        assert_eq!(book.id, BookId::new(1));
        assert_eq!(book.owner_email.as_deref(), Some("a@x.com"));
        assert_eq!(book.added_by, "a@x.com");
        assert!(book.isbn.is_none());
        assert!(book.pages.is_none());
    }

    #[test]
    fn test_ownerless_book_deserializes() {
        let json = serde_json::json!({
            "id": 2,
            "title": "Orphaned",
            "author": "Nobody",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        });

        let book: Book = serde_json::from_value(json).unwrap();
        assert!(book.owner_email.is_none());
        assert!(book.added_by.is_empty());
    }

    #[test]
    fn test_rating_wire_shape() {
        let json = serde_json::json!({
            "id": 7,
            "user_id": "6dfa0243-7f2c-4a2a-9a7e-24a55c5e2fd4",
            "book_id": 1,
            "rating": 9,
            "created_at": "2026-02-01T00:00:00Z",
            "updated_at": "2026-02-01T00:00:00Z"
        });

        let rating: Rating = serde_json::from_value(json).unwrap();
        assert_eq!(rating.book_id, BookId::new(1));
        assert_eq!(rating.rating, 9);
    }

    #[test]
    fn test_unrated_summary_has_no_average() {
        // The catalog sends an explanatory `message` field alongside a null
        // average; only the numbers matter here.
        let json = serde_json::json!({
            "book_id": 2,
            "average_rating": null,
            "total_ratings": 0,
            "message": "No ratings yet for this book"
        });

        let summary: RatingSummary = serde_json::from_value(json).unwrap();
        assert!(summary.average_rating.is_none());
        assert_eq!(summary.total_ratings, 0);
    }

    #[test]
    fn test_recommendation_optional_fields_default() {
        let json = serde_json::json!({
            "isbn": "0441172717",
            "title": "Dune",
            "author": "Frank Herbert"
        });

        let rec: Recommendation = serde_json::from_value(json).unwrap();
        assert!(rec.year.is_none());
        assert!(rec.publisher.is_none());
        assert!(rec.predicted_rating.is_none());
    }
}
