//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Book as returned by the backend. The backend is authoritative for ISBN
/// uniqueness, copy-count bounds and the `is_active` soft-delete flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub description: String,
    pub total_copies: i64,
    pub available_copies: i64,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    /// URL of the stored cover image, when one was uploaded.
    pub cover_image: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Binary cover image attached to a create/update request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Create book request.
///
/// Sent as multipart when `cover_image` is present, JSON otherwise.
/// Absent optional fields are omitted from the payload, never sent null.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub description: String,
    pub total_copies: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing)]
    pub cover_image: Option<CoverImage>,
}

impl CreateBook {
    /// Text fields of the multipart encoding, absent fields omitted
    /// entirely rather than sent empty.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("isbn", self.isbn.clone()),
            ("description", self.description.clone()),
            ("total_copies", self.total_copies.to_string()),
        ];
        if let Some(genre) = &self.genre {
            fields.push(("genre", genre.clone()));
        }
        if let Some(publisher) = &self.publisher {
            fields.push(("publisher", publisher.clone()));
        }
        if let Some(year) = self.publication_year {
            fields.push(("publication_year", year.to_string()));
        }
        if let Some(language) = &self.language {
            fields.push(("language", language.clone()));
        }
        fields
    }
}

/// Update book request; every field optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_copies: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing)]
    pub cover_image: Option<CoverImage>,
}

impl UpdateBook {
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(("title", title.clone()));
        }
        if let Some(author) = &self.author {
            fields.push(("author", author.clone()));
        }
        if let Some(isbn) = &self.isbn {
            fields.push(("isbn", isbn.clone()));
        }
        if let Some(genre) = &self.genre {
            fields.push(("genre", genre.clone()));
        }
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        if let Some(copies) = self.total_copies {
            fields.push(("total_copies", copies.to_string()));
        }
        if let Some(publisher) = &self.publisher {
            fields.push(("publisher", publisher.clone()));
        }
        if let Some(year) = self.publication_year {
            fields.push(("publication_year", year.to_string()));
        }
        if let Some(language) = &self.language {
            fields.push(("language", language.clone()));
        }
        fields
    }
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Book list query parameters, passed through to the backend untouched —
/// search, sort and pagination are never computed locally.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
