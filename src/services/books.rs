//! Book catalog operations.
//!
//! One method per backend endpoint; request shaping only. Create and
//! update switch to multipart encoding when a cover image is attached,
//! JSON otherwise.

use reqwest::multipart::{Form, Part};

use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;
use crate::models::{Book, BookQuery, CoverImage, CreateBook, Envelope, Page, UpdateBook};

#[derive(Debug, Clone)]
pub struct BooksService {
    http: HttpClient,
}

impl BooksService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List books; search, sort and pagination pass through untouched.
    pub async fn list(&self, query: &BookQuery) -> ApiResult<Page<Book>> {
        self.http
            .get_query::<Envelope<Vec<Book>>, _>("/books", query)
            .await?
            .into_page()
    }

    pub async fn get(&self, id: i64) -> ApiResult<Book> {
        self.http
            .get::<Envelope<Book>>(&format!("/books/{id}"))
            .await?
            .into_result()
    }

    pub async fn create(&self, book: &CreateBook) -> ApiResult<Book> {
        let envelope: Envelope<Book> = match &book.cover_image {
            Some(image) => {
                let form = build_form(book.text_fields(), image)?;
                self.http.post_multipart("/books", form).await?
            }
            None => self.http.post("/books", book).await?,
        };
        envelope.into_result()
    }

    pub async fn update(&self, id: i64, book: &UpdateBook) -> ApiResult<Book> {
        let endpoint = format!("/books/{id}");
        let envelope: Envelope<Book> = match &book.cover_image {
            Some(image) => {
                let form = build_form(book.text_fields(), image)?;
                self.http.put_multipart(&endpoint, form).await?
            }
            None => self.http.put(&endpoint, book).await?,
        };
        envelope.into_result()
    }

    /// Soft-delete; the backend flips `is_active` and keeps the record.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.http
            .delete::<Envelope<serde_json::Value>>(&format!("/books/{id}"))
            .await?
            .ensure_success()
    }

    pub async fn restore(&self, id: i64) -> ApiResult<Book> {
        self.http
            .post_empty::<Envelope<Book>>(&format!("/books/{id}/restore"))
            .await?
            .into_result()
    }

    /// Books with at least one available copy.
    pub async fn available(&self) -> ApiResult<Vec<Book>> {
        self.http
            .get::<Envelope<Vec<Book>>>("/books/available")
            .await?
            .into_result()
    }
}

/// Assemble the multipart form: every present field as a text part, the
/// cover image as a byte part with filename and mime. Absent fields are
/// not appended at all.
fn build_form(fields: Vec<(&'static str, String)>, image: &CoverImage) -> ApiResult<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }

    let part = Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| ApiError::Parse(format!("invalid cover image content type: {e}")))?;

    Ok(form.part("cover_image", part))
}
