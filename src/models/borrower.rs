//! Borrower model and related types

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Borrower status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowerStatus {
    Active,
    Overdue,
}

/// Borrower record.
///
/// The backend reports `borrowedBooks` and `dueDate` in camelCase; the
/// snake_case fields keep the crate's own naming consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "borrowedBooks")]
    pub borrowed_books: i64,
    pub status: BorrowerStatus,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub borrowed_book_id: Option<i64>,
}

/// Create borrower request
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct CreateBorrower {
    pub name: String,
    pub email: String,
    pub borrowed_book_id: Option<i64>,
}
