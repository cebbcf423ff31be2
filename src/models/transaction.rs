//! Borrow/return transaction model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;

/// Transaction state; transitions are owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Borrowed,
    Returned,
    Overdue,
}

/// A borrow/return transaction for the current user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub book: Book,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
}

/// Short user representation attached to admin transaction listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Transaction with its user, as seen by admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub user: UserSummary,
}
