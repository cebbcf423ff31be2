//! Borrow/return transaction operations

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::{AdminTransaction, Envelope, Transaction};

#[derive(Debug, Clone)]
pub struct TransactionsService {
    http: HttpClient,
}

impl TransactionsService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Transactions of the authenticated user.
    pub async fn my_books(&self) -> ApiResult<Vec<Transaction>> {
        self.http
            .get::<Envelope<Vec<Transaction>>>("/transactions/my-books")
            .await?
            .into_result()
    }

    /// Every transaction with its user (admin only).
    pub async fn list(&self) -> ApiResult<Vec<AdminTransaction>> {
        self.http
            .get::<Envelope<Vec<AdminTransaction>>>("/transactions")
            .await?
            .into_result()
    }

    /// Mark a borrowed book as returned. State transitions are the
    /// backend's call; this only reports the request.
    pub async fn return_book(&self, transaction_id: i64) -> ApiResult<()> {
        self.http
            .post_empty::<Envelope<serde_json::Value>>(&format!(
                "/transactions/{transaction_id}/return"
            ))
            .await?
            .ensure_success()
    }
}
