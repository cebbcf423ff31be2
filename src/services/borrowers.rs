//! Borrower registry operations

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::{Borrower, CreateBorrower, Envelope};

#[derive(Debug, Clone)]
pub struct BorrowersService {
    http: HttpClient,
}

impl BorrowersService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ApiResult<Vec<Borrower>> {
        self.http
            .get::<Envelope<Vec<Borrower>>>("/borrowers")
            .await?
            .into_result()
    }

    pub async fn create(&self, borrower: &CreateBorrower) -> ApiResult<Borrower> {
        self.http
            .post::<Envelope<Borrower>, _>("/borrowers", borrower)
            .await?
            .into_result()
    }
}
