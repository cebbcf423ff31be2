//! Uniform response envelope.
//!
//! Resource endpoints wrap their payloads in `{success, message, data,
//! meta}`. A `success: false` body means `data` must not be trusted; the
//! envelope converts to an error carrying the server message instead.
//! The auth endpoints return bare objects and bypass this module — the
//! services normalize both shapes so callers only ever see `ApiResult`.

use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Pagination block attached to list responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// One page of a list endpoint, after envelope unwrapping
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

/// Response envelope used by every resource endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> Envelope<T> {
    /// Extract the payload, converting a failed envelope into an error.
    pub fn into_result(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::Server {
                status: 200,
                message: self
                    .message
                    .unwrap_or_else(|| "An error occurred".to_string()),
            });
        }
        self.data
            .ok_or_else(|| ApiError::Parse("response envelope missing data".to_string()))
    }
}

impl<T> Envelope<T> {
    /// Check the success flag alone, for endpoints whose `data` is empty
    /// or uninteresting (deletes, returns).
    pub fn ensure_success(self) -> ApiResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Server {
                status: 200,
                message: self
                    .message
                    .unwrap_or_else(|| "An error occurred".to_string()),
            })
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Extract a list payload together with its pagination block.
    pub fn into_page(self) -> ApiResult<Page<T>> {
        let meta = self.meta.clone();
        let items = self.into_result()?;
        Ok(Page { items, meta })
    }
}
