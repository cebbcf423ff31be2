//! Error types for the Libradesk client

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Error payload shape returned by the backend on non-2xx responses.
///
/// Validation failures (422) additionally carry per-field messages under
/// `errors`, keyed by the offending field name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

/// Main client error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response reached the server (network down, backend unreachable).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// 401 - the credential was missing, invalid or expired.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 403 - authenticated but not allowed.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// 404 - surfaced as a message, never a redirect.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 422 - per-field messages belong next to the relevant input.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: HashMap<String, Vec<String>>,
    },

    /// 5xx and any other unexpected status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Malformed body on a success-path response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Map a non-2xx status and its parsed body to the matching variant.
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let message = body
            .message
            .unwrap_or_else(|| "An error occurred".to_string());

        match status {
            401 => ApiError::Auth(message),
            403 => ApiError::Permission(message),
            404 => ApiError::NotFound(message),
            422 => ApiError::Validation {
                message,
                errors: body.errors.unwrap_or_default(),
            },
            _ => ApiError::Server { status, message },
        }
    }

    /// Field messages for a validation failure, empty for everything else.
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            // Request never produced a usable response: DNS failure,
            // refused connection, timeout, TLS error.
            ApiError::Connection(e.to_string())
        }
    }
}

/// Collapse `validator` output into the same field-error map the backend
/// uses, so local and remote validation failures look identical to callers.
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors = e
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {field}"))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        ApiError::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;
