//! Service-level error taxonomy and its mapping to HTTP responses.
//!
//! Every failure a request can hit is recovered here and rendered as a
//! status code plus a JSON body with a human-readable message. Storage and
//! database causes are logged for operators but the caller only sees a
//! generic message, so internal state never leaks through the API.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;

use crate::storage::StorageError;

#[derive(Debug)]
pub enum ServiceError {
    /// A required field is missing or malformed.
    Validation(String),
    /// The record id is non-numeric or non-positive.
    InvalidId,
    /// The record does not exist or belongs to someone else. Deliberately
    /// not distinguished, so non-owners cannot probe for existence.
    NotFoundOrForbidden,
    Storage(StorageError),
    /// The underlying database write failed; carries the cause for the log.
    Persistence(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(msg) => write!(f, "{}", msg),
            ServiceError::InvalidId => write!(f, "Invalid source code ID."),
            ServiceError::NotFoundOrForbidden => write!(
                f,
                "Source code not found or you don't have permission to modify it."
            ),
            ServiceError::Storage(e) => write!(f, "{}", e),
            ServiceError::Persistence(_) => {
                write!(f, "Database error occurred. Please try again.")
            }
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> ServiceError {
        ServiceError::Storage(e)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> ServiceError {
        ServiceError::Persistence(e.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidId => StatusCode::BAD_REQUEST,
            ServiceError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            ServiceError::Storage(StorageError::UploadTooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Storage(_) => StatusCode::BAD_REQUEST,
            ServiceError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Storage(StorageError::Unavailable(cause)) => {
                error!("upload storage unavailable: {}", cause);
            }
            ServiceError::Storage(StorageError::UploadIncomplete(cause)) => {
                error!("upload interrupted: {}", cause);
            }
            ServiceError::Persistence(cause) => {
                error!("database write failed: {}", cause);
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.to_string(),
        }))
    }
}
