//! Error types for the bucket and its HTTP surface
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::bucket::Entry;

// == Bucket Error Enum ==
/// Read failures reported by the bucket store.
#[derive(Error, Debug)]
pub enum BucketError {
    /// Key not present in the region consulted
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was present but past its expiry; the entry has been removed
    #[error("Key expired: {key}")]
    Expired {
        key: String,
        /// The entry as it was stored before removal
        entry: Box<Entry>,
    },
}

impl BucketError {
    /// Returns the stale entry carried by an expiry failure.
    pub fn stale_entry(&self) -> Option<&Entry> {
        match self {
            BucketError::Expired { entry, .. } => Some(entry.as_ref()),
            BucketError::NotFound(_) => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for bucket operations.
pub type Result<T> = std::result::Result<T, BucketError>;

// == API Error Enum ==
/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Failed bucket read
    #[error(transparent)]
    Bucket(#[from] BucketError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Bucket(BucketError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Bucket(BucketError::Expired { .. }) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let valid_until = match &self {
            ApiError::Bucket(err) => err.stale_entry().and_then(|entry| entry.valid_until),
            ApiError::InvalidRequest(_) => None,
        };

        let mut body = json!({
            "error": self.to_string()
        });
        if let Some(until) = valid_until {
            body["expiredAt"] = json!(until);
        }

        (status, Json(body)).into_response()
    }
}


/// Convenience Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
