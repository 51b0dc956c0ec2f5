//! API Handlers
//!
//! HTTP request handlers for each bucket server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::bucket::BucketStore;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The bucket does its own locking, so handlers share it through a plain `Arc`.
#[derive(Clone, Default)]
pub struct AppState {
    /// Shared bucket store
    pub bucket: Arc<BucketStore>,
}

impl AppState {
    /// Creates a new AppState around the given bucket.
    pub fn new(bucket: BucketStore) -> Self {
        Self {
            bucket: Arc::new(bucket),
        }
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair, with an expiry if `validUntil` or `ttl` is given.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> ApiResult<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let valid_until = req.expiry(Utc::now());
    state.bucket.put(req.key.clone(), req.value, valid_until);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves an entry by key. Expired entries are removed and reported as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    let entry = state.bucket.get(&key)?;

    Ok(Json(GetResponse::new(key, entry)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key. Deleting an absent key succeeds with `deleted: false`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.bucket.delete(&key);

    Json(DeleteResponse::new(key, deleted))
}

/// Handler for GET /stats
///
/// Returns the bucket usage counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.bucket.stats(), state.bucket.len()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BucketError;

    fn set_request(key: &str, value: &str, ttl: Option<u64>) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            valid_until: None,
            ttl,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = AppState::default();

        let req = set_request("test_key", "test_value", None);
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        let response = result.unwrap();
        assert_eq!(response.entry.value, "test_value");
        assert!(response.entry.is_permanent());
    }

    #[tokio::test]
    async fn test_set_with_ttl_routes_to_expiring_region() {
        let state = AppState::default();

        let req = set_request("ttl_key", "v", Some(60));
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        assert!(state.bucket.is_ttl_key("ttl_key"));
        let response = get_handler(State(state), Path("ttl_key".to_string()))
            .await
            .unwrap();
        assert!(response.entry.valid_until.is_some());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = AppState::default();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(
            result,
            Err(ApiError::Bucket(BucketError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = AppState::default();

        let req = set_request("to_delete", "value", None);
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(response.deleted);

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_not_an_error() {
        let state = AppState::default();

        let response = delete_handler(State(state.clone()), Path("nothing".to_string())).await;
        assert!(!response.deleted);
        assert_eq!(state.bucket.stats().key_deletes, 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::default();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.key_hits, 0);
        assert_eq!(response.stats.absent_key_hits, 0);
        assert_eq!(response.total_entries, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = AppState::default();

        let req = set_request("", "value", None);
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
