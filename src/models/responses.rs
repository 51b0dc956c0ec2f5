//! Response DTOs for the bucket server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::bucket::{Entry, StatsSnapshot};

/// Response body for the GET operation (GET /get/:key)
///
/// The entry fields are flattened next to the key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored entry
    #[serde(flatten)]
    pub entry: Entry,
    /// Remaining lifetime in milliseconds, omitted for permanent entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_remaining_ms: Option<u64>,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, entry: Entry) -> Self {
        Self {
            key: key.into(),
            ttl_remaining_ms: entry.ttl_remaining_ms(),
            entry,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Outcome message
    pub message: String,
    /// The key that was deleted
    pub key: String,
    /// Whether an entry was actually removed
    pub deleted: bool,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        let key = key.into();
        let message = if deleted {
            format!("Key '{}' deleted successfully", key)
        } else {
            format!("Key '{}' was not present", key)
        };
        Self {
            message,
            key,
            deleted,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Raw counters
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    /// Number of entries currently stored
    pub total_entries: usize,
    /// keyHits over all reads
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a counter snapshot
    pub fn new(stats: StatsSnapshot, total_entries: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", Entry::new("test_value", None));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["key"], "test_key");
        assert_eq!(json["value"], "test_value");
        assert!(json.get("creationDate").is_some());
        assert!(json.get("validUntil").is_none());
        assert!(json.get("ttlRemainingMs").is_none());
    }

    #[test]
    fn test_get_response_reports_remaining_ttl() {
        let until = chrono::Utc::now() + chrono::Duration::seconds(30);
        let json = serde_json::to_value(GetResponse::new("k", Entry::new("v", Some(until)))).unwrap();

        let remaining = json["ttlRemainingMs"].as_u64().unwrap();
        assert!(remaining <= 30_000);
        assert!(remaining >= 29_000);
        assert!(json["validUntil"].is_string());
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_value(DeleteResponse::new("gone", true)).unwrap();
        assert_eq!(json["deleted"], true);
        assert!(json["message"].as_str().unwrap().contains("deleted"));

        let json = serde_json::to_value(DeleteResponse::new("never", false)).unwrap();
        assert_eq!(json["deleted"], false);
        assert!(json["message"].as_str().unwrap().contains("not present"));
    }

    #[test]
    fn test_stats_response_fields() {
        let stats = StatsSnapshot {
            key_hits: 8,
            absent_key_hits: 2,
            ..StatsSnapshot::default()
        };
        let resp = StatsResponse::new(stats, 3);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["keyHits"], 8);
        assert_eq!(json["absentKeyHits"], 2);
        assert_eq!(json["totalEntries"], 3);
        assert!(json.get("hitRate").is_some());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
