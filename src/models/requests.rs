//! Request DTOs for the bucket server API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::bucket::{normalize_valid_until, MAX_KEY_LENGTH, MAX_TTL_SECONDS, MAX_VALUE_SIZE};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The key to store the value under
/// - `value`: The value to store
/// - `validUntil`: Optional absolute expiry (RFC3339); the zero time
///   `0001-01-01T00:00:00Z` means no expiry
/// - `ttl`: Optional relative expiry in seconds; `0` means no expiry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    /// The bucket key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional absolute expiry
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        if self.valid_until.is_some() && self.ttl.is_some() {
            return Some("Provide either validUntil or ttl, not both".to_string());
        }
        if self.ttl.is_some_and(|ttl| ttl > MAX_TTL_SECONDS) {
            return Some(format!(
                "TTL exceeds maximum of {} seconds",
                MAX_TTL_SECONDS
            ));
        }
        None
    }

    /// Resolves the absolute expiry for this request, relative to `now`.
    ///
    /// Call after [`validate`](Self::validate) succeeded.
    pub fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match (self.valid_until, self.ttl) {
            (Some(until), _) => normalize_valid_until(Some(until)),
            (None, Some(0)) | (None, None) => None,
            (None, Some(ttl)) => {
                let secs = i64::try_from(ttl.min(MAX_TTL_SECONDS)).unwrap_or(i64::MAX);
                Some(now + Duration::seconds(secs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: "test".to_string(),
            valid_until: None,
            ttl: None,
        }
    }

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
        assert!(req.valid_until.is_none());
        assert!(req.ttl.is_none());
        assert!(req.expiry(Utc::now()).is_none());
    }

    #[test]
    fn test_set_request_with_valid_until() {
        let json = r#"{"key": "test", "value": "hello", "validUntil": "2030-01-01T00:00:00Z"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();

        let expected: DateTime<Utc> = "2030-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(req.valid_until, Some(expected));
        assert_eq!(req.expiry(Utc::now()), Some(expected));
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));

        let now = Utc::now();
        assert_eq!(req.expiry(now), Some(now + Duration::seconds(60)));
    }

    #[test]
    fn test_zero_ttl_means_no_expiry() {
        let req = SetRequest {
            ttl: Some(0),
            ..request("k")
        };
        assert!(req.validate().is_none());
        assert!(req.expiry(Utc::now()).is_none());
    }

    #[test]
    fn test_zero_valid_until_means_no_expiry() {
        let json = r#"{"key": "k", "value": "v", "validUntil": "0001-01-01T00:00:00Z"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();

        assert!(req.validate().is_none());
        assert!(req.expiry(Utc::now()).is_none());
    }

    #[test]
    fn test_validate_empty_key() {
        assert!(request("").validate().is_some());
    }

    #[test]
    fn test_validate_key_too_long() {
        assert!(request(&"x".repeat(MAX_KEY_LENGTH + 1)).validate().is_some());
    }

    #[test]
    fn test_validate_both_expiry_forms() {
        let req = SetRequest {
            valid_until: Some(Utc::now()),
            ttl: Some(10),
            ..request("k")
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_ttl_too_large() {
        let req = SetRequest {
            ttl: Some(MAX_TTL_SECONDS + 1),
            ..request("k")
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            ttl: Some(60),
            ..request("valid_key")
        };
        assert!(req.validate().is_none());
    }
}
