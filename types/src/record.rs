//! URL Record - one shortened URL as stored in its home shard
//!
//! Records are created once and never updated. The short code decides the
//! home shard; the id is only unique, it carries no routing information.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ShardId;

/// Lifetime stamped on newly created records
pub const RECORD_TTL_DAYS: i64 = 30;

/// A stored URL mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    /// Generated unique identifier
    pub id: String,

    /// The original long URL
    pub original_url: String,

    /// Short code (fixed alphabet, routes to exactly one shard)
    pub short_code: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Optional expiration time (informational, nothing sweeps it)
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Create a new record stamped now, expiring after `RECORD_TTL_DAYS`
    pub fn new(id: String, original_url: String, short_code: String) -> Self {
        let created_at = Utc::now();
        Self {
            id,
            original_url,
            short_code,
            created_at,
            expires_at: Some(created_at + Duration::days(RECORD_TTL_DAYS)),
        }
    }

    /// Override the creation timestamp (migration and tests)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Clear the expiration timestamp
    pub fn without_expiry(mut self) -> Self {
        self.expires_at = None;
        self
    }
}

/// Record count of a single shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardStats {
    pub shard_id: ShardId,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_expires_after_ttl() {
        let record = UrlRecord::new(
            "id-1".to_string(),
            "https://example.com".to_string(),
            "abc".to_string(),
        );

        let expires_at = record.expires_at.unwrap();
        assert_eq!(expires_at - record.created_at, Duration::days(RECORD_TTL_DAYS));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = UrlRecord::new(
            "id-1".to_string(),
            "https://example.com".to_string(),
            "abc".to_string(),
        )
        .without_expiry();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["shortCode"], "abc");
        assert!(json["expiresAt"].is_null());
    }
}
