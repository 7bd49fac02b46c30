//! Cache entry

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn epoch_seconds_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// A stored query/response pair.
///
/// Entries are never edited after construction. The vector stored next to an
/// entry is always the embedding of `query_text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    query_text: String,
    response_text: String,
    created_at: f64,
    session_id: String,
    #[serde(default)]
    extra_metadata: HashMap<String, serde_json::Value>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        query_text: impl Into<String>,
        response_text: impl Into<String>,
        session_id: impl Into<String>,
        extra_metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::created_at(
            query_text,
            response_text,
            session_id,
            extra_metadata,
            epoch_seconds_now(),
        )
    }

    /// Create an entry with an explicit creation timestamp
    pub fn created_at(
        query_text: impl Into<String>,
        response_text: impl Into<String>,
        session_id: impl Into<String>,
        extra_metadata: HashMap<String, serde_json::Value>,
        created_at: f64,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            response_text: response_text.into(),
            created_at,
            session_id: session_id.into(),
            extra_metadata,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    /// Seconds since the Unix epoch
    pub fn created_at_secs(&self) -> f64 {
        self.created_at
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn extra_metadata(&self) -> &HashMap<String, serde_json::Value> {
        &self.extra_metadata
    }

    /// Age in seconds at the given instant
    pub fn age_at(&self, now: f64) -> f64 {
        now - self.created_at
    }

    /// Live iff `now - created_at <= ttl_seconds`
    pub fn is_live_at(&self, now: f64, ttl_seconds: u64) -> bool {
        self.age_at(now) <= ttl_seconds as f64
    }
}
