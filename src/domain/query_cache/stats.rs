//! Cache statistics snapshot

use serde::{Deserialize, Serialize};

/// Stats as reported to operators.
///
/// A disabled cache serializes as `{"enabled": false}`. A failed count
/// serializes as `{"enabled": true, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_entries: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheStats {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            total_entries: None,
            similarity_threshold: None,
            ttl_hours: None,
            error: None,
        }
    }

    pub fn enabled(total_entries: usize, similarity_threshold: f32, ttl_hours: f64) -> Self {
        Self {
            enabled: true,
            total_entries: Some(total_entries),
            similarity_threshold: Some(similarity_threshold),
            ttl_hours: Some(ttl_hours),
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            enabled: true,
            total_entries: None,
            similarity_threshold: None,
            ttl_hours: None,
            error: Some(error.into()),
        }
    }
}
