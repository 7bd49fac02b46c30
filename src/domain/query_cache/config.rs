//! Query cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the semantic query cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCacheConfig {
    /// When false every cache operation is a no-op
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory holding the persistent cache collection
    #[serde(default = "default_persist_location")]
    pub persist_location: String,

    /// Embedding model used for both storing and looking up queries
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Minimum confidence for a hit, in (0, 1]
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum entry age in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_persist_location() -> String {
    "query_cache_db".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_similarity_threshold() -> f32 {
    0.95
}

fn default_ttl_seconds() -> u64 {
    86_400
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            persist_location: default_persist_location(),
            embedding_model: default_embedding_model(),
            similarity_threshold: default_similarity_threshold(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl QueryCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn ttl_hours(&self) -> f64 {
        self.ttl_seconds as f64 / 3600.0
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_persist_location(mut self, location: impl Into<String>) -> Self {
        self.persist_location = location.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the threshold as given; out-of-range values are rejected by `validate`
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = ttl.as_secs();
        self
    }

    /// Reject configurations the cache must not start with
    pub fn validate(&self) -> Result<(), DomainError> {
        let threshold = self.similarity_threshold;

        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(DomainError::configuration(format!(
                "cache.similarity_threshold must be in (0, 1], got {}",
                threshold
            )));
        }

        if self.persist_location.trim().is_empty() {
            return Err(DomainError::configuration(
                "cache.persist_location must not be empty",
            ));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(DomainError::configuration(
                "cache.embedding_model must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryCacheConfig::default();

        assert!(config.enabled);
        assert_eq!(config.persist_location, "query_cache_db");
        assert_eq!(config.embedding_model, "text-embedding-ada-002");
        assert!((config.similarity_threshold - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), Duration::from_secs(86_400));
        assert!((config.ttl_hours() - 24.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = QueryCacheConfig::new()
            .with_enabled(false)
            .with_persist_location("/tmp/cache")
            .with_embedding_model("custom-model")
            .with_similarity_threshold(0.9)
            .with_ttl(Duration::from_secs(2));

        assert!(!config.enabled);
        assert_eq!(config.persist_location, "/tmp/cache");
        assert_eq!(config.embedding_model, "custom-model");
        assert_eq!(config.ttl_seconds, 2);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(QueryCacheConfig::new().with_similarity_threshold(1.0).validate().is_ok());
        assert!(QueryCacheConfig::new().with_similarity_threshold(0.01).validate().is_ok());

        for bad in [0.0, -0.5, 1.01, f32::NAN] {
            let result = QueryCacheConfig::new().with_similarity_threshold(bad).validate();
            assert!(
                matches!(result, Err(DomainError::Configuration { .. })),
                "threshold {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_zero_ttl_is_valid() {
        let config = QueryCacheConfig::new().with_ttl(Duration::ZERO);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_persist_location_rejected() {
        let config = QueryCacheConfig::new().with_persist_location("  ");

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: QueryCacheConfig =
            serde_json::from_str(r#"{"similarity_threshold": 0.9}"#).unwrap();

        assert!(config.enabled);
        assert!((config.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.ttl_seconds, 86_400);
    }
}
