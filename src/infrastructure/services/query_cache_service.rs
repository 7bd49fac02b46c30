//! Semantic query cache service
//!
//! Serves stored responses for queries whose embedding lands close enough to a
//! previously answered one. Faults inside the cache never reach the chat turn:
//! `lookup` and `store` log them and behave as a miss or a no-op, while the
//! `try_*` variants surface them as [`CacheFault`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::embedding::{embed_text, EmbeddingProvider};
use crate::domain::query_cache::{
    epoch_seconds_now, evaluate, CacheEntry, CacheFault, CacheStats, LookupOutcome,
    QueryCacheConfig, CACHE_COLLECTION,
};
use crate::domain::vector_index::VectorIndex;
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_cache_lookup, record_cache_store};
use crate::infrastructure::vector_index::{FileVectorIndex, InMemoryVectorIndex};

/// Query cache backed by a dedicated vector index collection
#[derive(Debug)]
pub struct QueryCacheService {
    index: Arc<dyn VectorIndex<CacheEntry>>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    config: QueryCacheConfig,
}

impl QueryCacheService {
    /// Create the service over an existing index.
    ///
    /// An invalid configuration is rejected here so that a running cache
    /// never has to re-check its threshold or locations.
    pub fn new(
        index: Arc<dyn VectorIndex<CacheEntry>>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: QueryCacheConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            index,
            embedding_provider,
            config,
        })
    }

    /// Open the persistent collection named by the configuration.
    ///
    /// A disabled cache never touches disk and gets an empty in-memory index.
    pub async fn open(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: QueryCacheConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let index: Arc<dyn VectorIndex<CacheEntry>> = if config.enabled {
            Arc::new(
                FileVectorIndex::<CacheEntry>::open(&config.persist_location, CACHE_COLLECTION)
                    .await?,
            )
        } else {
            Arc::new(InMemoryVectorIndex::<CacheEntry>::new())
        };

        info!(
            enabled = config.enabled,
            backend = index.backend_name(),
            similarity_threshold = config.similarity_threshold,
            ttl_hours = config.ttl_hours(),
            "Query cache ready"
        );

        Self::new(index, embedding_provider, config)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CacheFault> {
        embed_text(
            self.embedding_provider.as_ref(),
            &self.config.embedding_model,
            query,
        )
        .await
        .map_err(CacheFault::embedding)
    }

    /// Evaluate the single nearest cached query, surfacing faults.
    ///
    /// Entries are shared by every session; `session_id` only identifies the
    /// caller in logs.
    pub async fn try_lookup(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<LookupOutcome, CacheFault> {
        if !self.config.enabled {
            return Ok(LookupOutcome::Disabled);
        }

        let vector = self.embed_query(query).await?;

        let nearest = self
            .index
            .search_nearest(&vector, 1)
            .await
            .map_err(CacheFault::index)?
            .into_iter()
            .next();

        Ok(evaluate(
            nearest,
            self.config.similarity_threshold,
            self.config.ttl_seconds,
            epoch_seconds_now(),
        ))
    }

    /// Return a cached response for `query`, if one qualifies
    pub async fn lookup(&self, query: &str, session_id: &str) -> Option<String> {
        match self.try_lookup(query, session_id).await {
            Ok(outcome) => {
                record_cache_lookup(outcome.label());

                match &outcome {
                    LookupOutcome::Hit(hit) => debug!(
                        session_id = %session_id,
                        confidence = hit.confidence,
                        age_secs = hit.age_secs,
                        stored_by = %hit.session_id,
                        "Query cache hit"
                    ),
                    LookupOutcome::BelowThreshold { confidence } => debug!(
                        session_id = %session_id,
                        confidence = *confidence,
                        threshold = self.config.similarity_threshold,
                        "Query cache miss: nearest entry below threshold"
                    ),
                    LookupOutcome::Expired {
                        confidence,
                        age_secs,
                    } => debug!(
                        session_id = %session_id,
                        confidence = *confidence,
                        age_secs = *age_secs,
                        "Query cache miss: nearest entry expired"
                    ),
                    LookupOutcome::Empty => {
                        debug!(session_id = %session_id, "Query cache miss: no entries")
                    }
                    LookupOutcome::EmptyResponse => debug!(
                        session_id = %session_id,
                        "Query cache miss: nearest entry has no response"
                    ),
                    LookupOutcome::Disabled => {}
                }

                outcome.into_response()
            }
            Err(fault) => {
                record_cache_lookup("fault");
                warn!(
                    session_id = %session_id,
                    kind = fault.kind(),
                    error = %fault,
                    "Query cache lookup failed, treating as miss"
                );
                None
            }
        }
    }

    /// Embed and append a new entry, surfacing faults.
    ///
    /// Returns `false` when caching is disabled and nothing was written.
    pub async fn try_store(
        &self,
        query: &str,
        response: &str,
        session_id: &str,
        metadata: Option<HashMap<String, Value>>,
    ) -> Result<bool, CacheFault> {
        if !self.config.enabled {
            return Ok(false);
        }

        let vector = self.embed_query(query).await?;
        let entry = CacheEntry::new(query, response, session_id, metadata.unwrap_or_default());

        self.index
            .insert(vector, entry)
            .await
            .map_err(CacheFault::index)?;

        Ok(true)
    }

    /// Cache `response` for `query`; faults are logged and dropped
    pub async fn store(
        &self,
        query: &str,
        response: &str,
        session_id: &str,
        metadata: Option<HashMap<String, Value>>,
    ) {
        match self.try_store(query, response, session_id, metadata).await {
            Ok(true) => {
                record_cache_store("stored");
                debug!(session_id = %session_id, "Stored query in cache");
            }
            Ok(false) => record_cache_store("disabled"),
            Err(fault) => {
                record_cache_store("fault");
                warn!(kind = fault.kind(), error = %fault, "Query cache store failed, skipping");
            }
        }
    }

    /// Remove every cached entry
    pub async fn clear(&self) -> Result<(), CacheFault> {
        if !self.config.enabled {
            return Ok(());
        }

        self.index
            .drop_and_recreate()
            .await
            .map_err(CacheFault::index)?;

        info!("Query cache cleared");
        Ok(())
    }

    pub async fn stats(&self) -> CacheStats {
        if !self.config.enabled {
            return CacheStats::disabled();
        }

        match self.index.count().await {
            Ok(total) => CacheStats::enabled(
                total,
                self.config.similarity_threshold,
                self.config.ttl_hours(),
            ),
            Err(e) => {
                warn!(error = %e, "Failed to count query cache entries");
                CacheStats::unavailable(e.to_string())
            }
        }
    }
}
