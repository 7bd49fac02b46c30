//! Vector index trait

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A payload returned by a nearest-neighbor search together with its
/// Euclidean distance from the query vector
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPayload<P> {
    pub payload: P,
    pub distance: f32,
}

impl<P> ScoredPayload<P> {
    pub fn new(payload: P, distance: f32) -> Self {
        Self { payload, distance }
    }
}

/// A stored (vector, payload) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedRecord<P> {
    pub vector: Vec<f32>,
    pub payload: P,
}

impl<P> IndexedRecord<P> {
    pub fn new(vector: Vec<f32>, payload: P) -> Self {
        Self { vector, payload }
    }
}

/// A collection of vectors with attached payloads, searchable by L2 distance.
///
/// Implementations own their concurrency safety: concurrent searches and
/// appends through a shared handle must be sound without outside locking.
#[async_trait]
pub trait VectorIndex<P>: Send + Sync + Debug
where
    P: Send + Sync + 'static,
{
    /// Return up to `k` payloads ordered by ascending distance
    async fn search_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPayload<P>>, DomainError>;

    /// Append a single record
    async fn insert(&self, vector: Vec<f32>, payload: P) -> Result<(), DomainError>;

    /// Append several records
    async fn insert_batch(&self, records: Vec<IndexedRecord<P>>) -> Result<usize, DomainError> {
        let count = records.len();

        for record in records {
            self.insert(record.vector, record.payload).await?;
        }

        Ok(count)
    }

    /// Discard every record and leave an empty, usable collection behind
    async fn drop_and_recreate(&self) -> Result<(), DomainError>;

    /// Number of physically stored records
    async fn count(&self) -> Result<usize, DomainError>;

    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Index whose every operation fails, for exercising fault paths
    #[derive(Debug, Default)]
    pub struct FailingVectorIndex;

    #[async_trait]
    impl<P> VectorIndex<P> for FailingVectorIndex
    where
        P: Send + Sync + 'static,
    {
        async fn search_nearest(
            &self,
            _vector: &[f32],
            _k: usize,
        ) -> Result<Vec<ScoredPayload<P>>, DomainError> {
            Err(DomainError::storage("index unavailable"))
        }

        async fn insert(&self, _vector: Vec<f32>, _payload: P) -> Result<(), DomainError> {
            Err(DomainError::storage("index unavailable"))
        }

        async fn drop_and_recreate(&self) -> Result<(), DomainError> {
            Err(DomainError::storage("index unavailable"))
        }

        async fn count(&self) -> Result<usize, DomainError> {
            Err(DomainError::storage("index unavailable"))
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }
}
