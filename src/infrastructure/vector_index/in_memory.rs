//! Process-local vector index

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::flat::FlatCollection;
use crate::domain::vector_index::{IndexedRecord, ScoredPayload, VectorIndex};
use crate::domain::DomainError;

/// Flat vector index kept in memory. Contents are lost on exit.
#[derive(Debug)]
pub struct InMemoryVectorIndex<P> {
    collection: RwLock<FlatCollection<P>>,
}

impl<P> Default for InMemoryVectorIndex<P> {
    fn default() -> Self {
        Self {
            collection: RwLock::new(FlatCollection::default()),
        }
    }
}

impl<P> InMemoryVectorIndex<P> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<P> VectorIndex<P> for InMemoryVectorIndex<P>
where
    P: Clone + Send + Sync + Debug + 'static,
{
    async fn search_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPayload<P>>, DomainError> {
        self.collection.read().await.nearest(vector, k)
    }

    async fn insert(&self, vector: Vec<f32>, payload: P) -> Result<(), DomainError> {
        self.collection
            .write()
            .await
            .push(IndexedRecord::new(vector, payload))
    }

    async fn insert_batch(&self, records: Vec<IndexedRecord<P>>) -> Result<usize, DomainError> {
        let mut collection = self.collection.write().await;
        let count = records.len();

        for record in records {
            collection.push(record)?;
        }

        Ok(count)
    }

    async fn drop_and_recreate(&self) -> Result<(), DomainError> {
        self.collection.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.collection.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
