//! Exhaustive L2 search over an in-memory record list

use crate::domain::embedding::euclidean_distance;
use crate::domain::vector_index::{IndexedRecord, ScoredPayload};
use crate::domain::DomainError;

/// Records plus the dimension fixed by the first insert
#[derive(Debug)]
pub(crate) struct FlatCollection<P> {
    dimension: Option<usize>,
    records: Vec<IndexedRecord<P>>,
}

impl<P> Default for FlatCollection<P> {
    fn default() -> Self {
        Self {
            dimension: None,
            records: Vec::new(),
        }
    }
}

impl<P: Clone> FlatCollection<P> {
    pub(crate) fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.dimension = None;
    }

    /// Reject vectors that cannot be stored in this collection
    pub(crate) fn check(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.is_empty() {
            return Err(DomainError::validation("Cannot index an empty vector"));
        }

        match self.dimension {
            Some(dimension) if dimension != vector.len() => Err(DomainError::validation(format!(
                "Vector dimension mismatch: collection has {}, got {}",
                dimension,
                vector.len()
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn push(&mut self, record: IndexedRecord<P>) -> Result<(), DomainError> {
        self.check(&record.vector)?;
        self.dimension.get_or_insert(record.vector.len());
        self.records.push(record);
        Ok(())
    }

    /// Up to `k` payloads by ascending distance. Ties keep insertion order.
    pub(crate) fn nearest(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPayload<P>>, DomainError> {
        if self.records.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        self.check(query)?;

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| euclidean_distance(query, &record.vector).map(|d| (i, d)))
            .collect();

        // Stable sort
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, distance)| ScoredPayload::new(self.records[i].payload.clone(), distance))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(vectors: &[(&str, Vec<f32>)]) -> FlatCollection<String> {
        let mut collection = FlatCollection::default();
        for (name, vector) in vectors {
            collection
                .push(IndexedRecord::new(vector.clone(), name.to_string()))
                .unwrap();
        }
        collection
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let collection = collection(&[
            ("far", vec![10.0, 0.0]),
            ("near", vec![1.0, 0.0]),
            ("exact", vec![0.0, 0.0]),
        ]);

        let results = collection.nearest(&[0.0, 0.0], 3).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.payload.as_str()).collect();

        assert_eq!(names, vec!["exact", "near", "far"]);
        assert_eq!(results[0].distance, 0.0);
        assert!((results[2].distance - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let collection = collection(&[
            ("first", vec![1.0, 0.0]),
            ("second", vec![0.0, 1.0]),
            ("third", vec![-1.0, 0.0]),
        ]);

        let results = collection.nearest(&[0.0, 0.0], 2).unwrap();

        assert_eq!(results[0].payload, "first");
        assert_eq!(results[1].payload, "second");
    }

    #[test]
    fn test_empty_collection_returns_nothing() {
        let collection: FlatCollection<String> = FlatCollection::default();

        assert!(collection.nearest(&[1.0], 1).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_fixed_by_first_insert() {
        let mut collection = collection(&[("a", vec![1.0, 2.0, 3.0])]);

        let result = collection.push(IndexedRecord::new(vec![1.0], "b".to_string()));
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(collection.nearest(&[1.0, 2.0], 1).is_err());

        collection.clear();
        assert!(collection
            .push(IndexedRecord::new(vec![1.0], "b".to_string()))
            .is_ok());
    }

    #[test]
    fn test_empty_vector_rejected() {
        let mut collection: FlatCollection<String> = FlatCollection::default();

        assert!(collection
            .push(IndexedRecord::new(vec![], "x".to_string()))
            .is_err());
        assert_eq!(collection.len(), 0);
    }
}
