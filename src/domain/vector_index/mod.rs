//! Vector index domain types
//!
//! Both the document retrieval index and the query cache sit behind the
//! same nearest-neighbor contract; only the payload type differs.

mod index;

pub use index::{IndexedRecord, ScoredPayload, VectorIndex};

#[cfg(test)]
pub use index::mock::FailingVectorIndex;
