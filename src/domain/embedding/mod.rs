//! Embedding provider domain models and traits

mod provider;
mod request;
mod response;

pub use provider::{embed_text, embed_texts, EmbeddingProvider};
pub use request::{EmbeddingInput, EmbeddingRequest};
pub use response::{euclidean_distance, Embedding, EmbeddingResponse, EmbeddingUsage};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
