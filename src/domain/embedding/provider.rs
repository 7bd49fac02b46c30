//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, local models, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;

    /// Get the embedding dimensions for a model
    fn dimensions(&self, model: &str) -> Option<usize>;
}

/// Embed a single text and return its vector
pub async fn embed_text(
    provider: &dyn EmbeddingProvider,
    model: &str,
    text: &str,
) -> Result<Vec<f32>, DomainError> {
    let response = provider.embed(EmbeddingRequest::single(model, text)).await?;

    response
        .into_embeddings()
        .into_iter()
        .next()
        .map(|e| e.into_vector())
        .ok_or_else(|| DomainError::provider(provider.provider_name(), "No embedding returned"))
}

/// Embed several texts in one request, returning vectors in input order
pub async fn embed_texts(
    provider: &dyn EmbeddingProvider,
    model: &str,
    texts: Vec<String>,
) -> Result<Vec<Vec<f32>>, DomainError> {
    let expected = texts.len();

    if expected == 0 {
        return Ok(Vec::new());
    }

    let vectors: Vec<Vec<f32>> = provider
        .embed(EmbeddingRequest::batch(model, texts))
        .await?
        .into_embeddings()
        .into_iter()
        .map(|e| e.into_vector())
        .collect();

    if vectors.len() != expected {
        return Err(DomainError::provider(
            provider.provider_name(),
            format!("Expected {} embeddings, received {}", expected, vectors.len()),
        ));
    }

    Ok(vectors)
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Deterministic embedding provider for tests.
    ///
    /// Texts registered with `with_vector` get exactly that vector; every
    /// other text gets a pseudo-random vector seeded from its bytes.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        error: Option<String>,
        failing: AtomicBool,
        fixed: HashMap<String, Vec<f32>>,
        seen: Mutex<Vec<String>>,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                error: None,
                failing: AtomicBool::new(false),
                fixed: HashMap::new(),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.fixed.insert(text.into(), vector);
            self
        }

        /// Toggle transient failures after construction
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Every text this provider was asked to embed, in call order
        pub fn seen_inputs(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some(vector) = self.fixed.get(text) {
                return vector.clone();
            }

            (0..self.dimensions)
                .map(|i| {
                    let hash = text.bytes().fold(
                        0xcbf2_9ce4_8422_2325u64 ^ (i as u64).wrapping_mul(0x9e37_79b9),
                        |acc, b| (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3),
                    );
                    (hash % 2000) as f32 / 1000.0 - 1.0
                })
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            if self.failing.load(Ordering::SeqCst) {
                return Err(DomainError::provider(self.name, "transient failure"));
            }

            let inputs = request.inputs();
            self.seen
                .lock()
                .unwrap()
                .extend(inputs.iter().map(|s| s.to_string()));

            let embeddings: Vec<Embedding> = inputs
                .iter()
                .enumerate()
                .map(|(idx, text)| Embedding::new(idx, self.vector_for(text)))
                .collect();

            let total_tokens = inputs.iter().map(|t| t.len() / 4).sum::<usize>() as u32;

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                embeddings,
                EmbeddingUsage::new(total_tokens, total_tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn default_model(&self) -> &'static str {
            "mock-embedding"
        }

        fn dimensions(&self, _model: &str) -> Option<usize> {
            Some(self.dimensions)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::EmbeddingInput;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new("test", 16);
            let request = EmbeddingRequest::new(
                "mock-embedding",
                EmbeddingInput::Batch(vec!["Hello".into(), "World".into()]),
            );

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[1].vector().len(), 16);
            assert_eq!(provider.seen_inputs(), vec!["Hello", "World"]);
        }

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 32);

            let first = embed_text(&provider, "mock-embedding", "Hello").await.unwrap();
            let second = embed_text(&provider, "mock-embedding", "Hello").await.unwrap();
            let other = embed_text(&provider, "mock-embedding", "Goodbye").await.unwrap();

            assert_eq!(first, second);
            assert_ne!(first, other);
        }

        #[tokio::test]
        async fn test_fixed_vector_and_failure_toggle() {
            let provider =
                MockEmbeddingProvider::new("test", 3).with_vector("pinned", vec![1.0, 2.0, 3.0]);

            let vector = embed_text(&provider, "m", "pinned").await.unwrap();
            assert_eq!(vector, vec![1.0, 2.0, 3.0]);

            provider.set_failing(true);
            assert!(embed_text(&provider, "m", "pinned").await.is_err());

            provider.set_failing(false);
            assert!(embed_text(&provider, "m", "pinned").await.is_ok());
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 8).with_error("API error");

            let result = embed_text(&provider, "mock-embedding", "Hello").await;

            assert!(matches!(result, Err(DomainError::Provider { .. })));
        }
    }
}
