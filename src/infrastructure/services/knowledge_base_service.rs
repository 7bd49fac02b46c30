//! Knowledge base service - document indexing and similarity retrieval

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::embedding::{embed_text, embed_texts, EmbeddingProvider};
use crate::domain::ingestion::ChunkingStrategy;
use crate::domain::knowledge_base::{
    Document, DocumentChunk, KnowledgeBaseConfig, Retriever, DOCUMENT_COLLECTION,
};
use crate::domain::vector_index::{IndexedRecord, ScoredPayload, VectorIndex};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::{DirectoryLoader, RecursiveChunker};
use crate::infrastructure::vector_index::FileVectorIndex;

/// Texts sent to the embedding provider per request while indexing
const EMBED_BATCH_SIZE: usize = 64;

/// Knowledge base over a persistent document index
pub struct KnowledgeBaseService {
    index: Arc<dyn VectorIndex<DocumentChunk>>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
    chunker: Arc<dyn ChunkingStrategy>,
    loader: DirectoryLoader,
    config: KnowledgeBaseConfig,
}

impl std::fmt::Debug for KnowledgeBaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseService")
            .field("backend", &self.index.backend_name())
            .field("embedding_model", &self.embedding_model)
            .field("documents_dir", &self.config.documents_dir)
            .finish()
    }
}

impl KnowledgeBaseService {
    pub fn new(
        index: Arc<dyn VectorIndex<DocumentChunk>>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: KnowledgeBaseConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let embedding_model = embedding_provider.default_model().to_string();

        Ok(Self {
            index,
            embedding_provider,
            embedding_model,
            chunker: Arc::new(RecursiveChunker::new()),
            loader: DirectoryLoader::default(),
            config,
        })
    }

    /// Open the persisted document collection under `config.persist_location`
    pub async fn open(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: KnowledgeBaseConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let index =
            FileVectorIndex::<DocumentChunk>::open(&config.persist_location, DOCUMENT_COLLECTION)
                .await?;

        Self::new(Arc::new(index), embedding_provider, config)
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_chunker(mut self, chunker: Arc<dyn ChunkingStrategy>) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_loader(mut self, loader: DirectoryLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &KnowledgeBaseConfig {
        &self.config
    }

    /// Make the knowledge base searchable.
    ///
    /// A collection that already holds chunks is reused as is. Otherwise every
    /// supported file under `documents_dir` is loaded and indexed. Returns the
    /// number of chunks available afterwards.
    pub async fn initialize(&self) -> Result<usize, DomainError> {
        let existing = self.index.count().await?;

        if existing > 0 {
            info!(chunks = existing, "Loaded existing knowledge base");
            return Ok(existing);
        }

        info!(dir = %self.config.documents_dir, "Building knowledge base from documents");

        let documents: Vec<Document> = self
            .loader
            .load(&self.config.documents_dir)
            .await?
            .into_iter()
            .map(|parsed| Document::new(parsed.content).with_metadata(parsed.metadata))
            .collect();

        if documents.is_empty() {
            info!("No documents found, knowledge base is empty");
            return Ok(0);
        }

        self.add_documents(documents).await
    }

    /// Split, embed and index documents, returning the number of chunks added
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        let chunking = self.config.chunking();
        let mut pending = Vec::new();

        for document in &documents {
            let attributes = chunk_attributes(document);

            for chunk in self.chunker.chunk(&document.content, &chunking)? {
                let mut payload =
                    DocumentChunk::new(chunk.content, chunk.metadata.chunk_index)
                        .with_metadata(attributes.clone());

                if let Some(source) = &document.metadata.source {
                    payload = payload.with_source(source.clone());
                }

                pending.push(payload);
            }
        }

        let mut added = 0;

        for batch in pending.chunks(EMBED_BATCH_SIZE) {
            let texts = batch.iter().map(|c| c.content.clone()).collect();
            let vectors =
                embed_texts(self.embedding_provider.as_ref(), &self.embedding_model, texts).await?;

            let records = vectors
                .into_iter()
                .zip(batch.iter().cloned())
                .map(|(vector, payload)| IndexedRecord::new(vector, payload))
                .collect();

            added += self.index.insert_batch(records).await?;
            debug!(added, total = pending.len(), "Indexed chunk batch");
        }

        info!(
            documents = documents.len(),
            chunks = added,
            "Added documents to knowledge base"
        );

        Ok(added)
    }

    /// The `k` chunks nearest to `query`, closest first
    pub async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPayload<DocumentChunk>>, DomainError> {
        let vector =
            embed_text(self.embedding_provider.as_ref(), &self.embedding_model, query).await?;

        self.index.search_nearest(&vector, k).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.index.count().await
    }
}

/// Document attributes copied onto each of its chunks
fn chunk_attributes(document: &Document) -> HashMap<String, Value> {
    let mut attributes = document.metadata.custom.clone();

    if let Some(title) = &document.metadata.title {
        attributes.insert("title".to_string(), Value::from(title.clone()));
    }

    attributes
}

#[async_trait]
impl Retriever for KnowledgeBaseService {
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentChunk>, DomainError> {
        let results = self.search(query, self.config.top_k).await?;

        Ok(results.into_iter().map(|scored| scored.payload).collect())
    }
}
