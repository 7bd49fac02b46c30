//! Domain layer - Core business logic and entities

pub mod conversation;
pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;
pub mod llm;
pub mod query_cache;
pub mod vector_index;

pub use conversation::{ChatReply, Transcript, DEFAULT_SESSION, SYSTEM_PROMPT};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{
    Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, DocumentMetadata, DocumentParser,
    ParsedDocument, ParserContent, ParserInput,
};
pub use knowledge_base::{Document, DocumentChunk, KnowledgeBaseConfig, Retriever};
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use query_cache::{CacheEntry, CacheFault, CacheStats, LookupOutcome, QueryCacheConfig};
pub use vector_index::{IndexedRecord, ScoredPayload, VectorIndex};
