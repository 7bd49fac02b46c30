//! Knowledge base configuration

use serde::{Deserialize, Serialize};

use crate::domain::ingestion::ChunkingConfig;
use crate::domain::DomainError;

/// Where documents come from, where their vectors live, and how they are split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Directory scanned recursively for source documents
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    /// Directory holding the persisted document index
    #[serde(default = "default_persist_location")]
    pub persist_location: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks returned per retrieval
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_documents_dir() -> String {
    "documents".to_string()
}

fn default_persist_location() -> String {
    "chroma_db".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    4
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            persist_location: default_persist_location(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

impl KnowledgeBaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents_dir(mut self, dir: impl Into<String>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    pub fn with_persist_location(mut self, location: impl Into<String>) -> Self {
        self.persist_location = location.into();
        self
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking().validate().map_err(|e| {
            DomainError::configuration(format!("knowledge_base chunking: {}", e))
        })?;

        if self.top_k == 0 {
            return Err(DomainError::configuration(
                "knowledge_base.top_k must be greater than 0",
            ));
        }

        if self.persist_location.trim().is_empty() {
            return Err(DomainError::configuration(
                "knowledge_base.persist_location must not be empty",
            ));
        }

        Ok(())
    }
}
