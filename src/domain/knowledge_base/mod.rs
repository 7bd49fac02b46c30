//! Knowledge base domain - document chunks and retrieval

mod chunk;
mod config;
mod retrieval;

pub use chunk::{Document, DocumentChunk};
pub use config::KnowledgeBaseConfig;
pub use retrieval::{
    format_retrieval, format_retrieval_error, retrieve_formatted, Retriever, NO_RESULTS_MESSAGE,
};

#[cfg(test)]
pub use retrieval::mock::StaticRetriever;

/// Collection name of the document index
pub const DOCUMENT_COLLECTION: &str = "documents";
