//! Retrieval seam and the text block handed to the model

use async_trait::async_trait;
use std::fmt::Debug;

use super::DocumentChunk;
use crate::domain::DomainError;

pub const NO_RESULTS_MESSAGE: &str = "No relevant information found in the knowledge base.";

/// Anything that can return the chunks most relevant to a query
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn retrieve(&self, query: &str) -> Result<Vec<DocumentChunk>, DomainError>;
}

/// Render retrieved chunks as a numbered, source-attributed block
pub fn format_retrieval(chunks: &[DocumentChunk]) -> String {
    if chunks.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut result = String::from("Retrieved Information:\n\n");

    for (i, chunk) in chunks.iter().enumerate() {
        result.push_str(&format!("[Document {}]\n", i + 1));
        result.push_str(&chunk.content);
        result.push('\n');

        if chunk.has_metadata() {
            let source = chunk.source.as_deref().unwrap_or("Unknown");
            result.push_str(&format!("Source: {}\n", source));
        }

        result.push('\n');
    }

    result.trim().to_string()
}

pub fn format_retrieval_error(error: &DomainError) -> String {
    format!("Error retrieving information: {}", error)
}

/// Run a retrieval and render either its results or its failure
pub async fn retrieve_formatted(retriever: &dyn Retriever, query: &str) -> String {
    match retriever.retrieve(query).await {
        Ok(chunks) => format_retrieval(&chunks),
        Err(e) => format_retrieval_error(&e),
    }
}


#[cfg(test)]
mod tests {
    use super::mock::StaticRetriever;
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_retrieval(&[]), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn test_format_numbered_with_sources() {
        let chunks = vec![
            DocumentChunk::new("Rust is a systems language.", 0).with_source("docs/rust.md"),
            DocumentChunk::new("Tokio is an async runtime.", 3).with_source("docs/tokio.txt"),
        ];

        assert_eq!(
            format_retrieval(&chunks),
            "Retrieved Information:\n\n\
             [Document 1]\nRust is a systems language.\nSource: docs/rust.md\n\n\
             [Document 2]\nTokio is an async runtime.\nSource: docs/tokio.txt"
        );
    }

    #[test]
    fn test_format_unknown_source_and_bare_chunk() {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("lang".to_string(), serde_json::json!("en"));
        let chunks = vec![
            DocumentChunk::new("Has metadata", 0).with_metadata(metadata),
            DocumentChunk::new("No metadata", 0),
        ];

        let formatted = format_retrieval(&chunks);

        assert!(formatted.contains("[Document 1]\nHas metadata\nSource: Unknown"));
        assert!(formatted.ends_with("[Document 2]\nNo metadata"));
    }

    #[tokio::test]
    async fn test_retrieve_formatted_error() {
        let retriever = StaticRetriever::failing("index offline");

        let formatted = retrieve_formatted(&retriever, "anything").await;

        assert_eq!(
            formatted,
            "Error retrieving information: Knowledge base error: index offline"
        );
    }
}
