//! Recursive directory loader

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, warn};

use super::parsers::{CsvParser, MarkdownParser, PlainTextParser};
use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Walks a directory tree and parses every file some parser accepts
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    parsers: Vec<Arc<dyn DocumentParser>>,
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new()
            .with_parser(Arc::new(PlainTextParser::new()))
            .with_parser(Arc::new(MarkdownParser::new()))
            .with_parser(Arc::new(CsvParser::new()))
    }
}

impl DirectoryLoader {
    /// Loader with no parsers registered
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    fn parser_for(&self, path: &Path) -> Option<&Arc<dyn DocumentParser>> {
        let name = path.file_name()?.to_str()?;
        self.parsers.iter().find(|p| p.supports_file(name))
    }

    /// Load every supported document under `dir`.
    ///
    /// A missing directory is created and yields nothing. Files that cannot
    /// be read or parsed are skipped with a warning.
    pub async fn load(&self, dir: impl AsRef<Path>) -> Result<Vec<ParsedDocument>, DomainError> {
        let dir = dir.as_ref();

        if !fs::try_exists(dir).await.unwrap_or(false) {
            fs::create_dir_all(dir).await.map_err(|e| {
                DomainError::knowledge_base(format!(
                    "Failed to create documents directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            info!(dir = %dir.display(), "Created empty documents directory");
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        for path in Self::collect_files(dir).await? {
            let Some(parser) = self.parser_for(&path) else {
                debug!(path = %path.display(), "No parser for file, skipping");
                continue;
            };

            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read document");
                    continue;
                }
            };

            let input = ParserInput::from_bytes(bytes).with_filename(path.display().to_string());

            match parser.parse(input).await {
                Ok(document) if document.content.trim().is_empty() => {
                    debug!(path = %path.display(), "Document is empty, skipping");
                }
                Ok(document) => documents.push(document),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to parse document"),
            }
        }

        info!(dir = %dir.display(), count = documents.len(), "Loaded documents");
        Ok(documents)
    }

    /// All regular files below `dir`, in sorted order
    async fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let mut pending = vec![dir.to_path_buf()];
        let mut files = Vec::new();

        while let Some(current) = pending.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = %current.display(), error = %e, "Failed to list directory");
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                DomainError::knowledge_base(format!(
                    "Failed to list {}: {}",
                    current.display(),
                    e
                ))
            })? {
                let path = entry.path();
                match entry.file_type().await {
                    Ok(kind) if kind.is_dir() => pending.push(path),
                    Ok(kind) if kind.is_file() => files.push(path),
                    _ => {}
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ragchat-docs-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_directory_is_created() {
        let dir = temp_dir();

        let documents = DirectoryLoader::default().load(&dir).await.unwrap();

        assert!(documents.is_empty());
        assert!(fs::try_exists(&dir).await.unwrap());

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_loads_supported_files_recursively() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("nested")).await.unwrap();
        fs::write(dir.join("a.txt"), "Plain text body").await.unwrap();
        fs::write(dir.join("nested/b.md"), "# Title\n\nMarkdown body").await.unwrap();
        fs::write(dir.join("nested/c.csv"), "term,meaning\nRAG,retrieval augmented generation\n")
            .await
            .unwrap();
        fs::write(dir.join("d.pdf"), "not supported").await.unwrap();
        fs::write(dir.join("empty.txt"), "   ").await.unwrap();
        fs::write(dir.join("bad.txt"), [0xff, 0xfe, 0xfd]).await.unwrap();

        let documents = DirectoryLoader::default().load(&dir).await.unwrap();

        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].content, "Plain text body");
        assert!(documents[0]
            .metadata
            .source
            .as_deref()
            .unwrap()
            .ends_with("a.txt"));
        assert_eq!(documents[1].metadata.title.as_deref(), Some("Title"));
        assert_eq!(
            documents[2].content,
            "term: RAG\nmeaning: retrieval augmented generation"
        );

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_loader_without_parsers_loads_nothing() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("a.txt"), "text").await.unwrap();

        let documents = DirectoryLoader::new().load(&dir).await.unwrap();

        assert!(documents.is_empty());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
