//! Document ingestion infrastructure
//!
//! Parsers for plain text and Markdown, the recursive chunker, and the
//! directory loader that feeds the knowledge base.

pub mod chunkers;
pub mod loader;
pub mod parsers;

pub use chunkers::RecursiveChunker;
pub use loader::DirectoryLoader;
pub use parsers::{MarkdownParser, PlainTextParser};
