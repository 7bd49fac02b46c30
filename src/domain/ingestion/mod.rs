//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentParser` trait for turning files into plain text
//! - `ChunkingStrategy` trait for splitting text into overlapping chunks

pub mod chunker;
pub mod parser;

pub use chunker::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
pub use parser::{DocumentMetadata, DocumentParser, ParsedDocument, ParserContent, ParserInput};
