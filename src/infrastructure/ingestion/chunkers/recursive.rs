//! Recursive chunking strategy

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy)]
enum Level {
    Separator(&'static str),
    Sentences,
    Graphemes,
}

/// Coarsest first
const LEVELS: [Level; 5] = [
    Level::Separator("\n\n"),
    Level::Separator("\n"),
    Level::Sentences,
    Level::Separator(" "),
    Level::Graphemes,
];

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Chunking strategy that splits text hierarchically and re-merges the
/// pieces into windows of at most `chunk_size` characters, carrying up to
/// `chunk_overlap` characters of trailing context into the next window.
///
/// Splitting order: paragraphs -> lines -> sentences -> words -> graphemes
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

impl RecursiveChunker {
    pub fn new() -> Self {
        Self
    }

    fn split(text: &str, level: Level) -> (Vec<&str>, &'static str) {
        match level {
            Level::Separator(separator) => (
                text.split(separator).filter(|p| !p.is_empty()).collect(),
                separator,
            ),
            Level::Sentences => (text.unicode_sentences().collect(), ""),
            Level::Graphemes => (text.graphemes(true).collect(), ""),
        }
    }

    fn recursive_split(text: &str, levels: &[Level], config: &ChunkingConfig) -> Vec<String> {
        let Some(last) = levels.len().checked_sub(1) else {
            return vec![text.to_string()];
        };

        // First level that actually divides the text
        let (position, (pieces, separator)) = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (i, Self::split(text, *level)))
            .find(|(i, (pieces, _))| pieces.len() > 1 || *i == last)
            .unwrap_or_else(|| (last, Self::split(text, levels[last])));
        let finer = &levels[position + 1..];

        let mut result = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) <= config.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                result.extend(Self::merge(&pending, separator, config));
                pending.clear();
            }

            if finer.is_empty() {
                result.push(piece.to_string());
            } else {
                result.extend(Self::recursive_split(piece, finer, config));
            }
        }

        if !pending.is_empty() {
            result.extend(Self::merge(&pending, separator, config));
        }

        result
    }

    fn merge(pieces: &[&str], separator: &str, config: &ChunkingConfig) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        let joiner_len = |window: &VecDeque<&str>| {
            if window.is_empty() { 0 } else { separator_len }
        };

        for piece in pieces {
            let len = char_len(piece);

            if !window.is_empty() && total + len + joiner_len(&window) > config.chunk_size {
                if let Some(chunk) = Self::join(&window, separator) {
                    chunks.push(chunk);
                }

                // Keep at most `chunk_overlap` characters as leading context
                while total > config.chunk_overlap
                    || (total > 0 && total + len + joiner_len(&window) > config.chunk_size)
                {
                    let Some(first) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + joiner_len(&window);
                }
            }

            total += len + joiner_len(&window);
            window.push_back(piece);
        }

        if let Some(chunk) = Self::join(&window, separator) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(window: &VecDeque<&str>, separator: &str) -> Option<String> {
        let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
        let trimmed = joined.trim();

        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        if char_len(content) <= config.chunk_size {
            return Ok(vec![Chunk::new(
                content,
                ChunkMetadata::new(0, 1, 0, content.len()),
            )]);
        }

        let texts = Self::recursive_split(content, &LEVELS, config);
        let total = texts.len();
        let mut cursor = 0usize;

        let chunks = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let start = content[cursor..]
                    .find(&text)
                    .map(|p| cursor + p)
                    .unwrap_or(cursor);
                let end = (start + text.len()).min(content.len());

                // Overlapping chunks may start inside the previous one
                cursor = content[start..]
                    .chars()
                    .next()
                    .map(|c| start + c.len_utf8())
                    .unwrap_or(start);

                Chunk::new(text, ChunkMetadata::new(i, total, start, end))
            })
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
