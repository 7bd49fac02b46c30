//! Markdown document parser

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag};

use crate::domain::ingestion::{DocumentMetadata, DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Parser rendering Markdown to plain text, one block per paragraph
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_text_and_title(markdown: &str) -> (String, Option<String>) {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut title: Option<String> = None;
        let mut heading_level: Option<u32> = None;
        let mut in_code_block = false;
        let mut list_depth = 0usize;

        let finish_block = |current: &mut String, blocks: &mut Vec<String>| {
            let block = current.trim();
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
            current.clear();
        };

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(level, ..)) => {
                    finish_block(&mut current, &mut blocks);
                    heading_level = Some(level as u32);
                }
                Event::End(Tag::Heading(..)) => {
                    if heading_level == Some(1) && title.is_none() {
                        title = Some(current.trim().to_string());
                    }
                    heading_level = None;
                    finish_block(&mut current, &mut blocks);
                }
                Event::Start(Tag::Paragraph)
                | Event::End(Tag::Paragraph)
                | Event::Start(Tag::BlockQuote)
                | Event::End(Tag::BlockQuote) => {
                    // Paragraphs inside list items stay part of the list block
                    if list_depth == 0 {
                        finish_block(&mut current, &mut blocks);
                    }
                }
                Event::Start(Tag::List(_)) => {
                    if list_depth == 0 {
                        finish_block(&mut current, &mut blocks);
                    }
                    list_depth += 1;
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    finish_block(&mut current, &mut blocks);
                    in_code_block = true;
                }
                Event::End(Tag::CodeBlock(_)) => {
                    in_code_block = false;
                    finish_block(&mut current, &mut blocks);
                }
                Event::Start(Tag::Item) => {
                    if !current.is_empty() && !current.ends_with('\n') {
                        current.push('\n');
                    }
                    current.push_str("- ");
                }
                Event::End(Tag::List(_)) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0 {
                        finish_block(&mut current, &mut blocks);
                    }
                }
                Event::Text(t) | Event::Code(t) => current.push_str(&t),
                Event::SoftBreak | Event::HardBreak => {
                    current.push(if in_code_block { '\n' } else { ' ' });
                }
                _ => {}
            }
        }

        finish_block(&mut current, &mut blocks);

        (blocks.join("\n\n"), title)
    }
}

#[async_trait]
impl DocumentParser for MarkdownParser {
    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let raw_content = input.content.into_text()?;
        let (content, title) = Self::extract_text_and_title(&raw_content);

        let mut metadata = DocumentMetadata::new().with_mime_type("text/markdown");

        if let Some(t) = title {
            metadata = metadata.with_title(t);
        }

        if let Some(filename) = input.filename {
            metadata = metadata.with_source(filename);
        }

        Ok(ParsedDocument::new(content, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(markdown: &str) -> ParsedDocument {
        MarkdownParser::new()
            .parse(ParserInput::from_text(markdown))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_parse_simple_markdown() {
        let result = parse("# Hello World\n\nThis is a paragraph.").await;

        assert_eq!(result.content, "Hello World\n\nThis is a paragraph.");
        assert_eq!(result.metadata.title, Some("Hello World".to_string()));
    }

    #[tokio::test]
    async fn test_formatting_is_stripped() {
        let result = parse("**bold** and *italic* with `code`").await;

        assert_eq!(result.content, "bold and italic with code");
    }

    #[tokio::test]
    async fn test_paragraphs_stay_separated() {
        let result = parse("First line\nsame paragraph.\n\nSecond paragraph.").await;

        assert_eq!(result.content, "First line same paragraph.\n\nSecond paragraph.");
    }

    #[tokio::test]
    async fn test_lists_and_code_blocks() {
        let result = parse("- Item 1\n- Item 2\n\n```rust\nlet x = 1;\nlet y = 2;\n```").await;

        assert!(result.content.contains("- Item 1\n- Item 2"));
        assert!(result.content.contains("let x = 1;\nlet y = 2;"));
    }

    #[tokio::test]
    async fn test_loose_list_is_one_block() {
        let result = parse("Intro.\n\n- First\n\n- Second\n\nOutro.").await;

        assert_eq!(result.content, "Intro.\n\n- First\n- Second\n\nOutro.");
    }

    #[tokio::test]
    async fn test_parse_markdown_without_h1() {
        let result = parse("## Secondary Heading\n\nNo H1 here.").await;

        assert!(result.metadata.title.is_none());
    }

    #[test]
    fn test_supports_file() {
        let parser = MarkdownParser::new();
        assert!(parser.supports_file("readme.md"));
        assert!(parser.supports_file("doc.markdown"));
        assert!(!parser.supports_file("file.txt"));
    }
}
