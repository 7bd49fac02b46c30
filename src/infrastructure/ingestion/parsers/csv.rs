//! CSV document parser
//!
//! Each row becomes a block of `header: value` lines; rows are separated by a
//! blank line so the chunker keeps a row together when it can.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ingestion::{DocumentMetadata, DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Parser for comma separated files with a header row
#[derive(Debug, Clone, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    fn render(text: &str) -> Result<(String, usize), DomainError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DomainError::validation(format!("Invalid CSV header: {}", e)))?
            .clone();

        let mut rows = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                DomainError::validation(format!("Invalid CSV row {}: {}", index + 1, e))
            })?;

            let lines: Vec<String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{}: {}", header, value))
                .collect();

            if !lines.is_empty() {
                rows.push(lines.join("\n"));
            }
        }

        let count = rows.len();
        Ok((rows.join("\n\n"), count))
    }
}

#[async_trait]
impl DocumentParser for CsvParser {
    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let text = input.content.into_text()?;
        let (content, rows) = Self::render(&text)?;

        let mut metadata = DocumentMetadata::new()
            .with_mime_type("text/csv")
            .with_custom("rows", Value::from(rows));

        if let Some(filename) = input.filename {
            metadata = metadata.with_source(filename);
        }

        Ok(ParsedDocument::new(content, metadata))
    }
}
