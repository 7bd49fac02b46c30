//! Document parser implementations

mod csv;
mod markdown;
mod plain_text;

pub use self::csv::CsvParser;
pub use markdown::MarkdownParser;
pub use plain_text::PlainTextParser;
