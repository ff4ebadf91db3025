/*!
 * Document model and I/O.
 *
 * - `reader`: Loading files and URLs into paragraphs
 * - `html`: Readable-text extraction from HTML
 * - `sections`: Leading/body/references carve-out
 * - `output`: Translated and bilingual rendering
 */

pub use self::output::OutputMode;
pub use self::reader::read_source;
pub use self::sections::{Sections, split_sections};

pub mod html;
pub mod output;
pub mod reader;
pub mod sections;

/// An ordered list of paragraphs read from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File path or URL the text came from
    pub source: String,
    /// Trimmed, non-blank lines in source order
    pub paragraphs: Vec<String>,
}

impl Document {
    /// Build a document from raw text, one paragraph per non-blank line
    pub fn from_text(source: impl Into<String>, text: &str) -> Self {
        let paragraphs = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            source: source.into(),
            paragraphs,
        }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|p| crate::translation::splitter::word_count(p))
            .sum()
    }
}
