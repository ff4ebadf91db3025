/*!
 * Carving a document into leading, body and references sections.
 */

use log::{debug, info};

use crate::errors::DocumentError;

/// Paragraphs repeated verbatim at the top when leading preservation is on
pub const LEADING_PARAGRAPHS: usize = 2;

/// A references header is a short paragraph, under this many characters
const MAX_HEADER_CHARS: usize = 30;

/// Headers that open a trailing section left untranslated
pub const REFERENCE_MARKERS: &[&str] = &[
    "Acknowledgment",
    "Notes",
    "NOTES",
    "disclosure statement",
    "References",
    "Funding",
    "declaration of conflicting interest",
    "acknowledgment",
    "supplementary material",
    "Acknowledgements",
];

/// A document split into the parts that are and are not translated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    /// Verbatim copies of the opening paragraphs, also present in `body`
    pub leading: Vec<String>,
    /// Translated
    pub body: Vec<String>,
    /// Kept verbatim at the bottom
    pub references: Vec<String>,
}

impl Sections {
    /// Everything goes to the body
    pub fn body_only(paragraphs: Vec<String>) -> Self {
        Self {
            body: paragraphs,
            ..Self::default()
        }
    }
}

/// True when `paragraph` looks like a references-type section header
pub fn is_reference_header(paragraph: &str) -> bool {
    if paragraph.chars().count() >= MAX_HEADER_CHARS {
        return false;
    }
    let lower = paragraph.to_lowercase();
    REFERENCE_MARKERS
        .iter()
        .any(|marker| paragraph.starts_with(marker) || lower.starts_with(&marker.to_lowercase()))
}

/// Split paragraphs into sections.
///
/// The references header is searched for across the whole document; the
/// first match and everything after it become `references`. Leading
/// paragraphs are copied from the top of the document and stay in `body`,
/// so the output opens with the originals followed by every translation.
pub fn split_sections(
    paragraphs: &[String],
    keep_leading: bool,
    exclude_references: bool,
) -> Result<Sections, DocumentError> {
    let leading = if keep_leading {
        paragraphs.iter().take(LEADING_PARAGRAPHS).cloned().collect()
    } else {
        Vec::new()
    };

    let mut body = paragraphs.to_vec();
    let mut references = Vec::new();

    if exclude_references {
        match paragraphs.iter().position(|p| is_reference_header(p)) {
            Some(index) => {
                info!("References will not be translated.");
                references = body.split_off(index);
            }
            None => {
                let tail = &paragraphs[paragraphs.len().saturating_sub(3)..];
                debug!("Last paragraphs without a references header: {:?}", tail);
                return Err(DocumentError::ReferencesNotFound);
            }
        }
    }

    Ok(Sections {
        leading,
        body,
        references,
    })
}
