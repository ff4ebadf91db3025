/*!
 * Final document assembly.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::sections::Sections;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("blank-line regex is valid"));

/// Kind of output file produced for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Translations only
    Translated,
    /// Each source paragraph followed by its translation
    Bilingual,
}

impl OutputMode {
    pub fn from_bilingual(bilingual: bool) -> Self {
        if bilingual { Self::Bilingual } else { Self::Translated }
    }

    /// File stem suffix, without the leading underscore
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Translated => "translated",
            Self::Bilingual => "bilingual",
        }
    }

    /// Render the output text for this mode
    pub fn render(&self, sections: &Sections, translations: &[String]) -> String {
        match self {
            Self::Translated => render_translated(sections, translations),
            Self::Bilingual => render_bilingual(sections, translations),
        }
    }
}

/// Translations joined by newline, with blank lines collapsed
pub fn render_translated(sections: &Sections, translations: &[String]) -> String {
    let joined = translations.join("\n");
    let body = BLANK_LINES.replace_all(&joined, "\n");
    wrap(sections, &body)
}

/// Source/translation pairs, one line each
pub fn render_bilingual(sections: &Sections, translations: &[String]) -> String {
    let body = sections
        .body
        .iter()
        .zip(translations)
        .map(|(paragraph, translation)| format!("{}\n{}", paragraph, translation))
        .collect::<Vec<_>>()
        .join("\n");
    wrap(sections, &body)
}

fn wrap(sections: &Sections, body: &str) -> String {
    let mut text = String::new();
    if !sections.leading.is_empty() {
        text.push_str(&sections.leading.join("\n"));
        text.push('\n');
    }
    text.push_str(body);
    if !sections.references.is_empty() {
        text.push('\n');
        text.push_str(&sections.references.join("\n"));
    }
    text
}
