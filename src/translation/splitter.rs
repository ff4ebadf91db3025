/*!
 * Paragraph chunking.
 *
 * Paragraphs above the request-size threshold are split once, at the
 * sentence boundary closest to the middle of the sentence list. Both halves
 * are translated independently and re-joined with a single space.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Word count above which a paragraph is split in two
pub const MAX_WORDS_PER_CHUNK: usize = 10_000;

/// Sentence terminator, optional closing quotes/brackets, then whitespace
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?…]+["'”’)\]]*\s+"#).expect("sentence regex is valid")
});

/// Tokens ending in '.' that do not end a sentence; none is also a common word
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "cf", "fig",
    "vol", "pp", "al", "inc", "ltd", "corp", "approx", "dept", "jan", "feb", "apr", "jun", "jul",
    "aug", "sept", "oct", "nov", "dec",
];

/// Which half of a split paragraph a chunk holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
}

/// A unit of translatable text tied back to its paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the owning paragraph in the document
    pub paragraph_index: usize,
    /// Set when the paragraph was split
    pub half: Option<Half>,
    /// Text to translate
    pub text: String,
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split a paragraph into sentences, in order.
///
/// Text without any terminator is returned as a single sentence.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(paragraph) {
        if is_abbreviation(&paragraph[start..m.start()], m.as_str(), &paragraph[m.end()..]) {
            continue;
        }
        let sentence = paragraph[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = m.end();
    }

    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

fn is_abbreviation(before: &str, terminator: &str, after: &str) -> bool {
    // Only a lone '.' can follow an abbreviation
    if !terminator.starts_with('.') || terminator.trim_end().starts_with("..") {
        return false;
    }
    let mut words = before.split_whitespace().rev();
    let token = match words.next() {
        Some(token) => token.trim_start_matches(|c: char| !c.is_alphanumeric()),
        None => return false,
    };
    if is_single_capital(token) {
        return is_initial(words.next(), after.split_whitespace().next());
    }
    ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

fn is_single_capital(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// A capital letter is an initial ("J. R. Tolkien", "John F. Kennedy") when it
/// opens the sentence, follows a capitalised word or initial, or precedes
/// another initial. After a lowercase word ("plan A.") it ends the sentence.
fn is_initial(previous: Option<&str>, next: Option<&str>) -> bool {
    let next_is_initial = next
        .and_then(|word| word.strip_suffix('.'))
        .is_some_and(is_single_capital);
    if next_is_initial {
        return true;
    }
    match previous {
        None => true,
        Some(word) => word
            .chars()
            .find(|c| c.is_alphabetic())
            .is_some_and(char::is_uppercase),
    }
}

/// Split a paragraph in two when it exceeds `MAX_WORDS_PER_CHUNK` words
pub fn split_if_needed(paragraph: &str) -> Vec<String> {
    split_with_limit(paragraph, MAX_WORDS_PER_CHUNK)
}

/// Split a paragraph in two when it exceeds `max_words` words.
///
/// The first half receives `K / 2` of the `K` sentences. A paragraph with
/// fewer than two sentences has no boundary to cut at and is returned whole.
pub fn split_with_limit(paragraph: &str, max_words: usize) -> Vec<String> {
    if word_count(paragraph) <= max_words {
        return vec![paragraph.to_string()];
    }

    let sentences = split_sentences(paragraph);
    if sentences.len() < 2 {
        return vec![paragraph.to_string()];
    }

    let half = sentences.len() / 2;
    vec![sentences[..half].join(" "), sentences[half..].join(" ")]
}

/// Chunk a paragraph and tag each piece with its origin
pub fn chunk_paragraph(paragraph_index: usize, paragraph: &str, max_words: usize) -> Vec<Chunk> {
    let pieces = split_with_limit(paragraph, max_words);
    let split = pieces.len() > 1;
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            paragraph_index,
            half: match (split, i) {
                (false, _) => None,
                (true, 0) => Some(Half::First),
                (true, _) => Some(Half::Second),
            },
            text,
        })
        .collect()
}
