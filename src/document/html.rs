/*!
 * Readable-text extraction from HTML.
 *
 * The page is parsed with html5ever into an `RcDom` and walked depth-first.
 * Non-content subtrees (scripts, navigation, forms, ...) are dropped, block
 * elements end the current line and whitespace inside a line is collapsed.
 */

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::errors::DocumentError;

/// Subtrees that never hold article text
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "head", "nav", "footer", "header", "aside", "form", "svg",
    "template", "iframe", "button", "select",
];

/// Elements that start and end a line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "caption", "dd", "div", "dl", "dt", "figcaption",
    "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

/// Extract the readable text of an HTML page, one block per line
pub fn extract_text(html: &str) -> Result<String, DocumentError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| DocumentError::Extraction(e.to_string()))?;

    let mut collector = TextCollector::default();
    collector.walk(&dom.document);
    let text = collector.finish();

    if text.is_empty() {
        return Err(DocumentError::Extraction(
            "no readable text found in page".to_string(),
        ));
    }
    Ok(text)
}

#[derive(Default)]
struct TextCollector {
    lines: Vec<String>,
    current: String,
    pending_space: bool,
}

impl TextCollector {
    fn walk(&mut self, node: &Handle) {
        match node.data {
            NodeData::Document => self.walk_children(node),
            NodeData::Element { ref name, .. } => {
                let tag = name.local.as_ref();
                if SKIPPED_TAGS.contains(&tag) {
                    return;
                }
                if tag == "br" {
                    self.break_line();
                    return;
                }
                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    self.break_line();
                }
                self.walk_children(node);
                if block {
                    self.break_line();
                }
            }
            NodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                self.push_text(&text);
            }
            _ => {}
        }
    }

    fn walk_children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.current.is_empty() {
                self.current.push(' ');
            }
            self.pending_space = false;
            self.current.push(c);
        }
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.pending_space = false;
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}
