//! Small Markdown dialect used by the resume view.
//!
//! Parsing produces a flat block list; [`to_html`] emits HTML from it. All
//! text is escaped before inline markup (code, links, bold, italic) is
//! applied.

mod html;
mod inline;

pub use html::to_html;
pub use inline::{escape, render_inline};

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").unwrap());
static UNORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*•]\s+(.*)$").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Rule,
    List { ordered: bool, items: Vec<String> },
    /// Consecutive non-blank lines; rendered with line breaks between them.
    Paragraph { lines: Vec<String> },
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Option<(bool, Vec<String>)>,
}

impl Builder {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let lines = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph { lines });
        }
    }

    fn flush_list(&mut self) {
        if let Some((ordered, items)) = self.list.take() {
            self.blocks.push(Block::List { ordered, items });
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn item(&mut self, ordered: bool, text: &str) {
        self.flush_paragraph();
        if self.list.as_ref().is_some_and(|(o, _)| *o != ordered) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| (ordered, Vec::new()))
            .1
            .push(text.to_owned());
    }
}

pub fn parse(src: &str) -> Vec<Block> {
    let mut b = Builder::default();

    for raw in src.lines() {
        let line = raw.trim();
        if line.is_empty() {
            b.flush();
        } else if let Some(caps) = HEADING.captures(line) {
            b.flush();
            b.blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_owned(),
            });
        } else if matches!(line, "---" | "___" | "***") {
            b.flush();
            b.blocks.push(Block::Rule);
        } else if let Some(caps) = UNORDERED.captures(line) {
            b.item(false, &caps[1]);
        } else if let Some(caps) = ORDERED.captures(line) {
            b.item(true, &caps[1]);
        } else {
            b.flush_list();
            b.paragraph.push(line.to_owned());
        }
    }
    b.flush();
    b.blocks
}

/// Parse and emit in one step.
pub fn render(src: &str) -> String {
    to_html(&parse(src))
}
