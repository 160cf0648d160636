//! Minimal page document model for in-tab scripts.
//!
//! Only what element lookup needs: a flat list of elements in document
//! order with their tag name, `id`, classes, parent link and the byte span
//! of their outer HTML in the source text. Malformed markup never fails to
//! parse; unmatched end tags are ignored and unclosed elements run to the
//! end of the input.

use thiserror::Error;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone)]
struct Element {
    name: String,
    id: Option<String>,
    classes: Vec<String>,
    start: usize,
    end: usize,
    parent: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PageDocument {
    html: String,
    elements: Vec<Element>,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        let lower = html.to_ascii_lowercase();
        let bytes = html.as_bytes();
        let mut elements: Vec<Element> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut i = 0;

        while let Some(rel) = html[i..].find('<') {
            let lt = i + rel;
            let rest = &html[lt..];

            if rest.starts_with("<!--") {
                i = match html[lt + 4..].find("-->") {
                    Some(e) => lt + 4 + e + 3,
                    None => html.len(),
                };
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                i = match html[lt..].find('>') {
                    Some(e) => lt + e + 1,
                    None => html.len(),
                };
                continue;
            }
            if rest.starts_with("</") {
                let Some(gt) = html[lt..].find('>').map(|e| lt + e) else {
                    break;
                };
                let name = lower[lt + 2..gt].trim().split_whitespace().next().unwrap_or("");
                close_until(&mut elements, &mut open, name, lt, gt + 1);
                i = gt + 1;
                continue;
            }
            if !bytes.get(lt + 1).is_some_and(u8::is_ascii_alphabetic) {
                i = lt + 1;
                continue;
            }

            let Some(tag) = scan_start_tag(html, lt) else {
                break;
            };
            let name = lower[lt + 1..tag.name_end].to_owned();
            let index = elements.len();
            elements.push(Element {
                id: tag.id,
                classes: tag.classes,
                start: lt,
                end: tag.end,
                parent: open.last().copied(),
                name,
            });
            i = tag.end;

            let name = elements[index].name.as_str();
            if tag.self_closing || VOID_ELEMENTS.contains(&name) {
                continue;
            }
            if RAW_TEXT_ELEMENTS.contains(&name) {
                let close = format!("</{name}");
                let end = lower[i..]
                    .find(&close)
                    .and_then(|c| html[i + c..].find('>').map(|g| i + c + g + 1))
                    .unwrap_or(html.len());
                elements[index].end = end;
                i = end;
                continue;
            }
            open.push(index);
        }

        for idx in open {
            elements[idx].end = html.len();
        }

        Self {
            html: html.to_owned(),
            elements,
        }
    }

    /// First element in document order matching `selector`.
    pub fn query_selector(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        (0..self.elements.len())
            .find(|&idx| selector.matches_at(self, selector.parts.len() - 1, idx))
            .map(|index| ElementRef { doc: self, index })
    }

    /// Parse `selector` and run [`Self::query_selector`].
    pub fn select(&self, selector: &str) -> Result<Option<ElementRef<'_>>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_selector(&selector))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Pop open elements up to and including the nearest one named `name`.
/// Elements closed implicitly end where the end tag starts.
fn close_until(
    elements: &mut [Element],
    open: &mut Vec<usize>,
    name: &str,
    tag_start: usize,
    tag_end: usize,
) {
    let Some(pos) = open.iter().rposition(|&idx| elements[idx].name == name) else {
        return;
    };
    for idx in open.drain(pos + 1..) {
        elements[idx].end = tag_start;
    }
    if let Some(idx) = open.pop() {
        elements[idx].end = tag_end;
    }
}

struct StartTag {
    name_end: usize,
    end: usize,
    self_closing: bool,
    id: Option<String>,
    classes: Vec<String>,
}

fn scan_start_tag(html: &str, lt: usize) -> Option<StartTag> {
    let bytes = html.as_bytes();
    let is_delim = |b: u8| b.is_ascii_whitespace() || b == b'/' || b == b'>';

    let mut i = lt + 1;
    while i < bytes.len() && !is_delim(bytes[i]) {
        i += 1;
    }
    let name_end = i;
    let mut id = None;
    let mut classes = Vec::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => break,
            b'/' => {
                self_closing = bytes.get(i + 1) == Some(&b'>');
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len() && !is_delim(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        let attr = html[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = "";
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i)? {
                q @ (b'"' | b'\'') => {
                    let close = html[i + 1..].find(*q as char)? + i + 1;
                    value = &html[i + 1..close];
                    i = close + 1;
                }
                _ => {
                    let v_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = &html[v_start..i];
                }
            }
        }

        match attr.as_str() {
            "id" if id.is_none() => id = Some(value.to_owned()),
            "class" if classes.is_empty() => {
                classes = value.split_whitespace().map(str::to_owned).collect();
            }
            _ => {}
        }
    }

    Some(StartTag {
        name_end,
        end: i + 1,
        self_closing,
        id,
        classes,
    })
}

/// Borrowed handle to one element of a [`PageDocument`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a PageDocument,
    index: usize,
}

impl<'a> ElementRef<'a> {
    fn element(&self) -> &'a Element {
        &self.doc.elements[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element().id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element().classes.iter().any(|c| c == class)
    }

    /// Source text of the element including its own tags.
    pub fn outer_html(&self) -> &'a str {
        let el = self.element();
        &self.doc.html[el.start..el.end]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported selector syntax in '{0}'")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(token: &str) -> Option<Self> {
        let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        let mut compound = Compound::default();
        let mut rest = token;

        if let Some(r) = rest.strip_prefix('*') {
            rest = r;
        } else {
            let len = rest.find(|c: char| !is_ident(c)).unwrap_or(rest.len());
            if len > 0 {
                compound.tag = Some(rest[..len].to_ascii_lowercase());
                rest = &rest[len..];
            }
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            let len = body.find(|c: char| !is_ident(c)).unwrap_or(body.len());
            if len == 0 {
                return None;
            }
            let ident = body[..len].to_owned();
            match marker {
                '.' => compound.classes.push(ident),
                '#' if compound.id.is_none() => compound.id = Some(ident),
                _ => return None,
            }
            rest = &body[len..];
        }
        Some(compound)
    }

    fn matches(&self, el: &Element) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == el.name)
            && self.id.as_ref().is_none_or(|id| el.id.as_ref() == Some(id))
            && self.classes.iter().all(|c| el.classes.contains(c))
    }
}

/// CSS selector subset: type, `*`, `.class`, `#id`, compounds of those,
/// and the descendant (` `) and child (`>`) combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    // (relation to the previous part, part); the first relation is unused
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let unsupported = || SelectorError::Unsupported(input.to_owned());
        let spaced = input.replace('>', " > ");
        let mut parts = Vec::new();
        let mut pending = Combinator::Descendant;
        let mut after_child = false;

        for token in spaced.split_whitespace() {
            if token == ">" {
                if parts.is_empty() || after_child {
                    return Err(unsupported());
                }
                pending = Combinator::Child;
                after_child = true;
                continue;
            }
            let compound = Compound::parse(token).ok_or_else(unsupported)?;
            parts.push((pending, compound));
            pending = Combinator::Descendant;
            after_child = false;
        }

        if after_child {
            return Err(unsupported());
        }
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    fn matches_at(&self, doc: &PageDocument, part: usize, idx: usize) -> bool {
        let (combinator, compound) = &self.parts[part];
        let el = &doc.elements[idx];
        if !compound.matches(el) {
            return false;
        }
        if part == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => el
                .parent
                .is_some_and(|p| self.matches_at(doc, part - 1, p)),
            Combinator::Descendant => {
                let mut ancestor = el.parent;
                while let Some(a) = ancestor {
                    if self.matches_at(doc, part - 1, a) {
                        return true;
                    }
                    ancestor = doc.elements[a].parent;
                }
                false
            }
        }
    }
}
