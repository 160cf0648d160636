use std::sync::LazyLock;

use regex::{Captures, Regex};

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*|\b_([^_]+)_\b").unwrap());

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and apply inline markup. Code spans are literal; link
/// targets are left alone by emphasis.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in CODE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&links(&text[last..m.start()]));
        out.push_str("<code>");
        out.push_str(&escape(&caps[1]));
        out.push_str("</code>");
        last = m.end();
    }
    out.push_str(&links(&text[last..]));
    out
}

fn links(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for caps in LINK.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&emphasis(&text[last..m.start()]));
        let label = emphasis(&caps[1]);
        let href = &caps[2];
        if safe_href(href) {
            out.push_str(&format!(r#"<a href="{}" target="_blank" rel="noopener">{label}</a>"#, escape(href)));
        } else {
            out.push_str(&label);
        }
        last = m.end();
    }
    out.push_str(&emphasis(&text[last..]));
    out
}

fn emphasis(text: &str) -> String {
    let escaped = escape(text);
    let bold = BOLD.replace_all(&escaped, |c: &Captures| {
        let inner = c.get(1).or_else(|| c.get(2)).map_or("", |m| m.as_str());
        format!("<strong>{inner}</strong>")
    });
    ITALIC
        .replace_all(&bold, |c: &Captures| {
            let inner = c.get(1).or_else(|| c.get(2)).map_or("", |m| m.as_str());
            format!("<em>{inner}</em>")
        })
        .into_owned()
}

/// Relative targets and web/mail schemes only.
fn safe_href(href: &str) -> bool {
    match href.split_once(':') {
        None => true,
        Some((scheme, _)) if scheme.contains('/') => true,
        Some((scheme, _)) => matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https" | "mailto"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_inside_escaped_text() {
        assert_eq!(
            render_inline("<b>**Lead** & *mentor*</b>"),
            "&lt;b&gt;<strong>Lead</strong> &amp; <em>mentor</em>&lt;/b&gt;"
        );
        assert_eq!(render_inline("__bold__ and _it_"), "<strong>bold</strong> and <em>it</em>");
    }

    #[test]
    fn code_is_literal() {
        assert_eq!(render_inline("use `**x** < y`"), "use <code>**x** &lt; y</code>");
    }

    #[test]
    fn link_targets() {
        assert_eq!(
            render_inline("[my *site*](https://example.com/a_b_c)"),
            r#"<a href="https://example.com/a_b_c" target="_blank" rel="noopener">my <em>site</em></a>"#
        );
        assert_eq!(render_inline("[x](javascript:alert)"), "x");
    }

    #[test]
    fn snake_case_is_not_italic() {
        assert_eq!(render_inline("snake_case_name"), "snake_case_name");
    }
}
