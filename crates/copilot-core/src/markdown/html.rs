use super::Block;
use super::inline::render_inline;

pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        if !out.is_empty() {
            out.push('\n');
        }
        match block {
            Block::Heading { level, text } => {
                out.push_str(&format!("<h{level}>{}</h{level}>", render_inline(text)));
            }
            Block::Rule => out.push_str("<hr>"),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                out.push_str(&format!("<{tag}>"));
                for item in items {
                    out.push_str(&format!("<li>{}</li>", render_inline(item)));
                }
                out.push_str(&format!("</{tag}>"));
            }
            Block::Paragraph { lines } => {
                let body: Vec<String> = lines.iter().map(|l| render_inline(l)).collect();
                out.push_str(&format!("<p>{}</p>", body.join("<br>")));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::markdown::render;

    #[test]
    fn emits_blocks() {
        let html = render("## Summary\nBuilt **things**\nat scale\n\n---\n1. one\n2. two\n- <script>");
        assert_eq!(
            html,
            "<h2>Summary</h2>\n\
             <p>Built <strong>things</strong><br>at scale</p>\n\
             <hr>\n\
             <ol><li>one</li><li>two</li></ol>\n\
             <ul><li>&lt;script&gt;</li></ul>"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(render("\n  \n"), "");
    }
}
