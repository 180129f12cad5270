use super::{Inline, Node};

/// Snippet length used when none is configured
pub const DEFAULT_SNIPPET_LENGTH: usize = 64;

/// Plain-text rendering of content, used for snippets
///
/// Embed directives contribute nothing, so a snippet never pulls in another
/// memo's text.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Paragraph { children } | Node::Heading { children, .. } => {
                lines.push(inline_text(children));
            }
            Node::CodeBlock { content, .. } => lines.push(content.clone()),
            Node::LineBreak => lines.push(String::new()),
            Node::Embed { .. } => {}
        }
    }
    lines.join("\n").trim().to_string()
}

fn inline_text(children: &[Inline]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            Inline::Text { content } | Inline::Code { content } => out.push_str(content),
            Inline::Tag { name } => {
                out.push('#');
                out.push_str(name);
            }
            Inline::Link { text, .. } => out.push_str(text),
        }
    }
    out
}

/// Cut `text` to `limit` characters, appending `...` when anything was dropped
pub fn truncate_snippet(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_content;

    #[test]
    fn test_plain_text_flattens_inlines() {
        let nodes = parse_content("# Title\nsee [docs](https://x.io) and `code` #rust");
        assert_eq!(plain_text(&nodes), "Title\nsee docs and code #rust");
    }

    #[test]
    fn test_plain_text_skips_embeds() {
        let nodes = parse_content("before\n![[memos/other]]\nafter");
        assert_eq!(plain_text(&nodes), "before\nafter");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_snippet("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_snippet("short", 64), "short");
        assert_eq!(truncate_snippet("exact", 5), "exact");
    }
}
