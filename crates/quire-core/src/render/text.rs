//! Plain-text output for terminals
//!
//! Cards are drawn with a box-drawing gutter:
//!
//! ```text
//! ┌ 2024-05-01 09:30 · 01234567 · /m/0123456789
//! │ embedded text
//! └
//! ```

use std::fmt::Write;

use super::RenderNode;
use crate::content::Inline;
use crate::memo::Resource;

/// Text rendering of a tree
pub fn to_text(node: &RenderNode) -> String {
    let mut out = String::new();
    write_node(node, "", &mut out);
    out
}

fn write_node(node: &RenderNode, prefix: &str, out: &mut String) {
    match node {
        RenderNode::Empty => {}
        RenderNode::Error { error } => line(out, prefix, &format!("[!] {error}")),
        RenderNode::Document {
            children,
            resources,
            ..
        } => {
            for child in children {
                write_node(child, prefix, out);
            }
            write_resources(resources, prefix, out);
        }
        RenderNode::Paragraph { children } => line(out, prefix, &inline_text(children)),
        RenderNode::Heading { level, children } => {
            let hashes = "#".repeat(usize::from(*level));
            line(out, prefix, &format!("{hashes} {}", inline_text(children)));
        }
        RenderNode::CodeBlock { language, content } => {
            line(out, prefix, &format!("```{}", language.as_deref().unwrap_or("")));
            for code_line in content.lines() {
                line(out, prefix, code_line);
            }
            line(out, prefix, "```");
        }
        RenderNode::LineBreak => line(out, prefix, ""),
        RenderNode::EmbedCard {
            short_uid,
            display_time,
            link,
            body,
            resources,
            ..
        } => {
            let header = format!(
                "┌ {} · {short_uid} · {link}",
                display_time.format("%Y-%m-%d %H:%M")
            );
            line(out, prefix, &header);
            let inner = format!("{prefix}│ ");
            write_node(body, &inner, out);
            write_resources(resources, &inner, out);
            line(out, prefix, "└");
        }
        RenderNode::InlineEmbed { body, resources } => {
            write_node(body, prefix, out);
            write_resources(resources, prefix, out);
        }
        RenderNode::Snippet { text, .. } => {
            for text_line in text.lines() {
                line(out, prefix, text_line);
            }
        }
        RenderNode::Content { children, .. } => {
            for child in children {
                write_node(child, prefix, out);
            }
        }
    }
}

fn write_resources(resources: &[Resource], prefix: &str, out: &mut String) {
    for resource in resources {
        line(out, prefix, &format!("[file] {} <{}>", resource.filename, resource.url()));
    }
}

fn inline_text(children: &[Inline]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            Inline::Text { content } => text.push_str(content),
            Inline::Code { content } => {
                let _ = write!(text, "`{content}`");
            }
            Inline::Tag { name } => {
                let _ = write!(text, "#{name}");
            }
            Inline::Link { text: label, url } => {
                let _ = write!(text, "{label} <{url}>");
            }
        }
    }
    text
}

fn line(out: &mut String, prefix: &str, text: &str) {
    if text.is_empty() {
        out.push_str(prefix.trim_end());
    } else {
        out.push_str(prefix);
        out.push_str(text);
    }
    out.push('\n');
}
