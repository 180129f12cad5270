//! HTML output
//!
//! Maud functions returning `Markup` fragments. [`page`] wraps a tree in a
//! standalone document with minimal styling.

use maud::{html, Markup, DOCTYPE};

use super::RenderNode;
use crate::content::Inline;
use crate::memo::{Resource, ResourceKind};

const PAGE_CSS: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;max-width:720px;margin:2rem auto;padding:0 1rem;color:#111}
.memo-content p{margin:0}
.line-clamp-3{display:-webkit-box;-webkit-line-clamp:3;-webkit-box-orient:vertical;overflow:hidden}
.embedded-memo{width:100%;margin:.5rem 0}
.embedded-memo-card{padding:.5rem .75rem;border:1px solid #e5e7eb;border-radius:8px}
.embedded-memo-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:.25rem;color:#9ca3af;font-size:.875rem}
.embedded-memo-uid{font-size:.75rem;opacity:.4;cursor:pointer}
.memo-error{color:#b91c1c;font-size:.875rem}
.memo-resources img,.memo-resources video{max-width:100%;border-radius:6px}
.tag{color:#2563eb}
"#;

/// Full HTML document for a rendered tree
pub fn page(title: &str, tree: &RenderNode) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (maud::PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (to_html(tree)) }
            }
        }
    }
}

/// HTML fragment for a rendered tree
pub fn to_html(node: &RenderNode) -> Markup {
    match node {
        RenderNode::Empty => html! {},
        RenderNode::Error { error } => html! {
            div class="memo-error" { (error.to_string()) }
        },
        RenderNode::Document {
            uid,
            children,
            resources,
            ..
        } => html! {
            article class="memo" data-uid=(uid) {
                div class="memo-content" {
                    @for child in children { (to_html(child)) }
                }
                (resource_list(resources))
            }
        },
        RenderNode::Paragraph { children } => html! { p { (inlines(children)) } },
        RenderNode::Heading { level, children } => heading(*level, inlines(children)),
        RenderNode::CodeBlock { language, content } => html! {
            pre {
                code class=[language.as_ref().map(|l| format!("language-{l}"))] { (content) }
            }
        },
        RenderNode::LineBreak => html! { br; },
        RenderNode::EmbedCard {
            uid,
            short_uid,
            display_time,
            link,
            body,
            resources,
        } => html! {
            div class="embedded-memo embedded-memo-card" {
                div class="embedded-memo-header" {
                    time class="embedded-memo-time" datetime=(display_time.to_rfc3339()) {
                        (display_time.format("%Y-%m-%d %H:%M").to_string())
                    }
                    div class="embedded-memo-actions" {
                        span class="embedded-memo-uid" data-copy=(uid) title="Copy memo UID" { (short_uid) }
                        a class="embedded-memo-link" href=(link) title="Open memo" { "↗" }
                    }
                }
                (to_html(body))
                (resource_list(resources))
            }
        },
        RenderNode::InlineEmbed { body, resources } => html! {
            div class="embedded-memo embedded-memo-inline" {
                (to_html(body))
                (resource_list(resources))
            }
        },
        RenderNode::Snippet { text, clamped } => html! {
            div class=(body_class("memo-snippet", *clamped)) { (text) }
        },
        RenderNode::Content { children, clamped } => html! {
            div class=(body_class("memo-content", *clamped)) {
                @for child in children { (to_html(child)) }
            }
        },
    }
}

fn body_class(base: &str, clamped: bool) -> String {
    if clamped {
        format!("{base} line-clamp-3")
    } else {
        base.to_string()
    }
}

fn heading(level: u8, inner: Markup) -> Markup {
    match level {
        1 => html! { h1 { (inner) } },
        2 => html! { h2 { (inner) } },
        3 => html! { h3 { (inner) } },
        4 => html! { h4 { (inner) } },
        5 => html! { h5 { (inner) } },
        _ => html! { h6 { (inner) } },
    }
}

fn inlines(children: &[Inline]) -> Markup {
    html! {
        @for child in children { (inline(child)) }
    }
}

fn inline(child: &Inline) -> Markup {
    match child {
        Inline::Text { content } => html! { (content) },
        Inline::Code { content } => html! { code { (content) } },
        Inline::Tag { name } => html! { span class="tag" { "#" (name) } },
        Inline::Link { text, url } if is_safe_url(url) => html! {
            a href=(url) rel="noopener" { (text) }
        },
        Inline::Link { text, .. } => html! { (text) },
    }
}

fn resource_list(resources: &[Resource]) -> Markup {
    if resources.is_empty() {
        return html! {};
    }
    html! {
        div class="memo-resources" {
            @for resource in resources { (resource_item(resource)) }
        }
    }
}

fn resource_item(resource: &Resource) -> Markup {
    let url = resource.url();
    match resource.kind() {
        ResourceKind::Image => html! {
            img src=(url) alt=(resource.filename) loading="lazy";
        },
        ResourceKind::Video => html! {
            video src=(url) controls preload="metadata" {}
        },
        ResourceKind::File => html! {
            a class="memo-resource-file" href=(url) { (resource.filename) }
        },
    }
}

/// Only http(s) and site-relative links become anchors
fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://")
        || url.starts_with("http://")
        || (url.starts_with('/') && !url.starts_with("//"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedError;
    use chrono::{TimeZone, Utc};

    fn card(body: RenderNode) -> RenderNode {
        RenderNode::EmbedCard {
            uid: "0123456789".to_string(),
            short_uid: "01234567".to_string(),
            display_time: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            link: "/m/0123456789".to_string(),
            body: Box::new(body),
            resources: vec![Resource::new("resources/1", "a.png", "image/png")],
        }
    }

    #[test]
    fn test_card_has_framing() {
        let out = to_html(&card(RenderNode::Snippet {
            text: "hi".to_string(),
            clamped: true,
        }))
        .into_string();

        assert!(out.contains("embedded-memo-header"));
        assert!(out.contains("datetime=\"2024-05-01T09:30:00+00:00\""));
        assert!(out.contains(">01234567<"));
        assert!(out.contains("href=\"/m/0123456789\""));
        assert!(out.contains("class=\"memo-snippet line-clamp-3\""));
        assert!(out.contains("src=\"/file/resources/1/a.png\""));
    }

    #[test]
    fn test_inline_has_no_framing() {
        let out = to_html(&RenderNode::InlineEmbed {
            body: Box::new(RenderNode::Snippet {
                text: "hi".to_string(),
                clamped: false,
            }),
            resources: Vec::new(),
        })
        .into_string();

        assert!(!out.contains("embedded-memo-header"));
        assert!(!out.contains("href="));
        assert!(!out.contains("line-clamp-3"));
        assert!(out.contains(">hi<"));
    }

    #[test]
    fn test_error_and_empty() {
        let out = to_html(&RenderNode::error(EmbedError::NotFound("zz".to_string()))).into_string();
        assert_eq!(out, "<div class=\"memo-error\">Memo not found: zz</div>");
        assert_eq!(to_html(&RenderNode::Empty).into_string(), "");
    }

    #[test]
    fn test_text_is_escaped_and_unsafe_links_dropped() {
        let out = to_html(&RenderNode::Paragraph {
            children: vec![
                Inline::text("<b>"),
                Inline::Link {
                    text: "x".to_string(),
                    url: "javascript:alert(1)".to_string(),
                },
            ],
        })
        .into_string();

        assert_eq!(out, "<p>&lt;b&gt;x</p>");
    }
}
