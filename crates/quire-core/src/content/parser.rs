use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Parser as CmarkParser, Tag as CmarkTag, TagEnd,
};
use regex::Regex;

use super::{Inline, Node};

static EMBED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!\[\[(?P<name>[^\]?]+)(?:\?(?P<params>[^\]]*))?\]\]$").expect("embed regex")
});

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?P<tag>[\p{L}\p{N}_/-]+)").expect("tag regex"));

/// Parse raw memo content into block nodes
///
/// Block structure is CommonMark. Inside a paragraph every source line is
/// its own [`Node::Paragraph`], and a line holding nothing but an embed
/// directive becomes a [`Node::Embed`]. Directives in code blocks, block
/// quotes, list items and HTML blocks stay literal text.
pub fn parse_content(raw: &str) -> Vec<Node> {
    let mut builder = NodeBuilder::new(raw);
    for (event, range) in CmarkParser::new(raw).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

struct PendingLink {
    url: String,
    text: String,
}

struct NodeBuilder<'a> {
    raw: &'a str,
    nodes: Vec<Node>,
    line: Vec<Inline>,
    /// Open block elements; zero between top-level blocks
    depth: usize,
    /// Last source line of the previous top-level block
    last_line: Option<usize>,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
    link: Option<PendingLink>,
    quote_depth: usize,
    /// Next number per open list, `None` for bullet lists
    lists: Vec<Option<u64>>,
    item_marker: Option<String>,
    in_html: bool,
}

impl<'a> NodeBuilder<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            nodes: Vec::new(),
            line: Vec::new(),
            depth: 0,
            last_line: None,
            heading: None,
            code: None,
            link: None,
            quote_depth: 0,
            lists: Vec::new(),
            item_marker: None,
            in_html: false,
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag, range),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline(Inline::Code {
                content: code.to_string(),
            }),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak | Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.open_block(&range);
                self.flush_line();
                self.nodes.push(Node::Paragraph {
                    children: vec![Inline::text("---")],
                });
                self.close_block(&range);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: CmarkTag<'_>, range: Range<usize>) {
        match tag {
            CmarkTag::Emphasis | CmarkTag::Strong | CmarkTag::Strikethrough => {}
            CmarkTag::Link { dest_url, .. } | CmarkTag::Image { dest_url, .. } => {
                self.link = Some(PendingLink {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            block => {
                self.open_block(&range);
                self.flush_line();
                match block {
                    CmarkTag::Heading { level, .. } => self.heading = Some(heading_level(level)),
                    CmarkTag::CodeBlock(kind) => {
                        let language = match kind {
                            CodeBlockKind::Fenced(info) => {
                                info.split_whitespace().next().map(str::to_string)
                            }
                            CodeBlockKind::Indented => None,
                        };
                        self.code = Some((language, String::new()));
                    }
                    CmarkTag::BlockQuote(_) => self.quote_depth += 1,
                    CmarkTag::List(start) => self.lists.push(start),
                    CmarkTag::Item => {
                        let marker = match self.lists.last_mut() {
                            Some(Some(n)) => {
                                let marker = format!("{n}. ");
                                *n += 1;
                                marker
                            }
                            _ => "- ".to_string(),
                        };
                        self.item_marker = Some(marker);
                    }
                    CmarkTag::HtmlBlock => self.in_html = true,
                    _ => {}
                }
            }
        }
    }

    fn end(&mut self, tag: TagEnd, range: Range<usize>) {
        match tag {
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {}
            TagEnd::Link | TagEnd::Image => {
                if let Some(link) = self.link.take() {
                    self.inline(Inline::Link {
                        text: link.text,
                        url: link.url,
                    });
                }
            }
            block => {
                match block {
                    TagEnd::Heading(_) => {
                        let children = self.take_inlines();
                        if let Some(level) = self.heading.take() {
                            self.nodes.push(Node::Heading { level, children });
                        }
                    }
                    TagEnd::CodeBlock => {
                        if let Some((language, mut content)) = self.code.take() {
                            if content.ends_with('\n') {
                                content.pop();
                            }
                            self.nodes.push(Node::CodeBlock { language, content });
                        }
                    }
                    TagEnd::BlockQuote(_) => {
                        self.flush_line();
                        self.quote_depth = self.quote_depth.saturating_sub(1);
                    }
                    TagEnd::List(_) => {
                        self.flush_line();
                        self.lists.pop();
                    }
                    TagEnd::Item => {
                        self.flush_line();
                        self.item_marker = None;
                    }
                    TagEnd::HtmlBlock => {
                        self.flush_line();
                        self.in_html = false;
                    }
                    _ => self.flush_line(),
                }
                self.close_block(&range);
            }
        }
    }

    /// Emit a line break per blank source line between top-level blocks
    fn open_block(&mut self, range: &Range<usize>) {
        if self.depth == 0 {
            if let Some(last) = self.last_line {
                let start = self.line_of(range.start);
                for _ in last + 1..start {
                    self.nodes.push(Node::LineBreak);
                }
            }
        }
        self.depth += 1;
    }

    fn close_block(&mut self, range: &Range<usize>) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.last_line = Some(self.line_of(range.end.saturating_sub(1)));
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.raw.len());
        self.raw.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
    }

    fn text(&mut self, text: &str) {
        if let Some((_, content)) = self.code.as_mut() {
            content.push_str(text);
            return;
        }
        if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
            return;
        }
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.push_text(first);
        }
        for part in parts {
            self.flush_line();
            self.push_text(part);
        }
    }

    fn inline(&mut self, inline: Inline) {
        if let (Some(link), Inline::Code { content }) = (self.link.as_mut(), &inline) {
            link.text.push_str(content);
            return;
        }
        self.line.push(inline);
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.line.last_mut() {
            Some(Inline::Text { content }) => content.push_str(text),
            _ => self.line.push(Inline::text(text)),
        }
    }

    /// Close the current source line as an embed or a paragraph
    fn flush_line(&mut self) {
        if self.line.is_empty() {
            return;
        }

        let quoted = self.quote_depth > 0 || !self.lists.is_empty() || self.in_html;
        if !quoted {
            if let Some(embed) = self.line_embed() {
                self.line.clear();
                self.nodes.push(embed);
                return;
            }
        }

        let mut prefix = "> ".repeat(self.quote_depth);
        if let Some(marker) = self.item_marker.take() {
            prefix.push_str(&marker);
        }
        let mut children = self.take_inlines();
        if !prefix.is_empty() {
            match children.first_mut() {
                Some(Inline::Text { content }) => content.insert_str(0, &prefix),
                _ => children.insert(0, Inline::text(prefix)),
            }
        }
        self.nodes.push(Node::Paragraph { children });
    }

    fn line_embed(&self) -> Option<Node> {
        let [Inline::Text { content }] = self.line.as_slice() else {
            return None;
        };
        let cap = EMBED_REGEX.captures(content.trim())?;
        Some(Node::Embed {
            resource_name: cap["name"].trim().to_string(),
            params: cap
                .name("params")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    fn take_inlines(&mut self) -> Vec<Inline> {
        let mut out = Vec::with_capacity(self.line.len());
        for inline in self.line.drain(..) {
            match inline {
                Inline::Text { content } => split_tags(&content, &mut out),
                other => out.push(other),
            }
        }
        out
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush_line();
        self.nodes
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Split `#tag`s out of a text run; a tag needs whitespace or the run start in front
fn split_tags(text: &str, out: &mut Vec<Inline>) {
    let mut last = 0;
    for cap in TAG_REGEX.captures_iter(text) {
        let (Some(whole), Some(tag)) = (cap.get(0), cap.name("tag")) else {
            continue;
        };
        let preceded_by_space = text[..whole.start()]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if !preceded_by_space {
            continue;
        }
        if whole.start() > last {
            out.push(Inline::text(&text[last..whole.start()]));
        }
        out.push(Inline::Tag {
            name: tag.as_str().to_string(),
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Inline::text(&text[last..]));
    }
}
