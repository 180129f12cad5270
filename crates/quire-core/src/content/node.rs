use serde::{Deserialize, Serialize};

/// A block of memo content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// One source line of a paragraph
    Paragraph { children: Vec<Inline> },
    /// Heading, level 1-6
    Heading { level: u8, children: Vec<Inline> },
    /// Fenced or indented code block
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        content: String,
    },
    /// `![[resource_name?params]]` transclusion directive
    Embed {
        resource_name: String,
        #[serde(default)]
        params: String,
    },
    /// Blank line between blocks
    LineBreak,
}

impl Node {
    /// Embed directive, if this node is one
    pub fn as_embed(&self) -> Option<(&str, &str)> {
        match self {
            Self::Embed {
                resource_name,
                params,
            } => Some((resource_name, params)),
            _ => None,
        }
    }
}

/// Inline content within a paragraph or heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { content: String },
    Code { content: String },
    Tag { name: String },
    Link { text: String, url: String },
}

impl Inline {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }
}
