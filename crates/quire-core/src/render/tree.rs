use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Inline;
use crate::embed::EmbedError;
use crate::memo::Resource;

/// Output of a render, independent of any output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    /// Placeholder while a memo is loading
    Empty,

    /// Visible placeholder for an embed that could not be rendered
    Error { error: EmbedError },

    /// Top-level memo
    Document {
        uid: String,
        name: String,
        display_time: DateTime<Utc>,
        children: Vec<RenderNode>,
        resources: Vec<Resource>,
    },

    Paragraph { children: Vec<Inline> },
    Heading { level: u8, children: Vec<Inline> },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        content: String,
    },
    LineBreak,

    /// Embedded memo with card framing: time, uid badge, link
    EmbedCard {
        uid: String,
        short_uid: String,
        display_time: DateTime<Utc>,
        link: String,
        body: Box<RenderNode>,
        resources: Vec<Resource>,
    },

    /// Embedded memo flowing inside its parent, no framing
    InlineEmbed {
        body: Box<RenderNode>,
        resources: Vec<Resource>,
    },

    /// Snippet text of an embedded memo
    Snippet { text: String, clamped: bool },

    /// Full content of an embedded memo
    Content { children: Vec<RenderNode>, clamped: bool },
}

impl RenderNode {
    pub fn error(error: EmbedError) -> Self {
        Self::Error { error }
    }

    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Direct children
    pub fn children(&self) -> Vec<&RenderNode> {
        match self {
            Self::Document { children, .. } | Self::Content { children, .. } => {
                children.iter().collect()
            }
            Self::EmbedCard { body, .. } | Self::InlineEmbed { body, .. } => vec![body.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Visit this node and every descendant, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every error placeholder in the tree, in document order
    pub fn errors(&self) -> Vec<&EmbedError> {
        let mut errors = Vec::new();
        self.walk(&mut |node| {
            if let Self::Error { error } = node {
                errors.push(error);
            }
        });
        errors
    }

    /// Nodes in the tree matching `predicate`
    pub fn count(&self, predicate: impl Fn(&RenderNode) -> bool) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if predicate(node) {
                n += 1;
            }
        });
        n
    }

    /// Embeds rendered with card framing
    pub fn cards(&self) -> Vec<&RenderNode> {
        let mut cards = Vec::new();
        self.walk(&mut |node| {
            if matches!(node, Self::EmbedCard { .. }) {
                cards.push(node);
            }
        });
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_in_document_order() {
        let tree = RenderNode::Content {
            clamped: false,
            children: vec![
                RenderNode::error(EmbedError::NotFound("x".to_string())),
                RenderNode::InlineEmbed {
                    body: Box::new(RenderNode::error(EmbedError::NestedRendering(
                        "memos/y".to_string(),
                    ))),
                    resources: Vec::new(),
                },
            ],
        };

        let targets: Vec<&str> = tree.errors().iter().map(|e| e.target()).collect();
        assert_eq!(targets, vec!["x", "memos/y"]);
    }

    #[test]
    fn test_json_is_tagged() {
        let json = serde_json::to_value(RenderNode::error(EmbedError::NotFound("x".to_string())))
            .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"]["kind"], "not_found");
        assert_eq!(json["error"]["target"], "x");
    }
}
