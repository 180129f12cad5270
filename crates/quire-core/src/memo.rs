//! Memo and resource model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{self, Node, DEFAULT_SNIPPET_LENGTH};

/// Prefix of every memo resource name
pub const MEMO_NAME_PREFIX: &str = "memos/";

/// Characters of the uid shown in a card badge
pub const SHORT_UID_LEN: usize = 8;

/// Resource name (`memos/{uid}`) for a memo uid
pub fn resource_name(uid: &str) -> String {
    format!("{MEMO_NAME_PREFIX}{uid}")
}

/// Uid from a `memos/{uid}` resource name
///
/// Returns `None` for other resource kinds and for an empty uid.
pub fn uid_from_resource_name(name: &str) -> Option<&str> {
    name.strip_prefix(MEMO_NAME_PREFIX)
        .filter(|uid| !uid.is_empty() && !uid.contains('/'))
}

/// A memo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Unique identifier
    pub uid: String,

    /// Parsed content
    pub content: Vec<Node>,

    /// Short plain-text preview
    pub snippet: String,

    /// Timestamp shown in the embed card
    pub display_time: DateTime<Utc>,

    /// Attached files
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Memo {
    /// Parse `raw` into a memo with a derived snippet and the current time
    pub fn new(uid: impl Into<String>, raw: &str) -> Self {
        Self::with_snippet_length(uid, raw, DEFAULT_SNIPPET_LENGTH)
    }

    /// Like [`Memo::new`] with an explicit snippet cut-off
    pub fn with_snippet_length(uid: impl Into<String>, raw: &str, snippet_length: usize) -> Self {
        let content = content::parse_content(raw);
        let snippet = content::truncate_snippet(&content::plain_text(&content), snippet_length);
        Self {
            uid: uid.into(),
            content,
            snippet,
            display_time: Utc::now(),
            resources: Vec::new(),
        }
    }

    /// Builder-style: set the display time
    #[must_use]
    pub fn with_display_time(mut self, display_time: DateTime<Utc>) -> Self {
        self.display_time = display_time;
        self
    }

    /// Builder-style: replace the derived snippet
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Builder-style: set attached resources
    #[must_use]
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// `memos/{uid}`
    pub fn name(&self) -> String {
        resource_name(&self.uid)
    }

    /// First [`SHORT_UID_LEN`] characters of the uid
    pub fn short_uid(&self) -> &str {
        match self.uid.char_indices().nth(SHORT_UID_LEN) {
            Some((idx, _)) => &self.uid[..idx],
            None => &self.uid,
        }
    }

    /// Resource names of every memo this memo embeds directly
    pub fn embedded_names(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .filter_map(Node::as_embed)
            .map(|(name, _)| name)
    }
}

/// A file attached to a memo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource name, e.g. `resources/42`
    pub name: String,
    pub filename: String,
    #[serde(default, rename = "type")]
    pub mime_type: String,
    /// Hosted elsewhere when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

/// Presentation class of a [`Resource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    File,
}

impl Resource {
    pub fn new(name: impl Into<String>, filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            external_link: None,
        }
    }

    #[must_use]
    pub fn with_external_link(mut self, link: impl Into<String>) -> Self {
        self.external_link = Some(link.into());
        self
    }

    pub fn kind(&self) -> ResourceKind {
        if self.mime_type.starts_with("image/") {
            ResourceKind::Image
        } else if self.mime_type.starts_with("video/") {
            ResourceKind::Video
        } else {
            ResourceKind::File
        }
    }

    /// External link, or `/file/{name}/{filename}`
    pub fn url(&self) -> String {
        match &self.external_link {
            Some(link) if !link.is_empty() => link.clone(),
            _ => format!("/file/{}/{}", self.name, self.filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_round_trip() {
        assert_eq!(resource_name("abc"), "memos/abc");
        assert_eq!(uid_from_resource_name("memos/abc"), Some("abc"));
        assert_eq!(uid_from_resource_name("resources/abc"), None);
        assert_eq!(uid_from_resource_name("memos/"), None);
        assert_eq!(uid_from_resource_name("memos/a/b"), None);
    }

    #[test]
    fn test_short_uid() {
        assert_eq!(Memo::new("0123456789ab", "").short_uid(), "01234567");
        assert_eq!(Memo::new("abc", "").short_uid(), "abc");
    }

    #[test]
    fn test_snippet_is_derived_and_truncated() {
        let memo = Memo::with_snippet_length("m", "# Heading\nbody text", 10);
        assert_eq!(memo.snippet, "Heading\nbo...");
    }

    #[test]
    fn test_explicit_snippet_overrides() {
        let memo = Memo::new("m", "long body").with_snippet("tl;dr");
        assert_eq!(memo.snippet, "tl;dr");
    }

    #[test]
    fn test_embedded_names() {
        let memo = Memo::new("m", "![[memos/a]]\ntext\n![[memos/b?snippet]]");
        assert_eq!(memo.embedded_names().collect::<Vec<_>>(), vec!["memos/a", "memos/b"]);
    }

    #[test]
    fn test_resource_kind_and_url() {
        let image = Resource::new("resources/1", "cat.png", "image/png");
        assert_eq!(image.kind(), ResourceKind::Image);
        assert_eq!(image.url(), "/file/resources/1/cat.png");

        let video = Resource::new("resources/2", "clip.mp4", "video/mp4")
            .with_external_link("https://cdn.example.com/clip.mp4");
        assert_eq!(video.kind(), ResourceKind::Video);
        assert_eq!(video.url(), "https://cdn.example.com/clip.mp4");

        assert_eq!(Resource::new("resources/3", "a.pdf", "application/pdf").kind(), ResourceKind::File);
    }
}
