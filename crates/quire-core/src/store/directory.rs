//! Directory-backed memo source
//!
//! Each memo is a file `<root>/<uid>.md`. An optional YAML frontmatter block
//! carries metadata:
//!
//! ```text
//! ---
//! display_time: 2024-05-01T09:30:00Z
//! snippet: Custom preview text
//! resources:
//!   - name: resources/17
//!     filename: diagram.png
//!     type: image/png
//! ---
//! Memo body, possibly with ![[memos/other]]
//! ```
//!
//! Without `display_time` the file's modification time is used.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{MemoSource, StoreError, StoreResult};
use crate::content::DEFAULT_SNIPPET_LENGTH;
use crate::memo::{Memo, Resource};

const MEMO_EXTENSION: &str = "md";

#[derive(Debug, Default, Deserialize)]
struct MemoFrontmatter {
    display_time: Option<DateTime<Utc>>,
    snippet: Option<String>,
    #[serde(default)]
    resources: Vec<Resource>,
}

/// Reads memos from a directory of markdown files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    snippet_length: usize,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            snippet_length: DEFAULT_SNIPPET_LENGTH,
        }
    }

    /// Builder-style: cut-off for derived snippets
    #[must_use]
    pub fn with_snippet_length(mut self, snippet_length: usize) -> Self {
        self.snippet_length = snippet_length;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Uids of every memo file, sorted
    pub async fn uids(&self) -> StoreResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut uids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MEMO_EXTENSION) {
                continue;
            }
            if let Some(uid) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_uid(uid) {
                    uids.push(uid.to_string());
                }
            }
        }
        uids.sort();
        Ok(uids)
    }

    fn memo_path(&self, uid: &str) -> PathBuf {
        self.root.join(format!("{uid}.{MEMO_EXTENSION}"))
    }
}

#[async_trait]
impl MemoSource for DirectorySource {
    async fn fetch(&self, uid: &str) -> StoreResult<Option<Memo>> {
        if !is_valid_uid(uid) {
            debug!(uid, "rejecting malformed uid");
            return Ok(None);
        }

        let path = self.memo_path(uid);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let (frontmatter, body) = split_frontmatter(&raw);
        let meta: MemoFrontmatter = match frontmatter {
            Some(yaml) if !yaml.trim().is_empty() => {
                serde_yaml::from_str(yaml).map_err(|e| StoreError::Frontmatter {
                    uid: uid.to_string(),
                    message: e.to_string(),
                })?
            }
            _ => MemoFrontmatter::default(),
        };

        let display_time = match meta.display_time {
            Some(time) => time,
            None => tokio::fs::metadata(&path)
                .await?
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now()),
        };

        let mut memo = Memo::with_snippet_length(uid, body, self.snippet_length)
            .with_display_time(display_time)
            .with_resources(meta.resources);
        if let Some(snippet) = meta.snippet {
            memo = memo.with_snippet(snippet);
        }
        Ok(Some(memo))
    }

    fn label(&self) -> &'static str {
        "directory"
    }
}

/// Uids become file names, so only `[A-Za-z0-9_-]` is accepted
fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split a leading `---` block from the body
fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let (yaml, after) = if let Some(after) = rest.strip_prefix("---") {
        ("", after)
    } else if let Some(end) = rest.find("\n---") {
        (&rest[..end], &rest[end + 4..])
    } else {
        return (None, raw);
    };

    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    (Some(yaml), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Node;
    use tempfile::TempDir;

    #[test]
    fn test_split_frontmatter() {
        assert_eq!(split_frontmatter("body"), (None, "body"));
        assert_eq!(
            split_frontmatter("---\na: 1\n---\nbody\n"),
            (Some("a: 1"), "body\n")
        );
        assert_eq!(split_frontmatter("---\n---\nbody"), (Some(""), "body"));
        assert_eq!(split_frontmatter("---\nunclosed"), (None, "---\nunclosed"));
    }

    #[test]
    fn test_uid_validation() {
        assert!(is_valid_uid("abc-123_X"));
        assert!(!is_valid_uid(""));
        assert!(!is_valid_uid("../etc/passwd"));
        assert!(!is_valid_uid("a.b"));
    }

    #[tokio::test]
    async fn test_fetch_with_frontmatter() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("m1.md"),
            "---\ndisplay_time: 2024-05-01T09:30:00Z\nresources:\n  - name: resources/1\n    filename: a.png\n    type: image/png\n---\nhello\n![[memos/m2?snippet]]\n",
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let memo = source.fetch("m1").await.unwrap().unwrap();

        assert_eq!(memo.uid, "m1");
        assert_eq!(memo.display_time.to_rfc3339(), "2024-05-01T09:30:00+00:00");
        assert_eq!(memo.resources.len(), 1);
        assert_eq!(memo.resources[0].mime_type, "image/png");
        assert_eq!(memo.snippet, "hello");
        assert_eq!(
            memo.content[1],
            Node::Embed {
                resource_name: "memos/m2".to_string(),
                params: "snippet".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_and_malformed_uids_are_absent() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path());

        assert!(source.fetch("nope").await.unwrap().is_none());
        assert!(source.fetch("../nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bad_frontmatter_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.md"), "---\ndisplay_time: [\n---\nx").unwrap();

        let err = DirectorySource::new(dir.path()).fetch("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Frontmatter { .. }));
    }

    #[tokio::test]
    async fn test_snippet_override_and_length() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "abcdefghij").unwrap();
        std::fs::write(dir.path().join("b.md"), "---\nsnippet: custom\n---\nbody").unwrap();

        let source = DirectorySource::new(dir.path()).with_snippet_length(4);
        assert_eq!(source.fetch("a").await.unwrap().unwrap().snippet, "abcd...");
        assert_eq!(source.fetch("b").await.unwrap().unwrap().snippet, "custom");
    }

    #[tokio::test]
    async fn test_uids_lists_memo_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let uids = DirectorySource::new(dir.path()).uids().await.unwrap();
        assert_eq!(uids, vec!["a", "b"]);
    }
}
