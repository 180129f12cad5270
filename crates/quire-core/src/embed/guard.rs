use std::collections::HashSet;

use tracing::debug;

use super::{AncestorTracking, EmbedError};

/// The ancestor chain at one point of a render
///
/// Built once per render for the root memo and passed down explicitly.
/// Descending into an embed derives a new context, so what one subtree
/// registers is never seen by its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedContext {
    root: String,
    ancestors: HashSet<String>,
}

impl EmbedContext {
    /// Context for a render whose top-level memo is `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: root_name.into(),
            ancestors: HashSet::new(),
        }
    }

    /// Context for a render with no top-level memo, e.g. a lone directive
    pub fn detached() -> Self {
        Self::new(String::new())
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Embedded memos between the root and this point
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.ancestors.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Whether `name` is the root or one of the ancestors
    pub fn contains(&self, name: &str) -> bool {
        (!self.root.is_empty() && self.root == name) || self.ancestors.contains(name)
    }

    /// Decide whether `candidate` may be embedded here
    ///
    /// Snippets are always allowed: they show precomputed text and never
    /// render the candidate's own embeds.
    pub fn check(&self, candidate: &str, use_snippet: bool) -> Result<(), EmbedError> {
        if !use_snippet && self.contains(candidate) {
            return Err(EmbedError::NestedRendering(candidate.to_string()));
        }
        Ok(())
    }

    pub fn can_embed(&self, candidate: &str, use_snippet: bool) -> bool {
        self.check(candidate, use_snippet).is_ok()
    }

    /// Context for rendering `candidate`'s content
    #[must_use]
    pub fn descend(&self, candidate: &str) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.insert(candidate.to_string());
        Self {
            root: self.root.clone(),
            ancestors,
        }
    }
}

/// Admits embeds during one render frame
///
/// Under [`AncestorTracking::Path`] only the context's chain is consulted.
/// Under [`AncestorTracking::Pass`] every memo admitted earlier in the frame
/// also blocks later full embeds of the same memo, siblings included.
#[derive(Debug, Clone, Default)]
pub struct EmbedGuard {
    tracking: AncestorTracking,
    embedded: HashSet<String>,
}

impl EmbedGuard {
    pub fn new(tracking: AncestorTracking) -> Self {
        Self {
            tracking,
            embedded: HashSet::new(),
        }
    }

    pub fn tracking(&self) -> AncestorTracking {
        self.tracking
    }

    /// Check `candidate` against `parent` and register it
    ///
    /// Returns the context to render the candidate's content with.
    pub fn admit(
        &mut self,
        parent: &EmbedContext,
        candidate: &str,
        use_snippet: bool,
    ) -> Result<EmbedContext, EmbedError> {
        let checked = parent.check(candidate, use_snippet).and_then(|()| {
            let seen_this_pass =
                self.tracking == AncestorTracking::Pass && self.embedded.contains(candidate);
            if !use_snippet && seen_this_pass {
                Err(EmbedError::NestedRendering(candidate.to_string()))
            } else {
                Ok(())
            }
        });

        if let Err(err) = checked {
            debug!(candidate, depth = parent.depth(), tracking = %self.tracking, "embed rejected");
            return Err(err);
        }

        self.embedded.insert(candidate.to_string());
        Ok(parent.descend(candidate))
    }

    /// Every memo admitted so far
    pub fn embedded(&self) -> impl Iterator<Item = &str> {
        self.embedded.iter().map(String::as_str)
    }
}
