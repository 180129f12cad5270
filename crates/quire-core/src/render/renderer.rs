use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use quire_config::RenderConfig;
use tracing::{debug, instrument};

use crate::content::Node;
use crate::embed::{AncestorTracking, EmbedContext, EmbedError, EmbedGuard, EmbedParams};
use crate::memo::{self, Memo};
use crate::store::MemoStore;

use super::RenderNode;

/// Embeds a render may hold unless configured otherwise
pub const DEFAULT_MAX_EMBEDS: usize = 1_000;

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub ancestor_tracking: AncestorTracking,
    /// Prefix of memo links, without trailing slash
    pub link_base: String,
    /// Embeds admitted per frame before the rest render
    /// [`EmbedError::EmbedLimit`], `None` for no limit
    pub max_embeds: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ancestor_tracking: AncestorTracking::default(),
            link_base: String::new(),
            max_embeds: Some(DEFAULT_MAX_EMBEDS),
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            ancestor_tracking: config.ancestor_tracking,
            link_base: config.link_base.trim_end_matches('/').to_string(),
            max_embeds: config.embed_limit(),
        }
    }

    /// Builder-style: cap the embeds of one render
    #[must_use]
    pub fn with_max_embeds(mut self, max_embeds: Option<usize>) -> Self {
        self.max_embeds = max_embeds;
        self
    }

    /// Builder-style: set the ancestor tracking mode
    #[must_use]
    pub fn with_tracking(mut self, tracking: AncestorTracking) -> Self {
        self.ancestor_tracking = tracking;
        self
    }
}

/// Renders memos and their embeds from a [`MemoStore`]
#[derive(Debug, Clone)]
pub struct MemoRenderer {
    store: Arc<MemoStore>,
    options: RenderOptions,
}

impl MemoRenderer {
    pub fn new(store: Arc<MemoStore>, options: RenderOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &Arc<MemoStore> {
        &self.store
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Start a render of memo `uid`
    pub fn begin(&self, uid: impl Into<String>) -> RenderPass<'_> {
        RenderPass::new(self, RootTarget::Memo(uid.into()))
    }

    /// Start a render of a lone embed directive, with no enclosing memo
    pub fn begin_embed(
        &self,
        resource_name: impl Into<String>,
        params: impl Into<String>,
    ) -> RenderPass<'_> {
        RenderPass::new(
            self,
            RootTarget::Embed {
                resource_name: resource_name.into(),
                params: params.into(),
            },
        )
    }

    /// Render memo `uid`, loading whatever it needs
    pub async fn render(&self, uid: &str) -> RenderNode {
        self.begin(uid).run().await
    }

    /// Render `![[resource_name?params]]` on its own
    pub async fn render_embed(&self, resource_name: &str, params: &str) -> RenderNode {
        self.begin_embed(resource_name, params).run().await
    }

    fn render_root(&self, uid: &str, frame: &mut FrameState<'_>) -> RenderNode {
        let memo = match frame.lookup(&self.store, uid) {
            Lookup::Loading => return RenderNode::Empty,
            Lookup::Missing => return RenderNode::error(EmbedError::NotFound(uid.to_string())),
            Lookup::Found(memo) => memo,
        };

        let context = EmbedContext::new(memo.name());
        RenderNode::Document {
            uid: memo.uid.clone(),
            name: memo.name(),
            display_time: memo.display_time,
            children: self.render_nodes(&memo.content, &context, frame),
            resources: memo.resources.clone(),
        }
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        context: &EmbedContext,
        frame: &mut FrameState<'_>,
    ) -> Vec<RenderNode> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Paragraph { children } => RenderNode::Paragraph {
                    children: children.clone(),
                },
                Node::Heading { level, children } => RenderNode::Heading {
                    level: *level,
                    children: children.clone(),
                },
                Node::CodeBlock { language, content } => RenderNode::CodeBlock {
                    language: language.clone(),
                    content: content.clone(),
                },
                Node::LineBreak => RenderNode::LineBreak,
                Node::Embed {
                    resource_name,
                    params,
                } => self.render_embed_node(resource_name, params, context, frame),
            })
            .collect()
    }

    fn render_embed_node(
        &self,
        resource_name: &str,
        raw_params: &str,
        context: &EmbedContext,
        frame: &mut FrameState<'_>,
    ) -> RenderNode {
        let Some(uid) = memo::uid_from_resource_name(resource_name) else {
            return RenderNode::error(EmbedError::UnknownResource(resource_name.to_string()));
        };

        // Path tracking admits repeated siblings, so the tree size is capped here.
        if self
            .options
            .max_embeds
            .is_some_and(|limit| frame.embeds >= limit)
        {
            return RenderNode::error(EmbedError::EmbedLimit(resource_name.to_string()));
        }

        let memo = match frame.lookup(&self.store, uid) {
            Lookup::Loading => return RenderNode::Empty,
            Lookup::Missing => return RenderNode::error(EmbedError::NotFound(uid.to_string())),
            Lookup::Found(memo) => memo,
        };

        let params = EmbedParams::parse(raw_params);
        let inner = match frame.guard.admit(context, &memo.name(), params.snippet) {
            Ok(inner) => inner,
            Err(err) => return RenderNode::error(err),
        };
        frame.embeds += 1;

        let clamped = !params.inline;
        let body = if params.snippet {
            RenderNode::Snippet {
                text: memo.snippet.clone(),
                clamped,
            }
        } else {
            RenderNode::Content {
                children: self.render_nodes(&memo.content, &inner, frame),
                clamped,
            }
        };

        if params.inline {
            RenderNode::InlineEmbed {
                body: Box::new(body),
                resources: memo.resources.clone(),
            }
        } else {
            RenderNode::EmbedCard {
                uid: memo.uid.clone(),
                short_uid: memo.short_uid().to_string(),
                display_time: memo.display_time,
                link: format!("{}/m/{}", self.options.link_base, memo.uid),
                body: Box::new(body),
                resources: memo.resources.clone(),
            }
        }
    }
}

#[derive(Debug, Clone)]
enum RootTarget {
    Memo(String),
    Embed {
        resource_name: String,
        params: String,
    },
}

impl fmt::Display for RootTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memo(uid) => write!(f, "{}", memo::resource_name(uid)),
            Self::Embed {
                resource_name,
                params,
            } if params.is_empty() => write!(f, "![[{resource_name}]]"),
            Self::Embed {
                resource_name,
                params,
            } => write!(f, "![[{resource_name}?{params}]]"),
        }
    }
}

/// One synchronous render of the tree from cached data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub tree: RenderNode,
    /// Uids that rendered as loading, in first-seen order
    pub pending: Vec<String>,
}

impl RenderFrame {
    /// Nothing left to load
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}

/// A single top-level render
///
/// Frames are rendered from the store's cache only. Each uid that is not
/// resident renders as [`RenderNode::Empty`] and is reported as pending;
/// [`RenderPass::load`] fetches those concurrently. A uid is fetched at most
/// once per pass, after which a missing memo renders as not found.
///
/// Dropping a pass while [`RenderPass::run`] or [`RenderPass::load`] is
/// awaiting cancels its fetches without touching the cache.
#[derive(Debug)]
pub struct RenderPass<'r> {
    renderer: &'r MemoRenderer,
    target: RootTarget,
    requested: HashSet<String>,
    frames: usize,
}

impl<'r> RenderPass<'r> {
    fn new(renderer: &'r MemoRenderer, target: RootTarget) -> Self {
        Self {
            renderer,
            target,
            requested: HashSet::new(),
            frames: 0,
        }
    }

    /// Render the current state without waiting for anything
    pub fn frame(&self) -> RenderFrame {
        let mut state = FrameState::new(&self.requested, self.renderer.options.ancestor_tracking);
        let tree = match &self.target {
            RootTarget::Memo(uid) => self.renderer.render_root(uid, &mut state),
            RootTarget::Embed {
                resource_name,
                params,
            } => self.renderer.render_embed_node(
                resource_name,
                params,
                &EmbedContext::detached(),
                &mut state,
            ),
        };
        RenderFrame {
            tree,
            pending: state.pending,
        }
    }

    /// Fetch `uids` concurrently and mark them requested
    pub async fn load(&mut self, uids: &[String]) {
        let store = &self.renderer.store;
        join_all(uids.iter().map(|uid| store.fetch_by_uid(uid))).await;
        self.requested.extend(uids.iter().cloned());
    }

    /// Alternate frames and loads until nothing is pending
    #[instrument(skip(self), fields(target = %self.target))]
    pub async fn run(mut self) -> RenderNode {
        loop {
            let frame = self.frame();
            self.frames += 1;
            if frame.is_settled() {
                debug!(frames = self.frames, fetched = self.requested.len(), "render settled");
                return frame.tree;
            }
            debug!(pending = ?frame.pending, "loading embedded memos");
            self.load(&frame.pending).await;
        }
    }

    /// Frames rendered by [`RenderPass::run`] so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Whether `uid` has been fetched during this pass
    pub fn was_requested(&self, uid: &str) -> bool {
        self.requested.contains(uid)
    }
}

enum Lookup {
    Loading,
    Missing,
    Found(Arc<Memo>),
}

struct FrameState<'p> {
    requested: &'p HashSet<String>,
    guard: EmbedGuard,
    pending: Vec<String>,
    /// Embeds admitted so far in this frame
    embeds: usize,
}

impl<'p> FrameState<'p> {
    fn new(requested: &'p HashSet<String>, tracking: AncestorTracking) -> Self {
        Self {
            requested,
            guard: EmbedGuard::new(tracking),
            pending: Vec::new(),
            embeds: 0,
        }
    }

    fn lookup(&mut self, store: &MemoStore, uid: &str) -> Lookup {
        if let Some(memo) = store.get_by_uid(uid) {
            return Lookup::Found(memo);
        }
        if self.requested.contains(uid) {
            return Lookup::Missing;
        }
        if !self.pending.iter().any(|p| p == uid) {
            self.pending.push(uid.to_string());
        }
        Lookup::Loading
    }
}
