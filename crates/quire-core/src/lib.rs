//! Quire core
//!
//! Renders memos whose content may transclude other memos through
//! `![[memos/<uid>?<params>]]` directives.
//!
//! - [`memo`] - memo and resource model
//! - [`content`] - content nodes and the line-based memo parser
//! - [`embed`] - embed parameters and the cycle guard
//! - [`store`] - memo sources and the load-state cache
//! - [`render`] - render tree, renderer, HTML and text writers
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quire_core::{InMemorySource, Memo, MemoRenderer, MemoStore, RenderOptions};
//!
//! # async fn example() {
//! let source = InMemorySource::new()
//!     .with_memo(Memo::new("a", "hello\n![[memos/b]]"))
//!     .with_memo(Memo::new("b", "world"));
//! let store = Arc::new(MemoStore::new(Arc::new(source)));
//! let renderer = MemoRenderer::new(store, RenderOptions::default());
//!
//! let tree = renderer.render("a").await;
//! println!("{}", quire_core::render::text::to_text(&tree));
//! # }
//! ```

pub mod content;
pub mod embed;
pub mod memo;
pub mod render;
pub mod store;

pub use content::{parse_content, Inline, Node};
pub use embed::{AncestorTracking, EmbedContext, EmbedError, EmbedGuard, EmbedParams};
pub use memo::{Memo, Resource, ResourceKind};
pub use render::{MemoRenderer, RenderFrame, RenderNode, RenderOptions, RenderPass};
pub use store::{
    DirectorySource, InMemorySource, LoadState, MemoSource, MemoStore, StoreError, StoreResult,
};
