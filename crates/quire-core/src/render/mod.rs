//! Rendering
//!
//! [`MemoRenderer`] turns a memo and everything it embeds into a
//! [`RenderNode`] tree. The [`html`] and [`text`] writers turn that tree into
//! output.
//!
//! Embeds are presented according to their parameters:
//!
//! | params           | body                      | framing |
//! |------------------|---------------------------|---------|
//! | none             | full content, clamped     | card    |
//! | `snippet`        | snippet text, clamped     | card    |
//! | `inline`         | full content              | none    |
//! | `snippet&inline` | snippet text              | none    |

pub mod html;
mod renderer;
pub mod text;
mod tree;

pub use renderer::{MemoRenderer, RenderFrame, RenderOptions, RenderPass, DEFAULT_MAX_EMBEDS};
pub use tree::RenderNode;
