//! Memo content
//!
//! Memo bodies are parsed as CommonMark into a flat sequence of block
//! [`Node`]s. Each line of a paragraph is its own block, and blank lines
//! between blocks become [`Node::LineBreak`]. Embed directives must occupy a
//! whole paragraph line outside code, quotes and lists:
//!
//! ```text
//! ![[memos/abc123]]
//! ![[memos/abc123?snippet&inline]]
//! ```

mod node;
mod parser;
mod plain;

pub use node::{Inline, Node};
pub use parser::parse_content;
pub use plain::{plain_text, truncate_snippet, DEFAULT_SNIPPET_LENGTH};
