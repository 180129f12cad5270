//! Embedded memo handling
//!
//! [`EmbedParams`] parses the `?snippet&inline` part of a directive.
//! [`EmbedContext`] is the ancestor chain threaded through a render, and
//! [`EmbedGuard`] decides whether a memo may be embedded at a given point.

mod error;
mod guard;
mod params;

pub use error::EmbedError;
pub use guard::{EmbedContext, EmbedGuard};
pub use params::EmbedParams;
pub use quire_config::AncestorTracking;
