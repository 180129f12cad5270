//! Configuration components
//!
//! One section per concern, each fully defaulted so a partial file is valid.

pub mod logging;
pub mod render;
pub mod store;

pub use logging::*;
pub use render::*;
pub use store::*;
