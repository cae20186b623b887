//! blocklex - incremental, block-by-block lexical highlighting
//!
//! Each line of a document is classified on its own, with a small
//! carry-over state for triple-quoted strings flowing from one line to
//! the next. Edits re-highlight the touched line and cascade forward only
//! as far as that state keeps changing.

pub mod config;
pub mod document;
pub mod error;
pub mod gutter;
pub mod line;
pub mod render;
pub mod syntax;

pub use config::Config;
pub use document::Document;
pub use error::{Error, Result};
pub use gutter::Gutter;
pub use render::Renderer;
