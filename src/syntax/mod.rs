//! Syntax highlighting
//!
//! This module provides the incremental highlighter:
//! - the ordered rule table and its Python token lists
//! - the block highlighter that classifies one line at a time
//! - the per-document cache that cascades re-highlighting after edits
//! - the style classes and the style table they map to

mod cache;
mod highlighter;
mod python;
mod rules;
mod style;
mod tokens;

pub use cache::HighlightCache;
pub use highlighter::BlockHighlighter;
pub use python::{BRACES, KEYWORDS, OPERATORS};
pub use rules::{HighlightResult, LineState, Rule, RuleMatch, TokenRuleSet};
pub use style::{Color, Slant, Style, StyleTable, StyledSpan, Weight};
pub use tokens::StyleClass;
