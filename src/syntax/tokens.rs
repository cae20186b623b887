//! Style classes for syntax highlighting
//!
//! This module defines the lexical classes a span can be assigned
//! and their default visual styles.

use super::style::{Color, Style};

/// Lexical classes recognized by the highlighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// Language keywords (if, def, return, ...)
    Keyword,
    /// Operators (=, +=, **, ...)
    Operator,
    /// Braces, brackets and parentheses
    Brace,
    /// Identifier following `def` or `class`
    DefOrClassName,
    /// Single-line string literals
    String,
    /// Triple-quoted strings, possibly spanning lines
    MultilineString,
    /// Line comments
    Comment,
    /// `self`
    SelfReference,
    /// Numeric literals
    Number,
}

impl StyleClass {
    /// Every class, in declaration order
    pub const ALL: [StyleClass; 9] = [
        StyleClass::Keyword,
        StyleClass::Operator,
        StyleClass::Brace,
        StyleClass::DefOrClassName,
        StyleClass::String,
        StyleClass::MultilineString,
        StyleClass::Comment,
        StyleClass::SelfReference,
        StyleClass::Number,
    ];

    /// Get the default style for this class
    pub fn default_style(&self) -> Style {
        match self {
            StyleClass::Keyword => Style::fg(Color::Blue),
            StyleClass::Operator => Style::fg(Color::Red),
            StyleClass::Brace => Style::fg(Color::Rgb(0xa9, 0xa9, 0xa9)),
            StyleClass::DefOrClassName => Style::fg(Color::Black).with_bold(),
            StyleClass::String => Style::fg(Color::Magenta),
            StyleClass::MultilineString => Style::fg(Color::Rgb(0x8b, 0x00, 0x8b)),
            StyleClass::Comment => Style::fg(Color::Rgb(0x00, 0x64, 0x00)).with_italic(),
            StyleClass::SelfReference => Style::fg(Color::Black).with_italic(),
            StyleClass::Number => Style::fg(Color::Rgb(0xa5, 0x2a, 0x2a)),
        }
    }

    /// Get the configuration name for this class
    pub fn name(&self) -> &'static str {
        match self {
            StyleClass::Keyword => "keyword",
            StyleClass::Operator => "operator",
            StyleClass::Brace => "brace",
            StyleClass::DefOrClassName => "defclass",
            StyleClass::String => "string",
            StyleClass::MultilineString => "string2",
            StyleClass::Comment => "comment",
            StyleClass::SelfReference => "self",
            StyleClass::Number => "numbers",
        }
    }

    /// Parse a class from its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|class| class.name() == name)
    }
}
