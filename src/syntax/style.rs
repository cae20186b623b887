//! Style types for text rendering
//!
//! This module provides the visual attributes attached to each
//! style class, the immutable style table built at startup, and the
//! styled span produced for every highlighted token.

use std::collections::HashMap;

use super::tokens::StyleClass;
use crate::error::{Error, Result};

/// Foreground colors
///
/// The ANSI 16-color palette plus arbitrary RGB values for hex or
/// named colors outside that palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color from a name or `#rrggbb` hex value
    ///
    /// Names are matched case-insensitively, ignoring `-` and `_`,
    /// so `darkGray`, `dark-gray` and `DARK_GRAY` are the same color.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::InvalidColor(value.to_string()));
        }

        let name: String = value
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let color = match name.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            // SVG names
            "darkgray" | "darkgrey" => Color::Rgb(0xa9, 0xa9, 0xa9),
            "darkmagenta" => Color::Rgb(0x8b, 0x00, 0x8b),
            "darkgreen" => Color::Rgb(0x00, 0x64, 0x00),
            "darkred" => Color::Rgb(0x8b, 0x00, 0x00),
            "darkblue" => Color::Rgb(0x00, 0x00, 0x8b),
            "darkcyan" => Color::Rgb(0x00, 0x8b, 0x8b),
            "brown" => Color::Rgb(0xa5, 0x2a, 0x2a),
            "orange" => Color::Rgb(0xff, 0xa5, 0x00),
            _ => return Err(Error::InvalidColor(value.to_string())),
        };
        Ok(color)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

impl Weight {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(Weight::Normal),
            "bold" => Some(Weight::Bold),
            _ => None,
        }
    }
}

/// Font slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slant {
    #[default]
    Normal,
    Italic,
}

impl Slant {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(Slant::Normal),
            "italic" => Some(Slant::Italic),
            _ => None,
        }
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Font weight
    pub weight: Weight,
    /// Font slant
    pub slant: Slant,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.weight = Weight::Bold;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.slant = Slant::Italic;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == Slant::Italic
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable mapping from style class to visual attributes
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    styles: HashMap<StyleClass, Style>,
}

impl StyleTable {
    /// Build a table from the default style of every class
    pub fn new() -> Self {
        let styles = StyleClass::ALL
            .iter()
            .map(|class| (*class, class.default_style()))
            .collect();
        Self { styles }
    }

    /// Build the default table, replacing the listed classes
    pub fn with_overrides(overrides: impl IntoIterator<Item = (StyleClass, Style)>) -> Self {
        let mut table = Self::new();
        table.styles.extend(overrides);
        table
    }

    /// Look up the style for a class
    pub fn get(&self, class: StyleClass) -> Style {
        self.styles
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_style())
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A styled run of bytes within one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte offset where this span starts
    pub start: usize,
    /// Length in bytes (never zero)
    pub len: usize,
    /// Style class assigned to the run
    pub class: StyleClass,
}

impl StyledSpan {
    /// Create a new span
    pub fn new(start: usize, len: usize, class: StyleClass) -> Self {
        Self { start, len, class }
    }

    /// Byte offset one past the end of this span
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Slice the span's text out of its line
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert!(style.is_default());
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.weight, Weight::Normal);
        assert_eq!(style.slant, Slant::Normal);
    }

    #[test]
    fn test_style_builders() {
        let style = Style::fg(Color::Red).with_bold().with_italic();
        assert_eq!(style.fg, Color::Red);
        assert!(style.is_bold());
        assert!(style.is_italic());
        assert!(!style.is_default());
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(Color::parse("blue").unwrap(), Color::Blue);
        assert_eq!(Color::parse("Bright-Cyan").unwrap(), Color::BrightCyan);
        assert_eq!(Color::parse("darkGray").unwrap(), Color::Rgb(0xa9, 0xa9, 0xa9));
        assert_eq!(Color::parse("dark_magenta").unwrap(), Color::Rgb(0x8b, 0x00, 0x8b));
        assert!(matches!(Color::parse("chartreuse-ish"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::Rgb(255, 128, 0));
        assert_eq!(Color::parse("#A52A2A").unwrap(), Color::Rgb(0xa5, 0x2a, 0x2a));
        assert!(Color::parse("#fff").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_weight_and_slant() {
        assert_eq!(Weight::parse("Bold"), Some(Weight::Bold));
        assert_eq!(Weight::parse("heavy"), None);
        assert_eq!(Slant::parse("italic"), Some(Slant::Italic));
        assert_eq!(Slant::parse("normal"), Some(Slant::Normal));
    }

    #[test]
    fn test_style_table_overrides() {
        let table = StyleTable::with_overrides([(StyleClass::Keyword, Style::fg(Color::Yellow))]);
        assert_eq!(table.get(StyleClass::Keyword), Style::fg(Color::Yellow));
        assert_eq!(table.get(StyleClass::Comment), StyleClass::Comment.default_style());
    }

    #[test]
    fn test_span_contains() {
        let span = StyledSpan::new(5, 5, StyleClass::Number);
        assert!(!span.contains(4));
        assert!(span.contains(5));
        assert!(span.contains(9));
        assert!(!span.contains(10));
        assert_eq!(span.end(), 10);
        assert_eq!(span.text("abcdefghijkl"), "fghij");
    }
}
