//! Terminal rendering of highlighted lines
//!
//! Writes styled text with crossterm commands to any `io::Write`, so the
//! same code drives stdout and in-memory buffers in tests.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{self, Attribute, Print, SetAttribute, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::gutter::Gutter;
use crate::syntax::{Color, Style, StyleTable, StyledSpan};

/// Renders documents line by line
#[derive(Debug, Clone)]
pub struct Renderer {
    styles: StyleTable,
    tab_width: usize,
    show_line_numbers: bool,
}

impl Renderer {
    pub fn new(styles: StyleTable, tab_width: usize, show_line_numbers: bool) -> Self {
        Self {
            styles,
            tab_width: tab_width.max(1),
            show_line_numbers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.styles.clone(), config.tab_width, config.show_line_numbers)
    }

    /// Render every line of a document, each followed by a newline
    pub fn render_document<W: Write>(&self, out: &mut W, doc: &Document) -> Result<()> {
        let gutter = Gutter::for_document(doc);
        for (idx, line) in doc.lines().iter().enumerate() {
            if self.show_line_numbers {
                self.render_gutter(out, &gutter, idx)?;
            }
            self.render_line(out, line.text(), doc.spans(idx))?;
            queue!(out, Print('\n'))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Render one line's text with its spans
    ///
    /// Bytes outside every span are written unstyled.
    pub fn render_line<W: Write>(&self, out: &mut W, text: &str, spans: &[StyledSpan]) -> Result<()> {
        let mut col = 0;
        let mut pos = 0;

        for span in spans {
            if span.start > pos {
                queue!(out, Print(self.expand_tabs(&text[pos..span.start], &mut col)))?;
            }
            apply_style(out, &self.styles.get(span.class))?;
            queue!(out, Print(self.expand_tabs(span.text(text), &mut col)))?;
            queue!(out, SetAttribute(Attribute::Reset))?;
            pos = span.end();
        }
        if pos < text.len() {
            queue!(out, Print(self.expand_tabs(&text[pos..], &mut col)))?;
        }
        Ok(())
    }

    fn render_gutter<W: Write>(&self, out: &mut W, gutter: &Gutter, idx: usize) -> Result<()> {
        let attribute = if gutter.is_active(idx) {
            Attribute::Bold
        } else {
            Attribute::Dim
        };
        queue!(
            out,
            SetAttribute(attribute),
            Print(gutter.label(idx)),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    /// Replace tabs with spaces up to the next tab stop
    fn expand_tabs(&self, s: &str, col: &mut usize) -> String {
        let mut expanded = String::with_capacity(s.len());
        for ch in s.chars() {
            if ch == '\t' {
                let spaces = self.tab_width - (*col % self.tab_width);
                expanded.extend(std::iter::repeat(' ').take(spaces));
                *col += spaces;
            } else {
                expanded.push(ch);
                *col += ch.width().unwrap_or(0);
            }
        }
        expanded
    }
}

/// Queue the commands that switch to a style
fn apply_style<W: Write>(out: &mut W, style: &Style) -> Result<()> {
    queue!(out, SetForegroundColor(to_term_color(style.fg)))?;
    if style.is_bold() {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.is_italic() {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    Ok(())
}

fn to_term_color(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
    }
}
