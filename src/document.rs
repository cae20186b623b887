//! Document representation - lines plus their highlighting state
//!
//! Every edit re-highlights the touched line and cascades forward
//! through the cache. The lines that need repainting accumulate until
//! the host collects them with [`Document::take_repaint`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::line::Line;
use crate::syntax::{BlockHighlighter, HighlightCache, LineState, StyledSpan};

/// A document containing text, highlighting and the active line
#[derive(Debug)]
pub struct Document {
    /// Lines of text
    lines: Vec<Line>,
    /// Document name (e.g., "main.py", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed documents)
    filename: Option<PathBuf>,
    /// Whether document has unsaved changes
    modified: bool,
    /// Line holding the cursor
    active_line: usize,
    /// Shared, immutable highlighter
    highlighter: Arc<BlockHighlighter>,
    /// Per-line highlighting state
    cache: HighlightCache,
    /// Lines to repaint since the last `take_repaint`
    repaint: BTreeSet<usize>,
}

impl Document {
    /// Create a new empty document with the given name
    pub fn new(name: impl Into<String>, highlighter: Arc<BlockHighlighter>) -> Self {
        Self::from_lines(name, vec![Line::new()], highlighter)
    }

    /// Create a document from text, splitting it into lines
    pub fn from_text(name: impl Into<String>, text: &str, highlighter: Arc<BlockHighlighter>) -> Self {
        let lines: Vec<Line> = text.lines().map(Line::from).collect();
        Self::from_lines(name, lines, highlighter)
    }

    /// Create a document from file contents
    pub fn from_file(path: &Path, highlighter: Arc<BlockHighlighter>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut doc = Self::from_text(name, &content, highlighter);
        doc.filename = Some(path.to_path_buf());
        debug!("loaded {} ({} lines)", path.display(), doc.line_count());
        Ok(doc)
    }

    fn from_lines(name: impl Into<String>, mut lines: Vec<Line>, highlighter: Arc<BlockHighlighter>) -> Self {
        // Always have at least one line
        if lines.is_empty() {
            lines.push(Line::new());
        }

        let mut cache = HighlightCache::new();
        cache.rebuild(&highlighter, &lines);
        let repaint = (0..lines.len()).collect();

        Self {
            lines,
            name: name.into(),
            filename: None,
            modified: false,
            active_line: 0,
            highlighter,
            cache,
            repaint,
        }
    }

    /// Get document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Check if document is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark document as modified
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Total number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the line holding the cursor
    pub fn active_line(&self) -> usize {
        self.active_line
    }

    /// Move the cursor to a line, clamped to the document
    pub fn set_active_line(&mut self, line: usize) {
        self.active_line = line.min(self.lines.len() - 1);
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whole text, lines joined with `\n`
    pub fn text(&self) -> String {
        let lines: Vec<&str> = self.lines.iter().map(Line::text).collect();
        lines.join("\n")
    }

    /// Styled spans of a line
    pub fn spans(&self, idx: usize) -> &[StyledSpan] {
        self.cache.spans(idx).unwrap_or(&[])
    }

    /// Multi-line string state at the end of a line
    pub fn line_state(&self, idx: usize) -> LineState {
        self.cache.state(idx).unwrap_or_default()
    }

    /// Lines whose spans changed or moved since the last call
    pub fn take_repaint(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.repaint).into_iter().collect()
    }

    /// Replace the text of a line
    pub fn set_line(&mut self, idx: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(idx) {
            line.set_text(text);
            self.line_changed(idx);
        }
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if ch == '\n' {
            self.insert_newline(line_idx, byte_pos);
        } else if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.line_changed(line_idx);
        }
    }

    /// Insert text at position; embedded newlines split the line
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, s: &str) {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return;
        };
        let mut pos = line.floor_char_boundary(byte_pos);
        let mut idx = line_idx;
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline(idx, pos);
                idx += 1;
                pos = 0;
            }
            if !part.is_empty() {
                self.lines[idx].insert_str(pos, part);
                pos += part.len();
                self.line_changed(idx);
            }
        }
    }

    /// Delete a character at position, returns the deleted char
    ///
    /// At end of line, joins the next line instead and returns `'\n'`.
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        let pos = line.floor_char_boundary(byte_pos);
        if pos < line.len() {
            let ch = line.text()[pos..].chars().next()?;
            line.delete_range(pos, pos + ch.len_utf8());
            self.line_changed(line_idx);
            Some(ch)
        } else if self.join_line(line_idx) {
            Some('\n')
        } else {
            None
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return;
        };
        let new_line = line.split_off(byte_pos);
        self.lines.insert(line_idx + 1, new_line);
        self.cache.insert_line(line_idx + 1);
        if self.active_line > line_idx {
            self.active_line += 1;
        }
        // Both halves changed; the second only has a placeholder so far
        self.rehighlight(line_idx);
        self.rehighlight(line_idx + 1);
        self.lines_moved(line_idx);
    }

    /// Join line with the next line (delete newline at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 >= self.lines.len() {
            return false;
        }
        let next_line = self.lines.remove(line_idx + 1);
        self.lines[line_idx].append(next_line);
        self.cache.remove_line(line_idx + 1);
        if self.active_line > line_idx {
            self.active_line -= 1;
        }
        self.rehighlight(line_idx);
        self.lines_moved(line_idx);
        true
    }

    /// Insert a whole line before `idx` (or at the end)
    pub fn insert_line(&mut self, idx: usize, text: &str) {
        let idx = idx.min(self.lines.len());
        self.lines.insert(idx, Line::from(text));
        self.cache.insert_line(idx);
        if self.active_line >= idx && idx < self.lines.len() - 1 {
            self.active_line += 1;
        }
        self.rehighlight(idx);
        self.lines_moved(idx);
    }

    /// Delete a line by index; the last remaining line is only cleared
    pub fn delete_line(&mut self, idx: usize) {
        if idx >= self.lines.len() {
            return;
        }
        if self.lines.len() == 1 {
            self.set_line(0, "");
            return;
        }
        self.lines.remove(idx);
        self.cache.remove_line(idx);
        if self.active_line > idx || self.active_line == self.lines.len() {
            self.active_line -= 1;
        }
        self.rehighlight(idx.saturating_sub(1));
        self.lines_moved(idx);
    }

    /// Re-highlight after an in-place edit of one line
    fn line_changed(&mut self, idx: usize) {
        self.modified = true;
        self.rehighlight(idx);
    }

    fn rehighlight(&mut self, idx: usize) {
        let changed = self.cache.cascade(&self.highlighter, &self.lines, idx);
        self.repaint.extend(changed);
    }

    /// Queue every line from `idx` down after lines were inserted or
    /// removed, since all of them moved on screen
    fn lines_moved(&mut self, idx: usize) {
        self.modified = true;
        self.repaint.extend(idx..self.lines.len());
    }

    /// Write document to its file
    pub fn save(&mut self) -> Result<()> {
        let path = self.filename.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No filename set")
        })?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Write document to a specific path
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.text())?;
        Ok(())
    }
}
