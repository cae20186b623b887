//! Per-document highlighting cache
//!
//! Stores the outgoing line state and the styled spans of every line,
//! and re-highlights forward from an edit until the line state settles.

use log::debug;

use super::highlighter::BlockHighlighter;
use super::rules::LineState;
use super::style::StyledSpan;

/// Per-line highlighting state for one document
#[derive(Debug, Clone, Default)]
pub struct HighlightCache {
    /// Outgoing state of each line (the next line's incoming state)
    line_states: Vec<LineState>,
    /// Spans computed for each line
    line_spans: Vec<Vec<StyledSpan>>,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines tracked
    pub fn len(&self) -> usize {
        self.line_states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_states.is_empty()
    }

    /// Outgoing state recorded for a line
    pub fn state(&self, line: usize) -> Option<LineState> {
        self.line_states.get(line).copied()
    }

    /// Spans recorded for a line
    pub fn spans(&self, line: usize) -> Option<&[StyledSpan]> {
        self.line_spans.get(line).map(Vec::as_slice)
    }

    /// State a line starts in: the outgoing state of the line above
    pub fn incoming_state(&self, line: usize) -> LineState {
        match line {
            0 => LineState::Clean,
            _ => self.state(line - 1).unwrap_or_default(),
        }
    }

    /// Highlight every line from scratch, in document order
    pub fn rebuild<S: AsRef<str>>(&mut self, highlighter: &BlockHighlighter, lines: &[S]) {
        self.line_states.clear();
        self.line_spans.clear();

        let mut state = LineState::Clean;
        for line in lines {
            let result = highlighter.highlight(line.as_ref(), state);
            state = result.end_state;
            self.line_states.push(result.end_state);
            self.line_spans.push(result.spans);
        }
        debug!("highlighted {} lines", lines.len());
    }

    /// Make room for a newly inserted line
    ///
    /// The placeholder records the line's incoming state as its outgoing
    /// state, so a cascade started at `line` stops as soon as the new
    /// line passes that state through unchanged.
    pub fn insert_line(&mut self, line: usize) {
        let line = line.min(self.len());
        let state = self.incoming_state(line);
        self.line_states.insert(line, state);
        self.line_spans.insert(line, Vec::new());
    }

    /// Drop the entry for a removed line
    ///
    /// The line above inherits the removed line's outgoing state, since
    /// that is what the line below was last highlighted with. Cascade
    /// from the line above afterwards.
    pub fn remove_line(&mut self, line: usize) {
        if line < self.len() {
            let state = self.line_states.remove(line);
            self.line_spans.remove(line);
            if line > 0 {
                self.line_states[line - 1] = state;
            }
        }
    }

    /// Ensure cache vectors match the document length
    fn ensure_size(&mut self, line_count: usize) {
        self.line_states.resize(line_count, LineState::Clean);
        self.line_spans.resize(line_count, Vec::new());
    }

    /// Re-highlight from `from`, cascading forward
    ///
    /// The first line is always re-highlighted. Each following line is
    /// re-highlighted only while the previous line's outgoing state
    /// differs from what was recorded before. Visits at most every line
    /// once. Returns the lines whose spans changed.
    pub fn cascade<S: AsRef<str>>(
        &mut self,
        highlighter: &BlockHighlighter,
        lines: &[S],
        from: usize,
    ) -> Vec<usize> {
        self.ensure_size(lines.len());

        let mut repaint = Vec::new();
        let mut line = from;

        while line < lines.len() {
            let incoming = self.incoming_state(line);
            let result = highlighter.highlight(lines[line].as_ref(), incoming);

            if self.line_spans[line] != result.spans {
                repaint.push(line);
                self.line_spans[line] = result.spans;
            }

            let previous = std::mem::replace(&mut self.line_states[line], result.end_state);
            if previous == result.end_state {
                break;
            }
            line += 1;
        }

        debug!(
            "cascade from line {} stopped at {}, {} lines to repaint",
            from,
            line,
            repaint.len()
        );
        repaint
    }
}
