//! Block highlighter
//!
//! Classifies one line of text at a time. Each call takes the line and
//! the state left by the previous line, and returns the styled spans for
//! the line plus the state for the next one.
//!
//! Highlighting runs in two phases:
//! 1. every single-line rule is applied in table order, later rules
//!    painting over earlier ones;
//! 2. a small state machine finds `'''` and `"""` delimiters and paints
//!    multi-line strings over whatever phase 1 produced.

use log::trace;

use super::rules::{HighlightResult, LineState, TokenRuleSet, TRIPLE_DOUBLE, TRIPLE_SINGLE};
use super::style::StyledSpan;
use super::tokens::StyleClass;
use crate::error::Result;

const DELIMITER_LEN: usize = 3;

/// Highlights single lines against an immutable rule table
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct BlockHighlighter {
    rules: TokenRuleSet,
}

impl BlockHighlighter {
    /// Create a highlighter over a rule table
    pub fn new(rules: TokenRuleSet) -> Self {
        Self { rules }
    }

    /// Create a highlighter with the built-in Python rules
    pub fn python() -> Result<Self> {
        Ok(Self::new(TokenRuleSet::python()?))
    }

    pub fn rules(&self) -> &TokenRuleSet {
        &self.rules
    }

    /// Highlight a single line of text
    ///
    /// Takes the line text (without newline) and the state from the
    /// previous line. Returns overlap-free spans in offset order and the
    /// state for the next line.
    pub fn highlight(&self, text: &str, incoming: LineState) -> HighlightResult {
        if text.is_empty() {
            return HighlightResult {
                spans: Vec::new(),
                end_state: incoming,
            };
        }

        let mut canvas = Canvas::new(text.len());
        let mut marks = QuoteMarks::new(text.len());

        for rule in self.rules.rules() {
            let mut offset = 0;
            while let Some(m) = rule.find_at(text, offset) {
                if m.group_start < m.group_end {
                    if rule.class == StyleClass::String {
                        marks.record(text, m.start, m.end);
                    }
                    canvas.paint(m.group_start, m.group_end, rule.class);
                }
                offset = if m.end > m.start {
                    m.end
                } else {
                    match text[m.end..].chars().next() {
                        Some(ch) => m.end + ch.len_utf8(),
                        None => break,
                    }
                };
            }
        }

        let end_state = match_multiline(text, incoming, &marks, &mut canvas);
        trace!("{:?} -> {:?} for {:?}", incoming, end_state, text);

        HighlightResult {
            spans: canvas.into_spans(),
            end_state,
        }
    }
}

/// Paint multi-line strings and compute the outgoing state
fn match_multiline(
    text: &str,
    incoming: LineState,
    marks: &QuoteMarks,
    canvas: &mut Canvas,
) -> LineState {
    let mut state = incoming;
    let mut pos = 0;

    loop {
        let (start, delimiter, search_from) = match state.delimiter() {
            // Already open: the string runs from the start of the line
            Some(delimiter) => (pos, delimiter, pos),
            None => match find_opening(text, pos, marks) {
                Some((start, delimiter)) => (start, delimiter, start + DELIMITER_LEN),
                None => return LineState::Clean,
            },
        };

        match text[search_from..].find(delimiter) {
            Some(offset) => {
                let end = search_from + offset + DELIMITER_LEN;
                canvas.paint(start, end, StyleClass::MultilineString);
                state = LineState::Clean;
                pos = end;
            }
            None => {
                canvas.paint(start, text.len(), StyleClass::MultilineString);
                return LineState::opened_by(delimiter);
            }
        }
    }
}

/// Find the first opening delimiter at or after `from`
///
/// Delimiters inside a completed single-line string are skipped. A `#`
/// outside any string starts a comment that runs to the end of the line,
/// so the scan stops there. Only bytes from `from` on are considered:
/// a `#` inside a multi-line string closed earlier on the line is text.
fn find_opening(text: &str, from: usize, marks: &QuoteMarks) -> Option<(usize, &'static str)> {
    let bytes = text.as_bytes();
    for pos in from..bytes.len() {
        if bytes[pos] == b'#' && !marks.is_quoted(pos) {
            return None;
        }
        if let Some(delimiter) = triple_at(bytes, pos) {
            if !marks.is_suppressed(pos) {
                return Some((pos, delimiter));
            }
        }
    }
    None
}

fn triple_at(bytes: &[u8], pos: usize) -> Option<&'static str> {
    let window = bytes.get(pos..pos + DELIMITER_LEN)?;
    if window == TRIPLE_SINGLE.as_bytes() {
        Some(TRIPLE_SINGLE)
    } else if window == TRIPLE_DOUBLE.as_bytes() {
        Some(TRIPLE_DOUBLE)
    } else {
        None
    }
}

/// Bytes covered by single-line string matches
///
/// `suppressed` marks the triple-quote runs inside those matches.
/// Lives for one highlight call only.
#[derive(Debug)]
struct QuoteMarks {
    quoted: Vec<bool>,
    suppressed: Vec<bool>,
}

impl QuoteMarks {
    fn new(len: usize) -> Self {
        Self {
            quoted: vec![false; len],
            suppressed: vec![false; len],
        }
    }

    /// Record the string match `text[start..end]`
    fn record(&mut self, text: &str, start: usize, end: usize) {
        let bytes = text.as_bytes();
        self.quoted[start..end].fill(true);
        let mut pos = start;
        while pos + DELIMITER_LEN <= end {
            if triple_at(bytes, pos).is_some() {
                for offset in pos..pos + DELIMITER_LEN {
                    self.suppressed[offset] = true;
                }
            }
            pos += 1;
        }
    }

    fn is_quoted(&self, offset: usize) -> bool {
        self.quoted.get(offset).copied().unwrap_or(false)
    }

    fn is_suppressed(&self, offset: usize) -> bool {
        self.suppressed.get(offset).copied().unwrap_or(false)
    }
}

/// Per-byte paint buffer for one line
///
/// Each paint call is a separate stroke; the last stroke to touch a
/// byte owns it.
struct Canvas {
    cells: Vec<Option<(u32, StyleClass)>>,
    strokes: u32,
}

impl Canvas {
    fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len],
            strokes: 0,
        }
    }

    fn paint(&mut self, start: usize, end: usize, class: StyleClass) {
        let end = end.min(self.cells.len());
        if start >= end {
            return;
        }
        self.strokes += 1;
        for cell in &mut self.cells[start..end] {
            *cell = Some((self.strokes, class));
        }
    }

    /// Collapse runs of bytes owned by the same stroke into spans
    fn into_spans(self) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        let mut run: Option<(usize, u32, StyleClass)> = None;

        for (pos, cell) in self.cells.iter().enumerate() {
            match (run, cell) {
                (Some((_, stroke, _)), Some((cell_stroke, _))) if stroke == *cell_stroke => {}
                _ => {
                    if let Some((start, _, class)) = run.take() {
                        spans.push(StyledSpan::new(start, pos - start, class));
                    }
                    run = cell.map(|(stroke, class)| (pos, stroke, class));
                }
            }
        }
        if let Some((start, _, class)) = run {
            spans.push(StyledSpan::new(start, self.cells.len() - start, class));
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn highlighter() -> BlockHighlighter {
        BlockHighlighter::python().unwrap()
    }

    fn span_at(result: &HighlightResult, pos: usize) -> Option<StyledSpan> {
        result.spans.iter().copied().find(|s| s.contains(pos))
    }

    #[test]
    fn test_def_line() {
        let result = highlighter().highlight("def foo(x):", LineState::Clean);

        assert_eq!(result.end_state, LineState::Clean);
        assert_eq!(
            result.spans,
            vec![
                StyledSpan::new(0, 3, StyleClass::Keyword),
                StyledSpan::new(4, 3, StyleClass::DefOrClassName),
                StyledSpan::new(7, 1, StyleClass::Brace),
                StyledSpan::new(9, 1, StyleClass::Brace),
            ]
        );
    }

    #[test]
    fn test_class_name_and_self() {
        let hl = highlighter();
        let result = hl.highlight("class Point:", LineState::Clean);
        assert_eq!(span_at(&result, 6), Some(StyledSpan::new(6, 5, StyleClass::DefOrClassName)));

        let result = hl.highlight("self.x = 1", LineState::Clean);
        assert_eq!(result.spans[0], StyledSpan::new(0, 4, StyleClass::SelfReference));
        assert_eq!(span_at(&result, 7).map(|s| s.class), Some(StyleClass::Operator));
        assert_eq!(span_at(&result, 9).map(|s| s.class), Some(StyleClass::Number));
    }

    #[test]
    fn test_numbers() {
        let hl = highlighter();
        let result = hl.highlight("n = 0x1F + 2.5e10", LineState::Clean);
        let numbers: Vec<_> = result
            .spans
            .iter()
            .filter(|s| s.class == StyleClass::Number)
            .map(|s| s.text("n = 0x1F + 2.5e10"))
            .collect();
        assert_eq!(numbers, vec!["0x1F", "2.5e10"]);

        // Digits inside identifiers are not numbers
        let result = hl.highlight("abc123", LineState::Clean);
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_later_rules_overwrite_earlier() {
        let hl = highlighter();

        // The keyword inside the string is painted over by the string rule
        let text = "x = \"if\"";
        let result = hl.highlight(text, LineState::Clean);
        assert_eq!(span_at(&result, 5), Some(StyledSpan::new(4, 4, StyleClass::String)));

        // The comment rule comes last and wins even inside a string
        let text = "s = \"#x\"";
        let result = hl.highlight(text, LineState::Clean);
        assert_eq!(span_at(&result, 4), Some(StyledSpan::new(4, 1, StyleClass::String)));
        assert_eq!(span_at(&result, 5), Some(StyledSpan::new(5, 3, StyleClass::Comment)));
    }

    #[test]
    fn test_adjacent_tokens_stay_separate() {
        let result = highlighter().highlight("(())", LineState::Clean);
        assert_eq!(result.spans.len(), 4);
        assert!(result.spans.iter().all(|s| s.len == 1 && s.class == StyleClass::Brace));
    }

    #[test]
    fn test_open_single_triple() {
        let result = highlighter().highlight("a = '''", LineState::Clean);
        assert_eq!(result.end_state, LineState::InSingle);
        assert_eq!(span_at(&result, 4), Some(StyledSpan::new(4, 3, StyleClass::MultilineString)));
    }

    #[test]
    fn test_open_double_triple() {
        let text = "doc = \"\"\"Summary";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::InDouble);
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(6, 10, StyleClass::MultilineString)));
    }

    #[test]
    fn test_continue_and_close() {
        let hl = highlighter();
        let first = hl.highlight("x = '''", LineState::Clean);
        assert_eq!(first.end_state, LineState::InSingle);

        let second = hl.highlight("still in string'''", first.end_state);
        assert_eq!(second.end_state, LineState::Clean);
        assert_eq!(second.spans, vec![StyledSpan::new(0, 18, StyleClass::MultilineString)]);
    }

    #[test]
    fn test_continue_without_closer() {
        let result = highlighter().highlight("def not_code(): # nope", LineState::InDouble);
        assert_eq!(result.end_state, LineState::InDouble);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 22, StyleClass::MultilineString)]);
    }

    #[test]
    fn test_other_variant_does_not_close() {
        let result = highlighter().highlight("it's ''' here", LineState::InDouble);
        assert_eq!(result.end_state, LineState::InDouble);
        assert_eq!(result.spans.len(), 1);
    }

    #[test]
    fn test_close_then_reopen() {
        let text = "end''' + x + \"\"\"start";
        let result = highlighter().highlight(text, LineState::InSingle);
        assert_eq!(result.end_state, LineState::InDouble);
        assert_eq!(result.spans.first(), Some(&StyledSpan::new(0, 6, StyleClass::MultilineString)));
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(13, 8, StyleClass::MultilineString)));
        assert_eq!(span_at(&result, 11).map(|s| s.class), Some(StyleClass::Operator));
    }

    #[test]
    fn test_complete_triple_on_one_line() {
        let text = "s = '''one''' + 1";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);
        assert_eq!(span_at(&result, 4), Some(StyledSpan::new(4, 9, StyleClass::MultilineString)));
        assert_eq!(span_at(&result, 16).map(|s| s.class), Some(StyleClass::Number));
    }

    #[test]
    fn test_triple_inside_string_is_suppressed() {
        let text = "y = \"he said '''hi'''\"";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);
        assert!(result.spans.iter().all(|s| s.class != StyleClass::MultilineString));
    }

    #[test]
    fn test_suppressed_opener_is_skipped_not_final() {
        // The first ''' lives inside a string; the second one really opens
        let text = "s = \"'''\" + '''";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::InSingle);
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(12, 3, StyleClass::MultilineString)));
        assert_eq!(span_at(&result, 5).map(|s| s.class), Some(StyleClass::String));
    }

    #[test]
    fn test_double_triple_inside_single_string() {
        let text = "q = 'say \"\"\"'";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(4, 9, StyleClass::String)));
    }

    #[test]
    fn test_comment_does_not_open() {
        let text = "# '''not a string'''";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 20, StyleClass::Comment)]);

        let result = highlighter().highlight("x = 1 # '''", LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);
    }

    #[test]
    fn test_comment_marker_inside_open_string() {
        let result = highlighter().highlight("# still text'''", LineState::InSingle);
        assert_eq!(result.end_state, LineState::Clean);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 15, StyleClass::MultilineString)]);
    }

    #[test]
    fn test_hash_in_closed_string_does_not_hide_reopen() {
        let hl = highlighter();

        let text = "x # y''' z = '''";
        let result = hl.highlight(text, LineState::InSingle);
        assert_eq!(result.end_state, LineState::InSingle);
        assert_eq!(result.spans.first(), Some(&StyledSpan::new(0, 8, StyleClass::MultilineString)));
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(13, 3, StyleClass::MultilineString)));

        let text = "s = '''a#b''' + '''";
        let result = hl.highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::InSingle);
        assert_eq!(span_at(&result, 4), Some(StyledSpan::new(4, 9, StyleClass::MultilineString)));
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(16, 3, StyleClass::MultilineString)));
    }

    #[test]
    fn test_comment_after_closed_string_does_not_open() {
        let result = highlighter().highlight("s = '''a#b''' # '''", LineState::Clean);
        assert_eq!(result.end_state, LineState::Clean);

        let result = highlighter().highlight("done''' # '''", LineState::InDouble);
        assert_eq!(result.end_state, LineState::InDouble);
        let result = highlighter().highlight("done\"\"\" # '''", LineState::InDouble);
        assert_eq!(result.end_state, LineState::Clean);
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let text = "x = \"#\" + '''";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(result.end_state, LineState::InSingle);
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(10, 3, StyleClass::MultilineString)));
    }

    #[test]
    fn test_empty_line_keeps_state() {
        let hl = highlighter();
        for state in [LineState::Clean, LineState::InSingle, LineState::InDouble] {
            let result = hl.highlight("", state);
            assert!(result.spans.is_empty());
            assert_eq!(result.end_state, state);
        }
    }

    #[test]
    fn test_plain_lines_stay_clean() {
        let hl = highlighter();
        for text in ["x = y + 3", "for i in range(10):", "    return self.value ** 2", "plain words"] {
            let result = hl.highlight(text, LineState::Clean);
            assert_eq!(result.end_state, LineState::Clean, "{}", text);
            assert!(result.spans.iter().all(|s| s.class != StyleClass::MultilineString));
        }
    }

    #[test]
    fn test_idempotent() {
        let hl = highlighter();
        let text = "def f(a, b='''x'''): return \"s\" # c";
        for state in [LineState::Clean, LineState::InSingle, LineState::InDouble] {
            assert_eq!(hl.highlight(text, state), hl.highlight(text, state));
        }
    }

    #[test]
    fn test_spans_are_ordered_disjoint_and_in_bounds() {
        let hl = highlighter();
        let lines = [
            "def foo(self, x=0x10): # comment",
            "print('a', \"b\", '''c''', 1.5)",
            "class A(B): pass",
            "s = \"unterminated",
            "tab\t= 'ü' + \"日本\"",
        ];
        for text in lines {
            let result = hl.highlight(text, LineState::Clean);
            let mut last_end = 0;
            for span in &result.spans {
                assert!(span.len > 0);
                assert!(span.start >= last_end, "overlap in {:?}", text);
                assert!(span.end() <= text.len());
                assert!(text.is_char_boundary(span.start) && text.is_char_boundary(span.end()));
                last_end = span.end();
            }
        }
    }

    #[test]
    fn test_unicode_offsets() {
        let text = "é = 'ñ'";
        let result = highlighter().highlight(text, LineState::Clean);
        assert_eq!(span_at(&result, 5), Some(StyledSpan::new(5, 4, StyleClass::String)));
        assert_eq!(result.spans.last().map(|s| s.text(text)), Some("'ñ'"));
    }

    #[test]
    fn test_shared_across_threads() {
        let hl = Arc::new(highlighter());
        let lines = ["a = 1", "b = '''", "def g(): pass"];
        let expected: Vec<_> = lines.iter().map(|l| hl.highlight(l, LineState::Clean)).collect();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = lines
                .iter()
                .map(|line| {
                    let hl = Arc::clone(&hl);
                    scope.spawn(move || hl.highlight(line, LineState::Clean))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results, expected);
    }
}
