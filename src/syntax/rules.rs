//! Pattern rules for syntax highlighting
//!
//! This module defines the ordered rule table used to classify tokens
//! within a single line, and the carry-over state handed from one line
//! to the next.

use log::debug;
use regex::Regex;

use super::style::StyledSpan;
use super::tokens::StyleClass;
use crate::error::Result;

/// A single-line pattern rule
///
/// Matches a regex pattern and assigns a style class to one capture
/// group of each match.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Capture group that receives the style (0 = whole match)
    pub group: usize,
    /// Style class to assign to matches
    pub class: StyleClass,
}

impl Rule {
    /// Create a new pattern rule
    pub fn new(name: &str, pattern: &str, group: usize, class: StyleClass) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            group,
            class,
        })
    }

    /// Find the first match at or after `start`
    ///
    /// Returns the byte range of the whole match and of the styled group.
    pub fn find_at(&self, text: &str, start: usize) -> Option<RuleMatch> {
        if start > text.len() {
            return None;
        }
        let caps = self.pattern.captures_at(text, start)?;
        let whole = caps.get(0)?;
        let group = caps.get(self.group)?;
        Some(RuleMatch {
            start: whole.start(),
            end: whole.end(),
            group_start: group.start(),
            group_end: group.end(),
        })
    }
}

/// Byte ranges of one rule match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub start: usize,
    pub end: usize,
    pub group_start: usize,
    pub group_end: usize,
}

/// Ordered, immutable table of single-line rules
///
/// Order matters: when two rules paint the same bytes, the later one
/// wins.
#[derive(Debug, Clone)]
pub struct TokenRuleSet {
    rules: Vec<Rule>,
}

impl TokenRuleSet {
    /// Build the table from keyword, operator and brace lists
    ///
    /// Operators and braces are plain literals; they are escaped here.
    pub fn new(keywords: &[&str], operators: &[&str], braces: &[&str]) -> Result<Self> {
        let mut rules = Vec::with_capacity(keywords.len() + operators.len() + braces.len() + 10);

        for word in keywords {
            let pattern = format!(r"\b{}\b", regex::escape(word));
            rules.push(Rule::new(word, &pattern, 0, StyleClass::Keyword)?);
        }
        for op in operators {
            rules.push(Rule::new(op, &regex::escape(op), 0, StyleClass::Operator)?);
        }
        for brace in braces {
            rules.push(Rule::new(brace, &regex::escape(brace), 0, StyleClass::Brace)?);
        }

        let structural: [(&str, &str, usize, StyleClass); 9] = [
            ("self", r"\bself\b", 0, StyleClass::SelfReference),
            ("def_name", r"\bdef\b\s*(\w+)", 1, StyleClass::DefOrClassName),
            ("class_name", r"\bclass\b\s*(\w+)", 1, StyleClass::DefOrClassName),
            ("integer", r"\b[+-]?[0-9]+[lL]?\b", 0, StyleClass::Number),
            ("hex", r"\b[+-]?0[xX][0-9A-Fa-f]+[lL]?\b", 0, StyleClass::Number),
            (
                "float",
                r"\b[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?\b",
                0,
                StyleClass::Number,
            ),
            ("double_string", r#""[^"\\]*(\\.[^"\\]*)*""#, 0, StyleClass::String),
            ("single_string", r"'[^'\\]*(\\.[^'\\]*)*'", 0, StyleClass::String),
            ("comment", r"#.*", 0, StyleClass::Comment),
        ];
        for (name, pattern, group, class) in structural {
            rules.push(Rule::new(name, pattern, group, class)?);
        }

        debug!("built rule table with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Multi-line string state carried from one line to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineState {
    /// Not inside a multi-line string
    #[default]
    Clean,
    /// Inside an open `'''` string
    InSingle,
    /// Inside an open `"""` string
    InDouble,
}

impl LineState {
    /// The delimiter that closes the open string, if any
    pub fn delimiter(&self) -> Option<&'static str> {
        match self {
            LineState::Clean => None,
            LineState::InSingle => Some(TRIPLE_SINGLE),
            LineState::InDouble => Some(TRIPLE_DOUBLE),
        }
    }

    /// State entered after an unclosed opening delimiter
    pub fn opened_by(delimiter: &str) -> Self {
        match delimiter {
            TRIPLE_SINGLE => LineState::InSingle,
            TRIPLE_DOUBLE => LineState::InDouble,
            _ => LineState::Clean,
        }
    }

    /// Check if we're inside a multi-line string
    pub fn is_inside_multiline(&self) -> bool {
        *self != LineState::Clean
    }
}

pub const TRIPLE_SINGLE: &str = "'''";
pub const TRIPLE_DOUBLE: &str = "\"\"\"";

/// Result of highlighting a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResult {
    /// Overlap-free spans in offset order
    pub spans: Vec<StyledSpan>,
    /// State at end of line (for next line)
    pub end_state: LineState,
}
