//! Python token lists

use super::rules::TokenRuleSet;
use crate::error::Result;

/// Python keywords, including the Python 2 `exec` and `print` statements
pub const KEYWORDS: &[&str] = &[
    "and", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "exec", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "not",
    "or", "pass", "print", "raise", "return", "try", "while", "yield", "None", "True", "False",
];

/// Python operators
pub const OPERATORS: &[&str] = &[
    "=",
    // Comparison
    "==", "!=", "<", "<=", ">", ">=",
    // Arithmetic
    "+", "-", "*", "/", "//", "%", "**",
    // In-place
    "+=", "-=", "*=", "/=", "%=",
    // Bitwise
    "^", "|", "&", "~", ">>", "<<",
];

/// Python braces
pub const BRACES: &[&str] = &["{", "}", "(", ")", "[", "]"];

impl TokenRuleSet {
    /// Rule table for Python source
    pub fn python() -> Result<Self> {
        Self::new(KEYWORDS, OPERATORS, BRACES)
    }
}
