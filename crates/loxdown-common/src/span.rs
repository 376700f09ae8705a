//! Source locations attached to syntax tree nodes and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A source range expressed as a 1-based line and column plus a length in
/// characters.
///
/// The front-end (lexer and parser) produces these; the checker only copies
/// them onto diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub length: u32,
}

impl Span {
    /// A span that points nowhere, used for synthesized nodes.
    pub const DUMMY: Self = Self {
        line: 0,
        column: 0,
        length: 0,
    };

    pub const fn new(line: u32, column: u32, length: u32) -> Self {
        Self {
            line,
            column,
            length,
        }
    }

    pub const fn is_dummy(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
