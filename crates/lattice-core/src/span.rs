//! Source location tracking for graph nodes and diagnostics.
//!
//! Provides [`Span`] to track where a syntax node, and therefore the graph
//! value lowered from it, starts in the source. A missing position is
//! modelled as `Option<Span>::None` rather than a sentinel value.

use std::fmt;

/// A span of source code, represented by its starting position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this span points at a real location. Line 0 is never produced
    /// by a parser.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }

    /// The span that starts `offset` bytes into this one, on the same line.
    ///
    /// Used to point into the middle of a literal, e.g. at an interpolation
    /// fragment.
    pub fn shifted(self, offset: u32) -> Span {
        Span {
            line: self.line,
            col: self.col + offset,
            len: self.len.saturating_sub(offset),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
