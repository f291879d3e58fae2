//! Source positions for tokens, events and errors.

use std::fmt;

/// A location in the scanned input.
///
/// `offset` is a byte offset into the original text, `column` counts scanned
/// characters starting at 1. Positions are plain values: they are copied,
/// never updated in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Position = Position {
        offset: 0,
        column: 1,
    };

    #[must_use]
    pub const fn new(offset: usize, column: usize) -> Self {
        Position { offset, column }
    }

    /// Returns the position after a character of `width` bytes.
    #[inline]
    #[must_use]
    pub(crate) const fn advance(self, width: usize) -> Self {
        Position {
            offset: self.offset + width,
            column: self.column + 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Col {} (Offset {})", self.column, self.offset)
    }
}
