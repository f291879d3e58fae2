//! Error types for lexing, parsing, value conversion and serde support.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - **Syntax errors** stop a lex or parse. They carry the [`Position`] where
//!   the problem was detected and arrive as the single terminal
//!   [`ParserEvent::Error`](crate::ParserEvent::Error) of an event stream.
//! - **Conversion errors** are local to one call of a [`Value`](crate::Value)
//!   conversion. Asking a string for an integer, or an out-of-range number for
//!   a `u64`, fails that call and nothing else.
//!
//! ## Examples
//!
//! ```rust
//! use plainfields::{Document, Error};
//!
//! let err = Document::parse("name=john,123").unwrap_err();
//! assert!(matches!(err, Error::Syntax { .. }));
//! assert_eq!(
//!     err.to_string(),
//!     "Error at Col 11 (Offset 10): ordered value not allowed here"
//! );
//! ```

use crate::value::{Conversion, ValueKind};
use crate::Position;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Represents every failure the crate reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Lexical or grammatical failure at a position in the input
    #[error("Error at {position}: {message}")]
    Syntax { position: Position, message: String },

    /// The value kind has no conversion to the requested target
    #[error("cannot convert {kind} to {target}")]
    NotConvertible { kind: ValueKind, target: Conversion },

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),

    /// Boolean value whose raw text is neither `true` nor `false`
    #[error("invalid boolean literal: {0:?}")]
    InvalidBoolean(String),

    /// A quoted string that cannot be de-escaped
    #[error("invalid string literal {raw}: {reason}")]
    InvalidString { raw: String, reason: String },

    /// A hex float whose mantissa or exponent cannot be read
    #[error("invalid hex float literal: {0:?}")]
    InvalidHexFloat(String),

    /// An ordered value was added after a labeled field
    #[error("ordered value not allowed after a labeled field")]
    OrderedAfterLabeled,

    /// A field name that does not scan as a single identifier
    #[error("{0:?}: invalid field name")]
    InvalidFieldName(String),

    /// IO error while reading input or writing output
    #[error("IO error: {0}")]
    Io(String),

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at `position`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use plainfields::{Error, Position};
    ///
    /// let err = Error::syntax(Position::new(4, 5), "expected value, got EOF");
    /// assert_eq!(err.to_string(), "Error at Col 5 (Offset 4): expected value, got EOF");
    /// ```
    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn not_convertible(kind: ValueKind, target: Conversion) -> Self {
        Error::NotConvertible { kind, target }
    }

    pub fn invalid_string(raw: &str, reason: impl Into<String>) -> Self {
        Error::InvalidString {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an unsupported type error for shapes the format cannot express.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The input position for syntax errors, `None` for everything else.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display() {
        let err = Error::syntax(Position::new(2, 3), "expected hex digit");
        assert_eq!(err.to_string(), "Error at Col 3 (Offset 2): expected hex digit");
        assert_eq!(err.position(), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_not_convertible_display() {
        let err = Error::not_convertible(ValueKind::String, Conversion::Int);
        assert_eq!(err.to_string(), "cannot convert string to int");
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_parse_int_is_wrapped() {
        let err: Error = "x".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, Error::ParseInt(_)));
    }

    #[test]
    fn test_serde_custom() {
        let err = <Error as serde::de::Error>::custom("missing field `name`");
        assert_eq!(err, Error::Custom("missing field `name`".to_string()));
    }
}
