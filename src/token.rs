//! Lexical tokens.
//!
//! A [`Token`] carries the exact slice of input it was scanned from: quotes,
//! signs, base prefixes and `_` separators are all retained. Nothing is
//! normalized at lex time; interpretation happens in [`crate::Value`].

use crate::Position;
use std::borrow::Cow;
use std::fmt;

/// The closed set of token kinds produced by the [`crate::Lexer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Lexing failed; the token text is the error message.
    Error,
    /// End of input reached.
    EndOfInput,
    /// `^` or `!`
    BooleanPrefix,
    /// `abc-123`
    Identifier,
    /// `=`
    Assign,
    /// `123`, `-1.5e3`, `0xFF`, `0o755`, `0b11`, ...
    Number,
    /// `"abc"` or `'def'`
    String,
    /// `true`
    True,
    /// `false`
    False,
    /// `nil`
    Nil,
    /// `,`
    FieldSeparator,
    /// `;`
    ListSeparator,
    /// `:`
    PairSeparator,
}

impl TokenKind {
    /// Returns `true` for the kinds that can stand as a scalar value.
    #[inline]
    #[must_use]
    pub const fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// Returns `true` for the kinds that end a token stream.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::EndOfInput)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Error => "Error",
            TokenKind::EndOfInput => "EOF",
            TokenKind::BooleanPrefix => "BooleanPrefix",
            TokenKind::Identifier => "Identifier",
            TokenKind::Assign => "Assign",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::Nil => "Nil",
            TokenKind::FieldSeparator => "FieldSeparator",
            TokenKind::ListSeparator => "ListSeparator",
            TokenKind::PairSeparator => "PairSeparator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the lexer.
///
/// `text` borrows from the input for every kind except [`TokenKind::Error`],
/// whose text is the formatted error message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub position: Position,
    pub text: Cow<'a, str>,
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn new(kind: TokenKind, position: Position, text: impl Into<Cow<'a, str>>) -> Self {
        Token {
            kind,
            position,
            text: text.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Detaches the token from the input it was scanned from.
    #[must_use]
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            position: self.position,
            text: Cow::Owned(self.text.into_owned()),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} at {}: {:?}}}", self.kind, self.position, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let cases = [
            (TokenKind::Error, "Error"),
            (TokenKind::EndOfInput, "EOF"),
            (TokenKind::BooleanPrefix, "BooleanPrefix"),
            (TokenKind::Identifier, "Identifier"),
            (TokenKind::Assign, "Assign"),
            (TokenKind::Number, "Number"),
            (TokenKind::String, "String"),
            (TokenKind::True, "True"),
            (TokenKind::False, "False"),
            (TokenKind::Nil, "Nil"),
            (TokenKind::FieldSeparator, "FieldSeparator"),
            (TokenKind::ListSeparator, "ListSeparator"),
            (TokenKind::PairSeparator, "PairSeparator"),
        ];

        for (kind, expected) in cases {
            assert_eq!(kind.to_string(), expected);
        }
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Identifier, Position::new(42, 7), "test-value");
        assert_eq!(
            token.to_string(),
            "{Identifier at Col 7 (Offset 42): \"test-value\"}"
        );
    }

    #[test]
    fn test_value_kinds() {
        assert!(TokenKind::Nil.is_value());
        assert!(TokenKind::String.is_value());
        assert!(!TokenKind::Assign.is_value());
        assert!(!TokenKind::BooleanPrefix.is_value());
        assert!(TokenKind::EndOfInput.is_terminal());
        assert!(!TokenKind::FieldSeparator.is_terminal());
    }
}
