//! Lexical scanner.
//!
//! [`Lexer`] is a pull-based iterator over [`Token`]s. It does no work until
//! the next token is requested, looks at most one character ahead, and stops
//! for good after yielding either [`TokenKind::EndOfInput`] or
//! [`TokenKind::Error`].
//!
//! ```rust
//! use plainfields::{lex, TokenKind};
//!
//! let kinds: Vec<TokenKind> = lex("^debug,level=3").map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::BooleanPrefix,
//!         TokenKind::Identifier,
//!         TokenKind::FieldSeparator,
//!         TokenKind::Identifier,
//!         TokenKind::Assign,
//!         TokenKind::Number,
//!         TokenKind::EndOfInput,
//!     ]
//! );
//! ```

use crate::{Position, Token, TokenKind};
use std::borrow::Cow;
use std::iter::FusedIterator;

#[inline]
pub(crate) const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

#[inline]
fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

#[inline]
const fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
const fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
const fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
const fn is_binary_digit(ch: char) -> bool {
    matches!(ch, '0' | '1')
}

#[inline]
const fn is_string_start(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

#[inline]
const fn is_numeric_sign(ch: char) -> bool {
    matches!(ch, '+' | '-')
}

#[inline]
fn is_identifier_continue(ch: char) -> bool {
    is_letter(ch) || is_digit(ch) || ch == '-' || ch == '_'
}

/// The kind of the single token `text` scans as, if it scans as exactly one.
fn single_token(text: &str) -> Option<TokenKind> {
    let mut lexer = Lexer::new(text);
    match (lexer.next(), lexer.next()) {
        (Some(first), Some(last)) if first.text == text && last.kind == TokenKind::EndOfInput => {
            Some(first.kind)
        }
        _ => None,
    }
}

/// Returns `true` if `text` scans as exactly one identifier token.
pub(crate) fn is_identifier(text: &str) -> bool {
    single_token(text) == Some(TokenKind::Identifier)
}

/// Returns `true` if `text` reads back as itself without quotes.
pub(crate) fn is_bare_word(text: &str) -> bool {
    matches!(
        single_token(text),
        Some(TokenKind::Identifier | TokenKind::Number)
    )
}

/// Formats a code point the way error messages quote it: `U+0040 '@'`.
fn describe_char(ch: char) -> String {
    if ch.is_control() {
        format!("U+{:04X}", ch as u32)
    } else {
        format!("U+{:04X} '{ch}'", ch as u32)
    }
}

/// Streaming tokenizer over a borrowed input string.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    start: Position,
    pos: Position,
    finished: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            start: Position::START,
            pos: Position::START,
            finished: false,
        }
    }

    /// The position the next token will be scanned from.
    #[must_use]
    pub fn position(&self) -> Position {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch.len_utf8());
        Some(ch)
    }

    fn bump_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.bump_if(&pred) {}
    }

    fn text(&self) -> &'a str {
        &self.input[self.start.offset..self.pos.offset]
    }

    fn emit(&mut self, kind: TokenKind) -> Token<'a> {
        let token = Token {
            kind,
            position: self.start,
            text: Cow::Borrowed(self.text()),
        };
        self.start = self.pos;
        token
    }

    fn error(&mut self, message: String) -> Token<'a> {
        log::debug!("lexer halted at {}: {}", self.start, message);
        self.finished = true;
        Token {
            kind: TokenKind::Error,
            position: self.start,
            text: Cow::Owned(message),
        }
    }

    fn scan(&mut self) -> Token<'a> {
        while self.bump_if(is_space) {}
        self.start = self.pos;

        let Some(ch) = self.peek() else {
            self.finished = true;
            return self.emit(TokenKind::EndOfInput);
        };

        let single = match ch {
            '^' | '!' => Some(TokenKind::BooleanPrefix),
            '=' => Some(TokenKind::Assign),
            ',' => Some(TokenKind::FieldSeparator),
            ';' => Some(TokenKind::ListSeparator),
            ':' => Some(TokenKind::PairSeparator),
            _ => None,
        };
        if let Some(kind) = single {
            self.bump();
            return self.emit(kind);
        }

        if is_string_start(ch) {
            self.scan_string(ch)
        } else if is_numeric_sign(ch) || is_digit(ch) {
            self.scan_number()
        } else if is_letter(ch) {
            self.scan_word()
        } else {
            self.error(format!("unexpected character: {}", describe_char(ch)))
        }
    }

    fn scan_word(&mut self) -> Token<'a> {
        self.bump();
        self.eat_while(is_identifier_continue);
        let kind = match self.text() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            _ => TokenKind::Identifier,
        };
        self.emit(kind)
    }

    fn scan_string(&mut self, quote: char) -> Token<'a> {
        self.bump();
        loop {
            match self.bump() {
                None => return self.error("unterminated string".to_string()),
                Some('\\') => {
                    if self.bump().is_none() {
                        return self.error("unterminated escape sequence".to_string());
                    }
                }
                Some(ch) if ch == quote => return self.emit(TokenKind::String),
                Some(_) => {}
            }
        }
    }

    fn scan_number(&mut self) -> Token<'a> {
        if self.bump_if(is_numeric_sign) && !self.peek().is_some_and(|c| is_digit(c) || c == '.') {
            return self.error("expected digit after sign".to_string());
        }

        let zero = self.bump_if(|c| c == '0');
        if zero {
            match self.peek() {
                Some('x' | 'X') => {
                    self.bump();
                    return self.scan_hex();
                }
                Some('o' | 'O') => {
                    self.bump();
                    return self.scan_radix(is_octal_digit, "octal");
                }
                Some('b' | 'B') => {
                    self.bump();
                    return self.scan_radix(is_binary_digit, "binary");
                }
                Some(c) if is_digit(c) || c == '_' || c == '.' => {}
                _ => return self.emit(TokenKind::Number),
            }
        }

        let integral = zero || self.peek().is_some_and(is_digit);
        self.eat_while(|c| is_digit(c) || c == '_');
        if self.bump_if(|c| c == '.') {
            // A number needs at least one digit on one side of the point.
            if !integral && !self.peek().is_some_and(is_digit) {
                return self.error("expected digit after decimal point".to_string());
            }
            self.eat_while(|c| is_digit(c) || c == '_');
        }
        if self.bump_if(|c| matches!(c, 'e' | 'E')) {
            self.bump_if(is_numeric_sign);
            if !self.peek().is_some_and(is_digit) {
                return self.error("expected digit after exponent".to_string());
            }
            self.eat_while(|c| is_digit(c) || c == '_');
        }
        self.emit(TokenKind::Number)
    }

    fn scan_hex(&mut self) -> Token<'a> {
        if !self.peek().is_some_and(is_hex_digit) {
            return self.error("expected hex digit".to_string());
        }
        self.eat_while(|c| is_hex_digit(c) || c == '_');
        if self.bump_if(|c| c == '.') {
            self.eat_while(|c| is_hex_digit(c) || c == '_');
        }
        if self.bump_if(|c| matches!(c, 'p' | 'P')) {
            self.bump_if(is_numeric_sign);
            if !self.peek().is_some_and(is_digit) {
                return self.error("expected digit after hex exponent".to_string());
            }
            self.eat_while(|c| is_digit(c) || c == '_');
        }
        self.emit(TokenKind::Number)
    }

    fn scan_radix(&mut self, is_radix_digit: fn(char) -> bool, name: &str) -> Token<'a> {
        if !self.peek().is_some_and(is_radix_digit) {
            return self.error(format!("expected {name} digit"));
        }
        self.eat_while(|c| is_radix_digit(c) || c == '_');
        self.emit(TokenKind::Number)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.scan())
    }
}

impl FusedIterator for Lexer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, offset: usize, column: usize, text: &str) -> Token<'static> {
        Token::new(kind, Position::new(offset, column), text.to_string())
    }

    fn lex_all(input: &str) -> Vec<Token<'_>> {
        Lexer::new(input).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex_all(""), vec![tok(TokenKind::EndOfInput, 0, 1, "")]);
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(
            lex_all("   \t\n  "),
            vec![tok(TokenKind::EndOfInput, 7, 8, "")]
        );
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(
            lex_all("abc=1"),
            vec![
                tok(TokenKind::Identifier, 0, 1, "abc"),
                tok(TokenKind::Assign, 3, 4, "="),
                tok(TokenKind::Number, 4, 5, "1"),
                tok(TokenKind::EndOfInput, 5, 6, ""),
            ]
        );
    }

    #[test]
    fn test_identifier_continuation() {
        assert_eq!(
            lex_all("abc-123=1,abc_123"),
            vec![
                tok(TokenKind::Identifier, 0, 1, "abc-123"),
                tok(TokenKind::Assign, 7, 8, "="),
                tok(TokenKind::Number, 8, 9, "1"),
                tok(TokenKind::FieldSeparator, 9, 10, ","),
                tok(TokenKind::Identifier, 10, 11, "abc_123"),
                tok(TokenKind::EndOfInput, 17, 18, ""),
            ]
        );
    }

    #[test]
    fn test_boolean_prefixes() {
        assert_eq!(
            lex_all("^abc,!xyz"),
            vec![
                tok(TokenKind::BooleanPrefix, 0, 1, "^"),
                tok(TokenKind::Identifier, 1, 2, "abc"),
                tok(TokenKind::FieldSeparator, 4, 5, ","),
                tok(TokenKind::BooleanPrefix, 5, 6, "!"),
                tok(TokenKind::Identifier, 6, 7, "xyz"),
                tok(TokenKind::EndOfInput, 9, 10, ""),
            ]
        );
    }

    #[test]
    fn test_map_value() {
        assert_eq!(
            lex_all(r#"values=a:1;"b":2;'c':true;0:false"#),
            vec![
                tok(TokenKind::Identifier, 0, 1, "values"),
                tok(TokenKind::Assign, 6, 7, "="),
                tok(TokenKind::Identifier, 7, 8, "a"),
                tok(TokenKind::PairSeparator, 8, 9, ":"),
                tok(TokenKind::Number, 9, 10, "1"),
                tok(TokenKind::ListSeparator, 10, 11, ";"),
                tok(TokenKind::String, 11, 12, "\"b\""),
                tok(TokenKind::PairSeparator, 14, 15, ":"),
                tok(TokenKind::Number, 15, 16, "2"),
                tok(TokenKind::ListSeparator, 16, 17, ";"),
                tok(TokenKind::String, 17, 18, "'c'"),
                tok(TokenKind::PairSeparator, 20, 21, ":"),
                tok(TokenKind::True, 21, 22, "true"),
                tok(TokenKind::ListSeparator, 25, 26, ";"),
                tok(TokenKind::Number, 26, 27, "0"),
                tok(TokenKind::PairSeparator, 27, 28, ":"),
                tok(TokenKind::False, 28, 29, "false"),
                tok(TokenKind::EndOfInput, 33, 34, ""),
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let kinds: Vec<TokenKind> = Lexer::new("true false nil nilly")
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                TokenKind::True,
                TokenKind::False,
                TokenKind::Nil,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_number_literals_keep_raw_text() {
        let input = "-.5 1. 123 -456 3.14 1e5 2.5e-3 0.123 0_1 0 +7 0xFF 0x123.4p5 0x1p1 0x123.4 0o777 0b1101 1_000";
        let texts: Vec<String> = Lexer::new(input)
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.into_owned())
            .collect();
        assert_eq!(
            texts,
            [
                "-.5", "1.", "123", "-456", "3.14", "1e5", "2.5e-3", "0.123", "0_1", "0", "+7", "0xFF",
                "0x123.4p5", "0x1p1", "0x123.4", "0o777", "0b1101", "1_000",
            ]
        );
    }

    #[test]
    fn test_strings_keep_quotes_and_escapes() {
        assert_eq!(
            lex_all(r#"s="a\nb\tc\"d",t='it''s'"#),
            vec![
                tok(TokenKind::Identifier, 0, 1, "s"),
                tok(TokenKind::Assign, 1, 2, "="),
                tok(TokenKind::String, 2, 3, r#""a\nb\tc\"d""#),
                tok(TokenKind::FieldSeparator, 14, 15, ","),
                tok(TokenKind::Identifier, 15, 16, "t"),
                tok(TokenKind::Assign, 16, 17, "="),
                tok(TokenKind::String, 17, 18, "'it'"),
                tok(TokenKind::String, 21, 22, "'s'"),
                tok(TokenKind::EndOfInput, 24, 25, ""),
            ]
        );
    }

    #[test]
    fn test_other_quote_inside_string() {
        let tokens = lex_all(r#"'say "hi"'"#);
        assert_eq!(tokens[0], tok(TokenKind::String, 0, 1, r#"'say "hi"'"#));
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(
            lex_all("  a  =  123  ,  b  =  true  "),
            vec![
                tok(TokenKind::Identifier, 2, 3, "a"),
                tok(TokenKind::Assign, 5, 6, "="),
                tok(TokenKind::Number, 8, 9, "123"),
                tok(TokenKind::FieldSeparator, 13, 14, ","),
                tok(TokenKind::Identifier, 16, 17, "b"),
                tok(TokenKind::Assign, 19, 20, "="),
                tok(TokenKind::True, 22, 23, "true"),
                tok(TokenKind::EndOfInput, 28, 29, ""),
            ]
        );
    }

    #[test]
    fn test_columns_count_characters() {
        assert_eq!(
            lex_all("ключ=1"),
            vec![
                tok(TokenKind::Identifier, 0, 1, "ключ"),
                tok(TokenKind::Assign, 8, 5, "="),
                tok(TokenKind::Number, 9, 6, "1"),
                tok(TokenKind::EndOfInput, 10, 7, ""),
            ]
        );
    }

    #[test]
    fn test_errors() {
        let cases = [
            ("a=@", "unexpected character: U+0040 '@'"),
            ("s=\"hello", "unterminated string"),
            ("s=\"hello\\", "unterminated escape sequence"),
            ("e=1e", "expected digit after exponent"),
            ("h=0xGHI", "expected hex digit"),
            ("h=0x1p+G", "expected digit after hex exponent"),
            ("o=0o8", "expected octal digit"),
            ("b=0b2", "expected binary digit"),
            ("n=-x", "expected digit after sign"),
            ("n=-", "expected digit after sign"),
            ("n=-.", "expected digit after decimal point"),
            ("n=+.e1", "expected digit after decimal point"),
        ];

        for (input, message) in cases {
            let tokens = lex_all(input);
            assert_eq!(tokens.len(), 3, "input {input:?}");
            assert_eq!(
                tokens[2],
                tok(TokenKind::Error, 2, 3, message),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_control_character_has_no_glyph() {
        let tokens = lex_all("\u{7}");
        assert_eq!(tokens, vec![tok(TokenKind::Error, 0, 1, "unexpected character: U+0007")]);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("font-size_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier(" name"));
        assert!(!is_identifier("invalid field"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("true"));
        assert!(!is_identifier("a=b"));

        assert!(is_bare_word("0x1F"));
        assert!(is_bare_word("ключ"));
        assert!(!is_bare_word("123abc"));
        assert!(!is_bare_word("'q'"));
        assert!(!is_bare_word("-"));
    }

    #[test]
    fn test_halts_after_error() {
        let mut lexer = Lexer::new("@abc");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Error));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_halts_after_end_of_input() {
        let mut lexer = Lexer::new("a");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Identifier));
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::EndOfInput));
        assert!(lexer.next().is_none());
    }
}
