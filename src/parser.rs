//! Streaming grammar parser.
//!
//! [`Parser`] turns a token stream into [`ParserEvent`]s. It pulls tokens on
//! demand, keeps at most one token of lookahead, and does no work beyond what
//! is needed to produce the next event. The whole document is classified as
//! an ordered list, a labeled map, or both in that order:
//!
//! ```text
//! john, 42, age=30, tags=a;b, ^admin
//! └─ ordered ─┘ └──────── labeled ───────┘
//! ```
//!
//! Ordered values are wrapped in `ListStart`/`ListEnd`, labeled fields in
//! `MapStart`/`MapEnd`. Empty input produces no events at all.
//!
//! The first lexical or grammatical error ends the stream with a single
//! [`ParserEvent::Error`].

use crate::{ParseOptions, ParserEvent, Position, Token, TokenKind, Value};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Top-level classification of the document seen so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DocumentState {
    Start,
    Ordered,
    Labeled,
    AtEnd,
}

/// What the parser does on its next step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Read the next field.
    Field,
    /// The current token must end the field.
    Separator,
    /// The current token is a key followed by `=`.
    Assignment,
    /// The current token starts the right-hand side of a field.
    Content,
    /// Inside a `;` list, after a value.
    ListItem,
    /// The current token starts a `key:value` or `^key` entry.
    Entry,
    /// After a map key, expecting `:` and a value.
    EntryValue,
    /// Inside a map, after an entry.
    MapItem,
    /// Close the document.
    Close,
}

struct Halt {
    position: Position,
    message: String,
}

/// Pull-based parser over any token iterator.
pub struct Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    tokens: I,
    options: ParseOptions,
    current: Token<'a>,
    peeked: Option<Token<'a>>,
    state: DocumentState,
    step: Step,
    pending: VecDeque<ParserEvent<'a>>,
    finished: bool,
}

impl<'a, I> Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(tokens: I, options: ParseOptions) -> Self {
        Parser {
            tokens,
            options,
            current: Token::new(TokenKind::EndOfInput, Position::START, ""),
            peeked: None,
            state: DocumentState::Start,
            step: Step::Field,
            pending: VecDeque::with_capacity(4),
            finished: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    fn emit(&mut self, event: ParserEvent<'a>) {
        self.pending.push_back(event);
    }

    fn halt(&self, message: impl Into<String>) -> Halt {
        Halt {
            position: self.current.position,
            message: message.into(),
        }
    }

    fn expected(&self, kind: TokenKind) -> Halt {
        self.halt(format!("expected {kind}, got {}", self.current.kind))
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next();
        }
        self.peeked.as_ref().map(|token| token.kind)
    }

    /// Moves to the next token. Lexer errors and a stream that ends without
    /// `EndOfInput` both halt the parse.
    fn advance(&mut self) -> Result<TokenKind, Halt> {
        let next = match self.peeked.take() {
            Some(token) => Some(token),
            None => self.tokens.next(),
        };
        match next {
            Some(token) if token.kind == TokenKind::Error => Err(Halt {
                position: token.position,
                message: token.text.into_owned(),
            }),
            Some(token) => {
                self.current = token;
                Ok(self.current.kind)
            }
            None => Err(self.halt("unexpected end of input")),
        }
    }

    fn expect_value(&self) -> Result<Value<'a>, Halt> {
        Value::from_token(self.current.clone())
            .ok_or_else(|| self.halt(format!("expected value, got {}", self.current.kind)))
    }

    fn transition(&mut self, next: DocumentState) {
        use DocumentState::*;

        match (self.state, next) {
            (Start, Ordered) => self.emit(ParserEvent::ListStart),
            (Start, Labeled) => self.emit(ParserEvent::MapStart),
            (Ordered, Labeled) => {
                self.emit(ParserEvent::ListEnd);
                self.emit(ParserEvent::MapStart);
            }
            (Ordered, AtEnd) => self.emit(ParserEvent::ListEnd),
            (Labeled, AtEnd) => self.emit(ParserEvent::MapEnd),
            _ => {}
        }
        if self.state != next {
            log::trace!("document state {:?} -> {:?} at {}", self.state, next, self.current.position);
        }
        self.state = next;
    }

    fn step(&mut self) -> Result<(), Halt> {
        self.step = match self.step {
            Step::Field => self.field()?,
            Step::Separator => self.separator()?,
            Step::Assignment => self.assignment()?,
            Step::Content => self.content()?,
            Step::ListItem => self.list_item()?,
            Step::Entry => self.entry()?,
            Step::EntryValue => self.entry_value()?,
            Step::MapItem => self.map_item()?,
            Step::Close => {
                self.transition(DocumentState::AtEnd);
                self.finished = true;
                Step::Close
            }
        };
        Ok(())
    }

    fn field(&mut self) -> Result<Step, Halt> {
        match self.advance()? {
            TokenKind::EndOfInput => Ok(Step::Close),
            TokenKind::BooleanPrefix => {
                self.transition(DocumentState::Labeled);
                self.boolean_entry()?;
                Ok(Step::Separator)
            }
            TokenKind::Identifier if self.peek_kind() == Some(TokenKind::Assign) => {
                self.transition(DocumentState::Labeled);
                let key = self.expect_value()?;
                self.emit(ParserEvent::MapKey(key));
                Ok(Step::Assignment)
            }
            kind if kind.is_value() || kind == TokenKind::FieldSeparator => {
                if !self.options.allow_ordered || self.state > DocumentState::Ordered {
                    return Err(self.halt("ordered value not allowed here"));
                }
                self.transition(DocumentState::Ordered);
                if kind == TokenKind::FieldSeparator {
                    self.emit(ParserEvent::FieldValue(Value::Zero));
                    Ok(Step::Separator)
                } else {
                    Ok(Step::Content)
                }
            }
            kind => Err(self.halt(format!(
                "expected field prefix, identifier, or value, got {kind}"
            ))),
        }
    }

    fn separator(&mut self) -> Result<Step, Halt> {
        match self.current.kind {
            TokenKind::FieldSeparator => Ok(Step::Field),
            TokenKind::EndOfInput => Ok(Step::Close),
            _ => Err(self.expected(TokenKind::FieldSeparator)),
        }
    }

    fn assignment(&mut self) -> Result<Step, Halt> {
        self.advance()?;
        if matches!(
            self.peek_kind(),
            Some(TokenKind::FieldSeparator | TokenKind::EndOfInput)
        ) {
            self.advance()?;
            self.emit(ParserEvent::FieldValue(Value::Zero));
            return Ok(Step::Separator);
        }
        self.advance()?;
        Ok(Step::Content)
    }

    fn content(&mut self) -> Result<Step, Halt> {
        if self.current.kind == TokenKind::BooleanPrefix {
            self.emit(ParserEvent::MapStart);
            return Ok(Step::Entry);
        }

        let value = self.expect_value()?;
        match self.peek_kind() {
            Some(TokenKind::PairSeparator) => {
                self.emit(ParserEvent::MapStart);
                Ok(Step::Entry)
            }
            Some(TokenKind::ListSeparator) => {
                self.emit(ParserEvent::ListStart);
                self.emit(ParserEvent::FieldValue(value));
                self.advance()?;
                Ok(Step::ListItem)
            }
            _ => {
                self.emit(ParserEvent::FieldValue(value));
                self.advance()?;
                Ok(Step::Separator)
            }
        }
    }

    fn list_item(&mut self) -> Result<Step, Halt> {
        if self.current.kind != TokenKind::ListSeparator {
            self.emit(ParserEvent::ListEnd);
            return Ok(Step::Separator);
        }
        self.advance()?;
        let value = self.expect_value()?;
        self.emit(ParserEvent::FieldValue(value));
        self.advance()?;
        Ok(Step::ListItem)
    }

    fn entry(&mut self) -> Result<Step, Halt> {
        if self.current.kind == TokenKind::BooleanPrefix {
            self.boolean_entry()?;
            return Ok(Step::MapItem);
        }
        let key = self.expect_value()?;
        self.emit(ParserEvent::MapKey(key));
        Ok(Step::EntryValue)
    }

    fn entry_value(&mut self) -> Result<Step, Halt> {
        if self.advance()? != TokenKind::PairSeparator {
            return Err(self.expected(TokenKind::PairSeparator));
        }
        self.advance()?;
        let value = self.expect_value()?;
        self.emit(ParserEvent::FieldValue(value));
        self.advance()?;
        Ok(Step::MapItem)
    }

    fn map_item(&mut self) -> Result<Step, Halt> {
        if self.current.kind != TokenKind::ListSeparator {
            self.emit(ParserEvent::MapEnd);
            return Ok(Step::Separator);
        }
        self.advance()?;
        Ok(Step::Entry)
    }

    /// `^name` or `!name`, with the prefix as the current token.
    fn boolean_entry(&mut self) -> Result<(), Halt> {
        let enabled = self.current.text == "^";
        if self.advance()? != TokenKind::Identifier {
            return Err(self.expected(TokenKind::Identifier));
        }
        let key = self.expect_value()?;
        self.emit(ParserEvent::MapKey(key));
        self.emit(ParserEvent::FieldValue(Value::boolean(enabled)));
        self.advance()?;
        Ok(())
    }

    fn fail(&mut self, halt: Halt) {
        log::debug!("parse failed at {}: {}", halt.position, halt.message);
        self.finished = true;
        self.peeked = None;
        self.emit(ParserEvent::Error {
            position: halt.position,
            message: halt.message,
        });
    }
}

impl<'a, I> Iterator for Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = ParserEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            if let Err(halt) = self.step() {
                self.fail(halt);
            }
        }
    }
}

impl<'a, I> FusedIterator for Parser<'a, I> where I: Iterator<Item = Token<'a>> {}
