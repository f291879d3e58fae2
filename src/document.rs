//! Document tree assembled from parser events.
//!
//! [`Document`] collects the ordered values and labeled fields of a parsed
//! input into owned containers, for callers that want random access instead
//! of the event stream.
//!
//! ```rust
//! use plainfields::{Document, Node};
//!
//! let doc = Document::parse("john, age=30, tags=dev;prod, db=host:local;port:5432").unwrap();
//!
//! assert_eq!(doc.ordered().len(), 1);
//! assert_eq!(doc.get("age").and_then(Node::as_value).unwrap().to_int().unwrap(), 30);
//! assert_eq!(doc.get("tags").and_then(Node::as_list).map(<[Node]>::len), Some(2));
//!
//! let db = doc.get("db").and_then(Node::as_map).unwrap();
//! assert_eq!(db.get("port").and_then(Node::as_value).unwrap().to_uint().unwrap(), 5432);
//! ```

use crate::{Error, FieldMap, Lexer, ParseOptions, Parser, ParserEvent, Result, Value};
use std::borrow::Cow;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Value(Value<'a>),
    List(Vec<Node<'a>>),
    Map(FieldMap<'a>),
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value<'a>> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Node<'a>]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&FieldMap<'a>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_owned(self) -> Node<'static> {
        match self {
            Node::Value(value) => Node::Value(value.into_owned()),
            Node::List(items) => Node::List(items.into_iter().map(Node::into_owned).collect()),
            Node::Map(map) => Node::Map(map.into_owned()),
        }
    }
}

impl<'a> From<Value<'a>> for Node<'a> {
    fn from(value: Value<'a>) -> Self {
        Node::Value(value)
    }
}

/// The ordered values and labeled fields of one input.
///
/// Field names are normalized to text: quoted keys are de-escaped, every
/// other key uses its raw text. A repeated name keeps its first position and
/// its last value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document<'a> {
    ordered: Vec<Node<'a>>,
    labeled: FieldMap<'a>,
}

impl<'a> Document<'a> {
    /// Parses `input` with the default options.
    pub fn parse(input: &'a str) -> Result<Self> {
        Self::parse_with_options(input, ParseOptions::default())
    }

    pub fn parse_with_options(input: &'a str, options: ParseOptions) -> Result<Self> {
        Self::from_events(Parser::new(Lexer::new(input), options))
    }

    /// Assembles a document from an event stream.
    ///
    /// The first [`ParserEvent::Error`] is returned as [`Error::Syntax`].
    /// Streams that are unbalanced or end early fail with [`Error::Custom`].
    pub fn from_events<I>(events: I) -> Result<Self>
    where
        I: IntoIterator<Item = ParserEvent<'a>>,
    {
        let mut events = events.into_iter();
        let mut document = Document::default();
        while let Some(event) = events.next() {
            match event {
                ParserEvent::ListStart => document.ordered.extend(read_list(&mut events)?),
                ParserEvent::MapStart => read_map(&mut events, &mut document.labeled)?,
                other => return Err(unexpected(other)),
            }
        }
        Ok(document)
    }

    /// Looks up a labeled field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node<'a>> {
        self.labeled.get(name)
    }

    #[must_use]
    pub fn ordered(&self) -> &[Node<'a>] {
        &self.ordered
    }

    #[must_use]
    pub fn labeled(&self) -> &FieldMap<'a> {
        &self.labeled
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty() && self.labeled.is_empty()
    }

    /// Splits the document into its ordered values and labeled fields.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Node<'a>>, FieldMap<'a>) {
        (self.ordered, self.labeled)
    }

    #[must_use]
    pub fn into_owned(self) -> Document<'static> {
        Document {
            ordered: self.ordered.into_iter().map(Node::into_owned).collect(),
            labeled: self.labeled.into_owned(),
        }
    }
}

fn read_node<'a, I>(events: &mut I, event: ParserEvent<'a>) -> Result<Node<'a>>
where
    I: Iterator<Item = ParserEvent<'a>>,
{
    match event {
        ParserEvent::FieldValue(value) => Ok(Node::Value(value)),
        ParserEvent::ListStart => read_list(events).map(Node::List),
        ParserEvent::MapStart => {
            let mut map = FieldMap::new();
            read_map(events, &mut map)?;
            Ok(Node::Map(map))
        }
        other => Err(unexpected(other)),
    }
}

fn read_list<'a, I>(events: &mut I) -> Result<Vec<Node<'a>>>
where
    I: Iterator<Item = ParserEvent<'a>>,
{
    let mut items = Vec::new();
    loop {
        match events.next().ok_or_else(truncated)? {
            ParserEvent::ListEnd => return Ok(items),
            event => items.push(read_node(events, event)?),
        }
    }
}

fn read_map<'a, I>(events: &mut I, map: &mut FieldMap<'a>) -> Result<()>
where
    I: Iterator<Item = ParserEvent<'a>>,
{
    loop {
        match events.next().ok_or_else(truncated)? {
            ParserEvent::MapEnd => return Ok(()),
            ParserEvent::MapKey(key) => {
                let event = events.next().ok_or_else(truncated)?;
                let node = read_node(events, event)?;
                map.insert(key_text(key)?, node);
            }
            other => return Err(unexpected(other)),
        }
    }
}

fn key_text(key: Value<'_>) -> Result<Cow<'_, str>> {
    match key {
        Value::Boolean(raw) => Ok(raw),
        Value::Zero => Ok(Cow::Borrowed("zero")),
        Value::Nil => Ok(Cow::Borrowed("nil")),
        key => key.into_text(),
    }
}

fn unexpected(event: ParserEvent<'_>) -> Error {
    match event.into_result() {
        Ok(event) => Error::custom(format!("unexpected {event} event")),
        Err(err) => err,
    }
}

fn truncated() -> Error {
    Error::custom("event stream ended inside a list or map")
}
