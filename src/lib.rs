//! # plainfields
//!
//! A lexer, streaming parser and Serde bridge for plainfields, a compact
//! configuration format written as one line of comma-separated fields.
//!
//! ## What does it look like?
//!
//! ```text
//! john, 30, ^admin, !guest, role="site admin", tags=dev;prod, limits=cpu:2;mem:0x200
//! ```
//!
//! Fields are positional values, boolean toggles (`^name` / `!name`) or
//! `name=value` assignments whose value is a scalar, a `;`-separated list or
//! a list of `key:value` pairs. See [`syntax`] for the full format.
//!
//! ## Key Features
//!
//! - **Streaming**: [`lex`] and [`parse`] are lazy iterators that pull one
//!   token at a time and stop at the first error
//! - **Zero-copy**: tokens and values borrow from the input
//! - **Lazy typing**: [`Value`] keeps its raw text and converts on demand, with
//!   hex, octal, binary, `_` separators and hex floats
//! - **Serde compatible**: [`from_str`] and [`to_string`] work with
//!   `#[derive(Serialize, Deserialize)]` types
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! plainfields = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use plainfields::{from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     name: String,
//!     age: u8,
//!     admin: bool,
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     name: "Alice".to_string(),
//!     age: 30,
//!     admin: true,
//!     tags: vec!["dev".to_string(), "ops".to_string()],
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "name=Alice,age=30,^admin,tags=dev;ops");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//!
//! // Positional values bind to fields in declaration order.
//! let bob: User = from_str("Bob, 0x2A, !admin, tags=qa").unwrap();
//! assert_eq!(bob.age, 42);
//! ```
//!
//! ### Events
//!
//! ```rust
//! use plainfields::{parse, ParserEvent};
//!
//! let events: Vec<ParserEvent> = parse("tags=red;blue").collect();
//! assert_eq!(events.len(), 7);
//! assert_eq!(events[0], ParserEvent::MapStart);
//! assert_eq!(events[2], ParserEvent::ListStart);
//!
//! let last = parse("name=john,123").last().unwrap();
//! assert_eq!(
//!     last.to_string(),
//!     "Error at Col 11 (Offset 10): ordered value not allowed here"
//! );
//! ```
//!
//! ### Documents
//!
//! ```rust
//! use plainfields::{Document, Node};
//!
//! let doc = Document::parse("db=host:local;port:5432").unwrap();
//! let db = doc.get("db").and_then(Node::as_map).unwrap();
//! assert_eq!(db.get("port").and_then(Node::as_value).unwrap().to_uint().unwrap(), 5432);
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: parser state transitions at
//! `trace`, lexer and parser failures at `debug`. Nothing is printed unless
//! the application installs a logger.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Proper error propagation with `Result` types
//! - No panics in the public API

pub mod builder;
pub mod de;
pub mod document;
pub mod error;
pub mod event;
pub mod lexer;
pub mod map;
pub mod options;
pub mod parser;
pub mod position;
pub mod ser;
pub mod syntax;
pub mod token;
pub mod value;

pub use builder::{needs_quoting, Builder, Literal};
pub use de::Deserializer;
pub use document::{Document, Node};
pub use error::{Error, Result};
pub use event::ParserEvent;
pub use lexer::Lexer;
pub use map::FieldMap;
pub use options::{BuilderOptions, ParseOptions};
pub use parser::Parser;
pub use position::Position;
pub use ser::to_builder;
pub use token::{Token, TokenKind};
pub use value::{Conversion, Value, ValueKind};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io;

/// Returns a lazy token stream over `input`.
///
/// The stream ends with exactly one [`TokenKind::EndOfInput`] or
/// [`TokenKind::Error`] token.
///
/// # Examples
///
/// ```rust
/// use plainfields::{lex, TokenKind};
///
/// let kinds: Vec<TokenKind> = lex("^on, n=0x1F").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::BooleanPrefix,
///         TokenKind::Identifier,
///         TokenKind::FieldSeparator,
///         TokenKind::Identifier,
///         TokenKind::Assign,
///         TokenKind::Number,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
#[must_use]
pub fn lex(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

/// Returns a lazy event stream over `input` with the default options.
///
/// # Examples
///
/// ```rust
/// use plainfields::{parse, ParserEvent, Value};
///
/// let mut events = parse("^debug");
/// assert_eq!(events.next(), Some(ParserEvent::MapStart));
/// assert_eq!(events.next(), Some(ParserEvent::MapKey(Value::Identifier("debug".into()))));
/// assert_eq!(events.next(), Some(ParserEvent::FieldValue(Value::boolean(true))));
/// assert_eq!(events.next(), Some(ParserEvent::MapEnd));
/// assert_eq!(events.next(), None);
/// ```
#[must_use]
pub fn parse(input: &str) -> Parser<'_, Lexer<'_>> {
    parse_with_options(input, ParseOptions::default())
}

/// Returns a lazy event stream over `input`.
#[must_use]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Parser<'_, Lexer<'_>> {
    Parser::new(Lexer::new(input), options)
}

/// Parses an existing token stream.
///
/// The tokens should end with [`TokenKind::EndOfInput`]; a stream that stops
/// early ends with an `unexpected end of input` error event.
#[must_use]
pub fn parse_tokens<'a, I>(tokens: I, options: ParseOptions) -> Parser<'a, I::IntoIter>
where
    I: IntoIterator<Item = Token<'a>>,
{
    Parser::new(tokens.into_iter(), options)
}

/// Serialize any `T: Serialize` to a plainfields string.
///
/// # Examples
///
/// ```rust
/// use plainfields::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: -2 }).unwrap(), "x=1,y=-2");
/// ```
///
/// # Errors
///
/// Returns an error if the value has a shape the format cannot express, such
/// as lists nested inside lists.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, BuilderOptions::default())
}

/// Serialize any `T: Serialize` to a plainfields string with custom options.
///
/// # Examples
///
/// ```rust
/// use plainfields::{to_string_with_options, BuilderOptions};
///
/// let text = to_string_with_options(&vec!["a", "b c"], BuilderOptions::spaced()).unwrap();
/// assert_eq!(text, r#"a, "b c""#);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: BuilderOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_builder(value, options).map(|builder| builder.build())
}

/// Serialize any `T: Serialize` to a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Deserialize an instance of type `T` from a plainfields string.
///
/// # Examples
///
/// ```rust
/// use plainfields::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("1, y=2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input does not parse, or a conversion
/// error if a value does not fit the target type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_str_with_options(s, ParseOptions::default())
}

/// Deserialize an instance of type `T` with custom parse options.
///
/// # Errors
///
/// Returns an error if the input does not parse under `options` or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(s: &'a str, options: ParseOptions) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_str_with_options(s, options)?)
}

/// Deserialize an instance of type `T` from bytes of plainfields text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, do not parse, or cannot
/// be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(Error::custom)?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails, the input does not parse, or the data
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&text)
}
