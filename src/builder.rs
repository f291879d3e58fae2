//! Text builder.
//!
//! [`Builder`] assembles a document field by field. Scalars are passed as
//! anything convertible into a [`Literal`]. Text is quoted when
//! [`needs_quoting`] says so, or when its bare form would not scan back as a
//! single identifier or number.
//!
//! ```rust
//! use plainfields::{Builder, Literal};
//!
//! let mut builder = Builder::new();
//! builder
//!     .enable("enabled").unwrap()
//!     .disable("debug").unwrap()
//!     .labeled("name", "john").unwrap()
//!     .list("tags", ["dev", "prod"]).unwrap()
//!     .pairs("settings", [("theme", Literal::from("dark")), ("fontSize", Literal::from(14))]).unwrap();
//!
//! assert_eq!(
//!     builder.build(),
//!     "^enabled,!debug,name=john,tags=dev;prod,settings=theme:dark;fontSize:14"
//! );
//! ```

use crate::lexer::{is_bare_word, is_identifier};
use crate::{BuilderOptions, Error, Result};
use std::fmt::{self, Write};

/// Returns `true` if `text` must be quoted to be read back as the same text.
///
/// Empty text, text containing a space or any of `,;:=\`, and the keywords
/// `true`, `false` and `nil` need quotes.
#[must_use]
pub fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text.contains([' ', ',', ';', ':', '=', '\\'])
        || matches!(text, "true" | "false" | "nil")
}

/// Writes `text` as a double-quoted string literal.
fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// A scalar ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Text, quoted when needed.
    Text(String),
    /// Written verbatim: numbers and booleans.
    Verbatim(String),
    Nil,
}

impl Literal {
    #[must_use]
    pub const fn nil() -> Self {
        Literal::Nil
    }

    pub(crate) fn write(&self, out: &mut String, options: &BuilderOptions) {
        match self {
            Literal::Text(text)
                if options.always_quote_strings || needs_quoting(text) || !is_bare_word(text) =>
            {
                write_quoted(out, text);
            }
            Literal::Text(text) | Literal::Verbatim(text) => out.push_str(text),
            Literal::Nil => out.push_str("nil"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write(&mut out, &BuilderOptions::default());
        f.write_str(&out)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl From<&String> for Literal {
    fn from(value: &String) -> Self {
        Literal::Text(value.clone())
    }
}

impl From<char> for Literal {
    fn from(value: char) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Verbatim(value.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::Verbatim(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// NaN and the infinities have no literal form; they would read back as
/// identifiers.
macro_rules! impl_try_from_float {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Literal {
                type Error = Error;

                fn try_from(value: $ty) -> Result<Self> {
                    if value.is_finite() {
                        Ok(Literal::Verbatim(value.to_string()))
                    } else {
                        Err(Error::unsupported_type("non-finite float"))
                    }
                }
            }
        )*
    };
}

impl_try_from_float!(f32, f64);

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Nil, Into::into)
    }
}

/// Accumulates fields and joins them with `,`.
///
/// Ordered values must come before any labeled field. Field names must scan
/// as a single identifier.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    options: BuilderOptions,
    fields: Vec<String>,
    has_labeled: bool,
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: BuilderOptions) -> Self {
        Builder {
            options,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Adds a positional value.
    pub fn ordered(&mut self, value: impl Into<Literal>) -> Result<&mut Self> {
        if self.has_labeled {
            return Err(Error::OrderedAfterLabeled);
        }
        let mut field = String::new();
        value.into().write(&mut field, &self.options);
        self.fields.push(field);
        Ok(self)
    }

    /// Adds `^name`.
    pub fn enable(&mut self, name: &str) -> Result<&mut Self> {
        self.boolean(name, true)
    }

    /// Adds `!name`.
    pub fn disable(&mut self, name: &str) -> Result<&mut Self> {
        self.boolean(name, false)
    }

    pub fn boolean(&mut self, name: &str, value: bool) -> Result<&mut Self> {
        let prefix = if value { '^' } else { '!' };
        let field = format!("{prefix}{}", Self::checked_name(name)?);
        self.push_labeled(field);
        Ok(self)
    }

    /// Adds `name=value`.
    pub fn labeled(&mut self, name: &str, value: impl Into<Literal>) -> Result<&mut Self> {
        let mut field = self.assignment(name)?;
        value.into().write(&mut field, &self.options);
        self.push_labeled(field);
        Ok(self)
    }

    /// Adds `name=a;b;c`. An empty list writes `name=`.
    pub fn list<I>(&mut self, name: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        let mut field = self.assignment(name)?;
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                field.push_str(self.options.list_separator());
            }
            value.into().write(&mut field, &self.options);
        }
        self.push_labeled(field);
        Ok(self)
    }

    /// Adds `name=k1:v1;k2:v2`. No pairs writes `name=`.
    pub fn pairs<I, K, V>(&mut self, name: &str, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Literal>,
        V: Into<Literal>,
    {
        let mut field = self.assignment(name)?;
        for (i, (key, value)) in pairs.into_iter().enumerate() {
            if i > 0 {
                field.push_str(self.options.list_separator());
            }
            key.into().write(&mut field, &self.options);
            field.push_str(self.options.pair_separator());
            value.into().write(&mut field, &self.options);
        }
        self.push_labeled(field);
        Ok(self)
    }

    /// Returns the document built so far.
    #[must_use]
    pub fn build(&self) -> String {
        self.fields.join(self.options.field_separator())
    }

    fn checked_name(name: &str) -> Result<&str> {
        if is_identifier(name) {
            Ok(name)
        } else {
            Err(Error::InvalidFieldName(name.to_string()))
        }
    }

    fn assignment(&self, name: &str) -> Result<String> {
        let name = Self::checked_name(name)?;
        Ok(format!("{name}{}", self.options.assignment()))
    }

    fn push_labeled(&mut self, field: String) {
        self.has_labeled = true;
        self.fields.push(field);
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_quoting() {
        let cases = [
            ("abc", false),
            ("", true),
            ("hello world", true),
            ("a,b", true),
            ("a;b", true),
            ("a:b", true),
            ("a=b", true),
            ("a\\b", true),
            ("true", true),
            ("false", true),
            ("nil", true),
            ("abc123", false),
            ("abc-123", false),
            ("123abc", false),
        ];

        for (text, expected) in cases {
            assert_eq!(needs_quoting(text), expected, "needs_quoting({text:?})");
        }
    }

    #[test]
    fn test_basic_fields() {
        let mut builder = Builder::new();
        builder
            .enable("feature")
            .unwrap()
            .labeled("name", "john")
            .unwrap()
            .labeled("age", 30)
            .unwrap();
        assert_eq!(builder.build(), "^feature,name=john,age=30");
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_boolean() {
        let mut builder = Builder::new();
        builder.boolean("feature1", true).unwrap();
        builder.boolean("feature2", false).unwrap();
        assert_eq!(builder.to_string(), "^feature1,!feature2");
    }

    #[test]
    fn test_string_escaping() {
        let mut builder = Builder::new();
        builder.labeled("simple", "abc").unwrap();
        builder.labeled("spaces", "hello world").unwrap();
        builder.labeled("special", "a:b;c,d").unwrap();
        builder.labeled("empty", "").unwrap();
        builder.labeled("keyword", "true").unwrap();
        builder.labeled("escaped", "a\\b \"c\"\n").unwrap();
        assert_eq!(
            builder.build(),
            r#"simple=abc,spaces="hello world",special="a:b;c,d",empty="",keyword="true",escaped="a\\b \"c\"\n""#
        );
    }

    #[test]
    fn test_empty_list_and_pairs() {
        let mut builder = Builder::new();
        builder.list("empty_list", Vec::<Literal>::new()).unwrap();
        builder.pairs("empty_pairs", Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(builder.build(), "empty_list=,empty_pairs=");
    }

    #[test]
    fn test_mixed_list() {
        let mut builder = Builder::new();
        builder
            .list(
                "mixed",
                [
                    Literal::from("string"),
                    Literal::from(123),
                    Literal::from(true),
                    Literal::nil(),
                    Literal::try_from(45.67).unwrap(),
                ],
            )
            .unwrap();
        assert_eq!(builder.build(), "mixed=string;123;true;nil;45.67");
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                Literal::try_from(value).unwrap_err().to_string(),
                "Unsupported type: non-finite float"
            );
        }
        assert!(Literal::try_from(f32::NAN).is_err());

        let mut builder = Builder::new();
        builder
            .labeled("ratio", Literal::try_from(0.5f32).unwrap())
            .unwrap()
            .labeled("scale", Literal::try_from(-2.5e-3).unwrap())
            .unwrap();
        assert_eq!(builder.build(), "ratio=0.5,scale=-0.0025");
    }

    #[test]
    fn test_ordered_values() {
        let mut builder = Builder::new();
        builder.ordered("a").unwrap().ordered("b").unwrap().ordered("c").unwrap();
        builder.labeled("d", 123).unwrap().labeled("flag", true).unwrap();
        assert_eq!(builder.build(), "a,b,c,d=123,flag=true");
    }

    #[test]
    fn test_always_quote_strings() {
        let mut builder = Builder::with_options(BuilderOptions::new().with_always_quote_strings(true));
        builder.labeled("name", "john").unwrap();
        builder.labeled("age", 30).unwrap();
        builder.labeled("city", "New York").unwrap();
        assert_eq!(builder.build(), r#"name="john",age=30,city="New York""#);
    }

    #[test]
    fn test_spacing_options() {
        let cases = [
            (
                BuilderOptions::new().with_space_after_field_separator(true),
                "^feature, name=john, tags=dev;prod, settings=theme:dark;fontSize:14",
            ),
            (
                BuilderOptions::new().with_space_after_list_separator(true),
                "^feature,name=john,tags=dev; prod,settings=theme:dark; fontSize:14",
            ),
            (
                BuilderOptions::new().with_space_after_pair_separator(true),
                "^feature,name=john,tags=dev;prod,settings=theme: dark;fontSize: 14",
            ),
            (
                BuilderOptions::new().with_space_around_assignment(true),
                "^feature,name = john,tags = dev;prod,settings = theme:dark;fontSize:14",
            ),
            (
                BuilderOptions::spaced(),
                "^feature, name = john, tags = dev; prod, settings = theme: dark; fontSize: 14",
            ),
        ];

        for (options, expected) in cases {
            let mut builder = Builder::with_options(options);
            builder.enable("feature").unwrap();
            builder.labeled("name", "john").unwrap();
            builder.list("tags", ["dev", "prod"]).unwrap();
            builder
                .pairs("settings", [("theme", Literal::from("dark")), ("fontSize", Literal::from(14))])
                .unwrap();
            assert_eq!(builder.build(), expected);
        }
    }

    #[test]
    fn test_ordered_after_labeled() {
        let mut builder = Builder::new();
        builder.labeled("name", "john").unwrap();
        assert_eq!(builder.ordered(123).unwrap_err(), Error::OrderedAfterLabeled);
        assert_eq!(builder.build(), "name=john");
    }

    #[test]
    fn test_invalid_field_name() {
        let mut builder = Builder::new();
        let err = builder.labeled("invalid field", "value").unwrap_err();
        assert_eq!(err.to_string(), "\"invalid field\": invalid field name");
        assert!(builder.enable("nil").is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_text_that_does_not_scan_bare_is_quoted() {
        let mut builder = Builder::new();
        builder.ordered("123abc").unwrap().ordered("'q'").unwrap().ordered("0x1F").unwrap();
        assert_eq!(builder.build(), r#""123abc","'q'",0x1F"#);
    }

    #[test]
    fn test_option_literal() {
        let mut builder = Builder::new();
        builder.ordered(Some(1)).unwrap().ordered(None::<i32>).unwrap();
        assert_eq!(builder.build(), "1,nil");
    }
}
