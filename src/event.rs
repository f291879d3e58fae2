//! Parser events.

use crate::{Error, Position, Result, Value};
use std::fmt;

/// A structural event emitted by the [`Parser`](crate::Parser).
///
/// Bracket events are balanced and properly nested unless the stream ends
/// with [`ParserEvent::Error`], which is always the last event.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserEvent<'a> {
    ListStart,
    ListEnd,
    MapStart,
    MapEnd,
    MapKey(Value<'a>),
    FieldValue(Value<'a>),
    Error { position: Position, message: String },
}

impl<'a> ParserEvent<'a> {
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, ParserEvent::Error { .. })
    }

    /// The value carried by a `MapKey` or `FieldValue` event.
    #[must_use]
    pub fn value(&self) -> Option<&Value<'a>> {
        match self {
            ParserEvent::MapKey(value) | ParserEvent::FieldValue(value) => Some(value),
            _ => None,
        }
    }

    /// Converts an `Error` event into [`Error::Syntax`].
    #[must_use]
    pub fn into_error(self) -> Option<Error> {
        match self {
            ParserEvent::Error { position, message } => Some(Error::Syntax { position, message }),
            _ => None,
        }
    }

    /// Turns the terminal `Error` event into `Err` so event loops can use `?`.
    ///
    /// ```rust
    /// use plainfields::{parse, ParserEvent};
    ///
    /// fn count_keys(input: &str) -> plainfields::Result<usize> {
    ///     let mut keys = 0;
    ///     for event in parse(input) {
    ///         if let ParserEvent::MapKey(_) = event.into_result()? {
    ///             keys += 1;
    ///         }
    ///     }
    ///     Ok(keys)
    /// }
    ///
    /// assert_eq!(count_keys("a=1,b=x:1;y:2").unwrap(), 4);
    /// assert!(count_keys("a=1;").is_err());
    /// ```
    pub fn into_result(self) -> Result<Self> {
        match self {
            ParserEvent::Error { position, message } => Err(Error::Syntax { position, message }),
            event => Ok(event),
        }
    }

    /// Detaches the event from the input it was parsed from.
    #[must_use]
    pub fn into_owned(self) -> ParserEvent<'static> {
        match self {
            ParserEvent::ListStart => ParserEvent::ListStart,
            ParserEvent::ListEnd => ParserEvent::ListEnd,
            ParserEvent::MapStart => ParserEvent::MapStart,
            ParserEvent::MapEnd => ParserEvent::MapEnd,
            ParserEvent::MapKey(value) => ParserEvent::MapKey(value.into_owned()),
            ParserEvent::FieldValue(value) => ParserEvent::FieldValue(value.into_owned()),
            ParserEvent::Error { position, message } => ParserEvent::Error { position, message },
        }
    }
}

impl fmt::Display for ParserEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserEvent::ListStart => f.write_str("ListStart"),
            ParserEvent::ListEnd => f.write_str("ListEnd"),
            ParserEvent::MapStart => f.write_str("MapStart"),
            ParserEvent::MapEnd => f.write_str("MapEnd"),
            ParserEvent::MapKey(value) => write!(f, "MapKey({value})"),
            ParserEvent::FieldValue(value) => write!(f, "FieldValue({value})"),
            ParserEvent::Error { position, message } => write!(f, "Error at {position}: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let event = ParserEvent::Error {
            position: Position::new(0, 1),
            message: "test error".to_string(),
        };
        assert!(event.is_error());
        assert_eq!(event.to_string(), "Error at Col 1 (Offset 0): test error");

        let err = event.into_error().unwrap();
        assert_eq!(err.to_string(), "Error at Col 1 (Offset 0): test error");

        assert!(ParserEvent::ListStart.into_error().is_none());
        assert_eq!(ParserEvent::MapEnd.into_result().unwrap(), ParserEvent::MapEnd);
    }

    #[test]
    fn test_display_and_value() {
        let event = ParserEvent::MapKey(Value::Identifier("key".into()));
        assert_eq!(event.to_string(), "MapKey(key (identifier))");
        assert_eq!(event.value().map(Value::raw), Some("key"));
        assert_eq!(ParserEvent::ListEnd.value(), None);
    }
}
