//! Serialization of Rust data structures.
//!
//! Values are first captured as an intermediate tree and then written through
//! a [`Builder`], so quoting and spacing follow [`BuilderOptions`] exactly as
//! they do for hand-built documents.
//!
//! ## Mapping
//!
//! - **Structs and maps** become labeled fields. `bool` fields are written as
//!   `^name` or `!name`, sequences as lists (`name=a;b`), and structs or maps
//!   as pairs (`name=k:v;k2:v2`).
//! - **Sequences and tuples** become ordered values.
//! - **A lone scalar** becomes a single ordered value.
//! - `None` and `()` are written as `nil`.
//!
//! Anything nested deeper than one level below a field, non-finite floats and
//! non-scalar map keys fail with [`Error::UnsupportedType`].
//!
//! ```rust
//! use plainfields::to_string;
//! use serde::Serialize;
//! use std::collections::BTreeMap;
//!
//! #[derive(Serialize)]
//! struct Job {
//!     name: String,
//!     retry: bool,
//!     tags: Vec<&'static str>,
//!     limits: BTreeMap<&'static str, u32>,
//! }
//!
//! let job = Job {
//!     name: "nightly build".to_string(),
//!     retry: false,
//!     tags: vec!["ci", "slow"],
//!     limits: BTreeMap::from([("cpu", 2), ("mem", 512)]),
//! };
//! assert_eq!(
//!     to_string(&job).unwrap(),
//!     r#"name="nightly build",!retry,tags=ci;slow,limits=cpu:2;mem:512"#
//! );
//! ```

use crate::{Builder, BuilderOptions, Error, Literal, Result};
use serde::{ser, Serialize};

const TOO_DEEP: &str = "nesting deeper than one level below a field";

/// Serializes `value` into a fresh [`Builder`].
///
/// The builder can be extended with more labeled fields before it is built.
pub fn to_builder<T>(value: &T, options: BuilderOptions) -> Result<Builder>
where
    T: ?Sized + Serialize,
{
    let mut builder = Builder::with_options(options);
    match value.serialize(ContentSerializer)? {
        Content::Map(entries) => {
            for (key, value) in entries {
                write_field(&mut builder, &field_name(key)?, value)?;
            }
        }
        Content::List(items) => {
            for item in items {
                builder.ordered(scalar(item)?)?;
            }
        }
        other => {
            builder.ordered(scalar(other)?)?;
        }
    }
    Ok(builder)
}

fn write_field(builder: &mut Builder, name: &str, value: Content) -> Result<()> {
    match value {
        Content::Bool(enabled) => builder.boolean(name, enabled)?,
        Content::List(items) => {
            let items = items.into_iter().map(scalar).collect::<Result<Vec<_>>>()?;
            builder.list(name, items)?
        }
        Content::Map(entries) => {
            let pairs = entries
                .into_iter()
                .map(|(key, value)| Ok((scalar(key)?, scalar(value)?)))
                .collect::<Result<Vec<_>>>()?;
            builder.pairs(name, pairs)?
        }
        other => builder.labeled(name, scalar(other)?)?,
    };
    Ok(())
}

fn scalar(content: Content) -> Result<Literal> {
    match content {
        Content::Nil => Ok(Literal::Nil),
        Content::Bool(value) => Ok(Literal::from(value)),
        Content::Scalar(literal) => Ok(literal),
        Content::List(_) | Content::Map(_) => Err(Error::unsupported_type(TOO_DEEP)),
    }
}

fn field_name(key: Content) -> Result<String> {
    match key {
        Content::Scalar(Literal::Text(text) | Literal::Verbatim(text)) => Ok(text),
        Content::Scalar(Literal::Nil) | Content::Nil => Ok("nil".to_string()),
        Content::Bool(value) => Ok(value.to_string()),
        Content::List(_) | Content::Map(_) => Err(Error::unsupported_type("non-scalar map key")),
    }
}

/// Intermediate form of a serialized value.
#[derive(Debug, Clone, PartialEq)]
enum Content {
    Nil,
    Bool(bool),
    Scalar(Literal),
    List(Vec<Content>),
    Map(Vec<(Content, Content)>),
}

impl Content {
    /// Wraps enum payloads as a single-entry map keyed by the variant name.
    fn variant(variant: &'static str, payload: Content) -> Content {
        Content::Map(vec![(Content::Scalar(Literal::from(variant)), payload)])
    }
}

struct ContentSerializer;

fn to_content<T>(value: &T) -> Result<Content>
where
    T: ?Sized + Serialize,
{
    value.serialize(ContentSerializer)
}

impl ser::Serializer for ContentSerializer {
    type Ok = Content;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Content> {
        Ok(Content::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_u8(self, v: u8) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_f32(self, v: f32) -> Result<Content> {
        Ok(Content::Scalar(Literal::try_from(v)?))
    }

    fn serialize_f64(self, v: f64) -> Result<Content> {
        Ok(Content::Scalar(Literal::try_from(v)?))
    }

    fn serialize_char(self, v: char) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_str(self, v: &str) -> Result<Content> {
        Ok(Content::Scalar(v.into()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Content> {
        Ok(Content::List(
            v.iter().map(|&b| Content::Scalar(b.into())).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Content> {
        Ok(Content::Nil)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Content> {
        Ok(Content::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Content> {
        Ok(Content::Nil)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Content> {
        Ok(Content::Scalar(variant.into()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        Ok(Content::variant(variant, to_content(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None, len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant), len))
    }
}

struct SerializeVec {
    variant: Option<&'static str>,
    items: Vec<Content>,
}

impl SerializeVec {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        SerializeVec {
            variant,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_content(value)?);
        Ok(())
    }

    fn finish(self) -> Content {
        let list = Content::List(self.items);
        match self.variant {
            Some(variant) => Content::variant(variant, list),
            None => list,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Content;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Content;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

struct SerializeMap {
    variant: Option<&'static str>,
    entries: Vec<(Content, Content)>,
    current_key: Option<Content>,
}

impl SerializeMap {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        SerializeMap {
            variant,
            entries: Vec::with_capacity(len),
            current_key: None,
        }
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entries
            .push((Content::Scalar(key.into()), to_content(value)?));
        Ok(())
    }

    fn finish(self) -> Content {
        let map = Content::Map(self.entries);
        match self.variant {
            Some(variant) => Content::variant(variant, map),
            None => map,
        }
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Content;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_content(key)? {
            Content::List(_) | Content::Map(_) => Err(Error::unsupported_type("non-scalar map key")),
            key => {
                self.current_key = Some(key);
                Ok(())
            }
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries.push((key, to_content(value)?));
        Ok(())
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Content> {
        Ok(self.finish())
    }
}
