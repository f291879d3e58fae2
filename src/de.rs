//! Deserialization into Rust data structures.
//!
//! The [`Deserializer`] parses the whole input into a [`Document`] first and
//! then drives serde over the tree. Scalars are interpreted with the
//! [`Value`] conversions, so every number syntax the format accepts (hex,
//! octal, binary, `_` separators, hex floats) works for numeric fields.
//!
//! ## Binding rules
//!
//! - **Structs**: ordered values bind to the struct's fields in declaration
//!   order, then labeled fields bind by name.
//! - **Maps**: labeled fields only.
//! - **Sequences and tuples**: ordered values only.
//! - **Lone scalars**: a document holding exactly one ordered value.
//!
//! ```rust
//! use plainfields::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//!     secure: bool,
//! }
//!
//! let endpoint: Endpoint = from_str("localhost, port=0x1F90, ^secure").unwrap();
//! assert_eq!(
//!     endpoint,
//!     Endpoint { host: "localhost".to_string(), port: 8080, secure: true }
//! );
//! ```
//!
//! Field values may themselves be lists or maps:
//!
//! ```rust
//! use plainfields::from_str;
//! use serde::Deserialize;
//! use std::collections::BTreeMap;
//!
//! #[derive(Deserialize)]
//! struct Job {
//!     tags: Vec<String>,
//!     limits: BTreeMap<String, u32>,
//! }
//!
//! let job: Job = from_str("tags=build;test, limits=cpu:2;mem:512").unwrap();
//! assert_eq!(job.tags, ["build", "test"]);
//! assert_eq!(job.limits["mem"], 512);
//! ```

use crate::{Document, Error, FieldMap, Node, ParseOptions, Result, Value};
use serde::de::{self, Visitor};
use serde::forward_to_deserialize_any;
use std::borrow::Cow;

/// Deserializes a parsed document.
///
/// Created via [`Deserializer::from_str`] or [`Deserializer::from_document`].
pub struct Deserializer<'de> {
    ordered: Vec<Node<'de>>,
    labeled: FieldMap<'de>,
}

impl<'de> Deserializer<'de> {
    /// Parses `input` with the default options.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Result<Self> {
        Self::from_str_with_options(input, ParseOptions::default())
    }

    pub fn from_str_with_options(input: &'de str, options: ParseOptions) -> Result<Self> {
        Document::parse_with_options(input, options).map(Self::from_document)
    }

    #[must_use]
    pub fn from_document(document: Document<'de>) -> Self {
        let (ordered, labeled) = document.into_parts();
        Deserializer { ordered, labeled }
    }

    fn is_empty(&self) -> bool {
        self.ordered.is_empty() && self.labeled.is_empty()
    }

    /// An empty document or a lone `nil`.
    fn is_none(&self) -> bool {
        self.is_empty()
            || (self.labeled.is_empty()
                && matches!(self.ordered.as_slice(), [Node::Value(Value::Nil)]))
    }

    /// The single ordered value of the document, for scalar targets.
    fn into_single(mut self) -> Result<NodeDeserializer<'de>> {
        if self.is_empty() {
            return Ok(NodeDeserializer::new(Node::Value(Value::Zero)));
        }
        if !self.labeled.is_empty() || self.ordered.len() != 1 {
            return Err(Error::custom(format!(
                "expected a single ordered value, found {} ordered and {} labeled",
                self.ordered.len(),
                self.labeled.len()
            )));
        }
        match self.ordered.pop() {
            Some(node) => Ok(NodeDeserializer::new(node)),
            None => Err(Error::custom("expected a single ordered value")),
        }
    }
}

macro_rules! forward_to_single {
    ($($method:ident)*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            self.into_single()?.$method(visitor)
        }
    )*};
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match (self.ordered.is_empty(), self.labeled.is_empty()) {
            (true, true) => visitor.visit_unit(),
            (false, true) => visitor.visit_seq(SeqDeserializer::new(self.ordered)),
            (true, false) => visitor.visit_map(MapDeserializer::new(self.labeled.into_iter())),
            (false, false) => {
                let positional = self
                    .ordered
                    .into_iter()
                    .enumerate()
                    .map(|(index, node)| (Cow::Owned(index.to_string()), node));
                visitor.visit_map(MapDeserializer::new(positional.chain(self.labeled)))
            }
        }
    }

    forward_to_single! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_i128 deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_u128 deserialize_f32 deserialize_f64 deserialize_char deserialize_str
        deserialize_string deserialize_bytes deserialize_byte_buf deserialize_identifier
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.is_none() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.is_empty() {
            visitor.visit_unit()
        } else {
            self.into_single()?.deserialize_unit(visitor)
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if !self.labeled.is_empty() {
            return Err(Error::custom("expected ordered values only, found labeled fields"));
        }
        visitor.visit_seq(SeqDeserializer::new(self.ordered))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if !self.ordered.is_empty() {
            return Err(Error::custom("expected labeled fields only, found ordered values"));
        }
        visitor.visit_map(MapDeserializer::new(self.labeled.into_iter()))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.ordered.len() > fields.len() {
            return Err(Error::custom(format!(
                "{} ordered values for {name} with {} fields",
                self.ordered.len(),
                fields.len()
            )));
        }
        let positional = fields
            .iter()
            .map(|field| Cow::Borrowed(*field))
            .zip(self.ordered);
        visitor.visit_map(MapDeserializer::new(positional.chain(self.labeled)))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.ordered.is_empty() && self.labeled.len() == 1 {
            if let Some((variant, node)) = self.labeled.into_iter().next() {
                return visitor.visit_enum(EnumDeserializer::new(variant, Some(node)));
            }
            return Err(Error::custom("expected enum variant"));
        }
        self.into_single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Deserializes one node of the document tree.
struct NodeDeserializer<'de> {
    node: Node<'de>,
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident($ty:ty) via $convert:ident;)*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            let number = self.into_value()?.$convert()?;
            let number = <$ty>::try_from(number).map_err(|_| {
                Error::custom(format!("{number} is out of range for {}", stringify!($ty)))
            })?;
            visitor.$visit(number)
        }
    )*};
}

impl<'de> NodeDeserializer<'de> {
    fn new(node: Node<'de>) -> Self {
        NodeDeserializer { node }
    }

    fn into_value(self) -> Result<Value<'de>> {
        match self.node {
            Node::Value(value) => Ok(value),
            Node::List(_) => Err(Error::custom("expected a value, found a list")),
            Node::Map(_) => Err(Error::custom("expected a value, found a map")),
        }
    }

    fn is_empty_value(&self) -> bool {
        matches!(self.node, Node::Value(Value::Zero | Value::Nil))
    }
}

impl<'de> de::Deserializer<'de> for NodeDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(Value::Zero | Value::Nil) => visitor.visit_unit(),
            Node::Value(value @ Value::Boolean(_)) => visitor.visit_bool(value.to_bool()?),
            Node::Value(value @ Value::Number(_)) => {
                if let Ok(unsigned) = value.to_uint() {
                    visitor.visit_u64(unsigned)
                } else if let Ok(signed) = value.to_int() {
                    visitor.visit_i64(signed)
                } else {
                    visitor.visit_f64(value.to_float()?)
                }
            }
            Node::Value(value) => visit_text(value.into_text()?, visitor),
            Node::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Node::Map(map) => visitor.visit_map(MapDeserializer::new(map.into_iter())),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.into_value()?.to_bool()?)
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8(i8) via to_int;
        deserialize_i16 => visit_i16(i16) via to_int;
        deserialize_i32 => visit_i32(i32) via to_int;
        deserialize_i64 => visit_i64(i64) via to_int;
        deserialize_i128 => visit_i128(i128) via to_int;
        deserialize_u8 => visit_u8(u8) via to_uint;
        deserialize_u16 => visit_u16(u16) via to_uint;
        deserialize_u32 => visit_u32(u32) via to_uint;
        deserialize_u64 => visit_u64(u64) via to_uint;
        deserialize_u128 => visit_u128(u128) via to_uint;
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f32(self.into_value()?.to_float()? as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.into_value()?.to_float()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = self.into_value()?.into_text()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(Error::custom(format!("expected a single character, found {text:?}"))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visit_text(self.into_value()?.into_text()?, visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.is_empty_value() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.is_empty_value() {
            visitor.visit_unit()
        } else {
            Err(Error::custom("expected nil or an omitted value"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// A lone value is a one-item list and an omitted value is an empty one,
    /// matching how single-item and empty lists are written.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Node::Value(Value::Zero) => visitor.visit_seq(SeqDeserializer::new(Vec::new())),
            Node::Value(value) => visitor.visit_seq(SeqDeserializer::new(vec![Node::Value(value)])),
            Node::Map(_) => Err(Error::custom("expected a list, found a map")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Map(map) => visitor.visit_map(MapDeserializer::new(map.into_iter())),
            Node::Value(Value::Zero) => visitor.visit_map(MapDeserializer::new(FieldMap::new().into_iter())),
            Node::Value(value) => Err(Error::custom(format!("expected a map, found {value}"))),
            Node::List(_) => Err(Error::custom("expected a map, found a list")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::List(items) if items.len() <= fields.len() => {
                let entries = fields.iter().map(|field| Cow::Borrowed(*field)).zip(items);
                visitor.visit_map(MapDeserializer::new(entries))
            }
            node => NodeDeserializer::new(node).deserialize_map(visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(value @ (Value::Identifier(_) | Value::String(_))) => {
                visitor.visit_enum(EnumDeserializer::new(value.into_text()?, None))
            }
            Node::Map(map) if map.len() == 1 => match map.into_iter().next() {
                Some((variant, node)) => visitor.visit_enum(EnumDeserializer::new(variant, Some(node))),
                None => Err(Error::custom("expected enum variant")),
            },
            _ => Err(Error::custom("expected enum variant name")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

fn visit_text<'de, V>(text: Cow<'de, str>, visitor: V) -> Result<V::Value>
where
    V: Visitor<'de>,
{
    match text {
        Cow::Borrowed(text) => visitor.visit_borrowed_str(text),
        Cow::Owned(text) => visitor.visit_string(text),
    }
}

struct SeqDeserializer<'de> {
    iter: std::vec::IntoIter<Node<'de>>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(items: Vec<Node<'de>>) -> Self {
        SeqDeserializer {
            iter: items.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'de, I> {
    iter: I,
    value: Option<Node<'de>>,
}

impl<'de, I> MapDeserializer<'de, I>
where
    I: Iterator<Item = (Cow<'de, str>, Node<'de>)>,
{
    fn new(iter: I) -> Self {
        MapDeserializer { iter, value: None }
    }
}

impl<'de, I> de::MapAccess<'de> for MapDeserializer<'de, I>
where
    I: Iterator<Item = (Cow<'de, str>, Node<'de>)>,
{
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Field names are text; numeric and boolean map keys are parsed from it.
struct KeyDeserializer<'de> {
    key: Cow<'de, str>,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident($ty:ty);)*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            let parsed = self.key.parse::<$ty>().map_err(|_| {
                Error::custom(format!("map key {:?} is not a valid {}", self.key, stringify!($ty)))
            })?;
            visitor.$visit(parsed)
        }
    )*};
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visit_text(self.key, visitor)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool(bool);
        deserialize_i8 => visit_i8(i8);
        deserialize_i16 => visit_i16(i16);
        deserialize_i32 => visit_i32(i32);
        deserialize_i64 => visit_i64(i64);
        deserialize_u8 => visit_u8(u8);
        deserialize_u16 => visit_u16(u16);
        deserialize_u32 => visit_u32(u32);
        deserialize_u64 => visit_u64(u64);
        deserialize_char => visit_char(char);
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(EnumDeserializer::new(self.key, None))
    }

    forward_to_deserialize_any! {
        i128 u128 f32 f64 str string bytes byte_buf option unit unit_struct seq
        tuple tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer<'de> {
    variant: Cow<'de, str>,
    value: Option<Node<'de>>,
}

impl<'de> EnumDeserializer<'de> {
    fn new(variant: Cow<'de, str>, value: Option<Node<'de>>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(KeyDeserializer { key: self.variant })?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: Option<Node<'de>>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None | Some(Node::Value(Value::Zero | Value::Nil)) => Ok(()),
            Some(_) => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(node @ (Node::List(_) | Node::Value(_))) => {
                de::Deserializer::deserialize_seq(NodeDeserializer::new(node), visitor)
            }
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Node::Map(map)) => visitor.visit_map(MapDeserializer::new(map.into_iter())),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
