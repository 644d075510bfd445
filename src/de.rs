//! Deserialization of a structured result into typed values.
//!
//! Form values are strings, so string leaves are parsed into whatever
//! primitive the target asks for:
//!
//! ```
//! use form_serialize::{Field, FieldType};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct Signup {
//!     name: String,
//!     age: u8,
//!     newsletter: bool,
//!     tags: Vec<String>,
//!     referrer: Option<String>,
//! }
//!
//! let fields = [
//!     Field::input("name", FieldType::Text).with_value("Alice"),
//!     Field::input("age", FieldType::Text).with_value("24"),
//!     Field::input("newsletter", FieldType::Checkbox).with_checked(true),
//!     Field::select_multiple("tags").with_option("rust", true),
//!     Field::input("referrer", FieldType::Text).with_value(""),
//! ];
//! let signup: Signup = form_serialize::from_fields(&fields).unwrap();
//! assert_eq!(
//!     signup,
//!     Signup {
//!         name: "Alice".to_string(),
//!         age: 24,
//!         newsletter: true,
//!         tags: vec!["rust".to_string()],
//!         referrer: None,
//!     }
//! );
//! ```

mod string_parser;

use serde::de::{self, IntoDeserializer, Unexpected};

use crate::error::{Error, Result};
use crate::map::Map;
use crate::Value;

use string_parser::StringParser;

/// Deserializes a [`Value`] into `T`.
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer(value))
}

/// Deserializer over an owned result tree.
pub struct ValueDeserializer(Value);

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer(value)
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer(self)
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Undefined | Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => Unexpected::Float(*n),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn visit_seq<'de, V>(items: Vec<Value>, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let mut seq = de::value::SeqDeserializer::<_, Error>::new(items.into_iter());
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_map<'de, V>(map: Map, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let entries = map.into_iter().map(|(k, v)| (StringParser::new(k), v));
    let mut map = de::value::MapDeserializer::<_, Error>::new(entries);
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

macro_rules! deserialize_primitive {
    ($method:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.0 {
                Value::String(s) => StringParser::new(s).$method(visitor),
                Value::Array(_) | Value::Object(_) => {
                    Err(de::Error::invalid_type(unexpected(&self.0), &visitor))
                }
                _ => self.deserialize_any(visitor),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Undefined | Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) if n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64 => {
                visitor.visit_u64(n as u64)
            }
            Value::Number(n) if n.fract() == 0.0 && n < 0.0 && n >= i64::MIN as f64 => {
                visitor.visit_i64(n as i64)
            }
            Value::Number(n) => visitor.visit_f64(n),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => visit_seq(items, visitor),
            Value::Object(map) => visit_map(map, visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.0 {
            Value::Undefined | Value::Null => visitor.visit_none(),
            Value::String(s) if s.is_empty() => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    /// Lists deserialize as themselves, objects as their values in order,
    /// and a single value as a one-element sequence: a field that happened
    /// to be submitted once still fills a `Vec`.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Array(items) => visit_seq(items, visitor),
            Value::Object(map) => visit_seq(map.into_values().collect(), visitor),
            Value::Undefined | Value::Null => visit_seq(Vec::new(), visitor),
            scalar => visit_seq(vec![scalar], visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
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
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Object(map) => visit_map(map, visitor),
            Value::Undefined | Value::Null => visit_map(Map::new(), visitor),
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::String(s) => StringParser::new(s).deserialize_enum(name, variants, visitor),
            Value::Object(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    return Err(Error::unexpected("a single-entry map", "an empty map"));
                };
                visitor.visit_enum(EnumDeserializer { variant, value })
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            other => ValueDeserializer(other).deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    deserialize_primitive!(deserialize_bool);
    deserialize_primitive!(deserialize_i8);
    deserialize_primitive!(deserialize_i16);
    deserialize_primitive!(deserialize_i32);
    deserialize_primitive!(deserialize_i64);
    deserialize_primitive!(deserialize_u8);
    deserialize_primitive!(deserialize_u16);
    deserialize_primitive!(deserialize_u32);
    deserialize_primitive!(deserialize_u64);
    deserialize_primitive!(deserialize_f32);
    deserialize_primitive!(deserialize_f64);

    serde::forward_to_deserialize_any! {
        char str string unit unit_struct identifier
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = ValueDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringParser::new(self.variant))?;
        Ok((variant, ValueDeserializer(self.value)))
    }
}

impl<'de> de::VariantAccess<'de> for ValueDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}
