//! Serializer strategies: how each extracted `(key, value)` pair is merged
//! into the accumulated result.

mod assign;
mod encode;
pub mod key;

pub use assign::VALUES_KEY;

use crate::Value;

/// Merges one extracted pair into an accumulator.
///
/// Two strategies are provided: [`FlatSerializer`] builds a urlencoded
/// string, [`StructuredSerializer`] builds a nested [`Value`]. Any closure
/// taking and returning the accumulator can stand in for either:
///
/// ```
/// use form_serialize::{Config, Field, FieldType, Value};
///
/// let fields = [
///     Field::input("a", FieldType::Text).with_value("1"),
///     Field::input("b", FieldType::Text).with_value("2"),
/// ];
/// let keys = Config::new().serialize_with(
///     &fields,
///     Vec::new(),
///     |mut keys: Vec<String>, key: &str, _value: Value| {
///         keys.push(key.to_owned());
///         keys
///     },
/// );
/// assert_eq!(keys, ["a", "b"]);
/// ```
pub trait Serializer<Acc> {
    fn merge(&mut self, acc: Acc, key: &str, value: Value) -> Acc;
}

impl<Acc, F> Serializer<Acc> for F
where
    F: FnMut(Acc, &str, Value) -> Acc,
{
    fn merge(&mut self, acc: Acc, key: &str, value: Value) -> Acc {
        self(acc, key, value)
    }
}

/// Builds an `application/x-www-form-urlencoded` string.
///
/// Pairs are joined with `&`. Keys and values are percent-encoded as URI
/// components; in values, spaces are written as `+` and line breaks are
/// normalized to `\r\n` first.
///
/// ```
/// use form_serialize::{FlatSerializer, Serializer, Value};
///
/// let mut serializer = FlatSerializer;
/// let out = serializer.merge(String::new(), "full name", Value::from("a b\nc"));
/// let out = serializer.merge(out, "n", Value::from(2.0));
/// assert_eq!(out, "full%20name=a+b%0D%0Ac&n=2");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatSerializer;

impl Serializer<String> for FlatSerializer {
    fn merge(&mut self, mut acc: String, key: &str, value: Value) -> String {
        if !acc.is_empty() {
            acc.push('&');
        }
        acc.extend(encode::encode_key(key));
        acc.push('=');

        let value = value.to_form_string();
        let value = encode::normalize_newlines(&value);
        acc.extend(encode::encode_value(&value));
        acc
    }
}

/// Builds a nested [`Value`] by reading bracket notation in keys.
///
/// Keys without brackets are assigned directly on the root object, and a
/// repeated key collects its values into a list. Every other key is parsed
/// into a [`key::KeyPath`] and merged along that path.
///
/// ```
/// use form_serialize::{StructuredSerializer, Serializer, Value};
///
/// let mut serializer = StructuredSerializer::new();
/// let mut tree = Value::Null;
/// for (key, value) in [("a[b][0]", "x"), ("a[b][1]", "y"), ("c", "1"), ("c", "2")] {
///     tree = serializer.merge(tree, key, Value::from(value));
/// }
/// assert_eq!(
///     serde_json::to_value(&tree).unwrap(),
///     serde_json::json!({ "a": { "b": ["x", "y"] }, "c": ["1", "2"] }),
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StructuredSerializer {
    array_limit: usize,
    max_depth: usize,
}

impl Default for StructuredSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredSerializer {
    pub const fn new() -> Self {
        Self {
            array_limit: crate::config::DEFAULT_ARRAY_LIMIT,
            max_depth: crate::config::DEFAULT_MAX_DEPTH,
        }
    }

    /// Largest list index honored as an index. Bigger indices are used as
    /// object keys instead.
    pub const fn array_limit(mut self, array_limit: usize) -> Self {
        self.array_limit = array_limit;
        self
    }

    /// Largest number of bracket groups read from a key. The rest of a
    /// deeper key becomes a single name.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Serializer<Value> for StructuredSerializer {
    fn merge(&mut self, acc: Value, key: &str, value: Value) -> Value {
        match key::KeyPath::parse(key, self.max_depth) {
            Some(path) => assign::assign(acc, path.segments(), value, self.array_limit),
            None => assign::assign_direct(acc, key, value),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FlatSerializer, Serializer, StructuredSerializer};
    use crate::Value;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn flat_joins_pairs() {
        let mut serializer = FlatSerializer;
        let mut out = String::new();
        for (key, value) in [("a", "1"), ("b[]", "x y"), ("", "")] {
            out = serializer.merge(out, key, Value::from(value));
        }
        assert_eq!(out, "a=1&b%5B%5D=x+y&=");
    }

    #[test]
    fn flat_coerces_non_strings() {
        let mut serializer = FlatSerializer;
        let out = serializer.merge(String::new(), "on", Value::Bool(true));
        let out = serializer.merge(out, "maybe", Value::Null);
        let out = serializer.merge(out, "n", Value::Number(-1.5));
        assert_eq!(out, "on=true&maybe=null&n=-1.5");
    }

    #[test]
    fn structured_root_defaults_to_object() {
        let mut serializer = StructuredSerializer::new();
        let tree = serializer.merge(Value::Undefined, "a", Value::from("1"));
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({ "a": "1" }));
    }

    #[test]
    fn closures_are_serializers() {
        let mut count = |acc: usize, _key: &str, _value: Value| acc + 1;
        let acc = count.merge(0, "a", Value::Null);
        assert_eq!(count.merge(acc, "b", Value::Null), 2);
    }
}
