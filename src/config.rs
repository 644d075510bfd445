use std::io::Write;

use serde::de;

use crate::error::Result;
use crate::extract::Events;
use crate::field::FormControl;
use crate::map::Map;
use crate::ser::{FlatSerializer, Serializer, StructuredSerializer};
use crate::{Output, Value};

/// Largest list index assigned as an index by default.
pub(crate) const DEFAULT_ARRAY_LIMIT: usize = 1000;

/// Largest number of bracket groups read from a key by default.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 20;

/// Configuration for form serialization.
///
/// ## Output mode
///
/// With `hash` set (the default for a `Config`), fields are merged into a
/// nested [`Value`] by reading bracket notation in their names. Without it,
/// they are joined into a urlencoded string.
///
/// A plain `bool` converts into a `Config` selecting the mode and leaving
/// every other option off, so `false` is the flat-string shorthand:
///
/// ```
/// use form_serialize::{Field, FieldType, Output};
///
/// let fields = [Field::input("user[name]", FieldType::Text).with_value("Alice")];
///
/// let flat = form_serialize::serialize(&fields, false);
/// assert_eq!(flat, Output::Flat("user%5Bname%5D=Alice".to_string()));
///
/// let nested = form_serialize::serialize(&fields, true);
/// assert_eq!(
///     nested.into_value().unwrap().get("user").and_then(|u| u.get("name")),
///     Some(&"Alice".into()),
/// );
/// ```
///
/// ## Empty values
///
/// By default fields with empty values, unchecked checkboxes and radio groups
/// without a checked member are left out. `empty` keeps them (with an empty
/// string value), and `booleans` keeps them while also turning checkboxes
/// into `true`/`false`.
///
/// ## Array limit
///
/// `array_limit` bounds the list index honored in keys like `a[5]`. A larger
/// index is used as an object key instead, so a single field cannot make the
/// serializer allocate an arbitrarily long sparse list. This departs from
/// plain sparse-list assignment: `a[1001]` builds `{ "a": { "1001": .. } }`
/// under the default limit, not a list. Raise the limit to keep such keys as
/// indices.
///
/// Default value: `array_limit = 1000`
///
/// ## Nesting depth
///
/// `max_depth` bounds how many bracket groups of a key are followed. The
/// remainder of a deeper key, brackets included, is used as one object key,
/// so hostile field names cannot nest the result without limit. A
/// `max_depth` of 0 keeps only the root name and one key for the rest.
///
/// Default value: `max_depth = 20`
///
/// ```
/// use form_serialize::{Config, Field, FieldType};
/// use serde_json::json;
///
/// let fields = [Field::input("a[b][c]", FieldType::Text).with_value("1")];
/// let value = Config::new().max_depth(1).serialize_value(&fields);
/// assert_eq!(
///     serde_json::to_value(&value).unwrap(),
///     json!({ "a": { "b": { "[c]": "1" } } }),
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) hash: bool,
    pub(crate) disabled: bool,
    pub(crate) empty: bool,
    pub(crate) booleans: bool,
    array_limit: usize,
    max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl From<bool> for Config {
    fn from(hash: bool) -> Self {
        Self::new().hash(hash)
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            hash: true,
            disabled: false,
            empty: false,
            booleans: false,
            array_limit: DEFAULT_ARRAY_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Produce a nested [`Value`] (`true`) or a urlencoded string (`false`).
    ///
    /// Also decides whether multi-select keys get a trailing `[]`.
    pub const fn hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    /// Serialize disabled fields too.
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Serialize fields with empty values.
    pub const fn empty(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }

    /// Serialize checkboxes as `true`/`false` (null while indeterminate).
    /// Implies keeping empty values.
    pub const fn booleans(mut self, booleans: bool) -> Self {
        self.booleans = booleans;
        self
    }

    /// Specifies the largest list index honored in a key. Default is 1000.
    pub const fn array_limit(mut self, array_limit: usize) -> Self {
        self.array_limit = array_limit;
        self
    }

    /// Specifies how many bracket groups of a key are followed. Default is 20.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) const fn keeps_empty(&self) -> bool {
        self.empty || self.booleans
    }

    fn structured_serializer(&self) -> StructuredSerializer {
        StructuredSerializer::new()
            .array_limit(self.array_limit)
            .max_depth(self.max_depth)
    }

    /// Serializes fields into the output selected by `hash`.
    pub fn serialize<'f, I, F>(self, fields: I) -> Output
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
    {
        if self.hash {
            Output::Structured(self.serialize_value(fields))
        } else {
            Output::Flat(self.serialize_string(fields))
        }
    }

    /// Serializes fields into a urlencoded string, regardless of `hash`.
    pub fn serialize_string<'f, I, F>(self, fields: I) -> String
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
    {
        self.hash(false)
            .serialize_with(fields, String::new(), FlatSerializer)
    }

    /// Serializes fields into a nested [`Value`], regardless of `hash`.
    ///
    /// The result is always an object, empty if nothing was submitted.
    pub fn serialize_value<'f, I, F>(self, fields: I) -> Value
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
    {
        let serializer = self.structured_serializer();
        self.hash(true)
            .serialize_with(fields, Value::Object(Map::new()), serializer)
    }

    /// Serializes fields with a caller-supplied [`Serializer`], starting
    /// from `init`.
    pub fn serialize_with<'f, I, F, Acc, S>(self, fields: I, init: Acc, mut serializer: S) -> Acc
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
        S: Serializer<Acc>,
    {
        Events::new(fields.into_iter(), self)
            .fold(init, |acc, entry| serializer.merge(acc, &entry.key, entry.value))
    }

    /// Serializes fields into a urlencoded string written to `writer`.
    pub fn serialize_to_writer<'f, I, F, W>(self, fields: I, writer: &mut W) -> Result<()>
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
        W: Write,
    {
        let serialized = self.serialize_string(fields);
        writer.write_all(serialized.as_bytes())?;
        Ok(())
    }

    /// Serializes fields into a nested [`Value`], then deserializes that
    /// into `T`.
    pub fn deserialize_fields<'f, I, F, T>(self, fields: I) -> Result<T>
    where
        I: IntoIterator<Item = &'f F>,
        F: FormControl + ?Sized + 'f,
        T: de::DeserializeOwned,
    {
        crate::de::from_value(self.serialize_value(fields))
    }
}
