//! Serialize HTML form controls
//!
//! Given the controls of a form in document order, this library decides
//! which of them a browser would submit and produces either an
//! `application/x-www-form-urlencoded` string or a nested [`Value`] built
//! by reading bracket notation in field names, in the style of
//! [form-serialize](https://github.com/defunctzombie/form-serialize) and
//! [`Rack::Utils::parse_nested_query`](http://www.rubydoc.info/github/rack/rack/Rack/Utils#parse_nested_query-class_method).
//!
//! ## Fields
//!
//! Controls are described through the [`FormControl`] trait. [`Field`] is
//! an owned implementation that can be built in code or deserialized from
//! JSON.
//!
//! ## Usage
//!
//! ```
//! use form_serialize::{Config, Field, FieldType};
//! use serde_json::json;
//!
//! let fields = [
//!     Field::input("user[name]", FieldType::Text).with_value("Alice Smith"),
//!     Field::input("user[age]", FieldType::Number).with_value("24"),
//!     Field::input("user[roles][]", FieldType::Checkbox)
//!         .with_value("admin")
//!         .with_checked(true),
//!     Field::input("user[roles][]", FieldType::Checkbox).with_value("owner"),
//!     Field::input("notes", FieldType::Text).with_value(""),
//! ];
//!
//! assert_eq!(
//!     form_serialize::to_string(&fields),
//!     "user%5Bname%5D=Alice+Smith&user%5Bage%5D=24&user%5Broles%5D%5B%5D=admin",
//! );
//!
//! let value = form_serialize::to_value(&fields);
//! assert_eq!(
//!     serde_json::to_value(&value).unwrap(),
//!     json!({ "user": { "name": "Alice Smith", "age": 24, "roles": ["admin"] } }),
//! );
//!
//! let value = Config::new().empty(true).serialize_value(&fields);
//! assert_eq!(value.get("notes"), Some(&"".into()));
//! ```
//!
//! ## Typed results
//!
//! The structured result can be deserialized into any `Deserialize` type
//! with [`from_fields`] or [`from_value`]. String leaves are parsed into
//! numbers and booleans on demand.
//!
//! ## Structured keys
//!
//! A key is split into a root name and the contents of each complete
//! `[...]` group that follows. Empty brackets append to a list, a
//! non-negative integer indexes into one (up to [`Config::array_limit`]) and
//! anything else names an object member. Nesting stops at
//! [`Config::max_depth`]. Keys that collide are resolved rather than rejected:
//! repeated plain keys collect into a list, and a scalar that later gains
//! children keeps its value under [`VALUES_KEY`].

mod config;
mod de;
mod error;
mod extract;
mod field;
mod map;
mod ser;
pub mod value;

use std::io::Write;

#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use de::{ValueDeserializer, from_value};
pub use error::{Error, Result};
#[doc(inline)]
pub use extract::{Entry, Events};
#[doc(inline)]
pub use field::{Element, Field, FieldType, FormControl, SelectOption};
pub use map::Map;
#[doc(inline)]
pub use ser::{FlatSerializer, Serializer, StructuredSerializer, VALUES_KEY, key};
#[doc(inline)]
pub use value::Value;

/// The result of serializing a form: flat or structured depending on
/// [`Config::hash`].
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Flat(String),
    Structured(Value),
}

impl Output {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Output::Flat(s) => Some(s),
            Output::Structured(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Output::Flat(_) => None,
            Output::Structured(v) => Some(v),
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Output::Flat(s) => Some(s),
            Output::Structured(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Output::Flat(_) => None,
            Output::Structured(v) => Some(v),
        }
    }
}

impl serde::Serialize for Output {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Output::Flat(s) => serializer.serialize_str(s),
            Output::Structured(v) => serde::Serialize::serialize(v, serializer),
        }
    }
}

/// Serializes fields with the given options.
///
/// Accepts a [`Config`] or a `bool`, which is shorthand for
/// `Config::new().hash(b)`.
///
/// ```
/// use form_serialize::{Config, Field, FieldType, Output};
///
/// let fields = [Field::input("q", FieldType::Text).with_value("rust serde")];
/// assert_eq!(
///     form_serialize::serialize(&fields, Config::new().hash(false)),
///     Output::Flat("q=rust+serde".to_string()),
/// );
/// ```
pub fn serialize<'f, I, F>(fields: I, config: impl Into<Config>) -> Output
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    config.into().serialize(fields)
}

/// Serializes fields into a urlencoded string using default options.
pub fn to_string<'f, I, F>(fields: I) -> String
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    Config::default().serialize_string(fields)
}

/// Serializes fields into a nested [`Value`] using default options.
pub fn to_value<'f, I, F>(fields: I) -> Value
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    Config::default().serialize_value(fields)
}

/// Writes fields as a urlencoded string using default options.
pub fn to_writer<'f, I, F, W>(fields: I, writer: &mut W) -> Result<()>
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
    W: Write,
{
    Config::default().serialize_to_writer(fields, writer)
}

/// Deserializes the structured form of the fields into `T`, using default
/// options.
pub fn from_fields<'f, I, F, T>(fields: I) -> Result<T>
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
    T: serde::de::DeserializeOwned,
{
    Config::default().deserialize_fields(fields)
}

/// Iterates over the `(key, value)` entries the fields submit, before any
/// serializer sees them.
pub fn events<'f, I, F>(fields: I, config: impl Into<Config>) -> Events<'f, I::IntoIter, F>
where
    I: IntoIterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    Events::new(fields.into_iter(), config.into())
}
