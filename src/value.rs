//! Dynamic value representation for structured form output.
//!
//! A [`Value`] is what field values are extracted into, and what the
//! structured serializer builds its result tree out of.
//!
//! ```
//! use form_serialize::Value;
//!
//! let value = Value::from("red");
//! assert!(value.is_truthy());
//! assert_eq!(value.as_str(), Some("red"));
//!
//! assert!(!Value::from("").is_truthy());
//! assert!(!Value::from(0.0).is_truthy());
//! ```

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::map::Map;

/// A dynamically-typed node of the result tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value at all: an unset `number` field, or a gap in a sparse list
    /// created by assigning a high index first.
    Undefined,
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Returns `false` for values a form treats as empty: undefined, null,
    /// `false`, zero, NaN and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Undefined and null are the only values a path assignment may
    /// overwrite with a fresh container.
    pub fn is_vacant(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` on an object node.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Renders the value the way it appears on the right-hand side of a
    /// urlencoded pair, before percent-encoding.
    pub fn to_form_string(&self) -> Cow<'_, str> {
        match self {
            Value::Undefined => Cow::Borrowed(""),
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Number(n) => Cow::Owned(format_number(*n)),
            Value::String(s) => Cow::Borrowed(s),
            Value::Array(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| item.to_form_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Object(_) => Cow::Borrowed(""),
        }
    }
}

/// Largest magnitude below which an integral float is printed without an
/// exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < PLAIN_INTEGER_LIMIT {
        if n.abs() < i64::MAX as f64 {
            let mut buffer = itoa::Buffer::new();
            // `-0.0` prints as `0`
            return buffer.format(n as i64).to_string();
        }
        return format!("{n:.0}");
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(n).to_string()
}

/// Parses the raw value of a `number` field.
///
/// Surrounding whitespace is ignored and an empty string is zero. Decimal and
/// exponent notation, `0x`/`0o`/`0b` prefixed integers and `Infinity` are
/// accepted; anything else yields NaN.
///
/// ```
/// use form_serialize::value::parse_number;
///
/// assert_eq!(parse_number(" 42 "), 42.0);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("0x1A"), 26.0);
/// assert!(parse_number("12px").is_nan());
/// ```
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return match u64::from_str_radix(&s[2..], radix) {
            Ok(n) => n as f64,
            Err(_) => f64::NAN,
        };
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // `f64::from_str` also accepts `inf` and `nan` spellings
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::{Value, parse_number};
    use crate::map::Map;

    use pretty_assertions::assert_eq;

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::Number(-0.0).is_truthy());
        assert!(Value::Number(0.5).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(Map::new()).is_truthy());
    }

    #[test]
    fn form_strings() {
        assert_eq!(Value::from(3.0).to_form_string(), "3");
        assert_eq!(Value::from(-0.0).to_form_string(), "0");
        assert_eq!(Value::from(1.5).to_form_string(), "1.5");
        assert_eq!(Value::from(f64::NAN).to_form_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_form_string(), "-Infinity");
        assert_eq!(Value::Bool(true).to_form_string(), "true");
        assert_eq!(Value::Null.to_form_string(), "null");
        assert_eq!(Value::Undefined.to_form_string(), "");
        assert_eq!(
            Value::Array(vec!["a".into(), Value::Undefined, 2.0.into()]).to_form_string(),
            "a,,2"
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("12"), 12.0);
        assert_eq!(parse_number("\t-1.25e2 "), -125.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("NaN").is_nan());
        assert!(parse_number("1,000").is_nan());
        assert!(parse_number("0x").is_nan());
    }

    #[test]
    fn serialize_integral_numbers_as_integers() {
        let json = serde_json::to_string(&Value::Array(vec![
            Value::from(2.0),
            Value::from(2.5),
            Value::Undefined,
        ]))
        .unwrap();
        assert_eq!(json, "[2,2.5,null]");
    }

    #[test]
    fn integers_beyond_i64_stay_floats() {
        let two_pow_63 = 9_223_372_036_854_775_808.0;
        let json = serde_json::to_value(Value::from(two_pow_63)).unwrap();
        assert!(json.is_f64(), "got: {json}");
        assert_eq!(json.as_f64(), Some(two_pow_63));
        assert_eq!(
            Value::from(two_pow_63).to_form_string(),
            "9223372036854775808"
        );

        let json = serde_json::to_value(Value::from(-9_007_199_254_740_992.0)).unwrap();
        assert_eq!(json.as_i64(), Some(-9_007_199_254_740_992));
    }
}
