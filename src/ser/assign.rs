//! Merging a value into the result tree along a key path.
//!
//! Each level takes ownership of the subtree currently at its position and
//! returns the subtree that replaces it, so coercions (creating a list or
//! object where nothing was) happen on the way down and the parent always
//! stores whatever the child level returned.
//!
//! Conflicting field names never fail and never drop a value:
//!
//! - `[]` reaching an object appends to that object's `_values` list.
//! - Any segment reaching a scalar turns it into `{ "_values": [scalar] }`.
//! - A name reaching a list turns the list into an object keyed by index.
//! - An index reaching an object is used as a decimal key.

use std::mem;

use tracing::debug;

use super::key::Segment;
use crate::Value;
use crate::map::{Entry, Map};

/// Side-channel key holding values that could not be placed at their path.
pub const VALUES_KEY: &str = "_values";

/// Assigns `value` to a key without brackets.
///
/// A repeated key collects its values into a list rather than overwriting
/// the first one. An undefined or null slot holds no value and is replaced.
pub fn assign_direct(root: Value, key: &str, value: Value) -> Value {
    let mut map = into_object(root);
    match map.entry(key.to_owned()) {
        Entry::Occupied(mut o) => match o.get_mut() {
            vacant if vacant.is_vacant() => *vacant = value,
            Value::Array(items) => items.push(value),
            existing => {
                let first = mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
        },
        Entry::Vacant(v) => {
            v.insert(value);
        }
    }
    Value::Object(map)
}

/// Walks `path` down from `current`, creating containers as needed, and
/// places `value` where the path ends. Returns the new `current`.
pub fn assign(current: Value, path: &[Segment<'_>], value: Value, array_limit: usize) -> Value {
    let Some((segment, rest)) = path.split_first() else {
        return value;
    };

    match *segment {
        Segment::Append => append(current, rest, value, array_limit),
        Segment::Index(index) if index <= array_limit => {
            assign_index(current, index, rest, value, array_limit)
        }
        Segment::Index(index) => {
            debug!(index, array_limit, "index above array limit, assigning as a name");
            let mut buffer = itoa::Buffer::new();
            assign_name(current, buffer.format(index), rest, value, array_limit)
        }
        Segment::Name(name) => assign_name(current, name, rest, value, array_limit),
    }
}

fn append(current: Value, rest: &[Segment<'_>], value: Value, array_limit: usize) -> Value {
    // every `[]` starts a fresh element
    let element = assign(Value::Undefined, rest, value, array_limit);
    match current {
        Value::Array(mut items) => {
            items.push(element);
            Value::Array(items)
        }
        Value::Object(mut map) => {
            debug!("array marker on an object, appending to `{VALUES_KEY}`");
            push_side_value(&mut map, element);
            Value::Object(map)
        }
        vacant if vacant.is_vacant() => Value::Array(vec![element]),
        scalar => {
            let mut map = promote_scalar(scalar);
            push_side_value(&mut map, element);
            Value::Object(map)
        }
    }
}

fn assign_index(
    current: Value,
    index: usize,
    rest: &[Segment<'_>],
    value: Value,
    array_limit: usize,
) -> Value {
    let mut items = match current {
        Value::Array(items) => items,
        vacant if vacant.is_vacant() => Vec::new(),
        other => {
            let mut buffer = itoa::Buffer::new();
            return assign_name(other, buffer.format(index), rest, value, array_limit);
        }
    };

    if items.len() <= index {
        // gaps stay undefined until something is assigned there
        items.resize(index + 1, Value::Undefined);
    }
    let slot = mem::take(&mut items[index]);
    items[index] = assign(slot, rest, value, array_limit);
    Value::Array(items)
}

fn assign_name(
    current: Value,
    name: &str,
    rest: &[Segment<'_>],
    value: Value,
    array_limit: usize,
) -> Value {
    let mut map = into_object(current);
    let entry = map.entry(name.to_owned()).or_insert(Value::Undefined);
    let slot = mem::take(entry);
    *entry = assign(slot, rest, value, array_limit);
    Value::Object(map)
}

/// Coerces any value into an object without losing its content.
fn into_object(current: Value) -> Map {
    match current {
        Value::Object(map) => map,
        Value::Array(items) => {
            debug!("named key on a list, converting the list to an object");
            items
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !item.is_undefined())
                .map(|(i, item)| (i.to_string(), item))
                .collect()
        }
        vacant if vacant.is_vacant() => Map::new(),
        scalar => promote_scalar(scalar),
    }
}

fn promote_scalar(scalar: Value) -> Map {
    debug!("nested key on a scalar, keeping the scalar in `{VALUES_KEY}`");
    let mut map = Map::new();
    map.insert(VALUES_KEY.to_owned(), Value::Array(vec![scalar]));
    map
}

fn push_side_value(map: &mut Map, element: Value) {
    match map.entry(VALUES_KEY.to_owned()) {
        Entry::Occupied(mut o) => match o.get_mut() {
            Value::Array(items) => items.push(element),
            existing => {
                let first = mem::take(existing);
                *existing = Value::Array(vec![first, element]);
            }
        },
        Entry::Vacant(v) => {
            v.insert(Value::Array(vec![element]));
        }
    }
}

#[cfg(test)]
mod test {
    use super::{assign, assign_direct};
    use crate::Value;
    use crate::ser::key::KeyPath;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    const LIMIT: usize = 1000;
    const DEPTH: usize = 20;

    fn build(pairs: &[(&str, &str)]) -> serde_json::Value {
        let mut root = Value::Object(Default::default());
        for (key, value) in pairs {
            root = match KeyPath::parse(key, DEPTH) {
                Some(path) => assign(root, path.segments(), Value::from(*value), LIMIT),
                None => assign_direct(root, key, Value::from(*value)),
            };
        }
        serde_json::to_value(&root).unwrap()
    }

    #[test]
    fn nested_objects_and_lists() {
        assert_eq!(
            build(&[("a[b][0]", "x"), ("a[b][1]", "y"), ("a[c]", "z")]),
            json!({ "a": { "b": ["x", "y"], "c": "z" } })
        );
    }

    #[test]
    fn append_creates_fresh_elements() {
        assert_eq!(
            build(&[("a[][x]", "1"), ("a[][y]", "2"), ("a[]", "3")]),
            json!({ "a": [{ "x": "1" }, { "y": "2" }, "3"] })
        );
    }

    #[test]
    fn repeated_nested_path_overwrites() {
        assert_eq!(build(&[("a[b]", "1"), ("a[b]", "2")]), json!({ "a": { "b": "2" } }));
    }

    #[test]
    fn direct_keys_collect_repeats() {
        assert_eq!(
            build(&[("color", "red"), ("color", "blue"), ("color", "green")]),
            json!({ "color": ["red", "blue", "green"] })
        );
        // a direct repeat of a list built with `[]` extends it
        assert_eq!(
            build(&[("t[]", "a"), ("t", "b")]),
            json!({ "t": ["a", "b"] })
        );
    }

    #[test]
    fn direct_key_replaces_vacant_slot() {
        let mut root = Value::Object(Default::default());
        root = assign_direct(root, "n", Value::Undefined);
        root = assign_direct(root, "n", Value::from(5.0));
        root = assign_direct(root, "m", Value::Null);
        root = assign_direct(root, "m", Value::from("x"));
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({ "n": 5, "m": "x" })
        );

        // falsy but present values are still collected
        assert_eq!(build(&[("e", ""), ("e", "1")]), json!({ "e": ["", "1"] }));
    }

    #[test]
    fn js_style_indices() {
        assert_eq!(
            build(&[("a[ 1]", "x"), ("b[1e1]", "y"), ("c[0x1]", "z"), ("d[ ]", "w")]),
            json!({
                "a": [null, "x"],
                "b": [null, null, null, null, null, null, null, null, null, null, "y"],
                "c": [null, "z"],
                "d": ["w"],
            })
        );
    }

    #[test]
    fn deep_keys_are_cut_at_max_depth() {
        let key = format!("a{}", "[x]".repeat(5_000));
        let value = build(&[(key.as_str(), "v")]);

        let mut node = &value["a"];
        for _ in 0..DEPTH {
            node = &node["x"];
        }
        let rest = "[x]".repeat(5_000 - DEPTH);
        assert_eq!(node[rest.as_str()], json!("v"));
    }

    #[test]
    fn sparse_indices() {
        let mut root = Value::Object(Default::default());
        let path = KeyPath::parse("a[2]", DEPTH).unwrap();
        root = assign(root, path.segments(), Value::from("c"), LIMIT);
        let path = KeyPath::parse("a[0]", DEPTH).unwrap();
        root = assign(root, path.segments(), Value::from("a"), LIMIT);

        assert_eq!(
            root.get("a"),
            Some(&Value::Array(vec![
                Value::from("a"),
                Value::Undefined,
                Value::from("c"),
            ]))
        );
    }

    #[test]
    fn array_marker_on_object_uses_side_channel() {
        assert_eq!(
            build(&[("a[x]", "1"), ("a[]", "2"), ("a[]", "3")]),
            json!({ "a": { "x": "1", "_values": ["2", "3"] } })
        );
        assert_eq!(
            build(&[("a[_values]", "1"), ("a[]", "2")]),
            json!({ "a": { "_values": ["1", "2"] } })
        );
    }

    #[test]
    fn nested_key_on_scalar_keeps_scalar() {
        assert_eq!(
            build(&[("a", "1"), ("a[b]", "2")]),
            json!({ "a": { "_values": ["1"], "b": "2" } })
        );
        assert_eq!(
            build(&[("a", ""), ("a[]", "2")]),
            json!({ "a": { "_values": ["", "2"] } })
        );
    }

    #[test]
    fn name_on_list_converts_to_object() {
        assert_eq!(
            build(&[("a[1]", "x"), ("a[b]", "y")]),
            json!({ "a": { "1": "x", "b": "y" } })
        );
    }

    #[test]
    fn index_on_object_is_a_key() {
        assert_eq!(
            build(&[("a[b]", "x"), ("a[0]", "y")]),
            json!({ "a": { "b": "x", "0": "y" } })
        );
    }

    #[test]
    fn index_above_limit_is_a_name() {
        let path = KeyPath::parse("a[5]", DEPTH).unwrap();
        let root = assign(Value::Undefined, path.segments(), Value::from("x"), 4);
        assert_eq!(serde_json::to_value(&root).unwrap(), json!({ "a": { "5": "x" } }));
    }
}
