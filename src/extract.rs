//! Deciding which fields are serialized, and with what value.
//!
//! [`Events`] walks an ordered sequence of controls and yields one [`Entry`]
//! per value that should be submitted. It follows the HTML notion of a
//! successful control, with a few switches from [`Config`]:
//!
//! - Unnamed fields, disabled fields (unless `disabled` is set), elements
//!   that are not form controls and submit-like inputs are skipped.
//! - `number` values are parsed into numbers.
//! - Checkboxes submit their value when checked. With `booleans` they submit
//!   `true`/`false`, or null while indeterminate.
//! - Only checked radios submit. A radio group with no checked member is
//!   submitted once with an empty value after all other fields, if `empty`
//!   or `booleans` is set.
//! - A multi-select submits one entry per selected option. In structured
//!   mode its key gets a trailing `[]` so the options land in a list.
//! - Empty values are dropped unless `empty` or `booleans` is set.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::marker::PhantomData;

use indexmap::IndexMap;
use tracing::trace;

use crate::Config;
use crate::Value;
use crate::field::{FieldType, FormControl};
use crate::value::parse_number;

/// The key marking a field name as a list.
const ARRAY_MARKER: &str = "[]";

/// One `(key, value)` pair to be merged into the result.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<'f> {
    pub key: Cow<'f, str>,
    pub value: Value,
}

impl<'f> Entry<'f> {
    fn new(key: impl Into<Cow<'f, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn into_pair(self) -> (String, Value) {
        (self.key.into_owned(), self.value)
    }
}

/// Iterator over the entries a field sequence submits.
///
/// ```
/// use form_serialize::{Config, Field, FieldType, Value};
///
/// let fields = [
///     Field::input("size", FieldType::Radio).with_value("s"),
///     Field::input("size", FieldType::Radio).with_value("m"),
///     Field::input("note", FieldType::Text).with_value("hi"),
/// ];
/// let entries: Vec<_> = form_serialize::events(&fields, Config::new().empty(true))
///     .map(|entry| entry.into_pair())
///     .collect();
/// assert_eq!(
///     entries,
///     [
///         ("note".to_string(), Value::from("hi")),
///         ("size".to_string(), Value::from("")),
///     ],
/// );
/// ```
pub struct Events<'f, I, F: ?Sized> {
    fields: I,
    config: Config,
    /// Whether any member of each radio group was checked, in the order the
    /// groups were first seen.
    radios: IndexMap<&'f str, bool>,
    pending: VecDeque<Entry<'f>>,
    unchecked_radios: Option<indexmap::map::IntoIter<&'f str, bool>>,
    marker: PhantomData<&'f F>,
}

impl<'f, I, F> Events<'f, I, F>
where
    I: Iterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    pub fn new(fields: I, config: Config) -> Self {
        Self {
            fields,
            config,
            radios: IndexMap::new(),
            pending: VecDeque::new(),
            unchecked_radios: None,
            marker: PhantomData,
        }
    }

    fn visit(&mut self, field: &'f F) {
        let name = field.name();
        if name.is_empty() {
            trace!("skipping unnamed field");
            return;
        }
        if field.disabled() && !self.config.disabled {
            trace!(name, "skipping disabled field");
            return;
        }

        let field_type = field.field_type();
        if !field.element().is_success_control() || field_type.is_submitter() {
            trace!(name, ?field_type, "skipping field that cannot submit a value");
            return;
        }

        let value = match field_type {
            FieldType::Number => field
                .value()
                .map_or(Value::Undefined, |raw| Value::Number(parse_number(raw))),
            FieldType::Checkbox if self.config.booleans => {
                if field.indeterminate() {
                    Value::Null
                } else {
                    Value::Bool(field.checked())
                }
            }
            FieldType::Checkbox if field.checked() => Value::from(field.value()),
            FieldType::Checkbox => Value::from(""),
            FieldType::Radio => {
                let group_checked = self.radios.entry(name).or_insert(false);
                if !field.checked() {
                    return;
                }
                *group_checked = true;
                Value::from(field.value())
            }
            FieldType::SelectMultiple => {
                self.visit_select_multiple(field);
                return;
            }
            _ => Value::from(field.value()),
        };

        if !value.is_truthy() && !self.config.keeps_empty() {
            trace!(name, "skipping empty value");
            return;
        }
        self.pending.push_back(Entry::new(name, value));
    }

    fn visit_select_multiple(&mut self, field: &'f F) {
        let name = field.name();
        let keeps_empty = self.config.keeps_empty();
        let key: Cow<'f, str> = if self.config.hash && !name.ends_with(ARRAY_MARKER) {
            Cow::Owned(format!("{name}{ARRAY_MARKER}"))
        } else {
            Cow::Borrowed(name)
        };

        let mut any_selected = false;
        for option in field.options() {
            if option.selected && (keeps_empty || !option.value.is_empty()) {
                any_selected = true;
                self.pending
                    .push_back(Entry::new(key.clone(), option.value.as_str()));
            }
        }

        if !any_selected && keeps_empty {
            self.pending.push_back(Entry::new(name, ""));
        }
    }
}

impl<'f, I, F> Iterator for Events<'f, I, F>
where
    I: Iterator<Item = &'f F>,
    F: FormControl + ?Sized + 'f,
{
    type Item = Entry<'f>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(entry);
            }

            if let Some(radios) = &mut self.unchecked_radios {
                return radios
                    .find(|(_, checked)| !checked)
                    .map(|(name, _)| Entry::new(name, ""));
            }

            match self.fields.next() {
                Some(field) => self.visit(field),
                None => {
                    let radios = std::mem::take(&mut self.radios);
                    let radios = if self.config.keeps_empty() {
                        radios
                    } else {
                        IndexMap::new()
                    };
                    self.unchecked_radios = Some(radios.into_iter());
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::field::{Element, Field, FieldType};
    use crate::{Config, Value};

    use pretty_assertions::assert_eq;

    fn pairs(fields: &[Field], config: Config) -> Vec<(String, Value)> {
        crate::events(fields, config)
            .map(|entry| entry.into_pair())
            .collect()
    }

    fn pair(key: &str, value: impl Into<Value>) -> (String, Value) {
        (key.to_string(), value.into())
    }

    #[test]
    fn skip_non_controls() {
        let fields = [
            Field::input("", FieldType::Text).with_value("x"),
            Field::input("go", FieldType::Submit).with_value("x"),
            Field::input("img", FieldType::Image).with_value("x"),
            Field::input("upload", FieldType::File).with_value("x"),
            Field {
                element: Element::Button,
                ..Field::input("b", FieldType::Text).with_value("x")
            },
            Field {
                element: Element::Other,
                ..Field::input("o", FieldType::Text).with_value("x")
            },
            Field::input("kept", FieldType::Text).with_value("x"),
        ];
        let config = Config::new().empty(true).disabled(true);
        assert_eq!(pairs(&fields, config), [pair("kept", "x")]);
    }

    #[test]
    fn disabled_fields() {
        let fields = [Field::input("a", FieldType::Text)
            .with_value("x")
            .with_disabled(true)];
        assert!(pairs(&fields, Config::new()).is_empty());
        assert_eq!(
            pairs(&fields, Config::new().disabled(true)),
            [pair("a", "x")]
        );
    }

    #[test]
    fn numbers() {
        let fields = [
            Field::input("a", FieldType::Number).with_value("12.5"),
            Field::input("b", FieldType::Number).with_value("0"),
            Field::input("c", FieldType::Number),
            Field::input("d", FieldType::Number).with_value("abc"),
        ];
        assert_eq!(pairs(&fields, Config::new()), [pair("a", 12.5)]);

        let all = pairs(&fields, Config::new().empty(true));
        assert_eq!(all[1], pair("b", 0.0));
        assert_eq!(all[2], pair("c", Value::Undefined));
        assert!(all[3].1.as_f64().is_some_and(f64::is_nan));
    }

    #[test]
    fn checkboxes() {
        let fields = [
            Field::input("a", FieldType::Checkbox).with_value("yes").with_checked(true),
            Field::input("b", FieldType::Checkbox).with_value("yes"),
            Field::input("c", FieldType::Checkbox)
                .with_checked(true)
                .with_indeterminate(true),
        ];
        assert_eq!(
            pairs(&fields, Config::new()),
            [pair("a", "yes"), pair("c", "on")]
        );
        assert_eq!(
            pairs(&fields, Config::new().empty(true)),
            [pair("a", "yes"), pair("b", ""), pair("c", "on")]
        );
        assert_eq!(
            pairs(&fields, Config::new().booleans(true)),
            [pair("a", true), pair("b", false), pair("c", Value::Null)]
        );
    }

    #[test]
    fn radios() {
        let fields = [
            Field::input("size", FieldType::Radio).with_value("s"),
            Field::input("size", FieldType::Radio).with_value("m").with_checked(true),
            Field::input("color", FieldType::Radio).with_value("red"),
            Field::input("note", FieldType::Text).with_value("n"),
            Field::input("color", FieldType::Radio).with_value("blue"),
        ];
        assert_eq!(
            pairs(&fields, Config::new()),
            [pair("size", "m"), pair("note", "n")]
        );
        assert_eq!(
            pairs(&fields, Config::new().empty(true)),
            [pair("size", "m"), pair("note", "n"), pair("color", "")]
        );
    }

    #[test]
    fn checked_radio_after_unchecked_member() {
        let fields = [
            Field::input("r", FieldType::Radio).with_value("1").with_checked(true),
            Field::input("r", FieldType::Radio).with_value("2"),
        ];
        assert_eq!(pairs(&fields, Config::new().booleans(true)), [pair("r", "1")]);
    }

    #[test]
    fn select_multiple() {
        let select = Field::select_multiple("tags")
            .with_option("x", true)
            .with_option("", true)
            .with_option("y", true)
            .with_option("z", false);

        assert_eq!(
            pairs(&[select.clone()], Config::new()),
            [pair("tags[]", "x"), pair("tags[]", "y")]
        );
        assert_eq!(
            pairs(&[select.clone()], Config::new().hash(false)),
            [pair("tags", "x"), pair("tags", "y")]
        );
        assert_eq!(
            pairs(&[select], Config::new().empty(true)),
            [pair("tags[]", "x"), pair("tags[]", ""), pair("tags[]", "y")]
        );

        let named_as_list = Field::select_multiple("tags[]").with_option("x", true);
        assert_eq!(
            pairs(&[named_as_list], Config::new()),
            [pair("tags[]", "x")]
        );
    }

    #[test]
    fn select_multiple_without_selection() {
        let select = Field::select_multiple("tags").with_option("x", false);
        assert!(pairs(&[select.clone()], Config::new()).is_empty());
        assert_eq!(
            pairs(&[select], Config::new().booleans(true)),
            [pair("tags", "")]
        );
    }

    #[test]
    fn empty_text_values() {
        let fields = [
            Field::input("a", FieldType::Text).with_value(""),
            Field::input("b", FieldType::Text),
            Field::textarea("c").with_value("body"),
        ];
        assert_eq!(pairs(&fields, Config::new()), [pair("c", "body")]);
        assert_eq!(
            pairs(&fields, Config::new().empty(true)),
            [pair("a", ""), pair("b", Value::Undefined), pair("c", "body")]
        );
    }
}
