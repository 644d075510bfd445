//! Field descriptors: the read-only view of a form control that the
//! serializer consumes.
//!
//! Anything that can answer the questions in [`FormControl`] can be
//! serialized. [`Field`] is a plain owned implementation, which can also be
//! deserialized from JSON:
//!
//! ```
//! use form_serialize::{Field, FieldType};
//!
//! let fields: Vec<Field> = serde_json::from_str(r#"[
//!     { "name": "user[name]", "type": "text", "value": "Alice" },
//!     { "name": "terms", "type": "checkbox", "checked": true }
//! ]"#).unwrap();
//!
//! assert_eq!(fields[1].field_type, FieldType::Checkbox);
//! assert_eq!(form_serialize::to_string(&fields), "user%5Bname%5D=Alice&terms=on");
//! ```

use serde::Deserialize;

/// The element a control is rendered as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Element {
    #[default]
    Input,
    Select,
    Textarea,
    Keygen,
    Button,
    Other,
}

impl Element {
    /// Whether controls of this element can ever contribute a value.
    pub fn is_success_control(self) -> bool {
        matches!(
            self,
            Element::Input | Element::Select | Element::Textarea | Element::Keygen
        )
    }
}

impl From<&str> for Element {
    fn from(tag: &str) -> Self {
        const TAGS: [(&str, Element); 5] = [
            ("input", Element::Input),
            ("select", Element::Select),
            ("textarea", Element::Textarea),
            ("keygen", Element::Keygen),
            ("button", Element::Button),
        ];
        TAGS.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map_or(Element::Other, |(_, element)| *element)
    }
}

impl From<String> for Element {
    fn from(tag: String) -> Self {
        Element::from(tag.as_str())
    }
}

/// The `type` of a control.
///
/// Only the types with special serialization rules get their own variant;
/// every other text-like type is [`FieldType::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Checkbox,
    Radio,
    SelectOne,
    SelectMultiple,
    Textarea,
    Submit,
    Button,
    Image,
    Reset,
    File,
    Other,
}

impl FieldType {
    /// Submit-like controls never contribute a value.
    pub fn is_submitter(self) -> bool {
        matches!(
            self,
            FieldType::Submit
                | FieldType::Button
                | FieldType::Image
                | FieldType::Reset
                | FieldType::File
        )
    }
}

impl From<&str> for FieldType {
    fn from(ty: &str) -> Self {
        const TYPES: [(&str, FieldType); 12] = [
            ("text", FieldType::Text),
            ("number", FieldType::Number),
            ("checkbox", FieldType::Checkbox),
            ("radio", FieldType::Radio),
            ("select-one", FieldType::SelectOne),
            ("select-multiple", FieldType::SelectMultiple),
            ("textarea", FieldType::Textarea),
            ("submit", FieldType::Submit),
            ("button", FieldType::Button),
            ("image", FieldType::Image),
            ("reset", FieldType::Reset),
            ("file", FieldType::File),
        ];
        let ty = ty.trim();
        TYPES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(ty))
            .map_or(FieldType::Other, |(_, field_type)| *field_type)
    }
}

impl From<String> for FieldType {
    fn from(ty: String) -> Self {
        FieldType::from(ty.as_str())
    }
}

/// One `<option>` of a select control.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            selected,
        }
    }
}

/// Read access to a form control.
///
/// The serializer never mutates a control, and reads only the properties
/// relevant to its type: `checked` for checkboxes and radios,
/// `indeterminate` for checkboxes, `options` for multi-selects.
pub trait FormControl {
    fn name(&self) -> &str;

    fn element(&self) -> Element;

    fn field_type(&self) -> FieldType;

    fn value(&self) -> Option<&str>;

    fn checked(&self) -> bool;

    fn indeterminate(&self) -> bool {
        false
    }

    fn disabled(&self) -> bool;

    fn options(&self) -> &[SelectOption] {
        &[]
    }
}

impl<T: FormControl + ?Sized> FormControl for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn element(&self) -> Element {
        (**self).element()
    }

    fn field_type(&self) -> FieldType {
        (**self).field_type()
    }

    fn value(&self) -> Option<&str> {
        (**self).value()
    }

    fn checked(&self) -> bool {
        (**self).checked()
    }

    fn indeterminate(&self) -> bool {
        (**self).indeterminate()
    }

    fn disabled(&self) -> bool {
        (**self).disabled()
    }

    fn options(&self) -> &[SelectOption] {
        (**self).options()
    }
}

/// An owned field descriptor.
///
/// ```
/// use form_serialize::{Field, FieldType};
///
/// let fields = [
///     Field::input("email", FieldType::Text).with_value("a@example.com"),
///     Field::input("remember", FieldType::Checkbox).with_checked(true),
///     Field::select_multiple("tags")
///         .with_option("x", true)
///         .with_option("y", false),
/// ];
/// assert_eq!(
///     form_serialize::to_string(&fields),
///     "email=a%40example.com&remember=on&tags=x",
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "nodeName")]
    pub element: Element,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub indeterminate: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl Field {
    /// An `<input>` of the given type.
    pub fn input(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            element: Element::Input,
            field_type,
            ..Default::default()
        }
    }

    /// A single-choice `<select>`.
    pub fn select(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: Element::Select,
            field_type: FieldType::SelectOne,
            ..Default::default()
        }
    }

    /// A `<select multiple>`.
    pub fn select_multiple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: Element::Select,
            field_type: FieldType::SelectMultiple,
            ..Default::default()
        }
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: Element::Textarea,
            field_type: FieldType::Textarea,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_indeterminate(mut self, indeterminate: bool) -> Self {
        self.indeterminate = indeterminate;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Appends an option to a select control.
    pub fn with_option(mut self, value: impl Into<String>, selected: bool) -> Self {
        self.options.push(SelectOption::new(value, selected));
        self
    }
}

impl FormControl for Field {
    fn name(&self) -> &str {
        &self.name
    }

    fn element(&self) -> Element {
        self.element
    }

    fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// A checked box without a `value` attribute submits `on`. A select
    /// reports its first selected option.
    fn value(&self) -> Option<&str> {
        match (self.value.as_deref(), self.field_type) {
            (Some(value), _) => Some(value),
            (None, FieldType::Checkbox | FieldType::Radio) => Some("on"),
            (None, FieldType::SelectOne | FieldType::SelectMultiple) => self
                .options
                .iter()
                .find(|option| option.selected)
                .map(|option| option.value.as_str()),
            (None, _) => None,
        }
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn indeterminate(&self) -> bool {
        self.indeterminate
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn options(&self) -> &[SelectOption] {
        &self.options
    }
}
