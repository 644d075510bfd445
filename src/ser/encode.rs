use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// The URI component set: every byte except the ASCII alphanumerics and
/// `-_.!~*'()` is percent-encoded.
const URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Same as [`URI_COMPONENT_SET`], but leaves spaces alone so they can be
/// written as `+`.
const FORM_VALUE_SET: &AsciiSet = &URI_COMPONENT_SET.remove(b' ');

/// Percent-encodes a key. Spaces become `%20`.
pub fn encode_key(key: &str) -> impl Iterator<Item = &str> + '_ {
    percent_encoding::utf8_percent_encode(key, URI_COMPONENT_SET)
}

/// Percent-encodes a value. Spaces become `+`.
///
/// The iterator yields borrowed chunks of the input wherever no encoding is
/// needed.
pub fn encode_value(value: &str) -> impl Iterator<Item = Cow<'_, str>> + '_ {
    percent_encoding::utf8_percent_encode(value, FORM_VALUE_SET).map(|s| {
        if s.contains(' ') {
            Cow::Owned(s.replace(' ', "+"))
        } else {
            Cow::Borrowed(s)
        }
    })
}

/// Normalizes every line break (`\n` or `\r\n`) to `\r\n`. A lone `\r` is
/// left as is.
pub fn normalize_newlines(value: &str) -> Cow<'_, str> {
    if !value.contains('\n') {
        return Cow::Borrowed(value);
    }
    let mut normalized = String::with_capacity(value.len() + 8);
    let mut previous = None;
    for c in value.chars() {
        if c == '\n' && previous != Some('\r') {
            normalized.push('\r');
        }
        normalized.push(c);
        previous = Some(c);
    }
    Cow::Owned(normalized)
}

#[cfg(test)]
mod test {
    use super::{encode_key, encode_value, normalize_newlines};

    use pretty_assertions::assert_eq;

    fn collect<T: AsRef<str>>(iter: impl Iterator<Item = T>) -> String {
        iter.map(|s| s.as_ref().to_owned()).collect()
    }

    #[test]
    fn keys_keep_percent_encoded_spaces() {
        assert_eq!(collect(encode_key("full name")), "full%20name");
        assert_eq!(collect(encode_key("a[b][]")), "a%5Bb%5D%5B%5D");
    }

    #[test]
    fn values_use_plus_for_spaces() {
        assert_eq!(collect(encode_value("a b  c")), "a+b++c");
        assert_eq!(collect(encode_value("1+1=2")), "1%2B1%3D2");
        assert_eq!(collect(encode_value("it's (fine)!*~")), "it's+(fine)!*~");
        assert_eq!(collect(encode_value("comté")), "comt%C3%A9");
    }

    #[test]
    fn newlines() {
        assert_eq!(normalize_newlines("a\nb"), "a\r\nb");
        assert_eq!(normalize_newlines("a\r\nb"), "a\r\nb");
        assert_eq!(normalize_newlines("a\rb"), "a\rb");
        assert_eq!(normalize_newlines("\n\r\n\n"), "\r\n\r\n\r\n");
    }
}
