//! Parsing of bracket-notation field names into key paths.
//!
//! `user[address][0][city]` becomes the path
//! `Name("user"), Name("address"), Index(0), Name("city")`.

use std::fmt;

use tracing::debug;

use crate::value::parse_number;

/// One step of a key path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A named key: the leading part of the field name, or a bracket group
    /// whose content is not a number.
    Name(&'a str),
    /// A bracket group whose content reads as a non-negative integer, the
    /// way a `number` field value is read: ` 3`, `1e1` and `0x1` all index.
    Index(usize),
    /// The empty bracket group `[]`.
    Append,
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(name) => write!(f, "\"{name}\""),
            Segment::Index(i) => write!(f, "[{i}]"),
            Segment::Append => write!(f, "[]"),
        }
    }
}

/// A parsed bracket-notation key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> KeyPath<'a> {
    /// Parses `key` into a path.
    ///
    /// Returns `None` when the key holds no complete bracket group; such
    /// keys are assigned directly rather than through a path.
    ///
    /// The text before the first bracket (if any) is the root segment. Every
    /// `[...]` group without nested brackets then contributes one segment,
    /// scanning left to right. Text between groups is ignored, as are
    /// unbalanced brackets.
    ///
    /// At most `max_depth` groups become segments. Everything from the next
    /// group on is kept as one name, so a key cannot nest arbitrarily deep.
    pub fn parse(key: &'a str, max_depth: usize) -> Option<Self> {
        let mut groups = bracket_groups(key).peekable();
        groups.peek()?;

        let root_end = key.find(['[', ']']).unwrap_or(key.len());
        let mut segments = Vec::with_capacity(4);
        if root_end > 0 {
            segments.push(Segment::Name(&key[..root_end]));
        }
        for (depth, (open, content)) in groups.enumerate() {
            if depth == max_depth {
                debug!(max_depth, "key nested too deeply, keeping the rest as one name");
                segments.push(Segment::Name(&key[open..]));
                break;
            }
            segments.push(classify(content));
        }
        Some(KeyPath { segments })
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }
}

/// Iterates the contents of every `[...]` group that contains no other
/// bracket, along with the position of its opening bracket.
fn bracket_groups(key: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut rest = 0;
    std::iter::from_fn(move || {
        loop {
            let open = rest + key[rest..].find('[')?;
            let content_start = open + 1;
            match key[content_start..].find(['[', ']']) {
                None => {
                    rest = key.len();
                    return None;
                }
                Some(offset) => {
                    let close = content_start + offset;
                    if key.as_bytes()[close] == b'[' {
                        // nested or unbalanced: restart from the inner bracket
                        rest = close;
                        continue;
                    }
                    rest = close + 1;
                    return Some((open, &key[content_start..close]));
                }
            }
        }
    })
}

fn classify(content: &str) -> Segment<'_> {
    if content.is_empty() {
        return Segment::Append;
    }
    // NaN and infinities fail the fraction check
    let n = parse_number(content);
    if n >= 0.0 && n.fract() == 0.0 && n < usize::MAX as f64 {
        return Segment::Index(n as usize);
    }
    Segment::Name(content)
}
