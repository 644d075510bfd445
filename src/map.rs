//! Ordered map used for object nodes of the result tree.
//!
//! Keys keep the order in which fields first assigned them, so serializing
//! the same fields twice always produces the same tree.

use crate::Value;

pub type Map = indexmap::IndexMap<String, Value>;

pub use indexmap::map::Entry;
