use serde::de;

use std::fmt::Display;
use std::io;

/// Errors raised while writing flat output or deserializing a structured
/// result into a typed value.
///
/// Building the result itself never fails: ambiguous keys and empty values
/// are resolved by policy rather than reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Custom error raised by a `Deserialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// Failure writing flat output to a writer.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Generate an error describing a value of the wrong shape.
    pub fn unexpected<T>(expected: &'static str, found: T) -> Self
    where
        T: Display,
    {
        Error::Custom(format!("expected {expected}, found {found}"))
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}
