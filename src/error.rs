//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

use crate::TagType;

/// Various errors that can occur while building, encoding, decoding, parsing
/// or accessing NBT.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An accessor for one tag type was used on a tag of another type.
    TypeMismatch { expected: TagType, found: TagType },

    /// A compound did not contain the requested key.
    KeyNotFound(String),

    /// A list or array position was past the end.
    IndexOutOfRange { index: usize, len: usize },

    /// Binary input could not be decoded: truncated data, an unknown tag,
    /// an oversized length, excessive nesting or a bad VarInt. Also used
    /// when a tree cannot be represented in a binary format.
    MalformedInput,

    /// SNBT text could not be parsed. Contains the byte offset into the
    /// input where the problem was found.
    Syntax { position: usize },

    /// A value of the wrong type was inserted into a list or typed array
    /// whose element type is already fixed.
    ListHeterogeneity { expected: TagType, found: TagType },

    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to
    /// new variants.
    Other,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

// The serde bridge reports unsupported Rust shapes through this.
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::bespoke(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::unexpected_eof(),
            _ => Error::bespoke(format!("io error: {}", e)),
        }
    }
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into SNBT input for syntax errors.
    pub fn position(&self) -> Option<usize> {
        match self.kind {
            ErrorKind::Syntax { position } => Some(position),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedInput)
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax { .. })
    }

    pub(crate) fn type_mismatch(expected: TagType, found: TagType) -> Error {
        Error {
            msg: format!("type mismatch: expected {}, found {}", expected, found),
            kind: ErrorKind::TypeMismatch { expected, found },
        }
    }

    pub(crate) fn key_not_found(key: &str) -> Error {
        Error {
            msg: format!("key not found: {:?}", key),
            kind: ErrorKind::KeyNotFound(key.to_owned()),
        }
    }

    pub(crate) fn index_out_of_range(index: usize, len: usize) -> Error {
        Error {
            msg: format!("index {} out of range for length {}", index, len),
            kind: ErrorKind::IndexOutOfRange { index, len },
        }
    }

    pub(crate) fn heterogeneous(expected: TagType, found: TagType) -> Error {
        Error {
            msg: format!(
                "list holds {} elements, cannot insert {}",
                expected, found
            ),
            kind: ErrorKind::ListHeterogeneity { expected, found },
        }
    }

    pub(crate) fn end_value(key: &str) -> Error {
        Error::bespoke(format!("compound value {:?} cannot be an end tag", key))
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Error {
        Error {
            msg: format!("malformed nbt: {}", msg.into()),
            kind: ErrorKind::MalformedInput,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error::malformed(format!("invalid nbt tag value: {}", tag))
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Error {
        Error::malformed(format!(
            "invalid nbt string: nonunicode: {}",
            String::from_utf8_lossy(data)
        ))
    }

    pub(crate) fn unexpected_eof() -> Error {
        Error::malformed("eof: unexpectedly ran out of input")
    }

    pub(crate) fn syntax(position: usize, msg: impl Display) -> Error {
        Error {
            msg: format!("invalid snbt at {}: {}", position, msg),
            kind: ErrorKind::Syntax { position },
        }
    }

    pub(crate) fn bespoke(msg: String) -> Error {
        Error {
            msg,
            kind: ErrorKind::Other,
        }
    }
}
