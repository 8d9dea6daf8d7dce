//! SNBT, the text form of NBT.
//!
//! ```
//! use quicknbt::{snbt::{self, SnbtFormat}, Tag};
//!
//! # fn main() -> quicknbt::error::Result<()> {
//! let tag = snbt::from_snbt(r#"{name: "Steve", health: 20.0f, pos: [I; 1, 64, -3]}"#)?;
//! assert_eq!(tag.get("health")?, &Tag::Float(20.0));
//!
//! assert_eq!(
//!     snbt::to_snbt(&tag, SnbtFormat::compact()),
//!     "{name:Steve,health:20.0f,pos:[I;1,64,-3]}"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Every scalar except Int prints with its type suffix and compound entries
//! print in insertion order, so text produced by [`to_snbt`] always parses
//! back to an equal tree.
//!
//! Bare words are classified like so:
//!
//! | Text | Tag |
//! | --- | --- |
//! | `1b`, `1s`, `1`, `1l` | Byte, Short, Int, Long |
//! | `1.5f`, `1.5`, `1.5d`, `1e3` | Float, Double, Double, Double |
//! | `NaN`, `Infinity`, `-Infinity` | Double, or Float with an `f` suffix |
//! | `true`, `false` | Byte 1 and 0 |
//! | anything else | String |
//!
//! An integer that does not fit its type is an error rather than a string.
use crate::error::{Error, Result};
use crate::Tag;

mod parser;
mod printer;

use parser::Parser;
use printer::Printer;

/// How [`to_snbt`] lays out text.
///
/// ```
/// use quicknbt::{nbt, snbt::{to_snbt, SnbtFormat}};
///
/// # fn main() -> quicknbt::error::Result<()> {
/// let tag = nbt!({ "id": "stone", "data": [B; 1_i8, 2_i8] })?;
/// assert_eq!(to_snbt(&tag, SnbtFormat::compact()), "{id:stone,data:[B;1b,2b]}");
/// assert_eq!(
///     to_snbt(&tag, SnbtFormat::pretty(2).force_quote(true)),
///     "{\n  \"id\": \"stone\",\n  \"data\": [B; 1b, 2b]\n}"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnbtFormat {
    pub(crate) indent: usize,
    pub(crate) force_quote: bool,
    pub(crate) ascii_escape: bool,
    pub(crate) array_line_feed: bool,
    pub(crate) always_line_feed: bool,
}

impl SnbtFormat {
    /// Widest indent per level that pretty printing uses.
    pub const MAX_INDENT: usize = 64;

    /// Everything on one line with no optional whitespace.
    pub const fn compact() -> Self {
        Self {
            indent: 0,
            force_quote: false,
            ascii_escape: false,
            array_line_feed: false,
            always_line_feed: false,
        }
    }

    /// Compound entries and nested lists on their own lines, indented by
    /// `indent` spaces per level. An indent of zero is the same as
    /// [`SnbtFormat::compact`]; indents wider than [`MAX_INDENT`] are
    /// clamped to it.
    ///
    /// [`MAX_INDENT`]: SnbtFormat::MAX_INDENT
    pub const fn pretty(indent: usize) -> Self {
        Self {
            indent: if indent > Self::MAX_INDENT {
                Self::MAX_INDENT
            } else {
                indent
            },
            ..Self::compact()
        }
    }

    /// Quote every key and string, even those that could be bare.
    pub const fn force_quote(mut self, value: bool) -> Self {
        self.force_quote = value;
        self
    }

    /// Write non-ASCII characters as `\u` escapes.
    pub const fn ascii_escape(mut self, value: bool) -> Self {
        self.ascii_escape = value;
        self
    }

    /// Put every typed array element on its own line when pretty printing.
    pub const fn array_line_feed(mut self, value: bool) -> Self {
        self.array_line_feed = value;
        self
    }

    /// Break every non-empty list over lines when pretty printing, not just
    /// lists of lists and compounds.
    pub const fn always_line_feed(mut self, value: bool) -> Self {
        self.always_line_feed = value;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for SnbtFormat {
    fn default() -> Self {
        Self::pretty(4)
    }
}

/// Parse SNBT text. The whole input must be one value, surrounded by
/// optional whitespace. Empty input is the empty document, `Tag::End`.
pub fn from_snbt(input: &str) -> Result<Tag> {
    let mut parser = Parser::new(input);
    let tag = parser.document()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(Error::syntax(parser.position(), "trailing input"));
    }
    Ok(tag)
}

/// Parse one value from the start of `input`, ignoring whatever follows it.
/// Returns the value and the number of bytes it used, including leading
/// whitespace.
///
/// ```
/// # use quicknbt::{snbt, Tag};
/// let (tag, used) = snbt::from_snbt_partial("12s and more").unwrap();
/// assert_eq!(tag, Tag::Short(12));
/// assert_eq!(used, 3);
/// ```
pub fn from_snbt_partial(input: &str) -> Result<(Tag, usize)> {
    let mut parser = Parser::new(input);
    let tag = parser.document()?;
    Ok((tag, parser.position()))
}

/// Print a tree as SNBT. `Tag::End` prints as the empty string.
pub fn to_snbt(tag: &Tag, format: SnbtFormat) -> String {
    let mut printer = Printer::new(format);
    printer.tag(tag);
    printer.finish()
}

impl Tag {
    /// Print this tree as SNBT. `Display` does the same in compact form.
    pub fn to_snbt(&self, format: SnbtFormat) -> String {
        to_snbt(self, format)
    }
}
