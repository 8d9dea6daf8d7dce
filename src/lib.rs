//! quicknbt works with NBT (Named Binary Tag) trees: a compact, typed and
//! self-describing binary format used by *Minecraft* to store world data,
//! player inventories and network payloads.
//!
//! * For the in-memory tree see [`Tag`], [`List`] and [`Compound`].
//! * For the binary codec, including the little-endian and VarInt encodings
//!   used by *Bedrock Edition*, see [`binary`].
//! * For the human-readable text form (SNBT) see [`snbt`].
//! * For building trees out of plain Rust values see [`Variant`] and the
//!   [`nbt!`] macro.
//!
//! ```toml
//! [dependencies]
//! quicknbt = "0.1"
//! ```
//!
//! # Quick example
//!
//! Build a tree, write it in the Java Edition format, read it back and print
//! it as SNBT.
//!
//! ```
//! use quicknbt::{nbt, binary::{self, BinaryFormat}, snbt::SnbtFormat};
//!
//! # fn main() -> quicknbt::error::Result<()> {
//! let player = nbt!({
//!     "DataVersion": 3465,
//!     "Name": "Steve",
//!     "Pos": [1.5, 64.0, -3.25],
//!     "Inventory": [
//!         { "id": "minecraft:stone", "Count": 64_i8 },
//!     ],
//! })?;
//!
//! let bytes = binary::to_bytes(&player, BinaryFormat::BigEndianFixed)?;
//! let back = binary::from_bytes(&bytes, BinaryFormat::BigEndianFixed)?;
//! assert_eq!(player, back);
//!
//! println!("{}", quicknbt::snbt::to_snbt(&back, SnbtFormat::pretty(4)));
//! # Ok(())
//! # }
//! ```
//!
//! # Lists are homogeneous
//!
//! Unlike JSON arrays, every element of an NBT list has the same tag type.
//! [`List`] fixes its element type on the first insertion and rejects
//! anything else with [`ErrorKind::ListHeterogeneity`][error::ErrorKind].

pub mod binary;
pub mod error;
pub mod snbt;

mod arrays;
mod bridge;
mod macros;
mod tag;

pub use arrays::*;
pub use bridge::*;
pub use tag::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;

use serde::Serialize;

/// The kind of an NBT tag. This does not carry the value or the name of the
/// data.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum TagType {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all elements have the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually, the tags will very rarely change
// so isn't a massive burden, but saves a significant amount of compile time.
impl TryFrom<u8> for TagType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use TagType::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagType> for u8 {
    fn from(tag: TagType) -> Self {
        tag as u8
    }
}

impl TagType {
    /// Size in bytes of one payload of this type when it has a fixed width in
    /// every binary format. Int and Long are variable in the VarInt format, so
    /// callers must check the format before relying on those two.
    pub(crate) const fn fixed_width(self) -> Option<usize> {
        match self {
            TagType::Byte => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float => Some(4),
            TagType::Long | TagType::Double => Some(8),
            _ => None,
        }
    }

    /// Name of the type as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TagType::End => "End",
            TagType::Byte => "Byte",
            TagType::Short => "Short",
            TagType::Int => "Int",
            TagType::Long => "Long",
            TagType::Float => "Float",
            TagType::Double => "Double",
            TagType::ByteArray => "ByteArray",
            TagType::String => "String",
            TagType::List => "List",
            TagType::Compound => "Compound",
            TagType::IntArray => "IntArray",
            TagType::LongArray => "LongArray",
        }
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
