//! Building trees from plain Rust values.
//!
//! [`Variant`] is a loosely typed value: integers and floats that may or may
//! not have a fixed NBT width, strings, sequences, keyed maps and finished
//! tags. It exists only to be resolved into a [`Tag`] with
//! [`Variant::into_tag`], which applies these rules:
//!
//! * Rust types with an obvious NBT width keep it: `i8`, `u8` and `bool` are
//!   Byte, `i16`/`u16` Short, `i64`/`u64` Long and `f32` Float.
//! * `i32`, `u32`, `isize` and `usize` are plain integers and become Int.
//!   `f64` is a plain float and becomes Double.
//! * A sequence whose elements are all explicitly Byte, all explicitly Int or
//!   all explicitly Long becomes a typed array. Any other sequence becomes a
//!   [`List`], which must be homogeneous.
//! * A map becomes a [`Compound`], keeping the order of its entries.
//! * A [`Tag`] is used as is.
//!
//! ```
//! use quicknbt::{Tag, TagType, Variant};
//!
//! # fn main() -> quicknbt::error::Result<()> {
//! let plain = Variant::from(vec![1, 2, 34, 92873]).into_tag()?;
//! assert_eq!(plain.as_list()?.element_type(), TagType::Int);
//!
//! let shorts = Variant::from(vec![23_i16, 87]).into_tag()?;
//! assert_eq!(shorts.as_list()?.element_type(), TagType::Short);
//!
//! let bytes = Variant::from(vec![1_i8, 2, 3]).into_tag()?;
//! assert_eq!(bytes.tag_type(), TagType::ByteArray);
//! # Ok(())
//! # }
//! ```
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::{ByteArray, Compound, IntArray, List, LongArray, Tag};

mod access;
mod ser;

pub use access::Values;
pub use ser::{to_tag, Serializer};

/// The NBT width an integer was given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Byte,
    Short,
    Int,
    Long,
}

/// The NBT width a float was given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    Float,
    Double,
}

/// A dynamically typed value that resolves into a [`Tag`].
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int {
        value: i64,
        width: Option<IntWidth>,
    },
    Float {
        value: f64,
        width: Option<FloatWidth>,
    },
    Str(String),
    Seq(Vec<Variant>),
    Map(Vec<(String, Variant)>),
    Tag(Tag),
}

impl Variant {
    /// An integer with no width of its own. Resolves to Int.
    pub fn integer(value: i64) -> Self {
        Variant::Int { value, width: None }
    }

    pub fn byte(value: i8) -> Self {
        Variant::Int {
            value: value as i64,
            width: Some(IntWidth::Byte),
        }
    }

    pub fn short(value: i16) -> Self {
        Variant::Int {
            value: value as i64,
            width: Some(IntWidth::Short),
        }
    }

    /// An integer explicitly marked as Int. Unlike a plain integer, a
    /// sequence of these becomes an IntArray.
    pub fn int(value: i32) -> Self {
        Variant::Int {
            value: value as i64,
            width: Some(IntWidth::Int),
        }
    }

    pub fn long(value: i64) -> Self {
        Variant::Int {
            value,
            width: Some(IntWidth::Long),
        }
    }

    pub fn float(value: f32) -> Self {
        Variant::Float {
            value: value as f64,
            width: Some(FloatWidth::Float),
        }
    }

    pub fn double(value: f64) -> Self {
        Variant::Float {
            value,
            width: Some(FloatWidth::Double),
        }
    }

    /// A map from any iterator of key/value pairs, in iteration order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Variant>,
        I: IntoIterator<Item = (K, V)>,
    {
        Variant::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resolve into a tag. Fails when a sequence would make a list with
    /// mixed element types, or when a map holds a `Tag::End` value.
    pub fn into_tag(self) -> Result<Tag> {
        Ok(match self {
            Variant::Int { value, width } => match width {
                Some(IntWidth::Byte) => Tag::Byte(value as i8),
                Some(IntWidth::Short) => Tag::Short(value as i16),
                Some(IntWidth::Long) => Tag::Long(value),
                Some(IntWidth::Int) | None => Tag::Int(value as i32),
            },
            Variant::Float { value, width } => match width {
                Some(FloatWidth::Float) => Tag::Float(value as f32),
                Some(FloatWidth::Double) | None => Tag::Double(value),
            },
            Variant::Str(s) => Tag::String(s),
            Variant::Tag(tag) => tag,
            Variant::Map(entries) => {
                let mut compound = Compound::with_capacity(entries.len());
                for (key, value) in entries {
                    compound.insert(key, value.into_tag()?)?;
                }
                Tag::Compound(compound)
            }
            Variant::Seq(items) => match array_width(&items) {
                Some(width) => typed_array(width, items),
                None => {
                    let mut list = List::new();
                    for item in items {
                        list.push(item.into_tag()?)?;
                    }
                    Tag::List(list)
                }
            },
        })
    }
}

/// The shared explicit width of a sequence that should become a typed array.
fn array_width(items: &[Variant]) -> Option<IntWidth> {
    let first = match items.first()? {
        Variant::Int {
            width: Some(w @ (IntWidth::Byte | IntWidth::Int | IntWidth::Long)),
            ..
        } => *w,
        _ => return None,
    };
    items
        .iter()
        .all(|v| matches!(v, Variant::Int { width: Some(w), .. } if *w == first))
        .then(|| first)
}

fn typed_array(width: IntWidth, items: Vec<Variant>) -> Tag {
    let values = items.into_iter().filter_map(|v| match v {
        Variant::Int { value, .. } => Some(value),
        _ => None,
    });
    match width {
        IntWidth::Byte => Tag::ByteArray(values.map(|v| v as i8).collect()),
        IntWidth::Long => Tag::LongArray(values.collect()),
        _ => Tag::IntArray(values.map(|v| v as i32).collect()),
    }
}

impl TryFrom<Variant> for Tag {
    type Error = Error;

    fn try_from(variant: Variant) -> Result<Self> {
        variant.into_tag()
    }
}

impl Tag {
    /// Wrap this tag as a variant. Resolving it again gives back the same tag.
    pub fn into_variant(self) -> Variant {
        Variant::Tag(self)
    }
}

macro_rules! variant_from_int {
    ($width:expr => $($ty:ident)*) => {
        $(
            impl From<$ty> for Variant {
                fn from(v: $ty) -> Self {
                    Variant::Int {
                        value: v as i64,
                        width: $width,
                    }
                }
            }
        )*
    };
}

variant_from_int!(None => i32 u32 isize usize);
variant_from_int!(Some(IntWidth::Byte) => i8 u8);
variant_from_int!(Some(IntWidth::Short) => i16 u16);
variant_from_int!(Some(IntWidth::Long) => i64 u64);

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::byte(v as i8)
    }
}

impl From<f32> for Variant {
    fn from(v: f32) -> Self {
        Variant::float(v)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float { value, width: None }
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::Str(v.to_owned())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::Str(v)
    }
}

impl From<&String> for Variant {
    fn from(v: &String) -> Self {
        Variant::Str(v.clone())
    }
}

macro_rules! variant_from_tag {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for Variant {
                fn from(v: $ty) -> Self {
                    Variant::Tag(v.into())
                }
            }
        )*
    };
}

variant_from_tag!(Tag List Compound ByteArray IntArray LongArray);

impl<T: Into<Variant>> From<Vec<T>> for Variant {
    fn from(v: Vec<T>) -> Self {
        Variant::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Variant>, const N: usize> From<[T; N]> for Variant {
    fn from(v: [T; N]) -> Self {
        Variant::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Variant>> From<&[T]> for Variant {
    fn from(v: &[T]) -> Self {
        Variant::Seq(v.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Variant>> From<IndexMap<K, V>> for Variant {
    fn from(v: IndexMap<K, V>) -> Self {
        Variant::map(v)
    }
}

impl<K: Into<String>, V: Into<Variant>> From<BTreeMap<K, V>> for Variant {
    fn from(v: BTreeMap<K, V>) -> Self {
        Variant::map(v)
    }
}

impl<K: Into<String>, V: Into<Variant>> From<HashMap<K, V>> for Variant {
    fn from(v: HashMap<K, V>) -> Self {
        Variant::map(v)
    }
}

impl<T: Into<Variant>> FromIterator<T> for Variant {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Variant::Seq(iter.into_iter().map(Into::into).collect())
    }
}
