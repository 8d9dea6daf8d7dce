mod compound;
mod list;

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::{
    error::{Error, Result},
    ByteArray, IntArray, LongArray, TagType,
};

pub use self::compound::Compound;
pub use self::list::List;

/// Tag is a complete NBT value. It owns its data, and every child is owned by
/// exactly one parent, so a tree can be cloned, moved and dropped like any
/// other Rust value.
///
/// The kind of a tag never changes through the typed accessors. Use
/// [`Tag::tag_type`] to find out what a tag holds, or the `as_*` methods to
/// get at the payload. An accessor for the wrong kind is an error rather than
/// a conversion:
///
/// ```
/// # use quicknbt::{Tag, TagType};
/// let tag = Tag::Short(7);
/// assert_eq!(tag.tag_type(), TagType::Short);
/// assert_eq!(tag.as_short().unwrap(), 7);
/// assert!(tag.as_int().is_err());
/// ```
///
/// `Tag::End` marks the end of a compound in the binary format. It is never a
/// list element or compound value, but an `End` root is how an empty document
/// is represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tag {
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(ByteArray),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(IntArray),
    LongArray(LongArray),
}

macro_rules! scalar_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Get the value of a `", stringify!($variant), "` tag.")]
        pub fn $name(&self) -> Result<$ty> {
            match self {
                Tag::$variant(v) => Ok(*v),
                other => Err(Error::type_mismatch(TagType::$variant, other.tag_type())),
            }
        }
    };
}

macro_rules! ref_accessor {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Borrow the payload of a `", stringify!($variant), "` tag.")]
        pub fn $name(&self) -> Result<&$ty> {
            match self {
                Tag::$variant(v) => Ok(v),
                other => Err(Error::type_mismatch(TagType::$variant, other.tag_type())),
            }
        }

        #[doc = concat!("Mutably borrow the payload of a `", stringify!($variant), "` tag.")]
        pub fn $name_mut(&mut self) -> Result<&mut $ty> {
            match self {
                Tag::$variant(v) => Ok(v),
                other => Err(Error::type_mismatch(TagType::$variant, other.tag_type())),
            }
        }
    };
}

impl Tag {
    /// Create the default value for a tag type: zero, an empty string or an
    /// empty container.
    pub fn new(tag_type: TagType) -> Tag {
        match tag_type {
            TagType::End => Tag::End,
            TagType::Byte => Tag::Byte(0),
            TagType::Short => Tag::Short(0),
            TagType::Int => Tag::Int(0),
            TagType::Long => Tag::Long(0),
            TagType::Float => Tag::Float(0.0),
            TagType::Double => Tag::Double(0.0),
            TagType::ByteArray => Tag::ByteArray(ByteArray::default()),
            TagType::String => Tag::String(String::new()),
            TagType::List => Tag::List(List::new()),
            TagType::Compound => Tag::Compound(Compound::new()),
            TagType::IntArray => Tag::IntArray(IntArray::default()),
            TagType::LongArray => Tag::LongArray(LongArray::default()),
        }
    }

    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::End,
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Tag::End)
    }

    scalar_accessor!(as_byte, Byte, i8);
    scalar_accessor!(as_short, Short, i16);
    scalar_accessor!(as_int, Int, i32);
    scalar_accessor!(as_long, Long, i64);
    scalar_accessor!(as_float, Float, f32);
    scalar_accessor!(as_double, Double, f64);

    ref_accessor!(as_string, as_string_mut, String, String);
    ref_accessor!(as_byte_array, as_byte_array_mut, ByteArray, ByteArray);
    ref_accessor!(as_int_array, as_int_array_mut, IntArray, IntArray);
    ref_accessor!(as_long_array, as_long_array_mut, LongArray, LongArray);
    ref_accessor!(as_list, as_list_mut, List, List);
    ref_accessor!(as_compound, as_compound_mut, Compound, Compound);

    /// Borrow the text of a `String` tag.
    pub fn as_str(&self) -> Result<&str> {
        self.as_string().map(String::as_str)
    }

    /// Any numeric tag as an `i64`. Floats are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            Tag::Float(v) => Some(v as i64),
            Tag::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Any numeric tag as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Short(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Store an integer into a numeric tag without changing its type. Values
    /// that do not fit wrap using two's complement, so setting `300` on a
    /// `Byte` stores `44`.
    pub fn set_integer(&mut self, value: i64) -> Result<()> {
        match self {
            Tag::Byte(v) => *v = value as i8,
            Tag::Short(v) => *v = value as i16,
            Tag::Int(v) => *v = value as i32,
            Tag::Long(v) => *v = value,
            Tag::Float(v) => *v = value as f32,
            Tag::Double(v) => *v = value as f64,
            other => return Err(Error::type_mismatch(TagType::Long, other.tag_type())),
        }
        Ok(())
    }

    /// Store a floating point value into a `Float` or `Double` tag. Float
    /// tags round to the nearest `f32`.
    pub fn set_float(&mut self, value: f64) -> Result<()> {
        match self {
            Tag::Float(v) => *v = value as f32,
            Tag::Double(v) => *v = value,
            other => return Err(Error::type_mismatch(TagType::Double, other.tag_type())),
        }
        Ok(())
    }

    /// Structural hash of the tree. Equal trees hash equally; floats are
    /// hashed by their bit pattern.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Convert to JSON text. Indentation of zero gives compact output. This
    /// is lossy: numbers forget their NBT type and arrays become JSON arrays.
    pub fn to_json(&self, indent: usize) -> Result<String> {
        if indent == 0 {
            return serde_json::to_string(self).map_err(|e| Error::bespoke(e.to_string()));
        }

        let indent = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)
            .map_err(|e| Error::bespoke(e.to_string()))?;

        String::from_utf8(out).map_err(|e| Error::bespoke(e.to_string()))
    }
}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag_type().hash(state);
        match self {
            Tag::End => {}
            Tag::Byte(v) => v.hash(state),
            Tag::Short(v) => v.hash(state),
            Tag::Int(v) => v.hash(state),
            Tag::Long(v) => v.hash(state),
            Tag::Float(v) => v.to_bits().hash(state),
            Tag::Double(v) => v.to_bits().hash(state),
            Tag::ByteArray(v) => v.hash(state),
            Tag::String(v) => v.hash(state),
            Tag::List(v) => v.hash(state),
            Tag::Compound(v) => v.hash(state),
            Tag::IntArray(v) => v.hash(state),
            Tag::LongArray(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Tag {
    /// Compact SNBT.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::snbt::to_snbt(self, crate::snbt::SnbtFormat::compact()))
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Tag::End => serializer.serialize_unit(),
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::ByteArray(v) => v.serialize(serializer),
            Tag::IntArray(v) => v.serialize(serializer),
            Tag::LongArray(v) => v.serialize(serializer),
            Tag::List(v) => v.serialize(serializer),
            Tag::Compound(v) => v.serialize(serializer),
        }
    }
}

#[cfg(feature = "arbitrary1")]
fn arb_list(u: &mut arbitrary::Unstructured, depth: usize) -> arbitrary::Result<List> {
    let element = u.arbitrary::<TagType>()?;
    if element == TagType::End {
        return Ok(List::new());
    }

    let len = u.arbitrary_len::<Tag>()?;
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(arb_tag_of(u, element, depth + 1)?);
    }

    // Every element was generated from the same tag type.
    List::try_from(items).map_err(|_| arbitrary::Error::IncorrectFormat)
}

#[cfg(feature = "arbitrary1")]
fn arb_tag_of(
    u: &mut arbitrary::Unstructured,
    tag_type: TagType,
    depth: usize,
) -> arbitrary::Result<Tag> {
    // Keep generated trees shallow enough to stay under the decode depth limit.
    let tag_type = match tag_type {
        TagType::List | TagType::Compound if depth > 16 => TagType::Int,
        other => other,
    };

    Ok(match tag_type {
        TagType::End => return Err(arbitrary::Error::IncorrectFormat),
        TagType::Byte => Tag::Byte(u.arbitrary()?),
        TagType::Short => Tag::Short(u.arbitrary()?),
        TagType::Int => Tag::Int(u.arbitrary()?),
        TagType::Long => Tag::Long(u.arbitrary()?),
        TagType::Float => Tag::Float(u.arbitrary()?),
        TagType::Double => Tag::Double(u.arbitrary()?),
        TagType::ByteArray => Tag::ByteArray(u.arbitrary()?),
        TagType::String => Tag::String(u.arbitrary()?),
        TagType::IntArray => Tag::IntArray(u.arbitrary()?),
        TagType::LongArray => Tag::LongArray(u.arbitrary()?),
        TagType::List => Tag::List(arb_list(u, depth)?),
        TagType::Compound => {
            let len = u.arbitrary_len::<(String, Tag)>()?;
            let mut compound = Compound::new();
            for _ in 0..len {
                let key: String = u.arbitrary()?;
                let element = match u.arbitrary::<TagType>()? {
                    TagType::End => TagType::Byte,
                    other => other,
                };
                compound
                    .insert(key, arb_tag_of(u, element, depth + 1)?)
                    .map_err(|_| arbitrary::Error::IncorrectFormat)?;
            }
            Tag::Compound(compound)
        }
    })
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let tag_type = u.arbitrary::<TagType>()?;
        arb_tag_of(u, tag_type, 0)
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Tag {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
        impl From<&$type> for Tag {
            fn from(val: &$type) -> Self {
                Self::$variant(val.to_owned()$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(ByteArray, ByteArray);
from!(IntArray, IntArray);
from!(LongArray, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

// ------------- comparisons against plain values -------------

fn eq_i64(tag: &Tag, other: i64) -> bool {
    tag.as_i64().map_or(false, |i| i == other)
}

fn eq_f64(tag: &Tag, other: f64) -> bool {
    tag.as_f64().map_or(false, |i| i == other)
}

fn eq_str(tag: &Tag, other: &str) -> bool {
    tag.as_str().map_or(false, |i| i == other)
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        eq_str(self, other)
    }
}

impl<'a> PartialEq<&'a str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        eq_str(self, other)
    }
}

impl PartialEq<String> for Tag {
    fn eq(&self, other: &String) -> bool {
        eq_str(self, other.as_str())
    }
}

macro_rules! partialeq_numeric {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Tag {
                fn eq(&self, other: &$ty) -> bool {
                    $eq(self, *other as _)
                }
            }

            impl PartialEq<Tag> for $ty {
                fn eq(&self, other: &Tag) -> bool {
                    $eq(other, *self as _)
                }
            }
        )*)*
    }
}

partialeq_numeric! {
    eq_i64[i8 i16 i32 i64]
    eq_f64[f32 f64]
}
