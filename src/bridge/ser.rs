// Taken from serde_json and modified for NBT
// https://github.com/serde-rs/json/blob/52a9c050f5dcc0dc3de4825b131b8ff05219cc82/src/value/ser.rs
//
// The source uses the MIT license, which is repeated here:
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use serde::{ser::Impossible, Serialize};

use super::Variant;
use crate::{
    error::{Error, Result},
    ByteArray, IntArray, List, Tag, TagType, BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN,
    LONG_ARRAY_TOKEN,
};

/// Convert any `Serialize` value into a tree.
///
/// Integers keep the width of their Rust type and structs become compounds
/// with fields in declaration order. Sequences become lists; use
/// [`ByteArray`], [`IntArray`] and [`LongArray`] fields for typed arrays.
///
/// ```
/// use quicknbt::{to_tag, IntArray, Tag, TagType};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Section {
///     y: i8,
///     palette: Vec<String>,
///     heights: IntArray,
/// }
///
/// # fn main() -> quicknbt::error::Result<()> {
/// let tag = to_tag(&Section {
///     y: -4,
///     palette: vec!["minecraft:air".into()],
///     heights: IntArray::new(vec![64, 65]),
/// })?;
///
/// assert_eq!(tag.get("y")?, &Tag::Byte(-4));
/// assert_eq!(tag.get("palette")?.as_list()?.element_type(), TagType::String);
/// assert_eq!(tag.get("heights")?.tag_type(), TagType::IntArray);
/// # Ok(())
/// # }
/// ```
///
/// A [`Tag`] serializes in a way this recognises, so `to_tag(&tag)` gives
/// back an equal tree. `()` and `None` have no NBT form and are errors, as is
/// a bare `Tag::End`.
pub fn to_tag<T>(value: &T) -> Result<Tag>
where
    T: ?Sized + Serialize,
{
    value.serialize(&mut Serializer)?.into_tag()
}

fn to_variant<T>(value: &T) -> Result<Variant>
where
    T: ?Sized + Serialize,
{
    value.serialize(&mut Serializer)
}

/// Serializer whose output is a [`Variant`]. This backs [`to_tag`].
pub struct Serializer;

impl<'a> serde::Serializer for &'a mut Serializer {
    type Ok = Variant;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<Variant> {
        Ok(Variant::from(value))
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<Variant> {
        Ok(Variant::byte(value))
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<Variant> {
        Ok(Variant::short(value))
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<Variant> {
        Ok(Variant::int(value))
    }

    fn serialize_i64(self, value: i64) -> Result<Variant> {
        Ok(Variant::long(value))
    }

    fn serialize_i128(self, v: i128) -> Result<Variant> {
        self.serialize_u128(v as u128)
    }

    fn serialize_u128(self, v: u128) -> Result<Variant> {
        Ok(Variant::Tag(Tag::IntArray(IntArray::new(vec![
            (v >> 96) as i32,
            (v >> 64) as i32,
            (v >> 32) as i32,
            v as i32,
        ]))))
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<Variant> {
        Ok(Variant::byte(value as i8))
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<Variant> {
        Ok(Variant::short(value as i16))
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<Variant> {
        Ok(Variant::int(value as i32))
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<Variant> {
        Ok(Variant::long(value as i64))
    }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<Variant> {
        Ok(Variant::float(value))
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<Variant> {
        Ok(Variant::double(value))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<Variant> {
        Ok(Variant::int(value as i32))
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Variant> {
        Ok(Variant::from(value))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Variant> {
        Ok(Variant::Tag(Tag::ByteArray(ByteArray::from_bytes(value))))
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Variant> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Variant>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(&mut *self)?;
        match name {
            BYTE_ARRAY_TOKEN => list_into_array(inner, TagType::ByteArray),
            INT_ARRAY_TOKEN => list_into_array(inner, TagType::IntArray),
            LONG_ARRAY_TOKEN => list_into_array(inner, TagType::LongArray),
            _ => Ok(inner),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Variant>
    where
        T: ?Sized + Serialize,
    {
        Ok(Variant::Map(vec![(variant.to_owned(), to_variant(value)?)]))
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<Variant>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant.into(),
            vec: SerializeVec {
                vec: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant.into(),
            map: SerializeMap {
                entries: Vec::with_capacity(len),
                next_key: None,
            },
        })
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<Variant>
    where
        T: std::fmt::Display,
    {
        Ok(Variant::Str(value.to_string()))
    }

    fn serialize_none(self) -> Result<Variant> {
        Err(Error::bespoke("NBT has no representation for None".to_owned()))
    }

    fn serialize_unit(self) -> Result<Variant> {
        Err(Error::bespoke("NBT has no representation for ()".to_owned()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Variant> {
        Ok(Variant::Map(Vec::new()))
    }
}

/// Turn a serialized `Vec<i8>`/`Vec<i32>`/`Vec<i64>` back into its array.
fn list_into_array(inner: Variant, kind: TagType) -> Result<Variant> {
    let list = match inner.into_tag()? {
        Tag::List(list) => list,
        other => return Err(Error::type_mismatch(TagType::List, other.tag_type())),
    };

    let mismatch = |t: &Tag| Error::heterogeneous(kind, t.tag_type());
    let tag = match kind {
        TagType::ByteArray => Tag::ByteArray(
            list.iter()
                .map(|t| t.as_byte().map_err(|_| mismatch(t)))
                .collect::<Result<_>>()?,
        ),
        TagType::IntArray => Tag::IntArray(
            list.iter()
                .map(|t| t.as_int().map_err(|_| mismatch(t)))
                .collect::<Result<_>>()?,
        ),
        _ => Tag::LongArray(
            list.iter()
                .map(|t| t.as_long().map_err(|_| mismatch(t)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(Variant::Tag(tag))
}

pub struct SerializeVec {
    vec: Vec<Tag>,
}

pub struct SerializeTupleVariant {
    name: String,
    vec: SerializeVec,
}

pub struct SerializeMap {
    entries: Vec<(String, Variant)>,
    next_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: String,
    map: SerializeMap,
}

impl SerializeVec {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_variant(value)?.into_tag()?);
        Ok(())
    }

    // Elements are resolved one by one so that plain sequences always become
    // lists. Typed arrays only come from the array newtypes.
    fn finish(self) -> Result<Variant> {
        Ok(Variant::Tag(Tag::List(List::try_from(self.vec)?)))
    }
}

impl serde::ser::SerializeSeq for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variant> {
        self.finish()
    }
}

impl serde::ser::SerializeTuple for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variant> {
        self.finish()
    }
}

impl serde::ser::SerializeTupleStruct for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variant> {
        self.finish()
    }
}

impl serde::ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value)
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::Map(vec![(self.name, self.vec.finish()?)]))
    }
}

impl serde::ser::SerializeMap for SerializeMap {
    type Ok = Variant;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::bespoke("serialize_value called before serialize_key".to_owned()))?;

        self.entries.push((key, to_variant(value)?));
        Ok(())
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::Map(self.entries))
    }
}

impl serde::ser::SerializeStruct for SerializeMap {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeMap::serialize_entry(self, key, value)
    }

    fn end(self) -> Result<Variant> {
        serde::ser::SerializeMap::end(self)
    }
}

impl serde::ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeMap::serialize_entry(&mut self.map, key, value)
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::Map(vec![(
            self.name,
            serde::ser::SerializeMap::end(self.map)?,
        )]))
    }
}

struct MapKeySerializer;

fn key_must_be_a_string() -> Error {
    Error::bespoke("Key must be a string".to_string())
}

impl serde::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _value: bool) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_i8(self, value: i8) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i16(self, value: i16) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i32(self, value: i32) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_i64(self, value: i64) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u8(self, value: u8) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u16(self, value: u16) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u32(self, value: u32) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_u64(self, value: u64) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_f32(self, _value: f32) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _value: f64) -> Result<String> {
        Err(key_must_be_a_string())
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<String> {
        Ok(value.to_string())
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<String> {
        Ok(value.to_owned())
    }

    fn serialize_bytes(self, _value: &[u8]) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<String>
    where
        T: std::fmt::Display,
    {
        Ok(value.to_string())
    }
}
