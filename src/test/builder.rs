use std::convert::TryInto;

use crate::binary::{varint, BinaryFormat};
use crate::TagType;

/// Builder for NBT data in any of the binary formats. This is to create test
/// data. It specifically does *not* guarantee the resulting data is valid
/// NBT. Creating invalid NBT is useful for testing.
pub struct Builder {
    payload: Vec<u8>,
    format: BinaryFormat,
}

impl Builder {
    pub fn new() -> Self {
        Self::with_format(BinaryFormat::BigEndianFixed)
    }

    pub fn with_format(format: BinaryFormat) -> Self {
        Builder {
            payload: Vec::new(),
            format,
        }
    }

    fn big_endian(&self) -> bool {
        self.format == BinaryFormat::BigEndianFixed
    }

    fn varint(&self) -> bool {
        self.format == BinaryFormat::LittleEndianVarInt
    }

    pub fn tag(mut self, t: TagType) -> Self {
        self.payload.push(t as u8);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        let name = if self.big_endian() {
            cesu8::to_java_cesu8(name).into_owned()
        } else {
            name.as_bytes().to_vec()
        };

        if self.varint() {
            varint::write_u32(&mut self.payload, name.len() as u32).unwrap();
        } else if self.big_endian() {
            let len_bytes = &(name.len() as u16).to_be_bytes()[..];
            self.payload.extend_from_slice(len_bytes);
        } else {
            let len_bytes = &(name.len() as u16).to_le_bytes()[..];
            self.payload.extend_from_slice(len_bytes);
        }
        self.payload.extend_from_slice(&name);
        self
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(TagType::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(TagType::End)
    }

    pub fn end_anon_compound(self) -> Self {
        self.tag(TagType::End)
    }

    pub fn start_list(self, name: &str, element_tag: TagType, size: i32) -> Self {
        self.tag(TagType::List)
            .name(name)
            .tag(element_tag)
            .len_payload(size)
    }

    pub fn start_anon_list(self, element_tag: TagType, size: i32) -> Self {
        self.tag(element_tag).len_payload(size)
    }

    pub fn byte(self, name: &str, b: i8) -> Self {
        self.tag(TagType::Byte).name(name).byte_payload(b)
    }

    pub fn short(self, name: &str, b: i16) -> Self {
        self.tag(TagType::Short).name(name).short_payload(b)
    }

    pub fn int(self, name: &str, b: i32) -> Self {
        self.tag(TagType::Int).name(name).int_payload(b)
    }

    pub fn long(self, name: &str, b: i64) -> Self {
        self.tag(TagType::Long).name(name).long_payload(b)
    }

    pub fn string(self, name: &str, s: &str) -> Self {
        self.tag(TagType::String).name(name).string_payload(s)
    }

    pub fn float(self, name: &str, n: f32) -> Self {
        self.tag(TagType::Float).name(name).float_payload(n)
    }

    pub fn double(self, name: &str, n: f64) -> Self {
        self.tag(TagType::Double).name(name).double_payload(n)
    }

    pub fn byte_array(self, name: &str, bs: &[i8]) -> Self {
        self.tag(TagType::ByteArray)
            .name(name)
            .len_payload(bs.len().try_into().unwrap())
            .byte_array_payload(bs)
    }

    pub fn int_array(self, name: &str, arr: &[i32]) -> Self {
        self.tag(TagType::IntArray)
            .name(name)
            .len_payload(arr.len().try_into().unwrap())
            .int_array_payload(arr)
    }

    pub fn long_array(self, name: &str, arr: &[i64]) -> Self {
        self.tag(TagType::LongArray)
            .name(name)
            .len_payload(arr.len().try_into().unwrap())
            .long_array_payload(arr)
    }

    pub fn string_payload(self, s: &str) -> Self {
        self.name(s)
    }

    pub fn byte_payload(mut self, b: i8) -> Self {
        self.payload.push(b as u8);
        self
    }

    pub fn byte_array_payload(mut self, bs: &[i8]) -> Self {
        for b in bs {
            self.payload.push(*b as u8);
        }
        self
    }

    pub fn short_payload(mut self, i: i16) -> Self {
        if self.big_endian() {
            self.payload.extend_from_slice(&i.to_be_bytes()[..]);
        } else {
            self.payload.extend_from_slice(&i.to_le_bytes()[..]);
        }
        self
    }

    /// A list or array length.
    pub fn len_payload(self, len: i32) -> Self {
        self.int_payload(len)
    }

    pub fn int_payload(mut self, i: i32) -> Self {
        if self.varint() {
            varint::write_u32(&mut self.payload, varint::zigzag32(i)).unwrap();
        } else if self.big_endian() {
            self.payload.extend_from_slice(&i.to_be_bytes()[..]);
        } else {
            self.payload.extend_from_slice(&i.to_le_bytes()[..]);
        }
        self
    }

    pub fn int_array_payload(mut self, is: &[i32]) -> Self {
        for i in is {
            self = self.int_payload(*i);
        }
        self
    }

    pub fn long_payload(mut self, i: i64) -> Self {
        if self.varint() {
            varint::write_u64(&mut self.payload, varint::zigzag64(i)).unwrap();
        } else if self.big_endian() {
            self.payload.extend_from_slice(&i.to_be_bytes()[..]);
        } else {
            self.payload.extend_from_slice(&i.to_le_bytes()[..]);
        }
        self
    }

    pub fn long_array_payload(mut self, is: &[i64]) -> Self {
        for i in is {
            self = self.long_payload(*i);
        }
        self
    }

    pub fn float_payload(mut self, f: f32) -> Self {
        if self.big_endian() {
            self.payload.extend_from_slice(&f.to_be_bytes()[..]);
        } else {
            self.payload.extend_from_slice(&f.to_le_bytes()[..]);
        }
        self
    }

    pub fn double_payload(mut self, f: f64) -> Self {
        if self.big_endian() {
            self.payload.extend_from_slice(&f.to_be_bytes()[..]);
        } else {
            self.payload.extend_from_slice(&f.to_le_bytes()[..]);
        }
        self
    }

    /// Straight up add some bytes to the payload. For very corner-case tests
    /// that are not worth a specific builder method.
    pub fn raw_bytes(mut self, bs: &[u8]) -> Self {
        self.payload.extend_from_slice(bs);
        self
    }

    /// This is a no-op, but can make code clearer by showing the points where a
    /// compound in a list has logically started.
    pub fn start_anon_compound(self) -> Self {
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }
}
