use std::{borrow::Cow, ops::Range};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{varint, BinaryFormat, DeOpts};
use crate::error::{Error, Result};
use crate::{ByteArray, Compound, IntArray, List, LongArray, Tag, TagType};

/// Reads whole trees from a byte slice in one format.
pub(crate) struct Decoder<'de> {
    data: &'de [u8],
    format: BinaryFormat,
    opts: DeOpts,
    depth: usize,
}

impl<'de> Decoder<'de> {
    pub(crate) fn new(data: &'de [u8], format: BinaryFormat, opts: DeOpts) -> Self {
        Self {
            data,
            format,
            opts,
            depth: 0,
        }
    }

    /// Bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len()
    }

    fn consume(&mut self, r: Range<usize>) -> Result<&'de [u8]> {
        if r.end <= self.data.len() {
            let ret = &self.data[r.start..r.end];
            self.data = &self.data[r.end..];
            Ok(ret)
        } else {
            Err(Error::unexpected_eof())
        }
    }

    fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.consume(0..1)?[0])
    }

    fn consume_tag(&mut self) -> Result<TagType> {
        let tag = self.consume_byte()?;
        TagType::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    fn consume_varint(&mut self, bits: u32) -> Result<u64> {
        let (value, len) = varint::read(self.data, bits)?;
        self.consume(0..len)?;
        Ok(value)
    }

    fn consume_u16(&mut self) -> Result<u16> {
        let bs = self.consume(0..2)?;
        Ok(match self.format {
            BinaryFormat::BigEndianFixed => BigEndian::read_u16(bs),
            _ => LittleEndian::read_u16(bs),
        })
    }

    fn consume_i16(&mut self) -> Result<i16> {
        let bs = self.consume(0..2)?;
        Ok(match self.format {
            BinaryFormat::BigEndianFixed => BigEndian::read_i16(bs),
            _ => LittleEndian::read_i16(bs),
        })
    }

    fn consume_i32(&mut self) -> Result<i32> {
        match self.format {
            BinaryFormat::BigEndianFixed => Ok(BigEndian::read_i32(self.consume(0..4)?)),
            BinaryFormat::LittleEndianFixed => Ok(LittleEndian::read_i32(self.consume(0..4)?)),
            BinaryFormat::LittleEndianVarInt => {
                let v = self.consume_varint(32)?;
                Ok(varint::unzigzag32(v as u32))
            }
        }
    }

    fn consume_i64(&mut self) -> Result<i64> {
        match self.format {
            BinaryFormat::BigEndianFixed => Ok(BigEndian::read_i64(self.consume(0..8)?)),
            BinaryFormat::LittleEndianFixed => Ok(LittleEndian::read_i64(self.consume(0..8)?)),
            BinaryFormat::LittleEndianVarInt => {
                let v = self.consume_varint(64)?;
                Ok(varint::unzigzag64(v))
            }
        }
    }

    fn consume_f32(&mut self) -> Result<f32> {
        let bs = self.consume(0..4)?;
        Ok(match self.format {
            BinaryFormat::BigEndianFixed => BigEndian::read_f32(bs),
            _ => LittleEndian::read_f32(bs),
        })
    }

    fn consume_f64(&mut self) -> Result<f64> {
        let bs = self.consume(0..8)?;
        Ok(match self.format {
            BinaryFormat::BigEndianFixed => BigEndian::read_f64(bs),
            _ => LittleEndian::read_f64(bs),
        })
    }

    /// A list or array count. Counts are checked against the bytes left so a
    /// crafted length cannot make us allocate more than the input could fill.
    fn consume_len(&mut self, min_element_size: usize) -> Result<usize> {
        let len = self.consume_i32()?;
        let len: usize = len
            .try_into()
            .map_err(|_| Error::malformed(format!("negative length: {}", len)))?;

        if len > self.opts.max_seq_len {
            return Err(Error::malformed(format!(
                "size ({}) greater than max sequence length ({})",
                len, self.opts.max_seq_len,
            )));
        }

        let needed = len
            .checked_mul(min_element_size)
            .ok_or_else(|| Error::malformed("size too large"))?;
        if needed > self.remaining() {
            return Err(Error::malformed(format!(
                "length {} exceeds the {} bytes remaining",
                len,
                self.remaining()
            )));
        }
        Ok(len)
    }

    fn consume_str(&mut self) -> Result<String> {
        let len = match self.format {
            BinaryFormat::LittleEndianVarInt => self.consume_varint(32)? as usize,
            _ => self.consume_u16()? as usize,
        };
        if len > self.remaining() {
            return Err(Error::malformed(format!(
                "string length {} exceeds the {} bytes remaining",
                len,
                self.remaining()
            )));
        }
        let bs = self.consume(0..len)?;

        match self.format {
            BinaryFormat::BigEndianFixed => {
                let s = cesu8::from_java_cesu8(bs).map_err(|_| Error::nonunicode_string(bs))?;
                Ok(match s {
                    Cow::Borrowed(s) => s.to_owned(),
                    Cow::Owned(s) => s,
                })
            }
            _ => std::str::from_utf8(bs)
                .map(str::to_owned)
                .map_err(|_| Error::nonunicode_string(bs)),
        }
    }

    /// Smallest encoding of one element of a list, used to bound counts.
    fn min_size(&self, tag: TagType) -> usize {
        match (self.format, tag) {
            (_, TagType::End) => 0,
            (BinaryFormat::LittleEndianVarInt, TagType::Int | TagType::Long) => 1,
            (BinaryFormat::LittleEndianVarInt, TagType::String) => 1,
            (_, TagType::String) => 2,
            (_, t) => t.fixed_width().unwrap_or(1),
        }
    }

    /// Read a root tag with its name. A lone end byte is the empty document.
    pub(crate) fn read_root(&mut self) -> Result<(String, Tag)> {
        let tag = self.consume_tag()?;
        if tag == TagType::End {
            return Ok((String::new(), Tag::End));
        }
        let name = self.consume_str()?;
        let value = self.read_payload(tag)?;
        Ok((name, value))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(Error::malformed(format!(
                "nesting deeper than {}",
                self.opts.max_depth
            )));
        }
        Ok(())
    }

    fn read_payload(&mut self, tag: TagType) -> Result<Tag> {
        Ok(match tag {
            TagType::End => return Err(Error::malformed("unexpected end tag")),
            TagType::Byte => Tag::Byte(self.consume_byte()? as i8),
            TagType::Short => Tag::Short(self.consume_i16()?),
            TagType::Int => Tag::Int(self.consume_i32()?),
            TagType::Long => Tag::Long(self.consume_i64()?),
            TagType::Float => Tag::Float(self.consume_f32()?),
            TagType::Double => Tag::Double(self.consume_f64()?),
            TagType::String => Tag::String(self.consume_str()?),
            TagType::ByteArray => {
                let len = self.consume_len(1)?;
                Tag::ByteArray(ByteArray::from_bytes(self.consume(0..len)?))
            }
            TagType::IntArray => {
                let len = self.consume_len(self.min_size(TagType::Int))?;
                let mut data = Vec::with_capacity(len);
                for _ in 0..len {
                    data.push(self.consume_i32()?);
                }
                Tag::IntArray(IntArray::new(data))
            }
            TagType::LongArray => {
                let len = self.consume_len(self.min_size(TagType::Long))?;
                let mut data = Vec::with_capacity(len);
                for _ in 0..len {
                    data.push(self.consume_i64()?);
                }
                Tag::LongArray(LongArray::new(data))
            }
            TagType::List => {
                self.enter()?;
                let list = self.read_list()?;
                self.depth -= 1;
                Tag::List(list)
            }
            TagType::Compound => {
                self.enter()?;
                let compound = self.read_compound()?;
                self.depth -= 1;
                Tag::Compound(compound)
            }
        })
    }

    fn read_list(&mut self) -> Result<List> {
        let element = self.consume_tag()?;
        let len = self.consume_len(self.min_size(element))?;

        if element == TagType::End {
            if len > 0 {
                return Err(Error::malformed(format!(
                    "list of {} end tags",
                    len
                )));
            }
            return Ok(List::new());
        }

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_payload(element)?);
        }
        Ok(List::from_raw(element, items))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();
        loop {
            let tag = self.consume_tag()?;
            if tag == TagType::End {
                return Ok(compound);
            }
            let name = self.consume_str()?;
            let value = self.read_payload(tag)?;
            compound.insert(name, value)?;
        }
    }
}
