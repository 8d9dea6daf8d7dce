use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use super::{varint, BinaryFormat};
use crate::error::{Error, Result};
use crate::{Compound, List, Tag, TagType};

/// Primitive writes shared by every format. The format decides byte order
/// and which integers become VarInts.
pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: TagType) -> Result<()> {
        self.write_u8(tag as u8)?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => {
                let s = cesu8::to_java_cesu8(s);
                let len: u16 = s
                    .len()
                    .try_into()
                    .map_err(|_| Error::malformed("string too long for u16 length"))?;
                self.write_u16::<BigEndian>(len)?;
                self.write_all(&s)?;
            }
            BinaryFormat::LittleEndianFixed => {
                let len: u16 = s
                    .len()
                    .try_into()
                    .map_err(|_| Error::malformed("string too long for u16 length"))?;
                self.write_u16::<LittleEndian>(len)?;
                self.write_all(s.as_bytes())?;
            }
            BinaryFormat::LittleEndianVarInt => {
                let len: u32 = s
                    .len()
                    .try_into()
                    .map_err(|_| Error::malformed("string too long for varint length"))?;
                varint::write_u32(self, len)?;
                self.write_all(s.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize, format: BinaryFormat) -> Result<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| Error::malformed("len too large"))?;
        match format {
            BinaryFormat::BigEndianFixed => self.write_i32::<BigEndian>(len)?,
            BinaryFormat::LittleEndianFixed => self.write_i32::<LittleEndian>(len)?,
            BinaryFormat::LittleEndianVarInt => varint::write_u32(self, varint::zigzag32(len))?,
        }
        Ok(())
    }

    fn write_nbt_short(&mut self, v: i16, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => self.write_i16::<BigEndian>(v)?,
            _ => self.write_i16::<LittleEndian>(v)?,
        }
        Ok(())
    }

    fn write_nbt_int(&mut self, v: i32, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => self.write_i32::<BigEndian>(v)?,
            BinaryFormat::LittleEndianFixed => self.write_i32::<LittleEndian>(v)?,
            BinaryFormat::LittleEndianVarInt => varint::write_u32(self, varint::zigzag32(v))?,
        }
        Ok(())
    }

    fn write_nbt_long(&mut self, v: i64, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => self.write_i64::<BigEndian>(v)?,
            BinaryFormat::LittleEndianFixed => self.write_i64::<LittleEndian>(v)?,
            BinaryFormat::LittleEndianVarInt => varint::write_u64(self, varint::zigzag64(v))?,
        }
        Ok(())
    }

    fn write_nbt_float(&mut self, v: f32, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => self.write_f32::<BigEndian>(v)?,
            _ => self.write_f32::<LittleEndian>(v)?,
        }
        Ok(())
    }

    fn write_nbt_double(&mut self, v: f64, format: BinaryFormat) -> Result<()> {
        match format {
            BinaryFormat::BigEndianFixed => self.write_f64::<BigEndian>(v)?,
            _ => self.write_f64::<LittleEndian>(v)?,
        }
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

/// Writes whole trees in one format.
pub(crate) struct Encoder<W> {
    writer: W,
    format: BinaryFormat,
}

impl<W: Write> Encoder<W> {
    pub(crate) fn new(writer: W, format: BinaryFormat) -> Self {
        Self { writer, format }
    }

    /// Write a named root. An `End` root is a lone end byte with no name.
    pub(crate) fn write_root(&mut self, name: &str, tag: &Tag) -> Result<()> {
        self.writer.write_tag(tag.tag_type())?;
        if tag.is_end() {
            return Ok(());
        }
        self.writer.write_size_prefixed_str(name, self.format)?;
        self.write_payload(tag)
    }

    fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        let format = self.format;
        let w = &mut self.writer;
        match tag {
            Tag::End => return Err(Error::malformed("end tag cannot carry a payload")),
            Tag::Byte(v) => w.write_i8(*v)?,
            Tag::Short(v) => w.write_nbt_short(*v, format)?,
            Tag::Int(v) => w.write_nbt_int(*v, format)?,
            Tag::Long(v) => w.write_nbt_long(*v, format)?,
            Tag::Float(v) => w.write_nbt_float(*v, format)?,
            Tag::Double(v) => w.write_nbt_double(*v, format)?,
            Tag::String(v) => w.write_size_prefixed_str(v, format)?,
            Tag::ByteArray(v) => {
                w.write_len(v.len(), format)?;
                let bytes: Vec<u8> = v.iter().map(|b| *b as u8).collect();
                w.write_all(&bytes)?;
            }
            Tag::IntArray(v) => {
                w.write_len(v.len(), format)?;
                for i in v.iter() {
                    w.write_nbt_int(*i, format)?;
                }
            }
            Tag::LongArray(v) => {
                w.write_len(v.len(), format)?;
                for l in v.iter() {
                    w.write_nbt_long(*l, format)?;
                }
            }
            Tag::List(list) => self.write_list(list)?,
            Tag::Compound(compound) => self.write_compound(compound)?,
        }
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        list.verify()
            .map_err(|e| Error::malformed(format!("cannot encode list: {}", e)))?;
        self.writer.write_tag(list.element_type())?;
        self.writer.write_len(list.len(), self.format)?;
        for item in list {
            self.write_payload(item)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for (key, value) in compound {
            if value.is_end() {
                return Err(Error::malformed(format!(
                    "compound value {:?} is an end tag",
                    key
                )));
            }
            self.writer.write_tag(value.tag_type())?;
            self.writer.write_size_prefixed_str(key, self.format)?;
            self.write_payload(value)?;
        }
        self.writer.write_tag(TagType::End)
    }
}
