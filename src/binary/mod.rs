//! The binary NBT codec.
//!
//! Three on-wire formats are supported, differing in byte order and integer
//! encoding:
//!
//! | Format | Integers | Counts | String lengths | Strings |
//! | --- | --- | --- | --- | --- |
//! | [`BigEndianFixed`][BinaryFormat::BigEndianFixed] | big-endian | `i32` | `u16` | Java modified UTF-8 |
//! | [`LittleEndianFixed`][BinaryFormat::LittleEndianFixed] | little-endian | `i32` | `u16` | UTF-8 |
//! | [`LittleEndianVarInt`][BinaryFormat::LittleEndianVarInt] | Int/Long zig-zag VarInt | zig-zag VarInt | VarInt | UTF-8 |
//!
//! Byte, Short, Float and Double are fixed width little-endian even in the
//! VarInt format.
//!
//! Every document is a single named root tag:
//!
//! ```
//! use quicknbt::{nbt, binary::{self, BinaryFormat}};
//!
//! # fn main() -> quicknbt::error::Result<()> {
//! let level = nbt!({ "LevelName": "My World", "SpawnY": 64 })?;
//! let bytes = binary::to_bytes_named(&level, "Data", BinaryFormat::LittleEndianFixed)?;
//!
//! let (name, back) = binary::from_bytes_named(&bytes, BinaryFormat::LittleEndianFixed)?;
//! assert_eq!(name, "Data");
//! assert_eq!(back, level);
//! # Ok(())
//! # }
//! ```
//!
//! Decoding never trusts a declared length further than the input can back
//! it, and nesting is limited by [`DeOpts::max_depth`].
use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::Tag;

mod read;
pub(crate) mod varint;
mod write;

use read::Decoder;
use write::Encoder;

/// One of the three byte-level NBT encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
pub enum BinaryFormat {
    /// Java Edition files and network data.
    BigEndianFixed,
    /// Bedrock Edition files such as `level.dat`.
    LittleEndianFixed,
    /// Bedrock Edition network data.
    LittleEndianVarInt,
}

impl BinaryFormat {
    pub const ALL: [BinaryFormat; 3] = [
        BinaryFormat::BigEndianFixed,
        BinaryFormat::LittleEndianFixed,
        BinaryFormat::LittleEndianVarInt,
    ];

    /// Whether this format has a defined file header.
    pub fn supports_header(self) -> bool {
        !matches!(self, BinaryFormat::LittleEndianVarInt)
    }
}

/// Options for customizing decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeOpts {
    pub(crate) max_depth: usize,
    pub(crate) max_seq_len: usize,
    pub(crate) exact: bool,
}

impl DeOpts {
    /// Default options: nesting up to 256 lists/compounds deep, no extra
    /// limit on sequence length and trailing bytes allowed.
    ///
    /// Decoding recurses once per level, so raising `max_depth` far past the
    /// default needs a larger stack than a spawned thread's 2 MiB.
    pub fn new() -> Self {
        Self {
            max_depth: 256,
            max_seq_len: usize::MAX,
            exact: false,
        }
    }

    /// Maximum number of nested lists and compounds.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Maximum number of elements in any list or array. Lengths are always
    /// bounded by the size of the input as well.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }

    /// Reject input with bytes left over after the root tag.
    pub fn exact(mut self, value: bool) -> Self {
        self.exact = value;
        self
    }
}

impl Default for DeOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a tree as an unnamed root.
pub fn to_bytes(tag: &Tag, format: BinaryFormat) -> Result<Vec<u8>> {
    to_bytes_named(tag, "", format)
}

/// Encode a tree with a root name.
pub fn to_bytes_named(tag: &Tag, name: &str, format: BinaryFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Encoder::new(&mut out, format).write_root(name, tag)?;
    Ok(out)
}

/// Encode a tree with a root name into `writer`. Nothing is written if the
/// tree cannot be encoded.
pub fn write_to<W: Write>(writer: &mut W, tag: &Tag, name: &str, format: BinaryFormat) -> Result<()> {
    let bytes = to_bytes_named(tag, name, format)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Decode a tree, discarding the root name.
pub fn from_bytes(input: &[u8], format: BinaryFormat) -> Result<Tag> {
    from_bytes_with_opts(input, format, DeOpts::new())
}

/// Decode a tree and its root name.
pub fn from_bytes_named(input: &[u8], format: BinaryFormat) -> Result<(String, Tag)> {
    from_bytes_named_with_opts(input, format, DeOpts::new())
}

/// Decode a tree with custom options.
///
/// ```
/// use quicknbt::binary::{self, BinaryFormat, DeOpts};
///
/// // An empty document followed by a stray byte.
/// let input = [0u8, 1];
/// assert!(binary::from_bytes(&input, BinaryFormat::BigEndianFixed).is_ok());
///
/// let opts = DeOpts::new().exact(true);
/// assert!(binary::from_bytes_with_opts(&input, BinaryFormat::BigEndianFixed, opts).is_err());
/// ```
pub fn from_bytes_with_opts(input: &[u8], format: BinaryFormat, opts: DeOpts) -> Result<Tag> {
    from_bytes_named_with_opts(input, format, opts).map(|(_, tag)| tag)
}

/// Decode a tree and its root name with custom options.
pub fn from_bytes_named_with_opts(
    input: &[u8],
    format: BinaryFormat,
    opts: DeOpts,
) -> Result<(String, Tag)> {
    let mut decoder = Decoder::new(input, format, opts);
    let root = decoder.read_root()?;
    if opts.exact && decoder.remaining() > 0 {
        return Err(Error::malformed(format!(
            "{} trailing bytes after root tag",
            decoder.remaining()
        )));
    }
    Ok(root)
}

const HEADER_LEN: usize = 8;

/// Encode a tree behind the 8 byte file header used by Bedrock's
/// `level.dat`: a storage version followed by the payload length, both `i32`
/// in the format's byte order. Only the fixed width formats have headers.
pub fn to_bytes_with_header(tag: &Tag, format: BinaryFormat, storage_version: i32) -> Result<Vec<u8>> {
    if !format.supports_header() {
        return Err(Error::bespoke(format!("{:?} has no file header", format)));
    }

    let payload = to_bytes(tag, format)?;
    let len: i32 = payload
        .len()
        .try_into()
        .map_err(|_| Error::malformed("payload too large for header"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    match format {
        BinaryFormat::BigEndianFixed => {
            out.write_i32::<BigEndian>(storage_version)?;
            out.write_i32::<BigEndian>(len)?;
        }
        _ => {
            out.write_i32::<LittleEndian>(storage_version)?;
            out.write_i32::<LittleEndian>(len)?;
        }
    }
    out.extend_from_slice(&payload);
    Ok(out)
}

fn read_header(input: &[u8], format: BinaryFormat) -> Result<(i32, &[u8])> {
    if !format.supports_header() {
        return Err(Error::bespoke(format!("{:?} has no file header", format)));
    }
    if input.len() < HEADER_LEN {
        return Err(Error::unexpected_eof());
    }

    let (version, len) = match format {
        BinaryFormat::BigEndianFixed => (
            BigEndian::read_i32(&input[0..4]),
            BigEndian::read_i32(&input[4..8]),
        ),
        _ => (
            LittleEndian::read_i32(&input[0..4]),
            LittleEndian::read_i32(&input[4..8]),
        ),
    };

    let payload = &input[HEADER_LEN..];
    let len: usize = len
        .try_into()
        .map_err(|_| Error::malformed(format!("negative header length: {}", len)))?;
    if len != payload.len() {
        return Err(Error::malformed(format!(
            "header declares {} bytes, found {}",
            len,
            payload.len()
        )));
    }
    trace!("header: storage version {}, {} payload bytes", version, len);
    Ok((version, payload))
}

/// Decode a headered document, returning the storage version and the tree.
/// The payload must fill exactly the length the header declares.
pub fn from_bytes_with_header(input: &[u8], format: BinaryFormat) -> Result<(i32, Tag)> {
    let (version, payload) = read_header(input, format)?;
    let tag = from_bytes_with_opts(payload, format, DeOpts::new().exact(true))?;
    Ok((version, tag))
}

/// The result of [`detect_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFormat {
    pub format: BinaryFormat,
    /// Whether the document starts with a storage version header.
    pub header: bool,
}

/// Guess the format of a binary document by decoding it. Candidates are
/// tried in order: headered little-endian, headered big-endian, little-endian,
/// big-endian, then VarInt. The first that decodes a compound root using
/// every byte wins.
pub fn detect_format(input: &[u8]) -> Option<DetectedFormat> {
    let candidates = [
        (BinaryFormat::LittleEndianFixed, true),
        (BinaryFormat::BigEndianFixed, true),
        (BinaryFormat::LittleEndianFixed, false),
        (BinaryFormat::BigEndianFixed, false),
        (BinaryFormat::LittleEndianVarInt, false),
    ];

    for (format, header) in candidates {
        let decoded = if header {
            from_bytes_with_header(input, format).map(|(_, tag)| tag)
        } else {
            from_bytes_with_opts(input, format, DeOpts::new().exact(true))
        };

        match decoded {
            Ok(Tag::Compound(_)) => {
                debug!("detected {:?} (header: {})", format, header);
                return Some(DetectedFormat { format, header });
            }
            Ok(other) => trace!("{:?} decoded a {} root, skipping", format, other.tag_type()),
            Err(e) => trace!("{:?} (header: {}) rejected: {}", format, header, e),
        }
    }

    debug!("no binary format matched {} bytes", input.len());
    None
}

/// Whether `input` is exactly one well-formed document in `format`.
pub fn validate(input: &[u8], format: BinaryFormat) -> bool {
    from_bytes_with_opts(input, format, DeOpts::new().exact(true)).is_ok()
}
