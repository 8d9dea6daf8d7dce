//! LEB128-style variable length integers as used by the little-endian VarInt
//! format. Signed values are zig-zag encoded first so that small negative
//! numbers stay short.
use std::io::Write;

use crate::error::{Error, Result};

/// Most groups a 64-bit value may use.
pub(crate) const MAX_GROUPS_64: usize = 10;

pub(crate) fn zigzag32(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

pub(crate) fn unzigzag32(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}

pub(crate) fn zigzag64(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub(crate) fn unzigzag64(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

pub(crate) fn write_u64<W: Write + ?Sized>(w: &mut W, mut v: u64) -> Result<()> {
    let mut buf = [0u8; MAX_GROUPS_64];
    let mut n = 0;
    loop {
        let group = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            buf[n] = group;
            n += 1;
            break;
        }
        buf[n] = group | 0x80;
        n += 1;
    }
    w.write_all(&buf[..n])?;
    Ok(())
}

pub(crate) fn write_u32<W: Write + ?Sized>(w: &mut W, v: u32) -> Result<()> {
    write_u64(w, v as u64)
}

/// Decode one VarInt of at most `bits` bits from the front of `data`,
/// returning the value and the number of bytes it used. A final group that
/// sets bits past `bits` is malformed.
pub(crate) fn read(data: &[u8], bits: u32) -> Result<(u64, usize)> {
    let max_groups = ((bits + 6) / 7) as usize;
    let mut value = 0u64;
    for (i, byte) in data.iter().enumerate() {
        if i >= max_groups {
            return Err(Error::malformed(format!(
                "varint longer than {} bytes",
                max_groups
            )));
        }
        let shift = 7 * i as u32;
        let group = (byte & 0x7f) as u64;
        if group >> (bits - shift).min(7) != 0 {
            return Err(Error::malformed(format!(
                "varint does not fit in {} bits",
                bits
            )));
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if data.len() >= max_groups {
        Err(Error::malformed(format!(
            "varint longer than {} bytes",
            max_groups
        )))
    } else {
        Err(Error::unexpected_eof())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_maps_small_magnitudes_to_small_codes() {
        assert_eq!(zigzag32(0), 0);
        assert_eq!(zigzag32(-1), 1);
        assert_eq!(zigzag32(1), 2);
        assert_eq!(zigzag32(-2), 3);
        assert_eq!(zigzag32(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag32(i32::MIN), u32::MAX);
        assert_eq!(unzigzag32(u32::MAX), i32::MIN);
        assert_eq!(unzigzag64(zigzag64(i64::MIN)), i64::MIN);
        assert_eq!(unzigzag64(zigzag64(-300)), -300);
    }

    #[test]
    fn encodes_in_seven_bit_groups() {
        let mut out = Vec::new();
        write_u32(&mut out, 300).unwrap();
        assert_eq!(out, [0xac, 0x02]);

        out.clear();
        write_u32(&mut out, u32::MAX).unwrap();
        assert_eq!(out, [0xff, 0xff, 0xff, 0xff, 0x0f]);

        out.clear();
        write_u64(&mut out, u64::MAX).unwrap();
        assert_eq!(out.len(), MAX_GROUPS_64);
    }

    #[test]
    fn read_reports_length() {
        assert_eq!(read(&[0xac, 0x02, 0xff], 32).unwrap(), (300, 2));
        assert_eq!(read(&[0x00], 32).unwrap(), (0, 1));
    }

    #[test]
    fn read_rejects_too_many_groups() {
        let data = [0x80; 6];
        assert!(read(&data, 32).unwrap_err().is_malformed());
        assert!(read(&[0x80; 11], 64).unwrap_err().is_malformed());
        assert!(read(&[0x80; 9], 64).is_err());
    }

    #[test]
    fn read_rejects_truncation() {
        let err = read(&[0x80, 0x80], 32).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn read_rejects_bits_past_the_width() {
        let max32 = [0xff, 0xff, 0xff, 0xff, 0x0f];
        assert_eq!(read(&max32, 32).unwrap(), (u32::MAX as u64, 5));
        assert!(read(&[0xff, 0xff, 0xff, 0xff, 0x1f], 32).unwrap_err().is_malformed());
        assert!(read(&[0xff, 0xff, 0xff, 0xff, 0x7f], 32).unwrap_err().is_malformed());
        assert!(read(&[0x80, 0x80, 0x80, 0x80, 0x10], 32).unwrap_err().is_malformed());

        let mut max64 = vec![0xff; 9];
        max64.push(0x01);
        assert_eq!(read(&max64, 64).unwrap(), (u64::MAX, 10));
        *max64.last_mut().unwrap() = 0x02;
        assert!(read(&max64, 64).unwrap_err().is_malformed());
    }
}
