use crate::binary::{self, BinaryFormat};
use crate::snbt::{from_snbt, to_snbt, SnbtFormat};
use crate::{Tag, TagType};

use super::builder::Builder;

#[test]
fn partial_input() {
    let input = Builder::new().start_compound("").int("a", 1).build();
    for format in BinaryFormat::ALL {
        assert!(binary::from_bytes(&input, format).is_err());
    }
}

#[test]
fn list_of_end() {
    // A list of End with zero elements is how empty lists are usually
    // written, and must decode.
    let input = Builder::new()
        .start_compound("")
        .start_list("a", TagType::End, 0)
        .end_compound()
        .build();
    let tag = binary::from_bytes(&input, BinaryFormat::BigEndianFixed).unwrap();
    assert!(tag.get("a").unwrap().as_list().unwrap().is_empty());
}

#[test]
fn huge_list_of_compounds() {
    let input = Builder::new()
        .start_compound("")
        .start_list("a", TagType::Compound, i32::MAX)
        .end_compound()
        .build();
    assert!(binary::from_bytes(&input, BinaryFormat::BigEndianFixed).is_err());
}

#[test]
fn huge_varint_string_length() {
    let input = Builder::with_format(BinaryFormat::LittleEndianVarInt)
        .tag(TagType::String)
        .raw_bytes(&[0xff, 0xff, 0xff, 0xff, 0x0f])
        .build();
    assert!(binary::from_bytes(&input, BinaryFormat::LittleEndianVarInt).is_err());
}

#[test]
fn random_bytes_never_panic() {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    for _ in 0..2_000 {
        let len = (state % 64) as usize;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            data.push(state as u8);
        }
        // Bias towards inputs that get past the first tag byte.
        if let Some(first) = data.first_mut() {
            *first %= 13;
        }

        for format in BinaryFormat::ALL {
            // Compare bytes rather than trees, random floats are often NaN.
            if let Ok(tag) = binary::from_bytes(&data, format) {
                let bytes = binary::to_bytes(&tag, format).unwrap();
                let again = binary::from_bytes(&bytes, format).unwrap();
                assert_eq!(binary::to_bytes(&again, format).unwrap(), bytes);
            }
        }
        let _ = binary::detect_format(&data);
    }
}

#[test]
fn snbt_oddities() {
    for input in [
        "[", "{", "{a", "{a:", "[B;", "[B;1", "\"\\", "'", "[,]", "{,}", "[1 2]", "-", "+", ".",
        "[I;1b]", "{a:1b,,}", "\u{0}", "NaNb", "1e", "1e+", "0x10",
    ] {
        if let Ok(tag) = from_snbt(input) {
            let text = to_snbt(&tag, SnbtFormat::compact());
            assert_eq!(from_snbt(&text).unwrap(), tag, "{:?}", input);
        }
    }
}

#[test]
fn bare_tokens_that_look_numeric() {
    // These parse as strings and must print quoted when they would not read
    // back the same bare.
    for s in ["-", "+", ".", "1e", "0x10", "NaNb", "1.2.3", "--1"] {
        let tag = from_snbt(s).unwrap();
        assert_eq!(tag, Tag::String(s.to_owned()));
        assert_eq!(from_snbt(&tag.to_string()).unwrap(), tag);
    }
}
