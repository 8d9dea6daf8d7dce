#![no_main]
use libfuzzer_sys::fuzz_target;

use quicknbt::binary::{self, BinaryFormat};
use quicknbt::Tag;

fuzz_target!(|input: (Tag, BinaryFormat)| {
    let (tag, format) = input;
    if let Ok(bs) = binary::to_bytes(&tag, format) {
        let back = binary::from_bytes(&bs, format).unwrap();
        assert_eq!(binary::to_bytes(&back, format).unwrap(), bs);
    }
});
