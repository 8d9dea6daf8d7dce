#![no_main]
use libfuzzer_sys::fuzz_target;

use quicknbt::binary::{self, BinaryFormat, DeOpts};

fuzz_target!(|data: &[u8]| {
    for format in BinaryFormat::ALL {
        let opts = DeOpts::new().max_seq_len(100);
        if let Ok(tag) = binary::from_bytes_with_opts(data, format, opts) {
            let _bs = binary::to_bytes(&tag, format).unwrap();
        }
    }
    let _ = binary::detect_format(data);
});
