#![no_main]
use libfuzzer_sys::fuzz_target;

use quicknbt::snbt::{from_snbt, to_snbt, SnbtFormat};

fuzz_target!(|data: &str| {
    if let Ok(tag) = from_snbt(data) {
        let text = to_snbt(&tag, SnbtFormat::compact());
        let again = from_snbt(&text).unwrap();
        assert_eq!(to_snbt(&again, SnbtFormat::compact()), text);
    }
});
