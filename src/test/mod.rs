use crate::binary::{self, BinaryFormat};
use crate::{Tag, TagType};

use self::builder::Builder;

mod bridge;
mod builder;
mod fuzz;
mod ser;

/// Run `f` on a thread with a 2 MiB stack and return its result.
fn on_small_stack<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(TagType::$tag), $val);
            assert_eq!(TagType::try_from($val as u8), Ok(TagType::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 13..=u8::MAX {
        assert!(TagType::try_from(value).is_err());
    }
}

#[test]
fn new_gives_zero_value_of_each_type() {
    for value in 0..=12u8 {
        let kind = TagType::try_from(value).unwrap();
        assert_eq!(Tag::new(kind).tag_type(), kind);
    }
    assert_eq!(Tag::new(TagType::Int), Tag::Int(0));
    assert_eq!(Tag::new(TagType::String), Tag::String(String::new()));
}

#[test]
fn builder_output_decodes_in_every_format() {
    for format in BinaryFormat::ALL {
        let payload = Builder::with_format(format)
            .start_compound("root")
            .int("n", 42)
            .string("s", "hi")
            .end_compound()
            .build();

        let (name, tag) = binary::from_bytes_named(&payload, format).unwrap();
        assert_eq!(name, "root");
        assert_eq!(tag.get("n").unwrap(), &Tag::Int(42));
        assert_eq!(tag.get("s").unwrap(), "hi");
    }
}
