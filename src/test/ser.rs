use std::collections::BTreeMap;

use serde::Serialize;

use crate::binary::{self, BinaryFormat};
use crate::error::ErrorKind;
use crate::{nbt, to_tag, ByteArray, IntArray, LongArray, Tag, TagType};

#[derive(Serialize)]
struct Item {
    id: String,
    count: i8,
}

#[derive(Serialize)]
struct Player {
    name: String,
    level: i32,
    xp: f32,
    score: u64,
    alive: bool,
    inventory: Vec<Item>,
    recent: Vec<i16>,
    seen: ByteArray,
    stamps: LongArray,
    nickname: Option<String>,
}

fn player() -> Player {
    Player {
        name: "Alex".into(),
        level: 12,
        xp: 0.5,
        score: 99,
        alive: true,
        inventory: vec![
            Item {
                id: "minecraft:stone".into(),
                count: 64,
            },
            Item {
                id: "minecraft:torch".into(),
                count: 3,
            },
        ],
        recent: vec![1, 2],
        seen: ByteArray::new(vec![1, 0]),
        stamps: LongArray::new(vec![5]),
        nickname: Some("lex".into()),
    }
}

#[test]
fn struct_to_compound() {
    let tag = to_tag(&player()).unwrap();
    let expected = nbt!({
        "name": "Alex",
        "level": 12,
        "xp": 0.5_f32,
        "score": 99_i64,
        "alive": 1_i8,
        "inventory": [
            { "id": "minecraft:stone", "count": 64_i8 },
            { "id": "minecraft:torch", "count": 3_i8 },
        ],
        "recent": [1_i16, 2_i16],
        "seen": [B; 1, 0],
        "stamps": [L; 5],
        "nickname": "lex",
    })
    .unwrap();
    assert_eq!(tag, expected);
}

#[test]
fn sequences_of_ints_stay_lists() {
    let tag = to_tag(&vec![1_i32, 2, 3]).unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Int);

    let tag = to_tag(&vec![1_i8, 2]).unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Byte);

    let tag = to_tag(&IntArray::new(vec![1, 2])).unwrap();
    assert_eq!(tag, Tag::IntArray(IntArray::new(vec![1, 2])));
}

#[test]
fn none_is_an_error() {
    let mut p = player();
    p.nickname = None;
    assert_eq!(to_tag(&p).unwrap_err().kind(), &ErrorKind::Other);
}

#[test]
fn unit_is_an_error() {
    #[derive(Serialize)]
    struct Marker {
        id: i32,
        flag: (),
    }

    let err = to_tag(&Marker { id: 1, flag: () }).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Other);
    assert!(to_tag(&()).is_err());
    assert!(to_tag(&Tag::End).is_err());
}

#[test]
fn mixed_sequence_is_an_error() {
    #[derive(Serialize)]
    #[serde(untagged)]
    enum Either {
        Num(i32),
        Text(String),
    }

    let err = to_tag(&vec![Either::Num(1), Either::Text("a".into())]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ListHeterogeneity { .. }));
}

#[test]
fn enums() {
    #[derive(Serialize)]
    enum Shape {
        Unit,
        Circle(f64),
        Point(i32, i32),
        Rect { w: i16, h: i16 },
    }

    assert_eq!(to_tag(&Shape::Unit).unwrap(), "Unit");
    assert_eq!(
        to_tag(&Shape::Circle(1.0)).unwrap(),
        nbt!({ "Circle": 1.0 }).unwrap()
    );
    assert_eq!(
        to_tag(&Shape::Point(1, 2)).unwrap().to_string(),
        "{Point:[1,2]}"
    );
    assert_eq!(
        to_tag(&Shape::Rect { w: 2, h: 3 }).unwrap().to_string(),
        "{Rect:{w:2s,h:3s}}"
    );
}

#[test]
fn maps_and_keys() {
    let mut map = BTreeMap::new();
    map.insert(2_u8, "two");
    map.insert(1_u8, "one");
    assert_eq!(to_tag(&map).unwrap().to_string(), "{1:one,2:two}");

    let mut bad = BTreeMap::new();
    bad.insert(vec![1], 1);
    assert!(to_tag(&bad).is_err());
}

#[test]
fn wide_integers_become_int_arrays() {
    let tag = to_tag(&0x0000_0001_0000_0002_0000_0003_0000_0004_u128).unwrap();
    assert_eq!(tag, Tag::IntArray(IntArray::new(vec![1, 2, 3, 4])));

    let tag = to_tag(&-1_i128).unwrap();
    assert_eq!(tag, Tag::IntArray(IntArray::new(vec![-1, -1, -1, -1])));
}

#[test]
fn chars_and_bytes() {
    assert_eq!(to_tag(&'A').unwrap(), Tag::Int(65));

    struct Raw<'a>(&'a [u8]);
    impl Serialize for Raw<'_> {
        fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(self.0)
        }
    }
    assert_eq!(
        to_tag(&Raw(&[1, 255])).unwrap(),
        Tag::ByteArray(ByteArray::new(vec![1, -1]))
    );
}

#[test]
fn tags_round_trip_through_serde() {
    let tag = nbt!({
        "a": [1, 2],
        "b": [B; 1],
        "c": [I; 2],
        "d": [L; 3],
        "e": { "f": [{ "g": 1.5_f32 }] },
        "h": [],
    })
    .unwrap();
    assert_eq!(to_tag(&tag).unwrap(), tag);
}

#[test]
fn serialized_structs_encode() {
    let tag = to_tag(&player()).unwrap();
    for format in BinaryFormat::ALL {
        let bytes = binary::to_bytes(&tag, format).unwrap();
        assert_eq!(binary::from_bytes(&bytes, format).unwrap(), tag);
    }
}

#[test]
fn tag_to_json() {
    let tag = to_tag(&player()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&tag.to_json(4).unwrap()).unwrap();
    assert_eq!(json["name"], "Alex");
    assert_eq!(json["inventory"][1]["count"], 3);
    assert_eq!(json["seen"], serde_json::json!([1, 0]));
}
