use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::ErrorKind;
use crate::{nbt, ByteArray, Compound, IntArray, List, LongArray, Tag, TagType, Variant};

#[test]
fn plain_integers_become_int() {
    assert_eq!(Variant::from(5).into_tag().unwrap(), Tag::Int(5));
    assert_eq!(Variant::from(5_usize).into_tag().unwrap(), Tag::Int(5));
    assert_eq!(Variant::integer(7).into_tag().unwrap(), Tag::Int(7));
}

#[test]
fn explicit_widths_are_kept() {
    assert_eq!(Variant::from(5_i8).into_tag().unwrap(), Tag::Byte(5));
    assert_eq!(Variant::from(200_u8).into_tag().unwrap(), Tag::Byte(-56));
    assert_eq!(Variant::from(5_u16).into_tag().unwrap(), Tag::Short(5));
    assert_eq!(Variant::from(5_i64).into_tag().unwrap(), Tag::Long(5));
    assert_eq!(Variant::from(true).into_tag().unwrap(), Tag::Byte(1));
    assert_eq!(Variant::from(1.5_f32).into_tag().unwrap(), Tag::Float(1.5));
    assert_eq!(Variant::from(1.5).into_tag().unwrap(), Tag::Double(1.5));
    assert_eq!(Variant::short(-2).into_tag().unwrap(), Tag::Short(-2));
    assert_eq!(Variant::double(0.5).into_tag().unwrap(), Tag::Double(0.5));
}

#[test]
fn plain_integer_sequence_is_an_int_list() {
    let tag = Variant::from(vec![1, 2, 34, 92873, 52678, -56278])
        .into_tag()
        .unwrap();
    let list = tag.as_list().unwrap();
    assert_eq!(list.element_type(), TagType::Int);
    assert_eq!(list.len(), 6);
    assert_eq!(tag.to_string(), "[1,2,34,92873,52678,-56278]");
}

#[test]
fn short_sequence_is_a_short_list() {
    let tag = Variant::from(vec![Variant::short(23), Variant::short(87)])
        .into_tag()
        .unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Short);
    assert_eq!(tag.to_string(), "[23s,87s]");
}

#[test]
fn explicit_sequences_become_arrays() {
    assert_eq!(
        Variant::from(vec![1_i8, 2]).into_tag().unwrap(),
        Tag::ByteArray(ByteArray::new(vec![1, 2]))
    );
    assert_eq!(
        Variant::from(vec![Variant::int(1), Variant::int(2)])
            .into_tag()
            .unwrap(),
        Tag::IntArray(IntArray::new(vec![1, 2]))
    );
    assert_eq!(
        Variant::from([3_i64, 4]).into_tag().unwrap(),
        Tag::LongArray(LongArray::new(vec![3, 4]))
    );
}

#[test]
fn mixed_widths_fall_back_to_lists() {
    // A plain integer among explicit ones does not make an array.
    let mixed = Variant::from(vec![Variant::int(1), Variant::integer(2)]);
    let tag = mixed.into_tag().unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Int);

    let err = Variant::from(vec![Variant::byte(1), Variant::long(2)])
        .into_tag()
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::ListHeterogeneity {
            expected: TagType::Byte,
            found: TagType::Long
        }
    );
}

#[test]
fn float_sequences_are_lists() {
    let tag = Variant::from(vec![1.5_f32, 2.0]).into_tag().unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Float);

    let tag = Variant::from(vec![1.5, 2.0]).into_tag().unwrap();
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::Double);
}

#[test]
fn empty_sequence_is_an_empty_list() {
    let tag = Variant::Seq(Vec::new()).into_tag().unwrap();
    assert_eq!(tag, Tag::List(List::new()));
    assert_eq!(tag.as_list().unwrap().element_type(), TagType::End);
}

#[test]
fn heterogeneous_sequence_fails() {
    let err = Variant::Seq(vec![Variant::from(1), Variant::from("a")])
        .into_tag()
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ListHeterogeneity { .. }));
}

#[test]
fn maps_keep_their_order() {
    let mut map = IndexMap::new();
    map.insert("z", 1);
    map.insert("a", 2);
    let tag = Variant::from(map).into_tag().unwrap();
    assert_eq!(tag.to_string(), "{z:1,a:2}");

    let mut sorted = BTreeMap::new();
    sorted.insert("z".to_string(), "last");
    sorted.insert("a".to_string(), "first");
    let tag = Variant::from(sorted).into_tag().unwrap();
    assert_eq!(tag.to_string(), "{a:first,z:last}");

    let tag = Variant::map(vec![("k", Variant::long(1))]).into_tag().unwrap();
    assert_eq!(tag.get("k").unwrap(), &Tag::Long(1));
}

#[test]
fn tags_pass_through() {
    let original = nbt!({ "a": [1, 2], "b": [I;] }).unwrap();
    assert_eq!(
        Variant::from(original.clone()).into_tag().unwrap(),
        original
    );
    assert_eq!(original.clone().into_variant().into_tag().unwrap(), original);
    assert_eq!(Tag::try_from(Variant::from("s")).unwrap(), "s");

    let list = List::try_from(vec![Tag::Byte(1)]).unwrap();
    assert_eq!(Variant::from(list.clone()).into_tag().unwrap(), Tag::List(list));
}

#[test]
fn end_is_not_a_compound_value() {
    assert!(Variant::map(vec![("a", Tag::End)]).into_tag().is_err());
    assert!(nbt!({ "a": 1, "b": Tag::End }).is_err());
    assert!(nbt!({ "outer": { "inner": Tag::End } }).is_err());

    // A bare end is still a valid root.
    assert_eq!(Variant::from(Tag::End).into_tag().unwrap(), Tag::End);
}

#[test]
fn collect_into_variant() {
    let tag = (1..=3).map(|i| i * 2).collect::<Variant>().into_tag().unwrap();
    assert_eq!(tag.to_string(), "[2,4,6]");
}

#[test]
fn nested_structures() {
    let tag = Variant::map(vec![
        ("pos", Variant::from(vec![1.0, 2.0, 3.0])),
        (
            "items",
            Variant::from(vec![
                Variant::map(vec![("id", "stone")]),
                Variant::map(vec![("id", "dirt")]),
            ]),
        ),
    ])
    .into_tag()
    .unwrap();
    assert_eq!(
        tag.to_string(),
        "{pos:[1.0d,2.0d,3.0d],items:[{id:stone},{id:dirt}]}"
    );
}

#[test]
fn get_and_at() {
    let tag = nbt!({ "list": [10, 20], "s": "x" }).unwrap();
    assert_eq!(tag.get("list").unwrap().at(1).unwrap(), &Tag::Int(20));

    let err = tag.get("missing").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::KeyNotFound("missing".into()));

    let err = tag.get("list").unwrap().at(2).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::IndexOutOfRange { index: 2, len: 2 });

    let err = tag.get("s").unwrap().get("x").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));

    let err = tag.at(0).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: TagType::List,
            found: TagType::Compound
        }
    );
}

#[test]
fn get_mut_and_at_mut() {
    let mut tag = nbt!({ "list": [10, 20] }).unwrap();
    tag.get_mut("list")
        .unwrap()
        .at_mut(0)
        .unwrap()
        .set_integer(11)
        .unwrap();
    assert_eq!(tag, nbt!({ "list": [11, 20] }).unwrap());

    assert!(tag.get_mut("nope").is_err());
    assert!(tag.get_mut("list").unwrap().at_mut(5).is_err());
}

#[test]
fn values_iterates_children() {
    let tag = nbt!({ "a": 1, "b": 2, "c": 3 }).unwrap();
    let values: Vec<_> = tag.values().unwrap().collect();
    assert_eq!(values, [&Tag::Int(1), &Tag::Int(2), &Tag::Int(3)]);
    assert_eq!(tag.values().unwrap().len(), 3);

    let list = nbt!(["x", "y"]).unwrap();
    let mut iter = list.values().unwrap();
    assert_eq!(iter.next().unwrap(), "x");
    let rest = iter.clone();
    assert_eq!(iter.next().unwrap(), "y");
    assert_eq!(rest.count(), 1);

    assert!(Tag::Int(1).values().is_err());
}

#[test]
fn len_and_is_empty() {
    assert_eq!(nbt!({ "a": 1 }).unwrap().len().unwrap(), 1);
    assert_eq!(nbt!([1, 2, 3]).unwrap().len().unwrap(), 3);
    assert_eq!(nbt!([L; 1, 2]).unwrap().len().unwrap(), 2);
    assert_eq!(Tag::String("abc".into()).len().unwrap(), 3);
    assert!(nbt!({}).unwrap().is_empty().unwrap());
    assert!(Tag::Compound(Compound::new()).is_empty().unwrap());

    let err = Tag::Double(1.0).len().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
}
