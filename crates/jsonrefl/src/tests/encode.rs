use alloc::{string::String, vec};

use super::{Code, Color, Id, Inner, Mixed, Outer, Paint, Slots};
use crate::{FixedStr, deserialize, serialize};

#[test]
fn record_members_in_declaration_order() {
    let outer = Outer {
        inner: Inner { a: 5 },
        x: 9,
    };
    assert_eq!(serialize(&outer), r#"{"inner":{"a":5},"x":9}"#);
}

#[test]
fn enum_as_its_name() {
    assert_eq!(serialize(&Paint { color: Color::Green }), r#"{"color":"Green"}"#);
    assert_eq!(serialize(&Color::Blue), r#""Blue""#);
}

#[test]
fn fixed_members() {
    let code = Code {
        code: FixedStr::try_from("a\"").unwrap(),
    };
    assert_eq!(serialize(&code), r#"{"code":"a\""}"#);

    let slots = Slots {
        values: [1, 2, 3, 0, 0],
    };
    assert_eq!(serialize(&slots), r#"{"values":[1,2,3,0,0]}"#);
}

#[test]
fn mixed_members() {
    let mixed = Mixed {
        flag: true,
        ratio: 0.5,
        note: None,
        items: vec![Inner { a: 1 }, Inner { a: -2 }],
    };
    assert_eq!(
        serialize(&mixed),
        r#"{"flag":true,"ratio":0.5,"note":null,"items":[{"a":1},{"a":-2}]}"#
    );

    let empty = Mixed {
        note: Some(String::from("line\nbreak")),
        ..Mixed::default()
    };
    assert_eq!(
        serialize(&empty),
        r#"{"flag":false,"ratio":0,"note":"line\nbreak","items":[]}"#
    );
}

#[test]
fn serialized_text_reads_back() {
    let mixed = Mixed {
        flag: true,
        ratio: -1.25e-7,
        note: Some(String::from("quote \" backslash \\ control \u{1} tab \t")),
        items: vec![Inner { a: i32::MIN }, Inner { a: i32::MAX }],
    };
    let text = serialize(&mixed);
    let mut back = Mixed::default();
    deserialize(&mut back, &text, false).unwrap();
    assert_eq!(back, mixed);

    let id = Id { id: -7 };
    let mut back = Id::default();
    deserialize(&mut back, &serialize(&id), false).unwrap();
    assert_eq!(back, id);
}
