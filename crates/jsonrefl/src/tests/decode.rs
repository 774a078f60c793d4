use alloc::{string::String, vec};

use rstest::rstest;

use super::{Code, Color, Id, Inner, Mixed, Outer, Paint, Slots, Wide};
use crate::{
    DeserializeOptions, ErrorKind, FixedStr, SyntaxError, UnknownKeys, deserialize,
    deserialize_array, deserialize_with,
};

fn skip_unknown() -> DeserializeOptions {
    DeserializeOptions {
        unknown_keys: UnknownKeys::Skip,
        ..DeserializeOptions::default()
    }
}

#[test]
fn partial_decode_stops_at_unknown_key() {
    let mut id = Id::default();
    deserialize(&mut id, r#"{"id":1,"extra":"x"}"#, true).unwrap();
    assert_eq!(id.id, 1);
}

#[test]
fn partial_decode_does_not_read_past_unknown_key() {
    let mut id = Id::default();
    deserialize(&mut id, r#"{"kind": "circle", "id": 5}"#, true).unwrap();
    assert_eq!(id.id, 0);
}

#[test]
fn strict_decode_rejects_unknown_key() {
    let mut id = Id::default();
    let err = deserialize(&mut id, r#"{"id":1,"extra":"x"}"#, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedKey("extra".into()));
    assert_eq!(err.offset(), 9);
    assert_eq!(id.id, 1);
}

#[test]
fn nested_records_stay_strict_under_partial_decode() {
    let mut outer = Outer::default();
    let err = deserialize(&mut outer, r#"{"inner": {"a": 1, "b": 2}, "x": 3}"#, true).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedKey("b".into()));
    assert_eq!(outer.inner.a, 1);
}

#[test]
fn skip_policy_ignores_unknown_values_at_any_depth() {
    let mut outer = Outer::default();
    let json = r#"{"meta": {"deep": [1, {"x": null}]}, "inner": {"z": "?", "a": 5}, "x": 9}"#;
    deserialize_with(&mut outer, json, &skip_unknown()).unwrap();
    assert_eq!(outer, Outer { inner: Inner { a: 5 }, x: 9 });
}

#[test]
fn skip_policy_still_reports_malformed_skipped_values() {
    let mut id = Id::default();
    let err = deserialize_with(&mut id, r#"{"extra": [1, }"#, &skip_unknown()).unwrap_err();
    assert!(err.is_syntax());
}

#[rstest]
#[case::fits(r#"{"code":"ab"}"#, "ab")]
#[case::exactly_full(r#"{"code":"abc"}"#, "abc")]
#[case::escaped(r#"{"code":"a\"b"}"#, "a\"b")]
fn fixed_text_within_capacity(#[case] json: &str, #[case] expected: &str) {
    let mut code = Code::default();
    deserialize(&mut code, json, false).unwrap();
    assert_eq!(code.code, expected);
}

#[test]
fn fixed_text_over_capacity_fails() {
    let mut code = Code {
        code: FixedStr::try_from("old").unwrap(),
    };
    let err = deserialize(&mut code, r#"{"code":"abcd"}"#, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TextTooLarge { capacity: 3, len: 4 });
    assert_eq!(err.offset(), 9);
    assert!(code.code.is_empty());
}

#[test]
fn fixed_array_underfill_resets_tail() {
    let mut values = [9; 5];
    deserialize_array(&mut values, "[1,2,3]").unwrap();
    assert_eq!(values, [1, 2, 3, 0, 0]);
}

#[test]
fn fixed_array_overflow_fails() {
    let mut values = [0; 5];
    let err = deserialize_array(&mut values, "[1,2,3,4,5,6]").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ArrayTooSmall { capacity: 5 });
    assert_eq!(err.offset(), 11);
    assert_eq!(values, [1, 2, 3, 4, 5]);
}

#[test]
fn fixed_array_member() {
    let mut slots = Slots::default();
    deserialize(&mut slots, r#"{"values": [4, 5]}"#, false).unwrap();
    assert_eq!(slots.values, [4, 5, 0, 0, 0]);
}

#[test]
fn top_level_array_must_be_an_array() {
    let mut values = [0_u8; 2];
    let err = deserialize_array(&mut values, r#"{"a":1}"#).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ExpectedArray);
}

#[rstest]
#[case::name(r#"{"color": "Green"}"#, Color::Green)]
#[case::numeric_string(r#"{"color": "1"}"#, Color::Green)]
#[case::number(r#"{"color": 2}"#, Color::Blue)]
#[case::unknown_name(r#"{"color": "Purple"}"#, Color::Red)]
#[case::wrong_case(r#"{"color": "green"}"#, Color::Red)]
#[case::unknown_value(r#"{"color": 7}"#, Color::Red)]
fn enum_from_name_or_value(#[case] json: &str, #[case] expected: Color) {
    let mut paint = Paint { color: Color::Blue };
    if expected == Color::Blue {
        paint.color = Color::Red;
    }
    deserialize(&mut paint, json, false).unwrap();
    assert_eq!(paint.color, expected);
}

#[test]
fn enum_rejects_other_tokens() {
    let mut paint = Paint::default();
    let err = deserialize(&mut paint, r#"{"color": true}"#, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ExpectedString);
}

#[test]
fn nested_record_decodes_both_levels() {
    let mut outer = Outer::default();
    deserialize(&mut outer, r#"{"inner":{"a":5},"x":9}"#, false).unwrap();
    assert_eq!(outer, Outer { inner: Inner { a: 5 }, x: 9 });
}

#[test]
fn keys_in_any_order_and_missing_keys_keep_values() {
    let mut outer = Outer {
        inner: Inner { a: 1 },
        x: 2,
    };
    deserialize(&mut outer, r#"{"x": 3}"#, false).unwrap();
    assert_eq!(outer, Outer { inner: Inner { a: 1 }, x: 3 });
    deserialize(&mut outer, "{}", false).unwrap();
    assert_eq!(outer.x, 3);
}

#[test]
fn whitespace_is_ignored() {
    let mut outer = Outer::default();
    let json = "\n\t{ \"inner\" :\r\n{ \"a\" : 5 } ,\"x\":9 }  \n";
    deserialize(&mut outer, json, false).unwrap();
    assert_eq!(outer, Outer { inner: Inner { a: 5 }, x: 9 });
}

#[test]
fn mixed_members() {
    let mut mixed = Mixed {
        note: Some("stale".into()),
        ..Mixed::default()
    };
    let json = r#"{"flag": true, "ratio": -2.5e-1, "note": null, "items": [{"a": 1}, {"a": 2}]}"#;
    deserialize(&mut mixed, json, false).unwrap();
    assert_eq!(
        mixed,
        Mixed {
            flag: true,
            ratio: -0.25,
            note: None,
            items: vec![Inner { a: 1 }, Inner { a: 2 }],
        }
    );

    deserialize(&mut mixed, r#"{"note": "tab\there é", "items": []}"#, false).unwrap();
    assert_eq!(mixed.note.as_deref(), Some("tab\there \u{e9}"));
    assert!(mixed.items.is_empty());
}

#[test]
fn failed_sequence_keeps_previous_vector() {
    let mut mixed = Mixed {
        items: vec![Inner { a: 7 }],
        ..Mixed::default()
    };
    let err = deserialize(&mut mixed, r#"{"items": [{"a": 1}, {"a": "two"}]}"#, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ExpectedNumber);
    assert_eq!(mixed.items, vec![Inner { a: 7 }]);
}

#[rstest]
#[case::integer("7", 7)]
#[case::truncated_fraction("-45.2", -45)]
#[case::exponent("1.5e2", 150)]
fn integer_members(#[case] number: &str, #[case] expected: i32) {
    let mut id = Id::default();
    let json = String::from(r#"{"id": "#) + number + "}";
    deserialize(&mut id, &json, false).unwrap();
    assert_eq!(id.id, expected);
}

#[rstest]
#[case::string(r#"{"id": "1"}"#, ErrorKind::ExpectedNumber, 8)]
#[case::array(r#"{"id": [1]}"#, ErrorKind::ExpectedValue, 7)]
#[case::object(r#"{"id": {}}"#, ErrorKind::ExpectedValue, 7)]
#[case::out_of_range(r#"{"id": 3000000000}"#, ErrorKind::NumberOutOfRange, 7)]
#[case::not_an_object("[1]", ErrorKind::ExpectedObject, 0)]
#[case::scalar_document("5", ErrorKind::ExpectedObject, 0)]
fn shape_errors(#[case] json: &str, #[case] kind: ErrorKind, #[case] offset: usize) {
    let mut id = Id::default();
    let err = deserialize(&mut id, json, false).unwrap_err();
    assert_eq!(err.kind(), &kind);
    assert_eq!(err.offset(), offset);
}

#[test]
fn wide_unsigned_round_trips() {
    let wide = Wide {
        big: u128::MAX,
        single: f32::MAX,
        double: f64::MIN_POSITIVE,
    };
    let text = crate::serialize(&wide);
    let mut back = Wide::default();
    deserialize(&mut back, &text, false).unwrap();
    assert_eq!(back, wide);
}

#[rstest]
#[case::single_overflow(r#"{"single": 1e39}"#, 11)]
#[case::single_negative_overflow(r#"{"single": -1e39}"#, 11)]
#[case::double_overflow(r#"{"double": 1e400}"#, 11)]
#[case::wide_above_max(r#"{"big": 340282366920938463463374607431768211456}"#, 8)]
#[case::wide_negative(r#"{"big": -1}"#, 8)]
fn numbers_that_do_not_fit(#[case] json: &str, #[case] offset: usize) {
    let mut wide = Wide::default();
    let err = deserialize(&mut wide, json, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NumberOutOfRange);
    assert_eq!(err.offset(), offset);
    assert_eq!(wide, Wide::default());
}

#[rstest]
#[case::missing_value(r#"{"id": }"#, SyntaxError::InvalidCharacter('}'), 7)]
#[case::trailing_characters(r#"{"id": 1} x"#, SyntaxError::TrailingCharacters, 10)]
#[case::second_document(r#"{"id": 1}{}"#, SyntaxError::TrailingCharacters, 9)]
#[case::unterminated(r#"{"id": 1"#, SyntaxError::UnexpectedEndOfInput, 8)]
#[case::empty("", SyntaxError::UnexpectedEndOfInput, 0)]
fn syntax_errors(#[case] json: &str, #[case] expected: SyntaxError, #[case] offset: usize) {
    let mut id = Id::default();
    let err = deserialize(&mut id, json, false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Syntax(expected));
    assert_eq!(err.offset(), offset);
}

#[test]
fn invalid_utf8_is_a_syntax_error() {
    let mut id = Id::default();
    let err = deserialize(&mut id, b"{\"id\": \xC0}".as_slice(), false).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Syntax(SyntaxError::InvalidUtf8));
    assert_eq!(err.offset(), 7);
}

#[test]
fn depth_limit_is_reported() {
    let mut outer = Outer::default();
    let options = DeserializeOptions {
        max_depth: 1,
        ..DeserializeOptions::default()
    };
    let err = deserialize_with(&mut outer, r#"{"inner":{"a":5},"x":9}"#, &options).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DepthLimitExceeded { limit: 1 });
    assert_eq!(err.offset(), 9);
}

#[test]
fn deep_nesting_within_limit_is_fine() {
    let mut outer = Outer::default();
    let options = DeserializeOptions {
        max_depth: 2,
        ..DeserializeOptions::default()
    };
    deserialize_with(&mut outer, r#"{"inner":{"a":5},"x":9}"#, &options).unwrap();
}
