#![no_main]

use arbitrary::Arbitrary;
use jsonrefl::{
    DeserializeOptions, FixedStr, UnknownKeys, deserialize_with, json_enum, record, serialize,
    tokenizer::{Container, Step, Token, Tokenizer},
};
use libfuzzer_sys::fuzz_target;

json_enum! {
    #[derive(Debug, Clone, Copy, Default)]
    enum Mode {
        #[default]
        Off = 0,
        On = 1,
        Auto = -1,
    }
}

record! {
    #[derive(Debug, Default)]
    struct Inner {
        name: String,
        code: FixedStr<4>,
        mode: Mode,
    }
}

record! {
    #[derive(Debug, Default)]
    struct Target {
        id: i64,
        ratio: f64,
        flag: Option<bool>,
        small: [u8; 3],
        tags: Vec<String>,
        inner: Inner,
        items: Vec<Inner>,
    }
}

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    policy: u8,
    max_depth: u8,
    data: &'a [u8],
}

/// Walks the raw token stream and checks the tokenizer never runs past the
/// input, whatever the outcome.
fn tokenize(data: &[u8]) {
    let mut tokenizer = Tokenizer::new(data);
    let mut token = Token::default();
    let mut stack: Vec<Container> = Vec::new();
    loop {
        match tokenizer.next_token(stack.last().copied(), &mut token) {
            Ok(Step::Token) => assert!(token.start <= token.end && token.end <= data.len()),
            Ok(Step::Enter(container)) => stack.push(container),
            Ok(Step::Leave(container)) => assert_eq!(stack.pop(), Some(container)),
            Ok(Step::Finished) => {
                assert!(stack.is_empty());
                assert!(tokenizer.is_finished());
                assert!(tokenizer.remaining().is_empty());
                break;
            }
            Err(_) => {
                assert!(!tokenizer.is_finished());
                assert!(tokenizer.position() <= data.len());
                break;
            }
        }
    }
}

fuzz_target!(|input: Input<'_>| {
    tokenize(input.data);

    let options = DeserializeOptions {
        unknown_keys: match input.policy % 3 {
            0 => UnknownKeys::Reject,
            1 => UnknownKeys::StopEarly,
            _ => UnknownKeys::Skip,
        },
        max_depth: usize::from(input.max_depth),
    };
    let mut target = Target::default();
    if deserialize_with(&mut target, input.data, &options).is_ok() {
        let text = serialize(&target);
        if let Err(err) = serde_json::from_str::<serde_json::Value>(&text) {
            panic!("serialized output rejected by serde_json: {err}\n{text}");
        }
    }
});
