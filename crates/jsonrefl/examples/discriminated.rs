//! Decodes a stream of tagged messages whose concrete record depends on a
//! `kind` discriminator carried as the first member.
//!
//! Each message is read twice: a partial decode into [`Header`] stops at the
//! first member it does not know, which is enough to learn the `kind`. The
//! full text is then decoded strictly into the matching record.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=jsonrefl=debug cargo run -p jsonrefl --example discriminated
//! ```

use jsonrefl::{Error, FixedStr, deserialize, json_enum, record, serialize};

json_enum! {
    /// The message discriminator.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    enum Kind {
        #[default]
        Unknown = 0,
        Circle = 1,
        Label = 2,
    }
}

record! {
    /// Common prefix of every message.
    #[derive(Debug, Default)]
    struct Header {
        kind: Kind,
    }
}

record! {
    /// A circle centred at a point.
    #[derive(Debug, Default)]
    struct Circle {
        kind: Kind,
        center: [f64; 2],
        radius: f64,
    }
}

record! {
    /// A short text label.
    #[derive(Debug, Default)]
    struct Label {
        kind: Kind,
        text: FixedStr<16>,
        size: u8,
    }
}

/// A decoded message.
#[derive(Debug)]
enum Message {
    /// See [`Circle`].
    Circle(Circle),
    /// See [`Label`].
    Label(Label),
}

fn decode(text: &str) -> Result<Option<Message>, Error> {
    let mut header = Header::default();
    deserialize(&mut header, text, true)?;

    let message = match header.kind {
        Kind::Circle => {
            let mut circle = Circle::default();
            deserialize(&mut circle, text, false)?;
            Message::Circle(circle)
        }
        Kind::Label => {
            let mut label = Label::default();
            deserialize(&mut label, text, false)?;
            Message::Label(label)
        }
        Kind::Unknown => return Ok(None),
    };
    Ok(Some(message))
}

fn main() {
    env_logger::init();

    let inbox = [
        r#"{"kind": "Circle", "center": [1.5, -2], "radius": 4}"#,
        r#"{"kind": 2, "text": "hello", "size": 12}"#,
        r#"{"kind": "Triangle", "points": []}"#,
        r#"{"kind": "Label", "text": "far too long for sixteen bytes"}"#,
    ];

    for text in inbox {
        match decode(text) {
            Ok(Some(Message::Circle(circle))) => {
                println!("{circle:?} -> {}", serialize(&circle));
            }
            Ok(Some(Message::Label(label))) => {
                println!("{label:?} -> {}", serialize(&label));
            }
            Ok(None) => println!("ignored message of unknown kind"),
            Err(err) => println!("rejected: {err}"),
        }
    }
}
