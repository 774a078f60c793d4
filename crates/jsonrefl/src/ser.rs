//! Generic serialization: appending the JSON text of a value to a `String`.
//!
//! Output is compact (no whitespace), members come in registry order, and
//! strings are escaped so the result is always valid JSON.
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt::Write;

use crate::{EnumNames, FixedStr, Record};

/// A value that can be written as JSON.
pub trait Marshal {
    /// Appends the JSON text of `self` to `out`.
    fn marshal(&self, out: &mut String);
}

/// Appends `text` as a quoted JSON string.
///
/// `"` and `\` are escaped, as are all control characters: `\n`, `\r` and
/// `\t` in their short form, the rest (and the line separators U+2028 and
/// U+2029) as `\uXXXX`.
pub fn write_escaped(out: &mut String, text: &str) {
    out.reserve(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => push_unicode_escape(out, c),
            c if c.is_control() && u32::from(c) <= 0xFFFF => push_unicode_escape(out, c),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn push_unicode_escape(out: &mut String, c: char) {
    // writing to a `String` cannot fail
    let _ = write!(out, "\\u{:04X}", u32::from(c));
}

/// Replaces a trailing `,` with `close`, or appends `close`.
fn close(out: &mut String, close: char) {
    if out.ends_with(',') {
        out.pop();
    }
    out.push(close);
}

/// Appends `[`, the comma-separated elements, and `]`.
pub fn marshal_sequence<'a, T: Marshal + 'a>(items: impl IntoIterator<Item = &'a T>, out: &mut String) {
    out.push('[');
    for item in items {
        item.marshal(out);
        out.push(',');
    }
    close(out, ']');
}

/// Appends `{`, one `"name":value` pair per member in registry order, and
/// `}`.
pub fn marshal_record<R: Record + ?Sized>(record: &R, out: &mut String) {
    out.push('{');
    for (index, field) in R::FIELDS.iter().enumerate() {
        if let Some(value) = record.field_ref(index) {
            write_escaped(out, field.name());
            out.push(':');
            value.marshal(out);
            out.push(',');
        }
    }
    close(out, '}');
}

/// Appends the quoted display name of `value`.
pub fn marshal_enum<E: EnumNames>(value: E, out: &mut String) {
    write_escaped(out, value.name());
}

impl Marshal for bool {
    fn marshal(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

macro_rules! marshal_integer {
    ($($ty:ty),+) => {
        $(impl Marshal for $ty {
            fn marshal(&self, out: &mut String) {
                let _ = write!(out, "{self}");
            }
        })+
    };
}

marshal_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! marshal_float {
    ($($ty:ty),+) => {
        $(impl Marshal for $ty {
            /// Shortest text that reads back as the same value; `null` for
            /// NaN and infinities.
            fn marshal(&self, out: &mut String) {
                if self.is_finite() {
                    let _ = write!(out, "{self}");
                } else {
                    out.push_str("null");
                }
            }
        })+
    };
}

marshal_float!(f32, f64);

impl Marshal for str {
    fn marshal(&self, out: &mut String) {
        write_escaped(out, self);
    }
}

impl Marshal for String {
    fn marshal(&self, out: &mut String) {
        write_escaped(out, self);
    }
}

impl Marshal for Cow<'_, str> {
    fn marshal(&self, out: &mut String) {
        write_escaped(out, self);
    }
}

impl<const N: usize> Marshal for FixedStr<N> {
    fn marshal(&self, out: &mut String) {
        write_escaped(out, self.as_str());
    }
}

impl<T: Marshal> Marshal for Option<T> {
    fn marshal(&self, out: &mut String) {
        match self {
            Some(value) => value.marshal(out),
            None => out.push_str("null"),
        }
    }
}

impl<T: Marshal> Marshal for [T] {
    fn marshal(&self, out: &mut String) {
        marshal_sequence(self, out);
    }
}

impl<T: Marshal, const N: usize> Marshal for [T; N] {
    fn marshal(&self, out: &mut String) {
        marshal_sequence(self, out);
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn marshal(&self, out: &mut String) {
        marshal_sequence(self, out);
    }
}

impl<T: Marshal + ?Sized> Marshal for &T {
    fn marshal(&self, out: &mut String) {
        (**self).marshal(out);
    }
}
