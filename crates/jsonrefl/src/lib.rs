//! Declarative JSON marshalling for plain records.
//!
//! Structs declared with [`record!`] and enums declared with [`json_enum!`]
//! carry a static description of their members. A generic deserializer
//! walks that description while pulling tokens from a streaming
//! [`Cursor`], and a generic serializer walks it to produce compact JSON, so
//! no per-type (de)serialization code is written by hand.
//!
//! ```rust
//! use jsonrefl::{FixedStr, json_enum, record};
//!
//! json_enum! {
//!     #[derive(Debug, Clone, Copy, Default, PartialEq)]
//!     pub enum Color {
//!         #[default]
//!         Red = 0,
//!         Green = 1,
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Pen {
//!         pub id: u32,
//!         pub color: Color,
//!         pub code: FixedStr<3>,
//!     }
//! }
//!
//! let mut pen = Pen::default();
//! jsonrefl::deserialize(&mut pen, r#"{"id": 7, "color": "Green", "code": "ab"}"#, false)?;
//! assert_eq!(pen.color, Color::Green);
//! assert_eq!(jsonrefl::serialize(&pen), r#"{"id":7,"color":"Green","code":"ab"}"#);
//! # Ok::<(), jsonrefl::Error>(())
//! ```
//!
//! Failures are returned as [`Error`], whose `Display` form locates the
//! problem in the input, and are also logged once through the [`log`]
//! facade under the `jsonrefl` target.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod fixed;
mod nesting;
mod options;
mod shape;

pub mod cursor;
pub mod de;
pub mod enums;
pub mod registry;
pub mod ser;
pub mod tokenizer;

#[cfg(test)]
mod tests;

use alloc::string::String;

use log::error;

pub use cursor::{Cursor, SaxState};
pub use de::Unmarshal;
pub use enums::EnumNames;
pub use error::{CONTEXT_WINDOW, Error, ErrorKind, SyntaxError};
pub use fixed::FixedStr;
pub use options::{DEFAULT_MAX_DEPTH, DeserializeOptions, UnknownKeys};
pub use registry::{Field, Record, RecordMut};
pub use ser::Marshal;
pub use shape::{ScalarKind, Shape, Typed};

#[doc(hidden)]
pub mod __private {
    pub use alloc::string::String;
}

/// Fills the record `target` from the JSON object in `json`.
///
/// With `allow_partial`, decoding stops successfully at the first key the
/// record does not declare, leaving the members read so far in place; this
/// supports decoding a common prefix first and dispatching on it. Without
/// it, an unknown key is an error.
///
/// # Errors
///
/// Returns the first syntax, shape, capacity or unknown-key error. The
/// target may have been partially written.
pub fn deserialize<'de, R, J>(target: &mut R, json: &'de J, allow_partial: bool) -> Result<(), Error>
where
    R: RecordMut<'de>,
    J: AsRef<[u8]> + ?Sized,
{
    deserialize_with(target, json, &DeserializeOptions::partial(allow_partial))
}

/// Like [`deserialize`], with every option spelled out.
///
/// # Errors
///
/// See [`deserialize`]; additionally fails with
/// [`ErrorKind::DepthLimitExceeded`] past [`DeserializeOptions::max_depth`].
pub fn deserialize_with<'de, R, J>(
    target: &mut R,
    json: &'de J,
    options: &DeserializeOptions,
) -> Result<(), Error>
where
    R: RecordMut<'de>,
    J: AsRef<[u8]> + ?Sized,
{
    let mut cursor = Cursor::with_options(json.as_ref(), *options);
    de::unmarshal_record(target, &mut cursor, options.unknown_keys)
        .and_then(|()| finish(&mut cursor))
        .inspect_err(log_failure)
}

/// Fills the fixed-size array `target` from the JSON array in `json`.
///
/// Slots beyond the end of the JSON array are reset to `T::default()`.
///
/// # Errors
///
/// Returns the first syntax or shape error, or
/// [`ErrorKind::ArrayTooSmall`] if the JSON array has more than `N`
/// elements.
pub fn deserialize_array<'de, T, J, const N: usize>(target: &mut [T; N], json: &'de J) -> Result<(), Error>
where
    [T; N]: Unmarshal<'de>,
    J: AsRef<[u8]> + ?Sized,
{
    let mut cursor = Cursor::new(json.as_ref());
    target
        .unmarshal(&mut cursor)
        .and_then(|()| finish(&mut cursor))
        .inspect_err(log_failure)
}

/// Returns the compact JSON text of `source`.
#[must_use]
pub fn serialize<T: Marshal + ?Sized>(source: &T) -> String {
    let mut out = String::new();
    source.marshal(&mut out);
    out
}

/// Surfaces an error recorded after the value was read, such as trailing
/// characters.
fn finish(cursor: &mut Cursor<'_>) -> Result<(), Error> {
    cursor.take_error().map_or(Ok(()), Err)
}

fn log_failure(err: &Error) {
    error!(target: "jsonrefl", "Parse error: {err}");
}
