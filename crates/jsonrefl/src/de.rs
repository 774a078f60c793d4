//! Generic deserialization: filling a destination value from a [`Cursor`].
//!
//! Each destination type implements [`Unmarshal`]. Scalars read the current
//! token and advance past it; sequences and records check that the cursor
//! is entering the right container, recurse into their elements or members,
//! and advance past the closing bracket. Every impl either fails or moves
//! the cursor forward, so the container loops always terminate.
//!
//! On failure the destination may be left partially written.
use alloc::{borrow::Cow, string::String, vec::Vec};

use log::debug;

use crate::{
    Cursor, EnumNames, Error, ErrorKind, FixedStr, RecordMut, SaxState, UnknownKeys,
    tokenizer::TokenKind,
};

/// A destination that can be filled from JSON.
///
/// `'de` is the lifetime of the input text, which lets destinations such as
/// `Cow<'de, str>` borrow from it.
pub trait Unmarshal<'de> {
    /// Reads one complete value at the cursor into `self` and advances past
    /// it.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded on the cursor.
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error>;
}

fn expect_value(cursor: &mut Cursor<'_>) -> Result<(), Error> {
    if cursor.state() == SaxState::HadValue {
        Ok(())
    } else {
        Err(cursor.fail(ErrorKind::ExpectedValue))
    }
}

fn expect_token(cursor: &mut Cursor<'_>, kind: TokenKind, or: ErrorKind) -> Result<(), Error> {
    expect_value(cursor)?;
    if cursor.token_kind() == Some(kind) {
        Ok(())
    } else {
        Err(cursor.fail(or))
    }
}

fn expect_container(cursor: &mut Cursor<'_>, state: SaxState, or: ErrorKind) -> Result<(), Error> {
    if cursor.state() == state {
        cursor.advance();
        Ok(())
    } else {
        Err(cursor.fail(or))
    }
}

impl<'de> Unmarshal<'de> for bool {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_value(cursor)?;
        match cursor.token_kind() {
            Some(TokenKind::True | TokenKind::False) => *self = cursor.get_bool(),
            _ => return Err(cursor.fail(ErrorKind::ExpectedBool)),
        }
        cursor.advance();
        Ok(())
    }
}

macro_rules! unmarshal_integer {
    ($($ty:ty),+) => {
        $(impl<'de> Unmarshal<'de> for $ty {
            fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
                expect_token(cursor, TokenKind::Number, ErrorKind::ExpectedNumber)?;
                *self = cursor
                    .get_integer()
                    .ok_or_else(|| cursor.fail(ErrorKind::NumberOutOfRange))?;
                cursor.advance();
                Ok(())
            }
        })+
    };
}

unmarshal_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! unmarshal_float {
    ($($ty:ty),+) => {
        $(impl<'de> Unmarshal<'de> for $ty {
            fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
                expect_token(cursor, TokenKind::Number, ErrorKind::ExpectedNumber)?;
                let value: $ty = cursor
                    .number_lexeme()
                    .and_then(|lexeme| lexeme.parse().ok())
                    .unwrap_or_default();
                if !value.is_finite() {
                    return Err(cursor.fail(ErrorKind::NumberOutOfRange));
                }
                *self = value;
                cursor.advance();
                Ok(())
            }
        })+
    };
}

unmarshal_float!(f32, f64);

impl<'de> Unmarshal<'de> for String {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_token(cursor, TokenKind::String, ErrorKind::ExpectedString)?;
        *self = cursor.get_string().into_owned();
        cursor.advance();
        Ok(())
    }
}

impl<'de> Unmarshal<'de> for Cow<'de, str> {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_token(cursor, TokenKind::String, ErrorKind::ExpectedString)?;
        *self = cursor.get_string();
        cursor.advance();
        Ok(())
    }
}

impl<'de, const N: usize> Unmarshal<'de> for FixedStr<N> {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_token(cursor, TokenKind::String, ErrorKind::ExpectedString)?;
        let text = cursor.get_string();
        self.try_set(&text).map_err(|kind| cursor.fail(kind))?;
        cursor.advance();
        Ok(())
    }
}

/// `null` clears the option; anything else is read into the inner value,
/// starting from its current content or `T::default()`.
impl<'de, T: Unmarshal<'de> + Default> Unmarshal<'de> for Option<T> {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        if cursor.state() == SaxState::HadValue && cursor.token_kind() == Some(TokenKind::Null) {
            *self = None;
            cursor.advance();
            return Ok(());
        }
        self.get_or_insert_with(T::default).unmarshal(cursor)
    }
}

/// Elements are collected into a fresh vector that replaces `self` only
/// once the whole array has been read.
impl<'de, T: Unmarshal<'de> + Default> Unmarshal<'de> for Vec<T> {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_container(cursor, SaxState::EnteringArray, ErrorKind::ExpectedArray)?;
        let mut items = Vec::new();
        while cursor.state() != SaxState::LeavingArray {
            let mut item = T::default();
            item.unmarshal(cursor)?;
            items.push(item);
        }
        *self = items;
        cursor.advance();
        Ok(())
    }
}

/// Every slot is reset to `T::default()` first, so a shorter JSON array
/// leaves the tail at its default. A longer one fails with
/// [`ErrorKind::ArrayTooSmall`] at the first element that does not fit.
impl<'de, T: Unmarshal<'de> + Default, const N: usize> Unmarshal<'de> for [T; N] {
    fn unmarshal(&mut self, cursor: &mut Cursor<'de>) -> Result<(), Error> {
        expect_container(cursor, SaxState::EnteringArray, ErrorKind::ExpectedArray)?;
        self.fill_with(T::default);
        let mut index = 0;
        while cursor.state() != SaxState::LeavingArray {
            let Some(slot) = self.get_mut(index) else {
                return Err(cursor.fail(ErrorKind::ArrayTooSmall { capacity: N }));
            };
            slot.unmarshal(cursor)?;
            index += 1;
        }
        cursor.advance();
        Ok(())
    }
}

/// Fills a record from a JSON object.
///
/// Keys may come in any order and members missing from the object keep
/// their current value. `unknown_keys` decides what happens to a key the
/// record does not declare; [`UnknownKeys::StopEarly`] returns `Ok` right
/// there, without reading the rest of the object.
///
/// # Errors
///
/// Fails if the cursor is not entering an object, on malformed input, on
/// a rejected unknown key, and on any member that fails to deserialize.
pub fn unmarshal_record<'de, R: RecordMut<'de>>(
    record: &mut R,
    cursor: &mut Cursor<'de>,
    unknown_keys: UnknownKeys,
) -> Result<(), Error> {
    expect_container(cursor, SaxState::EnteringObject, ErrorKind::ExpectedObject)?;
    while cursor.state() != SaxState::LeavingObject {
        let key_offset = cursor.offset();
        let Some(key) = cursor.next_object_key() else {
            return Err(cursor.fail(ErrorKind::ExpectedKey));
        };
        let Some(index) = R::field_index(&key) else {
            match unknown_keys {
                UnknownKeys::StopEarly => {
                    debug!(target: "jsonrefl", "stopping at unknown key {key:?} at {key_offset}");
                    return Ok(());
                }
                UnknownKeys::Skip => {
                    debug!(target: "jsonrefl", "skipping unknown key {key:?} at {key_offset}");
                    cursor.skip_value()?;
                    continue;
                }
                UnknownKeys::Reject => {
                    let kind = ErrorKind::UnexpectedKey(key.into_owned());
                    return Err(cursor.fail_at(kind, key_offset));
                }
            }
        };
        let Some(member) = record.field_mut(index) else {
            return Err(cursor.fail_at(ErrorKind::InvalidState, key_offset));
        };
        member.unmarshal(cursor)?;
    }
    cursor.advance();
    Ok(())
}

/// Reads an enumeration from its name or its integer value.
///
/// A JSON number, or a string starting with an ASCII digit, is taken as the
/// integer value; any other string is looked up by name. Values and names
/// that match no variant yield `E::default()`.
///
/// # Errors
///
/// Fails if the current token is neither a string nor a number, or if the
/// number does not fit `i64`.
pub fn unmarshal_enum<E: EnumNames + Default>(
    target: &mut E,
    cursor: &mut Cursor<'_>,
) -> Result<(), Error> {
    expect_value(cursor)?;
    *target = match cursor.token_kind() {
        Some(TokenKind::Number) => {
            let value = cursor
                .get_i64()
                .ok_or_else(|| cursor.fail(ErrorKind::NumberOutOfRange))?;
            E::from_value(value).unwrap_or_default()
        }
        Some(TokenKind::String) => {
            let text = cursor.get_string();
            if text.starts_with(|c: char| c.is_ascii_digit()) {
                text.parse().ok().and_then(E::from_value).unwrap_or_default()
            } else {
                E::from_name(&text, E::default())
            }
        }
        _ => return Err(cursor.fail(ErrorKind::ExpectedString)),
    };
    cursor.advance();
    Ok(())
}
