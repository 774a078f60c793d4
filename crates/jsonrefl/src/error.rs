use alloc::string::String;
use core::cmp;

use bstr::{BStr, BString, ByteSlice};
use thiserror::Error;

/// Number of bytes of input shown on each side of the error position.
pub const CONTEXT_WINDOW: usize = 16;

/// A failed (de)serialization, located in the input text.
///
/// The `Display` form is the one-line diagnostic
/// `"<message>@<offset>: <before> > HERE < <after>"`, where both context
/// windows hold up to [`CONTEXT_WINDOW`] bytes clipped to the input bounds.
/// It is meant for humans and log sinks, not for machine parsing; match on
/// [`Error::kind`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}@{offset}: {before} > HERE < {after}")]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
    before: BString,
    after: BString,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, input: &[u8], offset: usize) -> Self {
        let offset = cmp::min(offset, input.len());
        let start = offset.saturating_sub(CONTEXT_WINDOW);
        let end = cmp::min(offset + CONTEXT_WINDOW, input.len());
        Self {
            kind,
            offset,
            before: input[start..offset].into(),
            after: input[offset..end].into(),
        }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input where the problem was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The input bytes immediately preceding [`Error::offset`].
    #[must_use]
    pub fn context_before(&self) -> &BStr {
        self.before.as_bstr()
    }

    /// The input bytes starting at [`Error::offset`].
    #[must_use]
    pub fn context_after(&self) -> &BStr {
        self.after.as_bstr()
    }

    /// Returns `true` if the input text itself is malformed.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax(_))
    }
}

/// Classification of a (de)serialization failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token stream is not valid JSON.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// A scalar destination was reached while the cursor was not on a value.
    #[error("Expected value")]
    ExpectedValue,
    /// A record destination did not start with `{`.
    #[error("Expecting JSON object")]
    ExpectedObject,
    /// A sequence destination did not start with `[`.
    #[error("Expecting JSON array")]
    ExpectedArray,
    /// An object member did not start with a key.
    #[error("Expecting object key")]
    ExpectedKey,
    /// A text or enumeration destination received a non-string value.
    #[error("Expected string")]
    ExpectedString,
    /// A numeric destination received a non-number value.
    #[error("Expected number")]
    ExpectedNumber,
    /// A boolean destination received something other than `true`/`false`.
    #[error("Expected boolean")]
    ExpectedBool,
    /// A cursor read was attempted in a state that does not allow it.
    #[error("Invalid cursor state")]
    InvalidState,
    /// The object has a key that the destination record does not declare.
    #[error("Unexpected key \"{0}\"")]
    UnexpectedKey(String),
    /// A fixed-capacity text destination is too small for the incoming text.
    #[error("Given text is too large for the destination ({len} > {capacity} bytes)")]
    TextTooLarge {
        /// Destination capacity in bytes.
        capacity: usize,
        /// Incoming text length in bytes.
        len: usize,
    },
    /// A fixed-capacity array destination has fewer slots than the incoming
    /// array has elements.
    #[error("Array size ({capacity}) too small")]
    ArrayTooSmall {
        /// Number of slots in the destination.
        capacity: usize,
    },
    /// The number does not fit the integer destination.
    #[error("Number out of range")]
    NumberOutOfRange,
    /// The document nests containers deeper than allowed.
    #[error("Nesting depth exceeds limit ({limit})")]
    DepthLimitExceeded {
        /// The configured maximum depth.
        limit: usize,
    },
}

/// Malformed input, as reported by the tokenizer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot start or continue the expected token.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A backslash followed by something other than a JSON escape.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    /// A `\u` escape that is not four hex digits, or an unpaired surrogate.
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscape(u32),
    /// An unescaped control character (below U+0020) inside a string.
    #[error("control character U+{0:04X} in string")]
    ControlCharacter(u32),
    /// The input is not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// Non-whitespace input after the top-level value.
    #[error("trailing characters after JSON value")]
    TrailingCharacters,
    /// The input ended inside a value.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
