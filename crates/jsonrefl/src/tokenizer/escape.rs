//! Decoding of backslash escapes in JSON strings.
//!
//! The tokenizer validates every escape (including surrogate pairing) while
//! it scans a string, so [`unescape`] only ever sees well-formed input.
//! [`UnicodeEscapeBuffer`] is shared by both passes.
use alloc::string::String;

/// Accumulates the four hexadecimal digits of a `\uXXXX` escape and decodes
/// them into a UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte.
    ///
    /// Returns `Ok(None)` while fewer than four digits have been provided,
    /// `Ok(Some(unit))` on the fourth digit (and resets), or `Err(byte)` if
    /// `b` is not an ASCII hex digit.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u16>, u8> {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(b),
        };
        self.value = (self.value << 4) | u16::from(digit);
        self.len += 1;
        if self.len == 4 {
            let unit = self.value;
            *self = Self::default();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Decodes the raw content of a string token (without its quotes).
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('\\') {
        out.push_str(&rest[..at]);
        let bytes = rest.as_bytes();
        let Some(&kind) = bytes.get(at + 1) else {
            break;
        };
        let mut consumed = 2;
        match kind {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let high = read_unit(&bytes[at + 2..]);
                consumed += 4;
                let code = match high {
                    Some(h) if is_high_surrogate(h) => {
                        // A validated high surrogate is always followed by `\uDC00`-`\uDFFF`.
                        let low = bytes
                            .get(at + 6..at + 8)
                            .filter(|p| *p == b"\\u")
                            .and_then(|_| read_unit(&bytes[at + 8..]))
                            .filter(|l| is_low_surrogate(*l));
                        match low {
                            Some(l) => {
                                consumed += 6;
                                0x1_0000 + ((u32::from(h) - 0xD800) << 10) + (u32::from(l) - 0xDC00)
                            }
                            None => u32::from(char::REPLACEMENT_CHARACTER),
                        }
                    }
                    Some(unit) => u32::from(unit),
                    None => u32::from(char::REPLACEMENT_CHARACTER),
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(char::from(other)),
        }
        rest = rest.get(at + consumed..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}

fn read_unit(bytes: &[u8]) -> Option<u16> {
    let mut buffer = UnicodeEscapeBuffer::new();
    for &b in bytes.get(..4)? {
        if let Some(unit) = buffer.feed(b).ok()? {
            return Some(unit);
        }
    }
    None
}
