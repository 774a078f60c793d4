//! Byte-level JSON tokenizer.
//!
//! The tokenizer yields one token per call over a borrowed input buffer and
//! never copies it: a [`Token`] only records the byte span of its lexeme.
//!
//! It does not track nesting itself. The caller owns the stack of open
//! containers and passes the innermost one back in on every call; the
//! tokenizer reports when a container opens or closes through [`Step`], and
//! uses the parent it is given to decide what may follow a value (`,` and `}`
//! inside an object, `,` and `]` inside an array, end of input at the top
//! level).
//!
//! Grammar is strict RFC 8259: no comments, no trailing commas, no leading
//! zeros, only the four JSON whitespace bytes.
#![allow(clippy::enum_glob_use)]

pub(crate) mod escape;
mod literal;

use escape::{UnicodeEscapeBuffer, is_high_surrogate, is_low_surrogate};
use literal::ExpectedLiteral;

use crate::SyntaxError;

/// The kind of the token most recently produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// A string in key position.
    Key,
    /// A string in value position.
    String,
    /// A number lexeme.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

/// One token: its kind and the byte span of its lexeme.
///
/// For keys and strings the span excludes the quotes and `escaped` tells
/// whether the content contains backslash escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte offset of the first lexeme byte.
    pub start: usize,
    /// Byte offset one past the last lexeme byte.
    pub end: usize,
    /// The string content contains backslash escapes.
    pub escaped: bool,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            kind: TokenKind::Null,
            start: 0,
            end: 0,
            escaped: false,
        }
    }
}

/// A container marker, as kept on the caller's nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

/// Result code of [`Tokenizer::next_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A key or scalar token was produced.
    Token,
    /// A container opened; the caller must push it.
    Enter(Container),
    /// A container closed; the caller must pop it.
    Leave(Container),
    /// The top-level value is complete and only whitespace followed.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforePropertyName { first: bool },
    AfterPropertyName,
    BeforePropertyValue,
    BeforeArrayValue { first: bool },
    AfterValue,
    End,
    Error(SyntaxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// Pull tokenizer over a borrowed byte buffer.
#[derive(Debug)]
pub struct Tokenizer<'src> {
    input: &'src [u8],
    pos: usize,
    state: ParseState,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            pos: 0,
            state: ParseState::Start,
        }
    }

    /// Current byte offset. After an error this is the offending position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once [`Step::Finished`] has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == ParseState::End
    }

    /// Produces the next token into `token`.
    ///
    /// `parent` is the innermost open container according to the caller's
    /// nesting stack. Once an error has been returned, every later call
    /// returns the same error.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the input is not valid JSON;
    /// [`Tokenizer::position`] then points at the offending byte.
    pub fn next_token(
        &mut self,
        parent: Option<Container>,
        token: &mut Token,
    ) -> Result<Step, SyntaxError> {
        use ParseState::*;

        loop {
            if let Error(err) = self.state {
                return Err(err);
            }
            self.skip_whitespace();
            let Some(&byte) = self.input.get(self.pos) else {
                return self.end_of_input(parent);
            };

            match self.state {
                Start | BeforePropertyValue => return self.value(byte, token),
                BeforeArrayValue { first } => {
                    if first && byte == b']' {
                        return Ok(self.leave(Container::Array, token));
                    }
                    return self.value(byte, token);
                }
                BeforePropertyName { first } => match byte {
                    b'}' if first => return Ok(self.leave(Container::Object, token)),
                    b'"' => {
                        self.string(TokenKind::Key, token)?;
                        self.state = AfterPropertyName;
                        return Ok(Step::Token);
                    }
                    _ => return Err(self.invalid_char()),
                },
                AfterPropertyName => {
                    if byte != b':' {
                        return Err(self.invalid_char());
                    }
                    self.pos += 1;
                    self.state = BeforePropertyValue;
                }
                AfterValue => match (parent, byte) {
                    (Some(Container::Object), b',') => {
                        self.pos += 1;
                        self.state = BeforePropertyName { first: false };
                    }
                    (Some(Container::Array), b',') => {
                        self.pos += 1;
                        self.state = BeforeArrayValue { first: false };
                    }
                    (Some(Container::Object), b'}') => {
                        return Ok(self.leave(Container::Object, token));
                    }
                    (Some(Container::Array), b']') => {
                        return Ok(self.leave(Container::Array, token));
                    }
                    (None, _) => return Err(self.fail(SyntaxError::TrailingCharacters)),
                    _ => return Err(self.invalid_char()),
                },
                End => return Err(self.fail(SyntaxError::TrailingCharacters)),
                Error(err) => return Err(err),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\n' | b'\r' | b'\t') = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    fn end_of_input(&mut self, parent: Option<Container>) -> Result<Step, SyntaxError> {
        match (self.state, parent) {
            (ParseState::AfterValue | ParseState::End, None) => {
                self.state = ParseState::End;
                Ok(Step::Finished)
            }
            _ => Err(self.fail(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    fn value(&mut self, byte: u8, token: &mut Token) -> Result<Step, SyntaxError> {
        let start = self.pos;
        match byte {
            b'{' => {
                self.pos += 1;
                self.emit(token, TokenKind::ObjectStart, start);
                self.state = ParseState::BeforePropertyName { first: true };
                return Ok(Step::Enter(Container::Object));
            }
            b'[' => {
                self.pos += 1;
                self.emit(token, TokenKind::ArrayStart, start);
                self.state = ParseState::BeforeArrayValue { first: true };
                return Ok(Step::Enter(Container::Array));
            }
            b'"' => self.string(TokenKind::String, token)?,
            b'-' | b'0'..=b'9' => self.number(token)?,
            _ => {
                let Some(literal) = ExpectedLiteral::new(byte) else {
                    return Err(self.invalid_char());
                };
                self.literal(literal, token)?;
            }
        }
        self.state = ParseState::AfterValue;
        Ok(Step::Token)
    }

    fn leave(&mut self, container: Container, token: &mut Token) -> Step {
        let start = self.pos;
        self.pos += 1;
        let kind = match container {
            Container::Object => TokenKind::ObjectEnd,
            Container::Array => TokenKind::ArrayEnd,
        };
        self.emit(token, kind, start);
        self.state = ParseState::AfterValue;
        Step::Leave(container)
    }

    fn emit(&self, token: &mut Token, kind: TokenKind, start: usize) {
        *token = Token {
            kind,
            start,
            end: self.pos,
            escaped: false,
        };
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    fn string(&mut self, kind: TokenKind, token: &mut Token) -> Result<(), SyntaxError> {
        // opening quote
        self.pos += 1;
        let start = self.pos;
        let mut escaped = false;
        let mut pending_high: Option<u16> = None;

        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
            };
            match b {
                b'\\' => {
                    escaped = true;
                    self.pos += 1;
                    pending_high = self.escape(pending_high)?;
                    continue;
                }
                _ if pending_high.is_some() => {
                    return Err(self.unpaired_surrogate(pending_high));
                }
                b'"' => {
                    *token = Token {
                        kind,
                        start,
                        end: self.pos,
                        escaped,
                    };
                    self.pos += 1;
                    return Ok(());
                }
                0x00..=0x1F => {
                    return Err(self.fail(SyntaxError::ControlCharacter(u32::from(b))));
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Validates one escape; `self.pos` is just past the backslash. Returns
    /// the high surrogate still waiting for its low half, if any.
    fn escape(&mut self, pending_high: Option<u16>) -> Result<Option<u16>, SyntaxError> {
        let Some(&b) = self.input.get(self.pos) else {
            return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
        };
        match b {
            b'u' => {
                self.pos += 1;
                let unit = self.unicode_escape()?;
                match pending_high {
                    Some(_) if is_low_surrogate(unit) => Ok(None),
                    Some(_) => Err(self.fail(SyntaxError::InvalidUnicodeEscape(u32::from(unit)))),
                    None if is_high_surrogate(unit) => Ok(Some(unit)),
                    None if is_low_surrogate(unit) => {
                        Err(self.fail(SyntaxError::InvalidUnicodeEscape(u32::from(unit))))
                    }
                    None => Ok(None),
                }
            }
            _ if pending_high.is_some() => Err(self.unpaired_surrogate(pending_high)),
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                self.pos += 1;
                Ok(None)
            }
            _ => {
                let c = self.char_at_pos();
                Err(self.fail(SyntaxError::InvalidEscape(c)))
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<u16, SyntaxError> {
        let mut buffer = UnicodeEscapeBuffer::new();
        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
            };
            match buffer.feed(b) {
                Ok(None) => self.pos += 1,
                Ok(Some(unit)) => {
                    self.pos += 1;
                    return Ok(unit);
                }
                Err(_) => return Err(self.invalid_char()),
            }
        }
    }

    fn unpaired_surrogate(&mut self, high: Option<u16>) -> SyntaxError {
        self.fail(SyntaxError::InvalidUnicodeEscape(u32::from(high.unwrap_or_default())))
    }

    // ------------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------------

    fn number(&mut self, token: &mut Token) -> Result<(), SyntaxError> {
        use NumberState::*;

        let start = self.pos;
        let mut state = match self.input[self.pos] {
            b'-' => Sign,
            b'0' => Zero,
            _ => DecimalInteger,
        };
        self.pos += 1;

        loop {
            let next = self.input.get(self.pos).copied();
            state = match (state, next) {
                (Sign, Some(b'0')) => Zero,
                (Sign, Some(b'1'..=b'9')) | (DecimalInteger, Some(b'0'..=b'9')) => DecimalInteger,
                (Zero | DecimalInteger, Some(b'.')) => DecimalPoint,
                (Zero | DecimalInteger | DecimalFraction, Some(b'e' | b'E')) => DecimalExponent,
                (DecimalPoint | DecimalFraction, Some(b'0'..=b'9')) => DecimalFraction,
                (DecimalExponent, Some(b'+' | b'-')) => DecimalExponentSign,
                (
                    DecimalExponent | DecimalExponentSign | DecimalExponentInteger,
                    Some(b'0'..=b'9'),
                ) => DecimalExponentInteger,
                // complete number; whatever follows is checked by the caller
                (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => {
                    self.emit(token, TokenKind::Number, start);
                    return Ok(());
                }
                (_, None) => return Err(self.fail(SyntaxError::UnexpectedEndOfInput)),
                (_, Some(_)) => return Err(self.invalid_char()),
            };
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------------

    fn literal(&mut self, mut literal: ExpectedLiteral, token: &mut Token) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
            };
            match literal.step(b) {
                literal::Step::NeedMore => self.pos += 1,
                literal::Step::Done(kind) => {
                    self.pos += 1;
                    self.emit(token, kind, start);
                    return Ok(());
                }
                literal::Step::Reject => return Err(self.invalid_char()),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    fn char_at_pos(&self) -> char {
        let (c, _) = bstr::decode_utf8(&self.input[self.pos..]);
        c.unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn invalid_char(&mut self) -> SyntaxError {
        if self.pos >= self.input.len() {
            return self.fail(SyntaxError::UnexpectedEndOfInput);
        }
        let c = self.char_at_pos();
        self.fail(SyntaxError::InvalidCharacter(c))
    }

    fn fail(&mut self, err: SyntaxError) -> SyntaxError {
        self.state = ParseState::Error(err);
        err
    }

    /// The not-yet-consumed input, for diagnostics.
    #[cfg(any(test, feature = "fuzzing"))]
    #[must_use]
    pub fn remaining(&self) -> &'src bstr::BStr {
        use bstr::ByteSlice as _;
        self.input[self.pos.min(self.input.len())..].as_bstr()
    }
}
