//! Pull-style ("SAX") cursor over a JSON document.
//!
//! A [`Cursor`] wraps the [`Tokenizer`] and the nesting stack and exposes the
//! document as a sequence of [`SaxState`]s. Reads never consume: the
//! `get_*` projections decode the current token, and only
//! [`Cursor::advance`] moves forward.
use alloc::borrow::Cow;
use core::str;

use log::trace;

use crate::{
    DeserializeOptions, Error, ErrorKind, SyntaxError, UnknownKeys,
    nesting::NestingStack,
    tokenizer::{Container, Step, Token, TokenKind, Tokenizer, escape},
};

/// Where the cursor stands after the last [`Cursor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaxState {
    /// Just read `{`.
    EnteringObject,
    /// Just read `}`.
    LeavingObject,
    /// Just read `[`.
    EnteringArray,
    /// Just read `]`.
    LeavingArray,
    /// Just read an object key.
    HadKey,
    /// Just read a string, number, `true`, `false` or `null`.
    HadValue,
    /// The top-level value is complete.
    Done,
    /// An error was recorded; see [`Cursor::error`].
    Error,
}

/// Streaming reader over one JSON text.
///
/// The cursor borrows the input for its whole lifetime and never copies it;
/// string reads are zero-copy unless the string contains escapes.
#[derive(Debug)]
pub struct Cursor<'de> {
    input: &'de [u8],
    text: &'de str,
    tokenizer: Tokenizer<'de>,
    token: Token,
    state: SaxState,
    nesting: NestingStack,
    options: DeserializeOptions,
    error: Option<Error>,
}

impl<'de> Cursor<'de> {
    /// Creates a cursor with default options and reads the first token.
    #[must_use]
    pub fn new(input: &'de [u8]) -> Self {
        Self::with_options(input, DeserializeOptions::default())
    }

    /// Creates a cursor and reads the first token.
    ///
    /// Input that is not valid UTF-8 puts the cursor straight into
    /// [`SaxState::Error`], located at the first invalid byte.
    #[must_use]
    pub fn with_options(input: &'de [u8], options: DeserializeOptions) -> Self {
        let (text, invalid_at) = match str::from_utf8(input) {
            Ok(text) => (text, None),
            Err(err) => ("", Some(err.valid_up_to())),
        };
        let mut cursor = Self {
            input,
            text,
            tokenizer: Tokenizer::new(text.as_bytes()),
            token: Token::default(),
            state: SaxState::HadValue,
            nesting: NestingStack::new(options.max_depth),
            options,
            error: None,
        };
        match invalid_at {
            Some(offset) => {
                cursor.fail_at(ErrorKind::Syntax(SyntaxError::InvalidUtf8), offset);
            }
            None => {
                cursor.advance();
            }
        }
        cursor
    }

    /// Pulls the next token and updates the state and nesting stack.
    ///
    /// Returns `false` once the cursor is [`SaxState::Done`] or
    /// [`SaxState::Error`]; further calls do nothing.
    pub fn advance(&mut self) -> bool {
        if matches!(self.state, SaxState::Done | SaxState::Error) {
            return false;
        }
        let step = match self.tokenizer.next_token(self.nesting.peek(), &mut self.token) {
            Ok(step) => step,
            Err(err) => {
                let at = self.tokenizer.position();
                self.fail_at(ErrorKind::Syntax(err), at);
                return false;
            }
        };
        self.state = match step {
            Step::Finished => {
                debug_assert!(self.nesting.is_empty());
                trace!(target: "jsonrefl", "document finished at {}", self.tokenizer.position());
                self.state = SaxState::Done;
                return false;
            }
            Step::Enter(container) => {
                if let Err(kind) = self.nesting.push(container) {
                    let at = self.token.start;
                    self.fail_at(kind, at);
                    return false;
                }
                match container {
                    Container::Object => SaxState::EnteringObject,
                    Container::Array => SaxState::EnteringArray,
                }
            }
            Step::Leave(container) => {
                self.nesting.pop();
                match container {
                    Container::Object => SaxState::LeavingObject,
                    Container::Array => SaxState::LeavingArray,
                }
            }
            Step::Token if self.token.kind == TokenKind::Key => SaxState::HadKey,
            Step::Token => SaxState::HadValue,
        };
        trace!(
            target: "jsonrefl",
            "{:?} {:?} at {}..{} depth {}",
            self.state,
            self.token.kind,
            self.token.start,
            self.token.end,
            self.nesting.depth()
        );
        true
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> SaxState {
        self.state
    }

    /// Kind of the current token, or `None` once done or errored.
    #[must_use]
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self.state {
            SaxState::Done | SaxState::Error => None,
            _ => Some(self.token.kind),
        }
    }

    /// Reads the current key and advances to its value.
    ///
    /// On [`SaxState::LeavingObject`] this advances past the `}` and returns
    /// `None`. In any other state it records [`ErrorKind::InvalidState`] and
    /// returns `None`.
    pub fn next_object_key(&mut self) -> Option<Cow<'de, str>> {
        match self.state {
            SaxState::HadKey => {
                let key = self.get_string();
                self.advance();
                Some(key)
            }
            SaxState::LeavingObject => {
                self.advance();
                None
            }
            _ => {
                self.fail(ErrorKind::InvalidState);
                None
            }
        }
    }

    /// Decoded text of the current string or key token; empty for any other
    /// token.
    ///
    /// Borrows from the input unless the string contains escapes.
    #[must_use]
    pub fn get_string(&self) -> Cow<'de, str> {
        if !self.on_token(&[TokenKind::String, TokenKind::Key]) {
            return Cow::Borrowed("");
        }
        let raw = self.lexeme();
        if self.token.escaped {
            Cow::Owned(escape::unescape(raw))
        } else {
            Cow::Borrowed(raw)
        }
    }

    /// `true` only when the current token is `true`.
    #[must_use]
    pub fn get_bool(&self) -> bool {
        self.on_token(&[TokenKind::True])
    }

    /// The current number as `f64`; `0.0` for any other token.
    #[must_use]
    pub fn get_f64(&self) -> f64 {
        self.number_lexeme()
            .and_then(|lexeme| lexeme.parse().ok())
            .unwrap_or(0.0)
    }

    /// The current number as `i64`, truncated toward zero if it has a
    /// fraction or exponent. `None` for non-numbers and values out of range.
    #[must_use]
    pub fn get_i64(&self) -> Option<i64> {
        self.get_integer()
    }

    /// The current number as `u64`, truncated toward zero if it has a
    /// fraction or exponent. `None` for non-numbers and values out of range.
    #[must_use]
    pub fn get_u64(&self) -> Option<u64> {
        self.get_integer()
    }

    pub(crate) fn get_integer<T: TryFrom<i128> + TryFrom<u128>>(&self) -> Option<T> {
        let lexeme = self.number_lexeme()?;
        // unsigned lexemes above `i128::MAX` only fit `u128`
        if let Ok(value) = lexeme.parse::<u128>() {
            return T::try_from(value).ok();
        }
        parse_integer(lexeme).and_then(|value| T::try_from(value).ok())
    }

    /// Raw lexeme of the current number token.
    #[must_use]
    pub fn number_lexeme(&self) -> Option<&'de str> {
        self.on_token(&[TokenKind::Number]).then(|| self.lexeme())
    }

    /// Byte offset where the current token starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.token.start
    }

    /// Number of currently open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nesting.depth()
    }

    /// Consumes one complete value of any shape, including nested
    /// containers, and advances past it.
    ///
    /// # Errors
    ///
    /// Fails if the cursor is not on a value, or if the skipped value is
    /// malformed.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        match self.state {
            SaxState::HadValue => {}
            SaxState::EnteringObject | SaxState::EnteringArray => {
                let outer = self.nesting.depth().saturating_sub(1);
                loop {
                    if !self.advance() {
                        return Err(self.fail(ErrorKind::InvalidState));
                    }
                    let leaving = matches!(
                        self.state,
                        SaxState::LeavingObject | SaxState::LeavingArray
                    );
                    if leaving && self.nesting.depth() == outer {
                        break;
                    }
                }
            }
            _ => return Err(self.fail(ErrorKind::ExpectedValue)),
        }
        self.advance();
        Ok(())
    }

    /// Records `kind` at the current token and returns the error to report.
    ///
    /// If an error was already recorded, that root cause is kept and
    /// returned instead.
    pub fn fail(&mut self, kind: ErrorKind) -> Error {
        let at = self.token.start;
        self.fail_at(kind, at)
    }

    /// Like [`Cursor::fail`], located at `offset`.
    pub fn fail_at(&mut self, kind: ErrorKind, offset: usize) -> Error {
        if let Some(err) = &self.error {
            return err.clone();
        }
        let err = Error::new(kind, self.input, offset);
        self.state = SaxState::Error;
        self.error = Some(err.clone());
        err
    }

    /// The recorded error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Takes the recorded error out of the cursor.
    ///
    /// The cursor stays in [`SaxState::Error`].
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// The unknown-key policy for records below the top level.
    #[must_use]
    pub fn nested_unknown_keys(&self) -> UnknownKeys {
        self.options.nested_unknown_keys()
    }

    fn on_token(&self, kinds: &[TokenKind]) -> bool {
        matches!(self.state, SaxState::HadKey | SaxState::HadValue)
            && kinds.contains(&self.token.kind)
    }

    fn lexeme(&self) -> &'de str {
        self.text.get(self.token.start..self.token.end).unwrap_or_default()
    }
}

/// Parses a JSON number lexeme as an integer.
///
/// Plain integers are parsed exactly; lexemes with a fraction or exponent
/// are truncated toward zero.
fn parse_integer(lexeme: &str) -> Option<i128> {
    if let Ok(value) = lexeme.parse::<i128>() {
        return Some(value);
    }
    if !lexeme.contains(['.', 'e', 'E']) {
        // integer digits only, so the parse above overflowed
        return None;
    }
    // `f64::trunc` is unavailable in `no_std`; the `as` cast below truncates
    // toward zero, and f64 values near the i128 bounds are already integral.
    let value = lexeme.parse::<f64>().ok()?;
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let in_range = value >= i128::MIN as f64 && value < i128::MAX as f64;
    #[allow(clippy::cast_possible_truncation)]
    in_range.then(|| value as i128)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use rstest::rstest;

    use super::*;

    fn states(input: &str) -> Vec<SaxState> {
        let mut cursor = Cursor::new(input.as_bytes());
        let mut out = alloc::vec![cursor.state()];
        while cursor.advance() {
            out.push(cursor.state());
        }
        out.push(cursor.state());
        out
    }

    #[test]
    fn walks_states_and_tracks_depth() {
        use SaxState::*;
        assert_eq!(
            states(r#"{"a": [1, {"b": null}], "c": "x"}"#),
            [
                EnteringObject,
                HadKey,
                EnteringArray,
                HadValue,
                EnteringObject,
                HadKey,
                HadValue,
                LeavingObject,
                LeavingArray,
                HadKey,
                HadValue,
                LeavingObject,
                Done,
            ]
        );
    }

    #[test]
    fn depth_follows_containers() {
        let mut cursor = Cursor::new(br#"[[[]]]"#);
        let mut depths = alloc::vec![cursor.depth()];
        while cursor.advance() {
            depths.push(cursor.depth());
        }
        assert_eq!(depths, [1, 2, 3, 2, 1, 0]);
        assert_eq!(cursor.state(), SaxState::Done);
    }

    #[test]
    fn next_object_key_reads_key_and_moves_to_value() {
        let mut cursor = Cursor::new(br#"{"id": 7}"#);
        assert_eq!(cursor.state(), SaxState::EnteringObject);
        cursor.advance();
        assert_eq!(cursor.next_object_key().as_deref(), Some("id"));
        assert_eq!(cursor.state(), SaxState::HadValue);
        assert_eq!(cursor.get_i64(), Some(7));
        cursor.advance();
        assert_eq!(cursor.state(), SaxState::LeavingObject);
        assert_eq!(cursor.next_object_key(), None);
        assert_eq!(cursor.state(), SaxState::Done);
        assert!(cursor.error().is_none());
    }

    #[test]
    fn next_object_key_in_wrong_state_records_invalid_state() {
        let mut cursor = Cursor::new(b"[1]");
        assert_eq!(cursor.next_object_key(), None);
        assert_eq!(cursor.state(), SaxState::Error);
        assert_eq!(cursor.error().map(Error::kind), Some(&ErrorKind::InvalidState));
    }

    #[test]
    fn empty_key_is_a_key() {
        let mut cursor = Cursor::new(br#"{"": 1}"#);
        cursor.advance();
        assert_eq!(cursor.next_object_key().as_deref(), Some(""));
    }

    #[test]
    fn projections_on_other_tokens_are_empty() {
        let cursor = Cursor::new(br#""text""#);
        assert_eq!(cursor.get_string(), "text");
        assert!(!cursor.get_bool());
        assert_eq!(cursor.get_f64(), 0.0);
        assert_eq!(cursor.get_i64(), None);

        let cursor = Cursor::new(b"true");
        assert!(cursor.get_bool());
        assert_eq!(cursor.get_string(), "");
    }

    #[test]
    fn strings_borrow_unless_escaped() {
        let cursor = Cursor::new(br#""plain""#);
        assert!(matches!(cursor.get_string(), Cow::Borrowed("plain")));

        let cursor = Cursor::new(br#""a\nb""#);
        let text = cursor.get_string();
        assert!(matches!(text, Cow::Owned(_)));
        assert_eq!(text, "a\nb");
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("-7", Some(-7))]
    #[case("-45.2", Some(-45))]
    #[case("1e3", Some(1000))]
    #[case("0.99", Some(0))]
    #[case("9223372036854775807", Some(i64::MAX))]
    #[case("9223372036854775808", None)]
    #[case("1e300", None)]
    fn integer_projection(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(Cursor::new(input.as_bytes()).get_i64(), expected);
    }

    #[test]
    fn unsigned_projection_rejects_negative() {
        assert_eq!(Cursor::new(b"-1").get_u64(), None);
        assert_eq!(Cursor::new(b"18446744073709551615").get_u64(), Some(u64::MAX));
    }

    #[rstest]
    #[case("340282366920938463463374607431768211455", Some(u128::MAX))]
    #[case("170141183460469231731687303715884105728", Some(1 << 127))]
    #[case("340282366920938463463374607431768211456", None)]
    #[case("-1", None)]
    #[case("2.5", Some(2))]
    fn wide_unsigned_projection(#[case] input: &str, #[case] expected: Option<u128>) {
        assert_eq!(Cursor::new(input.as_bytes()).get_integer::<u128>(), expected);
    }

    #[test]
    fn float_projection() {
        assert_eq!(Cursor::new(b"-2.5e-1").get_f64(), -0.25);
    }

    #[test]
    fn skip_value_consumes_nested_containers() {
        let mut cursor = Cursor::new(br#"{"skip": {"a": [1, {"b": []}]}, "keep": 1}"#);
        cursor.advance();
        assert_eq!(cursor.next_object_key().as_deref(), Some("skip"));
        cursor.skip_value().unwrap();
        assert_eq!(cursor.state(), SaxState::HadKey);
        assert_eq!(cursor.next_object_key().as_deref(), Some("keep"));
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn skip_value_on_scalar() {
        let mut cursor = Cursor::new(br#"["x", 2]"#);
        cursor.advance();
        cursor.skip_value().unwrap();
        assert_eq!(cursor.get_i64(), Some(2));
    }

    #[test]
    fn syntax_error_is_recorded_with_position() {
        let mut cursor = Cursor::new(br#"{"id": }"#);
        while cursor.advance() {}
        assert_eq!(cursor.state(), SaxState::Error);
        let err = cursor.take_error().unwrap();
        assert_eq!(err.offset(), 7);
        assert_eq!(
            err.kind(),
            &ErrorKind::Syntax(SyntaxError::InvalidCharacter('}'))
        );
    }

    #[test]
    fn first_error_is_kept() {
        let mut cursor = Cursor::new(b"[x]");
        cursor.advance();
        let err = cursor.fail(ErrorKind::ExpectedValue);
        assert!(err.is_syntax());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let options = DeserializeOptions {
            max_depth: 2,
            ..DeserializeOptions::default()
        };
        let mut cursor = Cursor::with_options(b"[[[1]]]", options);
        while cursor.advance() {}
        let err = cursor.error().unwrap();
        assert_eq!(err.kind(), &ErrorKind::DepthLimitExceeded { limit: 2 });
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn invalid_utf8_is_located() {
        let cursor = Cursor::new(b"[\"a\xFFb\"]");
        let err = cursor.error().unwrap();
        assert_eq!(err.kind(), &ErrorKind::Syntax(SyntaxError::InvalidUtf8));
        assert_eq!(err.offset(), 3);
    }
}
