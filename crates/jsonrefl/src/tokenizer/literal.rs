use super::TokenKind;

/// What happened after feeding one more byte into the literal matcher?
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(TokenKind),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// Matches the remainder of `null`, `true` or `false` after its first byte.
///
/// `None`  ➜  no literal in flight
/// `Some`  ➜  `(remaining_bytes, token_kind)` while matching
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteral(Option<(&'static [u8], TokenKind)>);

impl ExpectedLiteral {
    /// Start matching after the *first* byte (`n`, `t`, or `f`). Returns
    /// `None` for any other byte.
    pub(crate) fn new(first: u8) -> Option<Self> {
        let expected: (&'static [u8], TokenKind) = match first {
            b'n' => (b"ull", TokenKind::Null),
            b't' => (b"rue", TokenKind::True),
            b'f' => (b"alse", TokenKind::False),
            _ => return None,
        };
        Some(ExpectedLiteral(Some(expected)))
    }

    /// Give the matcher the next input byte and learn what to do next.
    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((bytes, kind)) = self.0.take() else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((expected, rest)) if *expected == b => {
                if rest.is_empty() {
                    Step::Done(kind)
                } else {
                    self.0 = Some((rest, kind));
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some((bytes, kind));
                Step::Reject
            }
        }
    }
}
