use core::{fmt, hash, ops::Deref, str};

use crate::ErrorKind;

/// Text stored inline in a fixed buffer of `N` bytes.
///
/// All `N` bytes are usable; there is no terminator. Writing text longer
/// than `N` bytes fails with [`ErrorKind::TextTooLarge`] and leaves the
/// buffer empty.
///
/// ```rust
/// use jsonrefl::FixedStr;
///
/// let mut code = FixedStr::<3>::new();
/// assert!(code.try_set("abcd").is_err());
/// assert!(code.is_empty());
/// code.try_set("ab").unwrap();
/// assert_eq!(code.as_str(), "ab");
/// ```
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    /// An empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Usable bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Length of the stored text in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no text is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // only ever filled from whole `&str` values
        str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// Empties the buffer and zeroes its bytes.
    pub fn clear(&mut self) {
        self.bytes = [0; N];
        self.len = 0;
    }

    /// Replaces the stored text.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::TextTooLarge`] if `text` does not fit; the buffer is
    /// left empty.
    pub fn try_set(&mut self, text: &str) -> Result<(), ErrorKind> {
        self.clear();
        if text.len() > N {
            return Err(ErrorKind::TextTooLarge {
                capacity: N,
                len: text.len(),
            });
        }
        self.bytes[..text.len()].copy_from_slice(text.as_bytes());
        self.len = text.len();
        Ok(())
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TryFrom<&str> for FixedStr<N> {
    type Error = ErrorKind;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let mut fixed = Self::new();
        fixed.try_set(text)?;
        Ok(fixed)
    }
}

impl<const N: usize> Deref for FixedStr<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> PartialEq for FixedStr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const N: usize> Eq for FixedStr<N> {}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> hash::Hash for FixedStr<N> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
