/// Default for [`DeserializeOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What a record does when the JSON object has a key it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Fail with [`ErrorKind::UnexpectedKey`](crate::ErrorKind::UnexpectedKey).
    #[default]
    Reject,
    /// Stop decoding the top-level record at the first unknown key and report
    /// success.
    ///
    /// Everything before the unknown key has been written to the destination,
    /// nothing after it has been read. This is the building block for
    /// discriminated decoding: decode a small record holding the common
    /// prefix, inspect it, then decode the same text again into the concrete
    /// type. Nested records keep rejecting unknown keys, since stopping inside
    /// them would leave the outer record without a schema to continue with.
    StopEarly,
    /// Skip the value of every unknown key, at any depth, and keep going.
    Skip,
}

/// Configuration for deserialization.
///
/// # Examples
///
/// ```rust
/// use jsonrefl::{DeserializeOptions, UnknownKeys};
///
/// let options = DeserializeOptions {
///     unknown_keys: UnknownKeys::Skip,
///     ..Default::default()
/// };
/// assert_eq!(options.max_depth, jsonrefl::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// Policy for object keys that the destination record does not declare.
    ///
    /// # Default
    ///
    /// [`UnknownKeys::Reject`]
    pub unknown_keys: UnknownKeys,

    /// Maximum number of simultaneously open arrays and objects.
    ///
    /// Entering one more container than this fails with
    /// [`ErrorKind::DepthLimitExceeded`](crate::ErrorKind::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeys::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DeserializeOptions {
    /// Options matching the `allow_partial` flag of [`deserialize`](crate::deserialize).
    #[must_use]
    pub fn partial(allow_partial: bool) -> Self {
        Self {
            unknown_keys: if allow_partial {
                UnknownKeys::StopEarly
            } else {
                UnknownKeys::Reject
            },
            ..Self::default()
        }
    }

    /// The policy applied to records nested below the top level.
    pub(crate) fn nested_unknown_keys(&self) -> UnknownKeys {
        match self.unknown_keys {
            UnknownKeys::Skip => UnknownKeys::Skip,
            UnknownKeys::Reject | UnknownKeys::StopEarly => UnknownKeys::Reject,
        }
    }
}
