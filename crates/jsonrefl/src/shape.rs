use alloc::{borrow::Cow, string::String, vec::Vec};

use crate::FixedStr;

/// Static classification of a (de)serializable type.
///
/// Every type taking part in marshalling has exactly one shape, fixed at
/// compile time through [`Typed::SHAPE`]; the generic routines in
/// [`de`](crate::de) and [`ser`](crate::ser) dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single JSON token.
    Scalar(ScalarKind),
    /// A JSON array of homogeneous elements.
    Sequence {
        /// Number of slots for fixed-size arrays, `None` for growable ones.
        capacity: Option<usize>,
    },
    /// A JSON object with named fields, see [`Record`](crate::Record).
    Record,
}

/// The token a scalar is read from and written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `true` / `false`.
    Bool,
    /// A JSON number stored in an integer.
    Integer,
    /// A JSON number stored in a float.
    Float,
    /// A JSON string.
    Text,
    /// A JSON string stored in a fixed-capacity buffer.
    FixedText {
        /// Usable bytes.
        capacity: usize,
    },
    /// A JSON string or number naming a variant, see
    /// [`EnumNames`](crate::EnumNames).
    Enum,
}

/// Types with a static [`Shape`].
pub trait Typed {
    /// The shape of `Self`.
    const SHAPE: Shape;
}

macro_rules! typed {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(impl Typed for $ty {
            const SHAPE: Shape = Shape::Scalar($kind);
        })+
    };
}

typed!(ScalarKind::Bool => bool);
typed!(ScalarKind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
typed!(ScalarKind::Float => f32, f64);
typed!(ScalarKind::Text => String, Cow<'_, str>);

impl<const N: usize> Typed for FixedStr<N> {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::FixedText { capacity: N });
}

impl<T: Typed> Typed for Vec<T> {
    const SHAPE: Shape = Shape::Sequence { capacity: None };
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    const SHAPE: Shape = Shape::Sequence { capacity: Some(N) };
}

/// `null` is accepted in place of any value; the shape is the inner one.
impl<T: Typed> Typed for Option<T> {
    const SHAPE: Shape = T::SHAPE;
}
