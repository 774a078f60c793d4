//! Value/name tables for fieldless enumerations.

/// Bidirectional mapping between the variants of a fieldless enum, their
/// integer values and their display names.
///
/// Implemented by [`json_enum!`](crate::json_enum), which also makes the
/// enum (de)serializable: it is written as its quoted name and read from
/// either its name or its integer value.
pub trait EnumNames: Copy + 'static {
    /// Every variant with its display name, in declaration order.
    const VARIANTS: &'static [(Self, &'static str)];

    /// The integer value of `self`.
    fn value(self) -> i64;

    /// The display name of `self`, or `""` if the value has none.
    fn name(self) -> &'static str {
        let value = self.value();
        Self::VARIANTS
            .iter()
            .find(|(variant, _)| variant.value() == value)
            .map_or("", |(_, name)| name)
    }

    /// The variant named exactly `name` (case-sensitive), or `fallback`.
    fn from_name(name: &str, fallback: Self) -> Self {
        Self::VARIANTS
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map_or(fallback, |(variant, _)| *variant)
    }

    /// The variant with the given integer value.
    fn from_value(value: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .map(|(variant, _)| *variant)
            .find(|variant| variant.value() == value)
    }
}

/// Declares a fieldless enum together with its [`EnumNames`] table and its
/// (de)serialization impls.
///
/// The enum must derive `Clone`, `Copy` and `Default`: the default variant
/// is used when a name or value read from JSON matches no variant.
///
/// ```rust
/// use jsonrefl::{EnumNames, json_enum};
///
/// json_enum! {
///     #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
///     pub enum Color {
///         #[default]
///         Red = 0,
///         Green = 1,
///         Blue = 2,
///     }
/// }
///
/// assert_eq!(Color::Green.name(), "Green");
/// assert_eq!(Color::from_name("Blue", Color::Red), Color::Blue);
/// assert_eq!(Color::from_name("blue", Color::Red), Color::Red);
/// assert_eq!(Color::from_value(1), Some(Color::Green));
/// assert_eq!(jsonrefl::serialize(&Color::Blue), "\"Blue\"");
/// ```
#[macro_export]
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $value:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(= $value)?
            ),*
        }

        impl $crate::EnumNames for $name {
            const VARIANTS: &'static [(Self, &'static str)] = &[
                $((Self::$variant, stringify!($variant))),*
            ];

            #[allow(clippy::cast_lossless)]
            fn value(self) -> i64 {
                self as i64
            }
        }

        impl $crate::Typed for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar($crate::ScalarKind::Enum);
        }

        impl<'de> $crate::Unmarshal<'de> for $name {
            fn unmarshal(
                &mut self,
                cursor: &mut $crate::Cursor<'de>,
            ) -> ::core::result::Result<(), $crate::Error> {
                $crate::de::unmarshal_enum(self, cursor)
            }
        }

        impl $crate::Marshal for $name {
            fn marshal(&self, out: &mut $crate::__private::String) {
                $crate::ser::marshal_enum(*self, out);
            }
        }
    };
}
