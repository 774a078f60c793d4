//! Field registry for record types.
//!
//! A record exposes an ordered, immutable list of [`Field`] descriptors and
//! index-addressed accessors for the matching members. The list is a
//! `&'static` slice built once per type by [`record!`](crate::record), in
//! declaration order, which is also the order fields are serialized in.
use crate::{Marshal, Shape, Typed, Unmarshal};

/// Descriptor of one record member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    shape: Shape,
}

impl Field {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self { name, shape }
    }

    /// The JSON key of the member.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The shape of the member's type.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }
}

/// A type whose members are listed in a field registry.
///
/// Field names are unique within a type, and `field_ref(i)` is the member
/// described by `FIELDS[i]`.
pub trait Record: Typed {
    /// Member descriptors, in declaration order.
    const FIELDS: &'static [Field];

    /// Read access to the member at `index` in [`Record::FIELDS`].
    fn field_ref(&self, index: usize) -> Option<&dyn Marshal>;

    /// Position of the member named `name` in [`Record::FIELDS`].
    fn field_index(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|field| field.name() == name)
    }

    /// The descriptor of the member named `name`.
    fn field(name: &str) -> Option<&'static Field> {
        Self::FIELDS.iter().find(|field| field.name() == name)
    }
}

/// Write access to the members of a [`Record`], for values borrowing from
/// input with lifetime `'de`.
pub trait RecordMut<'de>: Record {
    /// Write access to the member at `index` in [`Record::FIELDS`].
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Unmarshal<'de>>;
}

/// Declares a struct together with its field registry and its
/// (de)serialization impls.
///
/// Every member type must itself be (de)serializable. A single lifetime
/// parameter is supported, for records holding `Cow<'a, str>` text borrowed
/// from the input.
///
/// ```rust
/// use jsonrefl::{Record, record};
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// assert_eq!(Point::FIELDS[1].name(), "y");
/// assert_eq!(Point::field_index("x"), Some(0));
///
/// let mut point = Point::default();
/// jsonrefl::deserialize(&mut point, r#"{"y": 2, "x": 1}"#, false).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// assert_eq!(jsonrefl::serialize(&point), r#"{"x":1,"y":2}"#);
/// ```
#[macro_export]
macro_rules! record {
    (@fields $($field:ident : $ty:ty),*) => {
        const FIELDS: &'static [$crate::Field] = &[
            $($crate::Field::new(stringify!($field), <$ty as $crate::Typed>::SHAPE)),*
        ];

        #[allow(unused_variables)]
        fn field_ref(&self, index: usize) -> ::core::option::Option<&dyn $crate::Marshal> {
            // discriminants are the declaration-order indices into `FIELDS`
            #[allow(non_camel_case_types, dead_code)]
            enum Index { $($field),* }
            $(
                if index == Index::$field as usize {
                    return ::core::option::Option::Some(&self.$field);
                }
            )*
            ::core::option::Option::None
        }
    };
    (@field_mut $lt:lifetime; $($field:ident),*) => {
        #[allow(unused_variables)]
        fn field_mut(
            &mut self,
            index: usize,
        ) -> ::core::option::Option<&mut dyn $crate::Unmarshal<$lt>> {
            #[allow(non_camel_case_types, dead_code)]
            enum Index { $($field),* }
            $(
                if index == Index::$field as usize {
                    return ::core::option::Option::Some(&mut self.$field);
                }
            )*
            ::core::option::Option::None
        }
    };
    (@unmarshal $lt:lifetime) => {
        fn unmarshal(
            &mut self,
            cursor: &mut $crate::Cursor<$lt>,
        ) -> ::core::result::Result<(), $crate::Error> {
            let unknown_keys = cursor.nested_unknown_keys();
            $crate::de::unmarshal_record(self, cursor, unknown_keys)
        }
    };
    (@marshal) => {
        fn marshal(&self, out: &mut $crate::__private::String) {
            $crate::ser::marshal_record(self, out);
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$lt:lifetime> {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name<$lt> {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty
            ),*
        }

        impl<$lt> $crate::Typed for $name<$lt> {
            const SHAPE: $crate::Shape = $crate::Shape::Record;
        }

        impl<$lt> $crate::Record for $name<$lt> {
            $crate::record!(@fields $($field: $ty),*);
        }

        impl<$lt> $crate::RecordMut<$lt> for $name<$lt> {
            $crate::record!(@field_mut $lt; $($field),*);
        }

        impl<$lt> $crate::Unmarshal<$lt> for $name<$lt> {
            $crate::record!(@unmarshal $lt);
        }

        impl<$lt> $crate::Marshal for $name<$lt> {
            $crate::record!(@marshal);
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty
            ),*
        }

        impl $crate::Typed for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Record;
        }

        impl $crate::Record for $name {
            $crate::record!(@fields $($field: $ty),*);
        }

        impl<'de> $crate::RecordMut<'de> for $name {
            $crate::record!(@field_mut 'de; $($field),*);
        }

        impl<'de> $crate::Unmarshal<'de> for $name {
            $crate::record!(@unmarshal 'de);
        }

        impl $crate::Marshal for $name {
            $crate::record!(@marshal);
        }
    };
}
