mod decode;
mod encode;

use alloc::{string::String, vec::Vec};

use crate::{FixedStr, json_enum, record};

json_enum! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub(crate) enum Color {
        #[default]
        Red = 0,
        Green = 1,
        Blue = 2,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Id {
        pub(crate) id: i32,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Code {
        pub(crate) code: FixedStr<3>,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Inner {
        pub(crate) a: i32,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Outer {
        pub(crate) inner: Inner,
        pub(crate) x: i32,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Paint {
        pub(crate) color: Color,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Slots {
        pub(crate) values: [i32; 5],
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Mixed {
        pub(crate) flag: bool,
        pub(crate) ratio: f64,
        pub(crate) note: Option<String>,
        pub(crate) items: Vec<Inner>,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Wide {
        pub(crate) big: u128,
        pub(crate) single: f32,
        pub(crate) double: f64,
    }
}
