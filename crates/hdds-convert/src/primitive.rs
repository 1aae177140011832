// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive conversion: identity copies and value-preserving widening.
//!
//! | target            | accepted sources besides identity     |
//! |-------------------|---------------------------------------|
//! | bool, char        | none                                  |
//! | byte (`u8`)       | char                                  |
//! | short (`i16/u16`) | char, byte                            |
//! | int (`i32/u32`)   | char, byte, short                     |
//! | long (`i64/u64`)  | char, byte, short, int                |
//! | float (`f32`)     | char, byte, short, int                |
//! | double (`f64`)    | char, byte, short, int, long, float   |
//!
//! Descriptor `char` is a signed 8-bit value; `i8` and Rust `char` both take
//! it by identity. `isize`/`usize` alias the pointer-width fixed kind.

use crate::cursor::Cursor;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{ConvertError, Result};
use crate::plan::{kind_mismatch, target_name, Capability, Convert, Plan, Resolver};

/// Read one source primitive and widen it to `T`.
pub type Reader<T> = fn(Cursor<'_>) -> T;

/// Target primitive with a closed set of accepted source kinds.
pub trait Primitive: Copy + Send + Sync + 'static {
    /// Kind converted by identity.
    const KIND: PrimitiveKind;

    /// Reader for `from`, or `None` when no widening path exists.
    fn reader(from: PrimitiveKind) -> Option<Reader<Self>>;
}

/// Build a primitive plan: a single read, optional cast, single write.
pub fn resolve_primitive<P: Primitive>(desc: &TypeDescriptor, _cx: &Resolver<'_>) -> Result<Plan<P>> {
    let TypeDescriptor::Primitive { name } = desc else {
        return Err(kind_mismatch::<P>(desc, Capability::Primitive));
    };
    let read = PrimitiveKind::from_name(name)
        .and_then(P::reader)
        .ok_or_else(|| ConvertError::UnknownPrimitive {
            from: name.clone(),
            target: target_name::<P>(),
        })?;
    Ok(Box::new(move |src: Cursor<'_>, dst: &mut P| *dst = read(src)))
}

macro_rules! impl_convert_primitive {
    ($target:ty) => {
        impl Convert for $target {
            const CAPABILITY: Capability = Capability::Primitive;

            fn build(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<Self>> {
                resolve_primitive::<Self>(desc, cx)
            }
        }
    };
}

/// Generate `Primitive` + `Convert` impls from widening rules.
///
/// `target => Kind via read_fn, Source via read_fn, ...;` accepts `Kind` by
/// identity and each listed `Source` through an `as` cast.
macro_rules! widening {
    ($($target:ty => $kind:ident via $read:ident $(, $from:ident via $from_read:ident)*;)*) => {$(
        impl Primitive for $target {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn reader(from: PrimitiveKind) -> Option<Reader<Self>> {
                match from {
                    PrimitiveKind::$kind => {
                        fn read(src: Cursor<'_>) -> $target {
                            src.$read() as $target
                        }
                        Some(read as Reader<Self>)
                    }
                    $(PrimitiveKind::$from => {
                        fn read(src: Cursor<'_>) -> $target {
                            src.$from_read() as $target
                        }
                        Some(read as Reader<Self>)
                    })*
                    _ => None,
                }
            }
        }

        impl_convert_primitive!($target);
    )*};
}

widening! {
    i8  => Char via read_i8;
    u8  => Byte via read_u8, Char via read_i8;
    i16 => Short via read_i16, Char via read_i8, Byte via read_u8;
    u16 => Short via read_u16, Char via read_i8, Byte via read_u8;
    i32 => Int via read_i32, Char via read_i8, Byte via read_u8, Short via read_i16;
    u32 => Int via read_u32, Char via read_i8, Byte via read_u8, Short via read_i16;
    i64 => Long via read_i64, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32;
    u64 => Long via read_u64, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32;
    f32 => Float via read_f32, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32;
    f64 => Double via read_f64, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32,
        Long via read_i64, Float via read_f32;
}

#[cfg(target_pointer_width = "64")]
widening! {
    isize => Long via read_i64, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32;
    usize => Long via read_u64, Char via read_i8, Byte via read_u8, Short via read_i16, Int via read_i32;
}

#[cfg(target_pointer_width = "32")]
widening! {
    isize => Int via read_i32, Char via read_i8, Byte via read_u8, Short via read_i16;
    usize => Int via read_u32, Char via read_i8, Byte via read_u8, Short via read_i16;
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn reader(from: PrimitiveKind) -> Option<Reader<Self>> {
        fn read(src: Cursor<'_>) -> bool {
            src.read_bool()
        }
        match from {
            PrimitiveKind::Bool => Some(read as Reader<Self>),
            _ => None,
        }
    }
}

impl Primitive for char {
    const KIND: PrimitiveKind = PrimitiveKind::Char;

    fn reader(from: PrimitiveKind) -> Option<Reader<Self>> {
        fn read(src: Cursor<'_>) -> char {
            char::from(src.read_u8())
        }
        match from {
            PrimitiveKind::Char => Some(read as Reader<Self>),
            _ => None,
        }
    }
}

impl Primitive for () {
    const KIND: PrimitiveKind = PrimitiveKind::Unit;

    fn reader(from: PrimitiveKind) -> Option<Reader<Self>> {
        fn read(_src: Cursor<'_>) {}
        match from {
            PrimitiveKind::Unit => Some(read as Reader<Self>),
            _ => None,
        }
    }
}

impl_convert_primitive!(bool);
impl_convert_primitive!(char);
impl_convert_primitive!(());
