// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for descriptor-tagged buffers.
//!
//! A descriptor is an immutable tree describing how a value is laid out in a
//! source buffer. Plans read it once at build time and never mutate it.

use crate::error::{ConvertError, Result};
use std::fmt;
use std::sync::Arc;

/// Width of the tag prefix of an encoded variant.
pub const TAG_SIZE: usize = 4;

/// Round `offset` up to the next multiple of `alignment` (a power of two, or 1).
///
/// `None` when the result does not fit in `usize`.
pub fn align_to(offset: usize, alignment: usize) -> Option<usize> {
    if alignment <= 1 {
        return Some(offset);
    }
    offset.checked_next_multiple_of(alignment)
}

/// Primitive kinds a descriptor can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PrimitiveKind {
    Unit,
    Bool,
    /// Signed 8-bit character.
    Char,
    /// Unsigned 8-bit integer.
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Parse a primitive name (`"int"`, `"double"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "unit" => Self::Unit,
            "bool" => Self::Bool,
            "char" => Self::Char,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    /// Canonical descriptor name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Size in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Unit => 0,
            Self::Bool | Self::Char | Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    /// Alignment requirement.
    pub fn alignment(self) -> usize {
        self.size().max(1)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A struct field: name, byte offset in the source, and type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructField {
    pub name: String,
    pub offset: usize,
    pub ty: Arc<TypeDescriptor>,
}

impl StructField {
    pub fn new(name: impl Into<String>, offset: usize, ty: impl Into<Arc<TypeDescriptor>>) -> Self {
        Self {
            name: name.into(),
            offset,
            ty: ty.into(),
        }
    }
}

/// A variant constructor: name, source tag, and payload type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantCtor {
    pub name: String,
    pub tag: u32,
    pub payload: Arc<TypeDescriptor>,
}

impl VariantCtor {
    pub fn new(name: impl Into<String>, tag: u32, payload: impl Into<Arc<TypeDescriptor>>) -> Self {
        Self {
            name: name.into(),
            tag,
            payload: payload.into(),
        }
    }
}

/// Structural description of an encoded value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypeDescriptor {
    /// Named primitive (`"int"`, `"char"`, ...).
    Primitive { name: String },
    /// Type-level natural number; only meaningful as an array length.
    Nat(u64),
    /// Fixed-length homogeneous array.
    FixedArray {
        element: Arc<TypeDescriptor>,
        length: Arc<TypeDescriptor>,
    },
    /// Record with explicitly placed fields, in source byte order.
    Struct { fields: Vec<StructField> },
    /// Tagged union.
    Variant { ctors: Vec<VariantCtor> },
}

/// Size and alignment of a laid-out descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    size: usize,
    align: usize,
}

impl TypeDescriptor {
    /// Primitive descriptor from a raw name (unknown names are kept as-is).
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive { name: name.into() }
    }

    /// Primitive descriptor from a known kind.
    pub fn prim(kind: PrimitiveKind) -> Self {
        Self::primitive(kind.name())
    }

    /// Type-level size.
    pub fn nat(n: u64) -> Self {
        Self::Nat(n)
    }

    /// Fixed array of `length` elements.
    pub fn array(element: impl Into<Arc<TypeDescriptor>>, length: u64) -> Self {
        Self::array_with_length(element, Self::Nat(length))
    }

    /// Fixed array with an arbitrary length sub-descriptor.
    pub fn array_with_length(
        element: impl Into<Arc<TypeDescriptor>>,
        length: impl Into<Arc<TypeDescriptor>>,
    ) -> Self {
        Self::FixedArray {
            element: element.into(),
            length: length.into(),
        }
    }

    /// Struct descriptor from placed fields.
    pub fn structure(fields: Vec<StructField>) -> Self {
        Self::Struct { fields }
    }

    /// Variant descriptor from tagged constructors.
    pub fn variant(ctors: Vec<VariantCtor>) -> Self {
        Self::Variant { ctors }
    }

    /// Category name (`"primitive"`, `"array"`, `"struct"`, `"variant"`, `"nat"`).
    pub fn category(&self) -> &'static str {
        match self {
            Self::Primitive { .. } => "primitive",
            Self::Nat(_) => "nat",
            Self::FixedArray { .. } => "array",
            Self::Struct { .. } => "struct",
            Self::Variant { .. } => "variant",
        }
    }

    /// Get a struct field by name.
    pub fn field(&self, name: &str) -> Option<&StructField> {
        match self {
            Self::Struct { fields } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Get a variant constructor by name.
    pub fn ctor(&self, name: &str) -> Option<&VariantCtor> {
        match self {
            Self::Variant { ctors } => ctors.iter().find(|c| c.name == name),
            _ => None,
        }
    }

    /// Length of a fixed array.
    ///
    /// Fails with `InvalidLengthDescriptor` when the length sub-descriptor is
    /// not a `Nat`, and with `KindMismatch` when `self` is not an array.
    pub fn array_length(&self) -> Result<u64> {
        match self {
            Self::FixedArray { length, .. } => match length.as_ref() {
                Self::Nat(n) => Ok(*n),
                _ => Err(ConvertError::InvalidLengthDescriptor {
                    descriptor: self.to_string(),
                }),
            },
            _ => Err(ConvertError::KindMismatch {
                descriptor: self.to_string(),
                target: "fixed array",
                expected: "array",
            }),
        }
    }

    /// Size in bytes of an encoded value.
    pub fn byte_size(&self) -> Result<usize> {
        self.extent().map(|e| e.size)
    }

    /// Alignment requirement of an encoded value.
    pub fn alignment(&self) -> Result<usize> {
        self.extent().map(|e| e.align)
    }

    pub(crate) fn malformed(&self, reason: &'static str) -> ConvertError {
        ConvertError::Malformed {
            descriptor: self.to_string(),
            reason,
        }
    }

    fn extent(&self) -> Result<Extent> {
        match self {
            Self::Primitive { name } => {
                let kind =
                    PrimitiveKind::from_name(name).ok_or_else(|| self.malformed("unknown primitive"))?;
                Ok(Extent {
                    size: kind.size(),
                    align: kind.alignment(),
                })
            }
            Self::Nat(_) => Err(self.malformed("size used as a value type")),
            Self::FixedArray { element, .. } => {
                let length = usize::try_from(self.array_length()?)
                    .map_err(|_| self.malformed("array length exceeds address space"))?;
                let elem = element.extent()?;
                let size = elem
                    .size
                    .checked_mul(length)
                    .ok_or_else(|| self.malformed("array size overflow"))?;
                Ok(Extent {
                    size,
                    align: elem.align,
                })
            }
            Self::Struct { fields } => {
                let mut end = 0usize;
                let mut align = 1usize;
                for field in fields {
                    let ext = field.ty.extent()?;
                    end = end.max(
                        field
                            .offset
                            .checked_add(ext.size)
                            .ok_or_else(|| self.malformed("field offset overflow"))?,
                    );
                    align = align.max(ext.align);
                }
                let size = align_to(end, align).ok_or_else(|| self.malformed("struct size overflow"))?;
                Ok(Extent { size, align })
            }
            Self::Variant { ctors } => {
                let mut max_size = 0usize;
                let mut max_align = 1usize;
                for ctor in ctors {
                    let ext = ctor.payload.extent()?;
                    max_size = max_size.max(ext.size);
                    max_align = max_align.max(ext.align);
                }
                let align = max_align.max(TAG_SIZE);
                let size = align_to(TAG_SIZE, max_align)
                    .and_then(|payload| payload.checked_add(max_size))
                    .and_then(|end| align_to(end, align))
                    .ok_or_else(|| self.malformed("variant size overflow"))?;
                Ok(Extent { size, align })
            }
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::prim(kind)
    }
}

impl From<PrimitiveKind> for Arc<TypeDescriptor> {
    fn from(kind: PrimitiveKind) -> Self {
        Arc::new(TypeDescriptor::prim(kind))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name } => f.write_str(name),
            Self::Nat(n) => write!(f, "{n}"),
            Self::FixedArray { element, length } => write!(f, "[{element}:{length}]"),
            Self::Struct { fields } => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}:{}@{}", field.name, field.ty, field.offset)?;
                }
                f.write_str("}")
            }
            Self::Variant { ctors } => {
                f.write_str("|")?;
                for (i, ctor) in ctors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}:{}", ctor.name, ctor.tag, ctor.payload)?;
                }
                f.write_str("|")
            }
        }
    }
}
