// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::descriptor::{align_to, PrimitiveKind, StructField, TypeDescriptor, VariantCtor};
use std::sync::Arc;

/// Builder for struct descriptors.
///
/// `field` lays fields out like a C struct; `field_at` places one explicitly.
#[derive(Debug, Default)]
pub struct StructBuilder {
    fields: Vec<StructField>,
    end: usize,
}

impl StructBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field at the next offset aligned for its type.
    ///
    /// A type that cannot be laid out (or a layout past `usize::MAX`) is
    /// placed unaligned and takes no space; building a plan from it reports
    /// the problem.
    pub fn field(self, name: impl Into<String>, ty: impl Into<Arc<TypeDescriptor>>) -> Self {
        let ty = ty.into();
        let offset = align_to(self.end, ty.alignment().unwrap_or(1)).unwrap_or(self.end);
        self.field_at(name, offset, ty)
    }

    /// Add a field at an explicit source offset.
    pub fn field_at(
        mut self,
        name: impl Into<String>,
        offset: usize,
        ty: impl Into<Arc<TypeDescriptor>>,
    ) -> Self {
        let ty = ty.into();
        self.end = self
            .end
            .max(offset.saturating_add(ty.byte_size().unwrap_or(0)));
        self.fields.push(StructField::new(name, offset, ty));
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::structure(self.fields)
    }
}

/// Builder for variant descriptors.
#[derive(Debug, Default)]
pub struct VariantBuilder {
    ctors: Vec<VariantCtor>,
    next_tag: u32,
}

impl VariantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constructor with auto-incrementing tag.
    pub fn ctor(self, name: impl Into<String>, payload: impl Into<Arc<TypeDescriptor>>) -> Self {
        let tag = self.next_tag;
        self.ctor_with_tag(name, tag, payload)
    }

    /// Add a constructor with explicit tag.
    pub fn ctor_with_tag(
        mut self,
        name: impl Into<String>,
        tag: u32,
        payload: impl Into<Arc<TypeDescriptor>>,
    ) -> Self {
        self.ctors.push(VariantCtor::new(name, tag, payload));
        self.next_tag = tag.wrapping_add(1);
        self
    }

    /// Add a payload-less constructor.
    pub fn unit_ctor(self, name: impl Into<String>) -> Self {
        self.ctor(name, PrimitiveKind::Unit)
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::variant(self.ctors)
    }
}
