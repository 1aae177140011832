// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion plans and the root resolver.
//!
//! Building a plan walks the descriptor once; applying it only follows the
//! tables captured at build time.

use crate::config::PlanOptions;
use crate::cursor::Cursor;
use crate::descriptor::TypeDescriptor;
use crate::error::{ConvertError, Result};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Apply step of a plan: read from the cursor, write into the destination.
pub type Plan<T> = Box<dyn Fn(Cursor<'_>, &mut T) + Send + Sync>;

/// Descriptor category a target type can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Primitive,
    Array,
    Record,
    Union,
}

impl Capability {
    /// Does `desc` belong to the category this capability converts from?
    pub fn accepts(self, desc: &TypeDescriptor) -> bool {
        matches!(
            (self, desc),
            (Self::Primitive, TypeDescriptor::Primitive { .. })
                | (Self::Array, TypeDescriptor::FixedArray { .. })
                | (Self::Record, TypeDescriptor::Struct { .. })
                | (Self::Union, TypeDescriptor::Variant { .. })
        )
    }

    /// Descriptor category name.
    pub fn category(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Array => "array",
            Self::Record => "struct",
            Self::Union => "variant",
        }
    }
}

/// A statically known type that plans can write into.
///
/// Implemented for primitives, fixed arrays, and (through the derive macros)
/// records and tagged unions.
pub trait Convert: Sized + 'static {
    /// Which descriptor category this type converts from.
    const CAPABILITY: Capability;

    /// Build the apply step from a descriptor already known to match
    /// [`Self::CAPABILITY`]. Call [`resolve`] instead of this directly.
    fn build(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<Self>>;
}

/// Build-time context threaded through nested resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'o> {
    options: &'o PlanOptions,
}

impl<'o> Resolver<'o> {
    pub fn new(options: &'o PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &'o PlanOptions {
        self.options
    }

    /// Resolve a nested type.
    pub fn resolve<T: Convert>(&self, desc: &TypeDescriptor) -> Result<Plan<T>> {
        resolve::<T>(desc, self)
    }
}

/// Name used for `T` in errors and logs.
pub fn target_name<T>() -> &'static str {
    std::any::type_name::<T>()
}

pub(crate) fn kind_mismatch<T>(desc: &TypeDescriptor, capability: Capability) -> ConvertError {
    ConvertError::KindMismatch {
        descriptor: desc.to_string(),
        target: target_name::<T>(),
        expected: capability.category(),
    }
}

/// Root dispatcher: check the descriptor category against `T`'s capability,
/// then hand over to the matching builder.
pub fn resolve<T: Convert>(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<T>> {
    if !T::CAPABILITY.accepts(desc) {
        return Err(kind_mismatch::<T>(desc, T::CAPABILITY));
    }
    T::build(desc, cx)
}

/// Resolve `F` against `desc` and route its output through `select`.
///
/// Generated record fields and union constructors bind through this: for a
/// field `select` borrows the field, for a constructor it switches the
/// destination to that constructor and borrows its payload.
pub fn project<R: 'static, F: Convert>(
    desc: &TypeDescriptor,
    cx: &Resolver<'_>,
    select: fn(&mut R) -> &mut F,
) -> Result<Plan<R>> {
    let convert = cx.resolve::<F>(desc)?;
    Ok(Box::new(move |src: Cursor<'_>, dst: &mut R| {
        convert(src, select(dst))
    }))
}

/// A reusable conversion from descriptor-tagged bytes into `T`.
///
/// Plans are immutable and can be shared across threads; applying one never
/// allocates and never fails on a buffer that matches the descriptor.
pub struct ConversionPlan<T> {
    root: Arc<dyn Fn(Cursor<'_>, &mut T) + Send + Sync>,
    source_size: Option<usize>,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: Convert> ConversionPlan<T> {
    /// Convert `source` into `destination`.
    ///
    /// `source` must encode a value of the descriptor this plan was built
    /// from. Short buffers and unknown variant tags panic.
    #[inline]
    pub fn apply(&self, source: &[u8], destination: &mut T) {
        (self.root)(Cursor::new(source), destination);
    }

    /// Size in bytes of a source value, when every part of the descriptor
    /// (including parts the plan ignores) can be laid out.
    pub fn source_size(&self) -> Option<usize> {
        self.source_size
    }
}

impl<T: Convert + Default> ConversionPlan<T> {
    /// Convert `source` into a fresh value.
    pub fn convert(&self, source: &[u8]) -> T {
        let mut out = T::default();
        self.apply(source, &mut out);
        out
    }
}

impl<T> Clone for ConversionPlan<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            source_size: self.source_size,
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ConversionPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionPlan")
            .field("target", &target_name::<T>())
            .field("source_size", &self.source_size)
            .finish_non_exhaustive()
    }
}

/// Builds plans with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlanOptions,
}

impl Planner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Build a plan converting values described by `desc` into `T`.
    ///
    /// Fails without side effects when any part of `T` cannot be matched.
    pub fn build<T: Convert>(&self, desc: &TypeDescriptor) -> Result<ConversionPlan<T>> {
        let cx = Resolver::new(&self.options);
        let root = resolve::<T>(desc, &cx).inspect_err(|e| {
            log::debug!(
                "[Planner::build] {} <- {} rejected ({}): {}",
                target_name::<T>(),
                desc,
                e.kind(),
                e
            );
        })?;
        let source_size = desc.byte_size().ok();
        log::debug!(
            "[Planner::build] {} <- {} ({:?} source bytes)",
            target_name::<T>(),
            desc,
            source_size
        );
        Ok(ConversionPlan {
            root: Arc::from(root),
            source_size,
            _target: PhantomData,
        })
    }
}

/// Build a plan with default options.
pub fn build_plan<T: Convert>(desc: &TypeDescriptor) -> Result<ConversionPlan<T>> {
    Planner::default().build(desc)
}
