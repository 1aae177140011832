// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record conversion by field name.
//!
//! Each destination field, in declaration order, is matched to the source
//! field of the same name. The matched pairs form a fixed table that apply
//! walks without branching. Extra source fields are ignored; a destination
//! field with no source aborts the build.

use crate::config::Report;
use crate::cursor::Cursor;
use crate::descriptor::TypeDescriptor;
use crate::error::{ConvertError, Result};
use crate::plan::{kind_mismatch, target_name, Capability, Plan, Resolver};
use std::fmt;

/// Builds the apply step of one field from the matched source field type.
pub type Bind<R> = fn(&TypeDescriptor, &Resolver<'_>) -> Result<Plan<R>>;

/// Reflective metadata of a named-field struct.
///
/// Usually generated with `#[derive(Record)]`.
pub trait Record: Sized + 'static {
    /// Fields in declaration order.
    const FIELDS: &'static [Field<Self>];
}

/// One destination field.
pub struct Field<R> {
    /// Name matched against source field names.
    pub name: &'static str,
    /// Byte offset inside `R` (`core::mem::offset_of!`).
    pub offset: usize,
    /// Resolves the field type and projects `R` onto the field.
    pub bind: Bind<R>,
}

impl<R> Field<R> {
    pub const fn new(name: &'static str, offset: usize, bind: Bind<R>) -> Self {
        Self { name, offset, bind }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// Conversion of one destination field.
pub struct FieldConversion<R> {
    name: &'static str,
    source_offset: usize,
    destination_offset: usize,
    convert: Plan<R>,
}

impl<R> FieldConversion<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Offset of the matched field in the source value.
    pub fn source_offset(&self) -> usize {
        self.source_offset
    }

    /// Offset of the field inside the destination type.
    pub fn destination_offset(&self) -> usize {
        self.destination_offset
    }
}

impl<R> fmt::Debug for FieldConversion<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConversion")
            .field("name", &self.name)
            .field("source_offset", &self.source_offset)
            .field("destination_offset", &self.destination_offset)
            .finish_non_exhaustive()
    }
}

/// Field table of a record conversion, in destination declaration order.
pub struct RecordPlan<R> {
    fields: Vec<FieldConversion<R>>,
}

impl<R: Record> RecordPlan<R> {
    /// Match every destination field by name and resolve its conversion.
    pub fn build(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Self> {
        let TypeDescriptor::Struct {
            fields: source_fields,
        } = desc
        else {
            return Err(kind_mismatch::<R>(desc, Capability::Record));
        };

        let mut fields = Vec::with_capacity(R::FIELDS.len());
        for field in R::FIELDS {
            let source = source_fields
                .iter()
                .find(|s| s.name == field.name)
                .ok_or_else(|| ConvertError::MissingField {
                    field: field.name,
                    descriptor: desc.to_string(),
                    target: target_name::<R>(),
                })?;
            let convert = (field.bind)(&source.ty, cx)?;
            log::trace!(
                "[RecordPlan::build] {}.{}: src+{} -> dst+{}",
                target_name::<R>(),
                field.name,
                source.offset,
                field.offset
            );
            fields.push(FieldConversion {
                name: field.name,
                source_offset: source.offset,
                destination_offset: field.offset,
                convert,
            });
        }

        if cx.options().unused_fields == Report::Warn {
            for source in source_fields {
                if !R::FIELDS.iter().any(|f| f.name == source.name) {
                    log::warn!(
                        "[RecordPlan::build] source field '{}' is not used by {}",
                        source.name,
                        target_name::<R>()
                    );
                }
            }
        }

        log::debug!(
            "[RecordPlan::build] {} <- {} ({} fields)",
            target_name::<R>(),
            desc,
            fields.len()
        );
        Ok(Self { fields })
    }
}

impl<R: 'static> RecordPlan<R> {
    pub fn fields(&self) -> &[FieldConversion<R>] {
        &self.fields
    }

    /// Convert every field, in table order.
    #[inline]
    pub fn apply(&self, src: Cursor<'_>, dst: &mut R) {
        for field in &self.fields {
            (field.convert)(src.at(field.source_offset), dst);
        }
    }

    pub fn into_plan(self) -> Plan<R> {
        Box::new(move |src: Cursor<'_>, dst: &mut R| self.apply(src, dst))
    }
}

impl<R> fmt::Debug for RecordPlan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordPlan")
            .field("fields", &self.fields)
            .finish()
    }
}

/// Build a record plan (the `Convert::build` of derived records).
pub fn resolve_record<R: Record>(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<R>> {
    Ok(RecordPlan::<R>::build(desc, cx)?.into_plan())
}
