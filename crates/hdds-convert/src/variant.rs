// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged-union conversion by constructor name.
//!
//! An encoded variant is a `u32` tag followed by the payload of the live
//! constructor. Each plan fixes one payload offset, `align_to(4, max)` where
//! `max` is the largest alignment among matched payloads, so the offset does
//! not depend on which tag a buffer carries.
//!
//! Destination constructors without a source counterpart are skipped: no
//! well-formed buffer can carry them. Source constructors without a
//! destination counterpart are ignored.
//!
//! The payload offset only accounts for matched constructors.
//! [`TypeDescriptor::byte_size`] and [`TypeDescriptor::alignment`] lay the
//! variant out over all constructors instead, so when an unmatched source
//! constructor is more aligned than every matched one, the plan reads
//! payloads before the offset that layout puts them at. Encode buffers for
//! such a plan against [`VariantPlan::payload_offset`], not `byte_size()`.

use crate::config::Report;
use crate::cursor::Cursor;
use crate::descriptor::{align_to, TypeDescriptor, TAG_SIZE};
use crate::error::Result;
use crate::plan::{kind_mismatch, target_name, Capability, Plan, Resolver};
use std::collections::HashMap;
use std::fmt;

/// Builds the apply step of one constructor from the matched payload type.
pub type Bind<U> = fn(&TypeDescriptor, &Resolver<'_>) -> Result<Plan<U>>;

/// Reflective metadata of a tagged union.
///
/// Usually generated with `#[derive(Variant)]`.
pub trait Variant: Sized + 'static {
    /// Constructors in declaration order.
    const CONSTRUCTORS: &'static [Constructor<Self>];

    /// Destination tag id of the live constructor.
    fn constructor_id(&self) -> u32;
}

/// One destination constructor.
pub struct Constructor<U> {
    /// Name matched against source constructor names.
    pub name: &'static str,
    /// Destination tag id.
    pub id: u32,
    /// Resolves the payload type; the resulting plan switches the
    /// destination to this constructor before filling the payload.
    pub bind: Bind<U>,
}

impl<U> Constructor<U> {
    pub const fn new(name: &'static str, id: u32, bind: Bind<U>) -> Self {
        Self { name, id, bind }
    }
}

impl<U> fmt::Debug for Constructor<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Bind a payload-less constructor: the payload must be `unit` and apply only
/// runs `select`.
pub fn unit<U: 'static>(desc: &TypeDescriptor, cx: &Resolver<'_>, select: fn(&mut U)) -> Result<Plan<U>> {
    cx.resolve::<()>(desc)?;
    Ok(Box::new(move |_src: Cursor<'_>, dst: &mut U| select(dst)))
}

struct Dispatch<U> {
    id: u32,
    convert: Plan<U>,
}

/// Dispatch table of a variant conversion.
pub struct VariantPlan<U> {
    table: HashMap<u32, Dispatch<U>>,
    payload_offset: usize,
    max_alignment: usize,
}

impl<U: Variant> VariantPlan<U> {
    /// Match destination constructors by name and resolve their payloads.
    pub fn build(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Self> {
        let TypeDescriptor::Variant { ctors } = desc else {
            return Err(kind_mismatch::<U>(desc, Capability::Union));
        };

        let mut table = HashMap::with_capacity(U::CONSTRUCTORS.len());
        let mut max_alignment = 1usize;
        for ctor in U::CONSTRUCTORS {
            let Some(source) = ctors.iter().find(|c| c.name == ctor.name) else {
                if cx.options().unmatched_constructors == Report::Warn {
                    log::warn!(
                        "[VariantPlan::build] constructor '{}' of {} has no source in {}",
                        ctor.name,
                        target_name::<U>(),
                        desc
                    );
                }
                continue;
            };
            let convert = (ctor.bind)(&source.payload, cx)?;
            max_alignment = max_alignment.max(source.payload.alignment()?);
            log::trace!(
                "[VariantPlan::build] {}::{}: tag {} -> id {}",
                target_name::<U>(),
                ctor.name,
                source.tag,
                ctor.id
            );
            table.insert(
                source.tag,
                Dispatch {
                    id: ctor.id,
                    convert,
                },
            );
        }

        let payload_offset = align_to(TAG_SIZE, max_alignment)
            .ok_or_else(|| desc.malformed("payload offset overflow"))?;
        log::debug!(
            "[VariantPlan::build] {} <- {} ({} constructors, payload at {})",
            target_name::<U>(),
            desc,
            table.len(),
            payload_offset
        );
        Ok(Self {
            table,
            payload_offset,
            max_alignment,
        })
    }

    /// Read the tag, switch the destination to the matching constructor and
    /// convert the payload.
    ///
    /// # Panics
    ///
    /// When the tag has no entry, i.e. the buffer does not encode the
    /// descriptor this plan was built from.
    #[inline]
    pub fn apply(&self, src: Cursor<'_>, dst: &mut U) {
        let tag = src.read_u32();
        let Some(dispatch) = self.table.get(&tag) else {
            unknown_tag(tag, target_name::<U>());
        };
        (dispatch.convert)(src.at(self.payload_offset), dst);
        debug_assert_eq!(dst.constructor_id(), dispatch.id);
    }

    pub fn into_plan(self) -> Plan<U> {
        Box::new(move |src: Cursor<'_>, dst: &mut U| self.apply(src, dst))
    }
}

impl<U> VariantPlan<U> {
    /// Offset of every payload, relative to the start of the encoded value.
    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// Largest alignment among matched payloads.
    pub fn max_alignment(&self) -> usize {
        self.max_alignment
    }

    /// `(source tag, destination id)` pairs, sorted by source tag.
    pub fn dispatch(&self) -> Vec<(u32, u32)> {
        let mut pairs: Vec<_> = self.table.iter().map(|(tag, d)| (*tag, d.id)).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl<U> fmt::Debug for VariantPlan<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantPlan")
            .field("dispatch", &self.dispatch())
            .field("payload_offset", &self.payload_offset)
            .finish()
    }
}

#[cold]
#[inline(never)]
fn unknown_tag(tag: u32, target: &str) -> ! {
    panic!(
        "source buffer does not match its descriptor: tag {} has no constructor in {}",
        tag, target
    )
}

/// Build a variant plan (the `Convert::build` of derived unions).
pub fn resolve_variant<U: Variant>(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<U>> {
    Ok(VariantPlan::<U>::build(desc, cx)?.into_plan())
}
