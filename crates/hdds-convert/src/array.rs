// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-array conversion: if `a` converts to `b`, then `[a:N]` converts to `[b; N]`.

use crate::cursor::Cursor;
use crate::descriptor::TypeDescriptor;
use crate::error::{ConvertError, Result};
use crate::plan::{kind_mismatch, target_name, Capability, Convert, Plan, Resolver};

impl<T: Convert, const N: usize> Convert for [T; N] {
    const CAPABILITY: Capability = Capability::Array;

    fn build(desc: &TypeDescriptor, cx: &Resolver<'_>) -> Result<Plan<Self>> {
        resolve_array::<T, N>(desc, cx)
    }
}

/// Build an array plan.
///
/// The element plan and the source stride are computed once; apply walks
/// the source by stride and the destination slot by slot.
pub fn resolve_array<T: Convert, const N: usize>(
    desc: &TypeDescriptor,
    cx: &Resolver<'_>,
) -> Result<Plan<[T; N]>> {
    let TypeDescriptor::FixedArray { element, .. } = desc else {
        return Err(kind_mismatch::<[T; N]>(desc, Capability::Array));
    };

    let length = desc.array_length()?;
    if length != N as u64 {
        return Err(ConvertError::LengthMismatch {
            descriptor: desc.to_string(),
            target: target_name::<[T; N]>(),
            expected: N,
            found: length,
        });
    }

    let convert_element = cx.resolve::<T>(element)?;
    let stride = element.byte_size()?;
    log::trace!(
        "[resolve_array] {} <- {} (stride {})",
        target_name::<[T; N]>(),
        desc,
        stride
    );

    Ok(Box::new(move |src: Cursor<'_>, dst: &mut [T; N]| {
        let mut cursor = src;
        for slot in dst.iter_mut() {
            convert_element(cursor, slot);
            cursor = cursor.at(stride);
        }
    }))
}
