// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan construction errors.
//!
//! Every error is raised while a plan is being built. Applying a built plan
//! never returns an error.

use thiserror::Error;

/// Result alias for plan construction.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Reasons a conversion plan cannot be built.
///
/// `descriptor` fields hold the rendering of the offending descriptor,
/// `target` fields the name of the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Descriptor category (primitive/array/struct/variant) does not match the target.
    #[error("cannot convert {descriptor} into {target}: kind mismatch (expected {expected})")]
    KindMismatch {
        descriptor: String,
        target: &'static str,
        expected: &'static str,
    },

    /// No widening path from the source primitive to the target primitive.
    #[error("cannot convert primitive {from} into {target}")]
    UnknownPrimitive { from: String, target: &'static str },

    /// Fixed-array length differs from the statically requested length.
    #[error("cannot convert {descriptor} into {target}: length mismatch (expected {expected}, found {found})")]
    LengthMismatch {
        descriptor: String,
        target: &'static str,
        expected: usize,
        found: u64,
    },

    /// A destination field has no same-named field in the descriptor.
    #[error("field '{field}' of {target} is not defined in {descriptor}")]
    MissingField {
        field: &'static str,
        descriptor: String,
        target: &'static str,
    },

    /// Array length sub-descriptor is not a size.
    #[error("invalid type description due to non-size array length: {descriptor}")]
    InvalidLengthDescriptor { descriptor: String },

    /// Descriptor cannot be laid out in memory.
    #[error("malformed type description {descriptor}: {reason}")]
    Malformed {
        descriptor: String,
        reason: &'static str,
    },
}

impl ConvertError {
    /// Short stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::UnknownPrimitive { .. } => "unknown_primitive",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidLengthDescriptor { .. } => "invalid_length_descriptor",
            Self::Malformed { .. } => "malformed",
        }
    }
}
