// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-convert - descriptor-driven conversion plans
//!
//! Converts values whose layout is only known at runtime (a [`TypeDescriptor`]
//! paired with a byte buffer) into ordinary Rust types.
//!
//! The descriptor is matched against the target type once, producing a
//! [`ConversionPlan`]. Applying the plan performs no lookups, no allocation
//! and no type checks; it just follows the offsets and casts fixed at build
//! time. Build fails with a [`ConvertError`] when the two types cannot be
//! matched, so a plan that exists is always safe to apply to a buffer of the
//! described shape.
//!
//! # Matching rules
//!
//! - **Primitives**: identity, or a value-preserving widening (`short` into
//!   `i64`, `int` into `f64`, ...). Narrowing is rejected.
//! - **Fixed arrays**: equal length, elements converted pairwise.
//! - **Structs**: destination fields are matched to source fields by name;
//!   extra source fields are ignored.
//! - **Variants**: constructors are matched by name and dispatched on the
//!   source tag; every payload sits at the same offset.
//!
//! # Example
//!
//! ```rust
//! use hdds_convert::{build_plan, PrimitiveKind, Record, StructBuilder};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Reading {
//!     sensor: u32,
//!     value: f64,
//! }
//!
//! // Source layout: {value:float@0, sensor:short@4}
//! let desc = StructBuilder::new()
//!     .field("value", PrimitiveKind::Float)
//!     .field("sensor", PrimitiveKind::Short)
//!     .build();
//!
//! let mut src = Vec::new();
//! src.extend_from_slice(&23.5f32.to_ne_bytes());
//! src.extend_from_slice(&7i16.to_ne_bytes());
//! src.extend_from_slice(&[0, 0]);
//!
//! let plan = build_plan::<Reading>(&desc)?;
//! assert_eq!(plan.convert(&src), Reading { sensor: 7, value: 23.5 });
//! # Ok::<(), hdds_convert::ConvertError>(())
//! ```

extern crate self as hdds_convert;

mod array;
mod builder;
mod config;
mod cursor;
mod descriptor;
mod error;
mod plan;
mod primitive;
pub mod record;
pub mod variant;

pub use array::resolve_array;
pub use builder::{StructBuilder, VariantBuilder};
pub use config::{PlanOptions, Report};
pub use cursor::Cursor;
pub use descriptor::{align_to, PrimitiveKind, StructField, TypeDescriptor, VariantCtor, TAG_SIZE};
pub use error::{ConvertError, Result};
pub use plan::{
    build_plan, project, resolve, target_name, Capability, ConversionPlan, Convert, Plan, Planner,
    Resolver,
};
pub use primitive::{resolve_primitive, Primitive, Reader};
pub use record::{Field, Record};
pub use variant::{Constructor, Variant};

/// Derive macros generating [`Record`]/[`Variant`] metadata and [`Convert`].
pub use hdds_convert_derive::{Record, Variant};
