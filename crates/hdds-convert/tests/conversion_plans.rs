// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Conversion plan behaviour through the public API: derived targets,
// builder-made descriptors, encoded source buffers.

#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

mod common;

use common::Source;
use hdds_convert::variant::VariantPlan;
use hdds_convert::{
    build_plan, ConvertError, PlanOptions, Planner, PrimitiveKind, Record, Resolver,
    StructBuilder, TypeDescriptor, Variant, VariantBuilder,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Sample {
    a: char,
    b: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Telemetry {
    id: u16,
    level: f64,
    counts: [i64; 3],
    alive: bool,
}

#[derive(Debug, Default, PartialEq, Variant)]
enum Outcome {
    Ok(i32),
    Err(char),
    #[default]
    Pending,
}

#[derive(Debug, Default, PartialEq, Variant)]
enum Wide {
    Small(i16),
    Big(f64),
    #[default]
    Nothing,
}

fn ok_err() -> TypeDescriptor {
    VariantBuilder::new()
        .ctor("Ok", PrimitiveKind::Int)
        .ctor("Err", PrimitiveKind::Char)
        .build()
}

fn telemetry_desc() -> TypeDescriptor {
    StructBuilder::new()
        .field("alive", PrimitiveKind::Bool)
        .field("counts", TypeDescriptor::array(PrimitiveKind::Int, 3))
        .field("level", PrimitiveKind::Float)
        .field("id", PrimitiveKind::Byte)
        .field("spare", PrimitiveKind::Double)
        .build()
}

#[test]
fn test_array_length_enforced() {
    let desc = TypeDescriptor::array(PrimitiveKind::Int, 3);
    let err = build_plan::<[i64; 4]>(&desc).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::LengthMismatch {
            expected: 4,
            found: 3,
            ..
        }
    ));

    let mut src = Source::for_descriptor(&desc);
    src.put(0, 1i32.to_ne_bytes())
        .put(4, 2i32.to_ne_bytes())
        .put(8, 3i32.to_ne_bytes());
    let plan = build_plan::<[i64; 3]>(&desc).expect("plan");
    assert_eq!(plan.convert(src.bytes()), [1, 2, 3]);
}

#[test]
fn test_struct_matching_is_name_based() {
    let desc = StructBuilder::new()
        .field("b", PrimitiveKind::Int)
        .field("a", PrimitiveKind::Char)
        .build();
    let mut src = Source::for_descriptor(&desc);
    src.put(0, 1234i32.to_ne_bytes()).put(4, [b'k']);

    let plan = build_plan::<Sample>(&desc).expect("plan");
    assert_eq!(plan.convert(src.bytes()), Sample { a: 'k', b: 1234 });

    let partial = StructBuilder::new().field("b", PrimitiveKind::Int).build();
    let err = build_plan::<Sample>(&partial).unwrap_err();
    assert!(matches!(err, ConvertError::MissingField { field: "a", .. }));
}

#[test]
fn test_mixed_record() {
    let desc = telemetry_desc();
    assert_eq!(
        desc.to_string(),
        "{alive:bool@0, counts:[int:3]@4, level:float@16, id:byte@20, spare:double@24}"
    );

    let mut src = Source::for_descriptor(&desc);
    src.put(0, [1])
        .put(4, (-1i32).to_ne_bytes())
        .put(8, 0i32.to_ne_bytes())
        .put(12, i32::MAX.to_ne_bytes())
        .put(16, 0.5f32.to_ne_bytes())
        .put(20, [200])
        .put(24, 99.0f64.to_ne_bytes());

    let plan = build_plan::<Telemetry>(&desc).expect("plan");
    assert_eq!(
        plan.convert(src.bytes()),
        Telemetry {
            id: 200,
            level: 0.5,
            counts: [-1, 0, i64::from(i32::MAX)],
            alive: true,
        }
    );
}

#[test]
fn test_struct_field_independence() {
    let desc = telemetry_desc();
    let plan = build_plan::<Telemetry>(&desc).expect("plan");

    let mut base = Source::for_descriptor(&desc);
    base.put(0, [1])
        .put(16, 1.25f32.to_ne_bytes())
        .put(20, [7]);
    let expected = plan.convert(base.bytes());

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..64 {
        // Vary only the counts array and the unused double.
        let mut src = Source::for_descriptor(&desc);
        src.put(0, [1]).put(16, 1.25f32.to_ne_bytes()).put(20, [7]);
        let counts = [rng.i32(..), rng.i32(..), rng.i32(..)];
        for (i, c) in counts.iter().enumerate() {
            src.put(4 + i * 4, c.to_ne_bytes());
        }
        src.put(24, rng.f64().to_ne_bytes());

        let out = plan.convert(src.bytes());
        assert_eq!(out.id, expected.id);
        assert_eq!(out.level, expected.level);
        assert_eq!(out.alive, expected.alive);
        assert_eq!(out.counts, counts.map(i64::from));
    }
}

#[test]
fn test_variant_round_trip() {
    let plan = build_plan::<Outcome>(&ok_err()).expect("plan");

    let mut src = Source::with_len(8);
    src.tag(0).put(4, 42i32.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Outcome::Ok(42));

    let mut src = Source::with_len(8);
    src.tag(1).put(4, [b'x']);
    assert_eq!(plan.convert(src.bytes()), Outcome::Err('x'));
}

#[test]
fn test_variant_missing_constructor_narrows_table() {
    // Pending has no source constructor: not an error.
    let opts = PlanOptions::default();
    let table = VariantPlan::<Outcome>::build(&ok_err(), &Resolver::new(&opts)).expect("plan");
    assert_eq!(table.dispatch(), vec![(0, 0), (1, 1)]);
    assert_eq!(Outcome::Pending.constructor_id(), 2);
}

#[test]
fn test_variant_payload_offset_stability() {
    let desc = VariantBuilder::new()
        .ctor("Small", PrimitiveKind::Short)
        .ctor("Big", PrimitiveKind::Double)
        .unit_ctor("Nothing")
        .build();
    let opts = PlanOptions::default();
    let table = VariantPlan::<Wide>::build(&desc, &Resolver::new(&opts)).expect("plan");
    assert_eq!(Some(table.payload_offset()), hdds_convert::align_to(4, 8));
    assert_eq!(desc.byte_size(), Ok(16));

    let plan = build_plan::<Wide>(&desc).expect("plan");
    let mut src = Source::for_descriptor(&desc);
    src.tag(0).put(8, 300i16.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Wide::Small(300));

    let mut src = Source::for_descriptor(&desc);
    src.tag(1).put(8, 6.5f64.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Wide::Big(6.5));

    let mut src = Source::for_descriptor(&desc);
    src.tag(2);
    assert_eq!(plan.convert(src.bytes()), Wide::Nothing);
}

#[test]
fn test_rebuild_is_observationally_equivalent() {
    let desc = telemetry_desc();
    let first = build_plan::<Telemetry>(&desc).expect("plan");
    let second = Planner::new(PlanOptions::verbose())
        .build::<Telemetry>(&desc)
        .expect("plan");

    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..32 {
        let size = desc.byte_size().expect("size");
        let bytes: Vec<u8> = std::iter::repeat_with(|| rng.u8(..)).take(size).collect();
        // Debug output so NaN levels compare equal.
        assert_eq!(
            format!("{:?}", first.convert(&bytes)),
            format!("{:?}", second.convert(&bytes))
        );
    }
}

#[test]
fn test_plan_shared_across_threads() {
    let desc = TypeDescriptor::array(PrimitiveKind::Short, 4);
    let plan = build_plan::<[i32; 4]>(&desc).expect("plan");

    std::thread::scope(|s| {
        for t in 0..4i16 {
            let plan = &plan;
            s.spawn(move || {
                let src: Vec<u8> = (0..4i16).flat_map(|i| (t * 10 + i).to_ne_bytes()).collect();
                let mut out = [0i32; 4];
                for _ in 0..100 {
                    plan.apply(&src, &mut out);
                }
                let t = i32::from(t);
                assert_eq!(out, [t * 10, t * 10 + 1, t * 10 + 2, t * 10 + 3]);
            });
        }
    });
}

#[test]
fn test_plan_clone_moves_to_thread() {
    let plan = build_plan::<Outcome>(&ok_err()).expect("plan");
    let copy = plan.clone();
    let handle = std::thread::spawn(move || {
        let mut src = Source::with_len(8);
        src.tag(0).put(4, 5i32.to_ne_bytes());
        copy.convert(src.bytes())
    });
    assert_eq!(handle.join().expect("thread"), Outcome::Ok(5));
}

#[test]
fn test_malformed_unused_field_still_builds() {
    // A bare size where a type is expected cannot be laid out, but the target
    // never asks for it.
    let desc = TypeDescriptor::structure(vec![
        hdds_convert::StructField::new("a", 0, PrimitiveKind::Char),
        hdds_convert::StructField::new("b", 4, PrimitiveKind::Int),
        hdds_convert::StructField::new("junk", 8, TypeDescriptor::nat(2)),
    ]);
    let plan = build_plan::<Sample>(&desc).expect("plan");
    assert_eq!(plan.source_size(), None);

    let mut src = Source::with_len(8);
    src.put(0, [b'z']).put(4, 1i32.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Sample { a: 'z', b: 1 });
}

#[derive(Debug, Default, PartialEq, Variant)]
enum Marker {
    #[default]
    Small,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Head {
    a: i32,
}

#[test]
fn test_oversized_unused_constructor_still_builds() {
    // Laying out Huge overflows usize; the target only asks for Small.
    let desc = VariantBuilder::new()
        .unit_ctor("Small")
        .ctor("Huge", TypeDescriptor::array(PrimitiveKind::Byte, usize::MAX as u64))
        .build();
    let plan = build_plan::<Marker>(&desc).expect("plan");
    assert_eq!(plan.source_size(), None);

    let mut src = Source::with_len(4);
    src.tag(0);
    assert_eq!(plan.convert(src.bytes()), Marker::Small);
}

#[test]
fn test_oversized_unused_field_still_builds() {
    let desc = TypeDescriptor::structure(vec![
        hdds_convert::StructField::new("a", 0, PrimitiveKind::Int),
        hdds_convert::StructField::new("far", usize::MAX - 5, PrimitiveKind::Int),
    ]);
    let plan = build_plan::<Head>(&desc).expect("plan");
    assert_eq!(plan.source_size(), None);

    let mut src = Source::with_len(4);
    src.put(0, 77i32.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Head { a: 77 });
}

#[test]
fn test_malformed_array_element_fails() {
    let desc = TypeDescriptor::array(TypeDescriptor::nat(1), 2);
    let err = build_plan::<[i32; 2]>(&desc).unwrap_err();
    assert_eq!(err.kind(), "kind_mismatch");
}

#[test]
#[should_panic(expected = "source buffer does not match its descriptor")]
fn test_truncated_buffer_panics() {
    let plan = build_plan::<Sample>(
        &StructBuilder::new()
            .field("a", PrimitiveKind::Char)
            .field("b", PrimitiveKind::Int)
            .build(),
    )
    .expect("plan");
    let _ = plan.convert(&[b'a', 0, 0]);
}
