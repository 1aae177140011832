// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Descriptors and plan options loaded from JSON manifests.

#![cfg(feature = "serde")]

mod common;

use common::Source;
use hdds_convert::{Planner, PlanOptions, Record, Report, TypeDescriptor};

#[derive(Debug, Default, PartialEq, Record)]
struct Point {
    x: i64,
    y: i64,
}

const POINT_MANIFEST: &str = r#"{
    "struct": {
        "fields": [
            { "name": "y", "offset": 0, "ty": { "primitive": { "name": "short" } } },
            { "name": "x", "offset": 4, "ty": { "primitive": { "name": "int" } } },
            { "name": "history", "offset": 8,
              "ty": { "fixed_array": { "element": { "primitive": { "name": "int" } },
                                       "length": { "nat": 2 } } } }
        ]
    }
}"#;

#[test]
fn test_descriptor_from_manifest() {
    let desc: TypeDescriptor = serde_json::from_str(POINT_MANIFEST).expect("parse descriptor");
    assert_eq!(
        desc.to_string(),
        "{y:short@0, x:int@4, history:[int:2]@8}"
    );

    let options: PlanOptions =
        serde_json::from_str(r#"{"unused_fields":"warn"}"#).expect("parse options");
    assert_eq!(options.unused_fields, Report::Warn);

    let plan = Planner::new(options).build::<Point>(&desc).expect("plan");
    let mut src = Source::for_descriptor(&desc);
    src.put(0, (-4i16).to_ne_bytes()).put(4, 1_000_000i32.to_ne_bytes());
    assert_eq!(plan.convert(src.bytes()), Point { x: 1_000_000, y: -4 });
}

#[test]
fn test_descriptor_manifest_round_trip() {
    let desc: TypeDescriptor = serde_json::from_str(POINT_MANIFEST).expect("parse descriptor");
    let text = serde_json::to_string(&desc).expect("serialize");
    let back: TypeDescriptor = serde_json::from_str(&text).expect("reparse");
    assert_eq!(back, desc);
}
