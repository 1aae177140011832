// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan construction options.

/// How a tolerated schema difference is reported at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Report {
    /// Say nothing.
    #[default]
    Silent,
    /// Emit a `log::warn!` record.
    Warn,
}

/// Options consulted while building plans.
///
/// Options never make a build stricter: they only control what is reported
/// about tolerated differences between a descriptor and its target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanOptions {
    /// Destination constructors with no same-named source constructor.
    pub unmatched_constructors: Report,
    /// Source struct fields no destination field asks for.
    pub unused_fields: Report,
}

impl PlanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reporting for unmatched destination constructors.
    #[must_use]
    pub fn unmatched_constructors(mut self, report: Report) -> Self {
        self.unmatched_constructors = report;
        self
    }

    /// Set reporting for unused source fields.
    #[must_use]
    pub fn unused_fields(mut self, report: Report) -> Self {
        self.unused_fields = report;
        self
    }

    /// Warn about every tolerated difference.
    pub fn verbose() -> Self {
        Self {
            unmatched_constructors: Report::Warn,
            unused_fields: Report::Warn,
        }
    }
}
