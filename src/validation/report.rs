// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Run report types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal conditions collected over a run.
///
/// Everything here degrades the output rather than aborting it; strict mode
/// re-checks the invariant-violation subset at the end of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A footprint vertex exceeded the world limit and was clamped.
    ExtentClamped { id: String },
    /// A ring could not be repaired into a simple polygon.
    RingRepairFailed { id: String, reason: String },
    /// A ring's area fell below the configured minimum.
    SliverDropped { id: String, area_units: f64 },
    /// A clipped piece carried interior rings; holes are unsupported.
    HolesUnsupported { id: String },
    /// Decomposition exceeded the configured part cap.
    DecompositionOverflow { id: String, parts: usize },
    /// A snapped prism fell below the micro-brush thresholds.
    MicroBrushDropped { id: String, part: usize },
    /// More footprints were submitted than `max_buildings`.
    BuildingCapReached { limit: usize, skipped: usize },
    /// The brush cap cut off remaining prisms.
    BrushCapReached { limit: usize, skipped: usize },
    /// The face cap cut off remaining prisms.
    FaceCapReached { limit: usize },
    /// A face loop was not convex after snapping.
    NonConvexFace { solid_id: u32 },
    /// A face normal pointed toward the solid interior.
    InvertedNormal { solid_id: u32, face: usize },
    /// A solid's boundary had open or over-shared edges.
    Leak { solid_id: u32, open_edges: usize },
}

impl Warning {
    /// Export invariant violations are the class strict mode promotes to a
    /// run failure.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Warning::NonConvexFace { .. } | Warning::InvertedNormal { .. } | Warning::Leak { .. }
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ExtentClamped { id } => {
                write!(f, "footprint {id}: extent clamped to world limit")
            }
            Warning::RingRepairFailed { id, reason } => {
                write!(f, "footprint {id}: ring repair failed ({reason})")
            }
            Warning::SliverDropped { id, area_units } => {
                write!(f, "footprint {id}: sliver dropped ({area_units:.2} units²)")
            }
            Warning::HolesUnsupported { id } => {
                write!(f, "footprint {id}: polygon with holes skipped")
            }
            Warning::DecompositionOverflow { id, parts } => {
                write!(f, "footprint {id}: decomposition exceeded {parts} parts")
            }
            Warning::MicroBrushDropped { id, part } => {
                write!(f, "footprint {id}: part {part} dropped as micro-brush")
            }
            Warning::BuildingCapReached { limit, skipped } => {
                write!(f, "building cap {limit} reached, {skipped} skipped")
            }
            Warning::BrushCapReached { limit, skipped } => {
                write!(f, "brush cap {limit} reached, {skipped} skipped")
            }
            Warning::FaceCapReached { limit } => write!(f, "face cap {limit} reached"),
            Warning::NonConvexFace { solid_id } => {
                write!(f, "solid {solid_id}: non-convex face loop")
            }
            Warning::InvertedNormal { solid_id, face } => {
                write!(f, "solid {solid_id}: face {face} normal inverted")
            }
            Warning::Leak { solid_id, open_edges } => {
                write!(f, "solid {solid_id}: leak, {open_edges} open edge(s)")
            }
        }
    }
}

/// Aggregate counters of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Footprints that yielded at least one solid.
    pub buildings_processed: usize,
    /// Footprints that yielded nothing: dropped, failed, or capped.
    pub buildings_skipped: usize,
    pub brushes_emitted: usize,
    pub faces_emitted: usize,
}

/// Watertightness/convexity verdict for one solid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidVerdict {
    pub solid_id: u32,
    pub watertight: bool,
    pub convex: bool,
    pub inverted_faces: usize,
}

impl SolidVerdict {
    pub fn is_clean(&self) -> bool {
        self.watertight && self.convex && self.inverted_faces == 0
    }
}

/// Complete validation report for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub counts: Counts,
    pub warnings: Vec<Warning>,
    pub verdicts: Vec<SolidVerdict>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn violation_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.is_invariant_violation())
            .count()
    }

    pub fn has_violations(&self) -> bool {
        self.warnings.iter().any(|w| w.is_invariant_violation())
    }

    /// Solids with at least one failed check.
    pub fn dirty_solids(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.is_clean()).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_classification() {
        let mut report = ValidationReport::new();
        report.warn(Warning::SliverDropped {
            id: "a".into(),
            area_units: 0.5,
        });
        assert!(!report.has_violations());

        report.warn(Warning::Leak {
            solid_id: 3,
            open_edges: 2,
        });
        assert!(report.has_violations());
        assert_eq!(report.violation_count(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ValidationReport::new();
        report.counts.brushes_emitted = 2;
        report.verdicts.push(SolidVerdict {
            solid_id: 0,
            watertight: true,
            convex: true,
            inverted_faces: 0,
        });
        let json = report.to_json().unwrap();
        assert!(json.contains("brushes_emitted"));
        assert!(json.contains("watertight"));
    }
}
