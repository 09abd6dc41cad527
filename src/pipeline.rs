// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Pipeline orchestration
//!
//! Stages 1-6 run per footprint on the rayon pool; the export merge is a
//! single sequential pass in input order, so solid ids and output bytes are
//! independent of the parallelism degree.

use geo_types::Rect;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

use crate::bbox::BoundingBox;
use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::geometry::{
    clean_polygon, cull_reason, decompose, extrude, simplify_ring, snap_prism, ConvexPart,
    CoordinateTransformer, DecomposeFailure, Footprint, Prism,
};
use crate::map::{MapDocument, Solid};
use crate::validation::{validate, ValidationReport, Warning};

/// The two artifacts of a run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub document: MapDocument,
    pub report: ValidationReport,
}

/// Atomic check-and-increment counter backing a global cap.
struct CapCounter {
    limit: usize,
    used: AtomicUsize,
}

impl CapCounter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Reserve `n` slots; false when the cap would be exceeded.
    fn try_acquire(&self, n: usize) -> bool {
        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            if current + n > self.limit {
                return false;
            }
            match self.used.compare_exchange(
                current,
                current + n,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }
}

struct FootprintOutcome {
    prisms: Vec<Prism>,
    warnings: Vec<Warning>,
}

/// Run the full pipeline over the footprint list.
///
/// Returns a complete document plus report, or a fatal input error before
/// any processing. In strict mode validator violations also fail the run.
pub fn generate(
    footprints: &[Footprint],
    bounds: &BoundingBox,
    config: &MapConfig,
) -> Result<PipelineOutput> {
    config.validate()?;
    let transformer = CoordinateTransformer::new(bounds, config.scale, config.world_limit)?;
    let clip = transformer.clip_rect(bounds);

    let mut report = ValidationReport::new();

    let accepted = footprints.len().min(config.max_buildings);
    if footprints.len() > accepted {
        warn!(
            limit = config.max_buildings,
            submitted = footprints.len(),
            "building cap reached"
        );
        report.warn(Warning::BuildingCapReached {
            limit: config.max_buildings,
            skipped: footprints.len() - accepted,
        });
    }

    // Stages 1-6, embarrassingly parallel; collect() preserves input order.
    let outcomes: Vec<FootprintOutcome> = footprints[..accepted]
        .par_iter()
        .map(|fp| process_footprint(fp, &transformer, &clip, config))
        .collect();

    let total_prisms: usize = outcomes.iter().map(|o| o.prisms.len()).sum();
    let brush_cap = CapCounter::new(config.max_brushes);
    let face_cap = CapCounter::new(config.max_faces);

    let mut doc = MapDocument::new(config.textures.clone());
    let mut next_id: u32 = 0;
    let mut capped_by_faces = false;
    let mut stopped = false;

    for outcome in outcomes {
        let mut emitted_any = false;
        if !stopped {
            for prism in &outcome.prisms {
                if !brush_cap.try_acquire(1) {
                    stopped = true;
                    break;
                }
                if !face_cap.try_acquire(prism.face_count()) {
                    capped_by_faces = true;
                    stopped = true;
                    break;
                }
                doc.push_solid(Solid::from_prism(next_id, prism));
                next_id += 1;
                emitted_any = true;
            }
        }
        for warning in outcome.warnings {
            report.warn(warning);
        }
        if emitted_any {
            report.counts.buildings_processed += 1;
        } else {
            report.counts.buildings_skipped += 1;
        }
    }
    report.counts.buildings_skipped += footprints.len() - accepted;

    if stopped {
        let skipped = total_prisms - doc.solid_count();
        if capped_by_faces {
            warn!(limit = config.max_faces, skipped, "face cap reached");
            report.warn(Warning::FaceCapReached {
                limit: config.max_faces,
            });
        } else {
            warn!(limit = config.max_brushes, skipped, "brush cap reached");
            report.warn(Warning::BrushCapReached {
                limit: config.max_brushes,
                skipped,
            });
        }
    }

    report.counts.brushes_emitted = doc.solid_count();
    report.counts.faces_emitted = doc.face_count();

    validate(&doc, &mut report);

    if config.strict_validation && report.has_violations() {
        return Err(Error::StrictValidation {
            violations: report.violation_count(),
            solids: report.dirty_solids(),
        });
    }

    Ok(PipelineOutput {
        document: doc,
        report,
    })
}

/// Stages 1-6 for one footprint: transform, clean, simplify, decompose,
/// extrude, snap and cull.
fn process_footprint(
    footprint: &Footprint,
    transformer: &CoordinateTransformer,
    clip: &Rect<f64>,
    config: &MapConfig,
) -> FootprintOutcome {
    let mut warnings = Vec::new();

    let (projected, clamped) = transformer.transform(footprint);
    if clamped {
        warnings.push(Warning::ExtentClamped {
            id: footprint.id.clone(),
        });
    }

    let (pieces, mut clean_warnings) =
        clean_polygon(&projected, clip, config.min_area_units());
    warnings.append(&mut clean_warnings);

    let height_units = footprint.height_or(config.default_height) * config.scale;
    let tolerance = config.simplify_tolerance_units();

    let mut prisms = Vec::new();
    let mut part_index = 0usize;
    for piece in pieces {
        let ring = simplify_ring(&piece.ring, tolerance);
        let parts = match decompose(&ring, config.max_parts) {
            Ok(parts) => parts,
            Err(DecomposeFailure::TooManyParts(parts)) => {
                warnings.push(Warning::DecompositionOverflow {
                    id: footprint.id.clone(),
                    parts,
                });
                continue;
            }
            Err(DecomposeFailure::NoDiagonal) => {
                warnings.push(Warning::RingRepairFailed {
                    id: footprint.id.clone(),
                    reason: "no valid split diagonal".into(),
                });
                continue;
            }
        };
        for part_ring in parts {
            let part = ConvexPart::new(footprint.id.clone(), part_index, part_ring);
            part_index += 1;
            let prism = extrude(&part, height_units);
            let Some(snapped) = snap_prism(&prism, config.grid_size) else {
                warnings.push(Warning::MicroBrushDropped {
                    id: footprint.id.clone(),
                    part: part.index,
                });
                continue;
            };
            if cull_reason(&snapped, config.min_brush_area, config.min_brush_height).is_some() {
                warnings.push(Warning::MicroBrushDropped {
                    id: footprint.id.clone(),
                    part: part.index,
                });
                continue;
            }
            prisms.push(snapped);
        }
    }

    debug!(
        id = %footprint.id,
        prisms = prisms.len(),
        warnings = warnings.len(),
        "footprint processed"
    );
    FootprintOutcome { prisms, warnings }
}
