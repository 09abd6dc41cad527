// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 6: grid snapping and micro-brush culling

use geo_types::Coord;

use super::extrude::Prism;
use crate::geometry::cleaner::repair_ring;

/// Snap a value to the nearest grid multiple. Idempotent; grid 0 disables.
pub fn snap_value(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    (v / grid).round() * grid
}

/// Snap a prism's base ring and height to the grid, then merge coincident
/// points and degenerate edges. Returns None when the base collapses below a
/// triangle.
pub fn snap_prism(prism: &Prism, grid: f64) -> Option<Prism> {
    let snapped: Vec<Coord<f64>> = prism
        .base
        .iter()
        .map(|c| Coord {
            x: snap_value(c.x, grid),
            y: snap_value(c.y, grid),
        })
        .collect();

    // Snapping can collapse edges or leave collinear runs; repair exactly as
    // the cleaner does.
    let base = repair_ring(&snapped)?;
    let height = snap_value(prism.height, grid);
    if height <= 0.0 {
        return None;
    }
    Some(Prism {
        footprint_id: prism.footprint_id.clone(),
        part_index: prism.part_index,
        base,
        height,
    })
}

/// Why a prism was culled after snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullReason {
    BaseArea,
    Height,
}

/// Micro-brush test against the post-snap thresholds.
pub fn cull_reason(prism: &Prism, min_area: f64, min_height: f64) -> Option<CullReason> {
    if prism.base_area() < min_area {
        return Some(CullReason::BaseArea);
    }
    if prism.height < min_height {
        return Some(CullReason::Height);
    }
    None
}
