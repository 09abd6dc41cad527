// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 2: clipping, ring repair, sliver removal, winding normalization

use geo::{Area, BooleanOps};
use geo_types::{Coord, LineString, Polygon, Rect};

use super::footprint::ProjectedPolygon;
use crate::utils::math;
use crate::validation::report::Warning;

/// Points closer than this are treated as coincident (engine units).
const EPS_POINT: f64 = 1e-6;

/// Clip a projected footprint to the bounding rectangle and repair it into
/// zero or more simple, closed, CCW polygons above the area threshold.
pub fn clean_polygon(
    poly: &ProjectedPolygon,
    clip: &Rect<f64>,
    min_area_units: f64,
) -> (Vec<ProjectedPolygon>, Vec<Warning>) {
    let mut warnings = Vec::new();

    let Some(ring) = repair_ring(&poly.ring) else {
        warnings.push(Warning::RingRepairFailed {
            id: poly.id.clone(),
            reason: "fewer than 3 distinct points".into(),
        });
        return (Vec::new(), warnings);
    };

    if !math::is_simple_ring(&ring) {
        warnings.push(Warning::RingRepairFailed {
            id: poly.id.clone(),
            reason: "self-intersecting ring".into(),
        });
        return (Vec::new(), warnings);
    }

    let pieces = if ring_inside_rect(&ring, clip) {
        vec![ring]
    } else {
        clip_ring(&ring, clip, &poly.id, &mut warnings)
    };

    let mut cleaned = Vec::new();
    for piece in pieces {
        // Clipping can introduce duplicate or collinear points on the
        // rectangle boundary.
        let Some(piece) = repair_ring(&piece) else {
            continue;
        };
        let area = math::signed_area(&piece);
        if area.abs() < min_area_units {
            warnings.push(Warning::SliverDropped {
                id: poly.id.clone(),
                area_units: area.abs(),
            });
            continue;
        }
        let ring = if area < 0.0 {
            piece.into_iter().rev().collect()
        } else {
            piece
        };
        cleaned.push(ProjectedPolygon {
            id: poly.id.clone(),
            ring,
            height: poly.height,
        });
    }
    (cleaned, warnings)
}

/// Collapse coincident points, remove collinear vertices and zero-width
/// spikes, and drop the explicit closing point. Returns None when fewer than
/// 3 distinct points remain.
pub fn repair_ring(ring: &[Coord<f64>]) -> Option<Vec<Coord<f64>>> {
    let mut pts: Vec<Coord<f64>> = ring.to_vec();

    // Drop the explicit closing duplicate if the ring arrives closed.
    while pts.len() > 1 && coincident(pts[0], *pts.last().unwrap()) {
        pts.pop();
    }

    loop {
        let before = pts.len();
        pts = collapse_duplicates(&pts);
        pts = remove_straight_vertices(&pts);
        if pts.len() == before {
            break;
        }
    }

    if pts.len() < 3 || math::signed_area(&pts).abs() < math::EPS_AREA {
        None
    } else {
        Some(pts)
    }
}

fn coincident(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() < EPS_POINT && (a.y - b.y).abs() < EPS_POINT
}

fn collapse_duplicates(pts: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last().is_some_and(|&q| coincident(p, q)) {
            continue;
        }
        out.push(p);
    }
    while out.len() > 1 && coincident(out[0], *out.last().unwrap()) {
        out.pop();
    }
    out
}

/// Remove vertices whose adjacent edges are collinear. This also erases
/// zero-width spikes (out-and-back vertices), whose tips are collinear with
/// both neighbors.
fn remove_straight_vertices(pts: &[Coord<f64>]) -> Vec<Coord<f64>> {
    if pts.len() < 3 {
        return pts.to_vec();
    }
    let n = pts.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let next = pts[(i + 1) % n];
        if math::collinear(prev, pts[i], next) {
            continue;
        }
        out.push(pts[i]);
    }
    out
}

fn ring_inside_rect(ring: &[Coord<f64>], rect: &Rect<f64>) -> bool {
    ring.iter().all(|c| {
        c.x >= rect.min().x && c.x <= rect.max().x && c.y >= rect.min().y && c.y <= rect.max().y
    })
}

fn clip_ring(
    ring: &[Coord<f64>],
    rect: &Rect<f64>,
    id: &str,
    warnings: &mut Vec<Warning>,
) -> Vec<Vec<Coord<f64>>> {
    let subject = Polygon::new(LineString::from(ring.to_vec()), Vec::new());
    let clipped = subject.intersection(&rect.to_polygon());

    let mut pieces = Vec::new();
    for piece in clipped {
        if !piece.interiors().is_empty() {
            warnings.push(Warning::HolesUnsupported { id: id.to_string() });
            continue;
        }
        if piece.unsigned_area() < math::EPS_AREA {
            continue;
        }
        let mut coords = piece.exterior().0.clone();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        pieces.push(coords);
    }
    pieces
}
