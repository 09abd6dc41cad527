// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! 2D math predicates shared by the polygon stages

use geo_types::Coord;

/// Tolerance for cross-product sign tests on engine-unit coordinates.
pub const EPS_CROSS: f64 = 1e-9;

/// Tolerance for area comparisons in engine units squared.
pub const EPS_AREA: f64 = 1e-6;

/// Cross product of (a - o) and (b - o).
///
/// Positive when o→a→b turns left (counter-clockwise).
pub fn cross(o: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// True when c lies strictly left of the directed line a→b.
pub fn left(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    cross(a, b, c) > EPS_CROSS
}

/// True when c lies left of or on the directed line a→b.
pub fn left_on(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    cross(a, b, c) > -EPS_CROSS
}

/// True when c is collinear with a→b within tolerance.
pub fn collinear(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    cross(a, b, c).abs() <= EPS_CROSS
}

/// True when c lies on the closed segment a-b (collinearity assumed checked).
fn between(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    if (a.x - b.x).abs() > (a.y - b.y).abs() {
        (a.x <= c.x && c.x <= b.x) || (b.x <= c.x && c.x <= a.x)
    } else {
        (a.y <= c.y && c.y <= b.y) || (b.y <= c.y && c.y <= a.y)
    }
}

/// Proper intersection: segments a-b and c-d cross at a point interior to both.
pub fn segments_properly_intersect(
    a: Coord<f64>,
    b: Coord<f64>,
    c: Coord<f64>,
    d: Coord<f64>,
) -> bool {
    if collinear(a, b, c) || collinear(a, b, d) || collinear(c, d, a) || collinear(c, d, b) {
        return false;
    }
    (left(a, b, c) != left(a, b, d)) && (left(c, d, a) != left(c, d, b))
}

/// Intersection including improper cases (shared endpoints, collinear overlap).
pub fn segments_intersect(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, d: Coord<f64>) -> bool {
    if segments_properly_intersect(a, b, c, d) {
        return true;
    }
    (collinear(a, b, c) && between(a, b, c))
        || (collinear(a, b, d) && between(a, b, d))
        || (collinear(c, d, a) && between(c, d, a))
        || (collinear(c, d, b) && between(c, d, b))
}

/// Signed area of an open ring (last point implicitly connects to the first).
///
/// Positive for counter-clockwise winding.
pub fn signed_area(ring: &[Coord<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Area centroid of an open ring.
pub fn ring_centroid(ring: &[Coord<f64>]) -> Coord<f64> {
    let area = signed_area(ring);
    if area.abs() < EPS_AREA {
        // Degenerate ring: fall back to the vertex mean.
        let n = ring.len().max(1) as f64;
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        return Coord { x: sx / n, y: sy / n };
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Coord {
        x: cx / (6.0 * area),
        y: cy / (6.0 * area),
    }
}

/// Squared distance from point p to the segment a-b.
pub fn dist_sq_point_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        let px = p.x - a.x;
        let py = p.y - a.y;
        return px * px + py * py;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let qx = a.x + t * dx - p.x;
    let qy = a.y + t * dy - p.y;
    qx * qx + qy * qy
}

/// True when no two non-adjacent edges of the open ring intersect.
pub fn is_simple_ring(ring: &[Coord<f64>]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip edges sharing a vertex with edge i.
            if (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let c = ring[j];
            let d = ring[(j + 1) % n];
            if segments_intersect(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

/// True when the open CCW ring is convex (collinear runs allowed).
pub fn is_convex_ring(ring: &[Coord<f64>]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        if cross(prev, cur, next) < -EPS_CROSS {
            return false;
        }
    }
    true
}
