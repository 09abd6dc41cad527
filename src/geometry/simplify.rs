// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 3: topology-preserving Douglas-Peucker ring simplification

use geo_types::Coord;

use crate::utils::math;

/// Simplify an open CCW ring with the given tolerance (engine units).
///
/// Tolerance 0 is the identity. The result always keeps at least 3 vertices
/// and stays simple: when a pass would introduce a self-intersection the
/// tolerance is halved and the pass retried, falling back to the input ring.
pub fn simplify_ring(ring: &[Coord<f64>], tolerance: f64) -> Vec<Coord<f64>> {
    if tolerance <= 0.0 || ring.len() <= 3 {
        return ring.to_vec();
    }

    let mut tol = tolerance;
    for _ in 0..4 {
        let out = simplify_pass(ring, tol);
        if out.len() >= 3 && math::is_simple_ring(&out) {
            return out;
        }
        tol /= 2.0;
    }
    ring.to_vec()
}

/// One Douglas-Peucker pass over the closed ring, split into two chains at
/// vertex 0 and the vertex farthest from it.
fn simplify_pass(ring: &[Coord<f64>], tolerance: f64) -> Vec<Coord<f64>> {
    let n = ring.len();
    let anchor = 0usize;
    let far = farthest_from(ring, anchor);
    if far == anchor {
        return ring.to_vec();
    }

    let mut keep = vec![false; n];
    keep[anchor] = true;
    keep[far] = true;

    let tol_sq = tolerance * tolerance;
    let chain_a: Vec<usize> = (anchor..=far).collect();
    let chain_b: Vec<usize> = (far..n).chain(0..=anchor).collect();
    mark_chain(ring, &chain_a, tol_sq, &mut keep);
    mark_chain(ring, &chain_b, tol_sq, &mut keep);

    // A ring never shrinks below a triangle: restore the most significant
    // dropped vertex when both chains collapsed to their endpoints.
    if keep.iter().filter(|k| **k).count() < 3 {
        let a = ring[anchor];
        let b = ring[far];
        let rescue = (0..n)
            .filter(|i| !keep[*i])
            .max_by(|&i, &j| {
                let di = math::dist_sq_point_segment(ring[i], a, b);
                let dj = math::dist_sq_point_segment(ring[j], a, b);
                di.partial_cmp(&dj).unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(i) = rescue {
            keep[i] = true;
        }
    }

    (0..n).filter(|&i| keep[i]).map(|i| ring[i]).collect()
}

fn farthest_from(ring: &[Coord<f64>], anchor: usize) -> usize {
    let a = ring[anchor];
    let mut best = anchor;
    let mut best_d = 0.0;
    for (i, c) in ring.iter().enumerate() {
        let dx = c.x - a.x;
        let dy = c.y - a.y;
        let d = dx * dx + dy * dy;
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Classic recursive Douglas-Peucker over a chain of ring indices whose
/// endpoints are already kept.
fn mark_chain(ring: &[Coord<f64>], chain: &[usize], tol_sq: f64, keep: &mut [bool]) {
    if chain.len() <= 2 {
        return;
    }
    let a = ring[chain[0]];
    let b = ring[*chain.last().unwrap()];
    let mut split = 0;
    let mut split_d = 0.0;
    for (k, &i) in chain.iter().enumerate().skip(1).take(chain.len() - 2) {
        let d = math::dist_sq_point_segment(ring[i], a, b);
        if d > split_d {
            split_d = d;
            split = k;
        }
    }
    if split_d > tol_sq {
        keep[chain[split]] = true;
        mark_chain(ring, &chain[..=split], tol_sq, keep);
        mark_chain(ring, &chain[split..], tol_sq, keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_zero_tolerance_is_identity() {
        let ring = vec![
            c(0.0, 0.0),
            c(5.0, 0.2),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
        ];
        assert_eq!(simplify_ring(&ring, 0.0), ring);
    }

    #[test]
    fn test_removes_small_deviation() {
        let ring = vec![
            c(0.0, 0.0),
            c(5.0, 0.2), // within tolerance of the bottom edge
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
        ];
        let out = simplify_ring(&ring, 0.5);
        assert_eq!(out.len(), 4);
        assert!(!out.contains(&c(5.0, 0.2)));
    }

    #[test]
    fn test_keeps_significant_deviation() {
        let ring = vec![
            c(0.0, 0.0),
            c(5.0, 3.0), // well outside tolerance
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
        ];
        let out = simplify_ring(&ring, 0.5);
        assert!(out.contains(&c(5.0, 3.0)));
    }

    #[test]
    fn test_never_below_triangle() {
        let ring = vec![c(0.0, 0.0), c(10.0, 0.1), c(20.0, 0.0), c(10.0, 0.2)];
        let out = simplify_ring(&ring, 50.0);
        assert!(out.len() >= 3);
    }

    #[test]
    fn test_output_stays_simple() {
        // Aggressive tolerances must not produce self-intersections.
        let ring = vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 6.0),
            c(6.0, 6.0),
            c(6.0, 2.0),
            c(4.0, 2.0),
            c(4.0, 6.0),
            c(0.0, 6.0),
        ];
        for tol in [0.5, 1.0, 2.0, 4.0, 8.0] {
            let out = simplify_ring(&ring, tol);
            assert!(out.len() >= 3);
            assert!(math::is_simple_ring(&out), "tolerance {tol}");
        }
    }
}
