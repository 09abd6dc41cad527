// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 4: convex decomposition of simple polygons
//!
//! Recursive diagonal splitting at reflex vertices, followed by a
//! convexity-preserving merge pass that re-joins parts across shared
//! diagonals. Diagonal choice is fully deterministic: minimize the larger
//! part's vertex count, then take the lowest index pair.

use geo_types::Coord;

use crate::utils::math;

/// Non-fatal decomposition failures; the footprint is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecomposeFailure {
    /// The part cap was exceeded (pathological input).
    TooManyParts(usize),
    /// No valid splitting diagonal exists at any reflex vertex.
    NoDiagonal,
}

/// Split a simple CCW ring into convex parts whose union reconstructs it.
///
/// Already-convex input yields exactly one part.
pub fn decompose(
    ring: &[Coord<f64>],
    max_parts: usize,
) -> Result<Vec<Vec<Coord<f64>>>, DecomposeFailure> {
    if math::is_convex_ring(ring) {
        return Ok(vec![ring.to_vec()]);
    }

    let mut done: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut queue: Vec<Vec<Coord<f64>>> = vec![ring.to_vec()];

    while let Some(part) = queue.pop() {
        if math::is_convex_ring(&part) {
            done.push(part);
            continue;
        }
        let (i, j) = best_diagonal(&part).ok_or(DecomposeFailure::NoDiagonal)?;
        let first = slice_ring(&part, i, j);
        let second = slice_ring(&part, j, i);
        queue.push(second);
        queue.push(first);

        if done.len() + queue.len() > max_parts {
            return Err(DecomposeFailure::TooManyParts(max_parts));
        }
    }

    Ok(merge_parts(done))
}

/// Pick the splitting diagonal: a valid diagonal with at least one reflex
/// endpoint, minimizing max(part sizes), tie-broken by lowest index pair.
fn best_diagonal(ring: &[Coord<f64>]) -> Option<(usize, usize)> {
    let n = ring.len();
    let mut best: Option<(usize, usize, usize)> = None; // (cost, i, j)

    for i in reflex_vertices(ring) {
        for step in 2..n - 1 {
            let j = (i + step) % n;
            if !is_diagonal(ring, i, j) {
                continue;
            }
            let len_a = step + 1;
            let len_b = n - step + 1;
            let cost = len_a.max(len_b);
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            let candidate = (cost, lo, hi);
            if best.map_or(true, |b| candidate < b) {
                best = Some(candidate);
            }
        }
    }
    best.map(|(_, lo, hi)| (lo, hi))
}

fn reflex_vertices(ring: &[Coord<f64>]) -> Vec<usize> {
    let n = ring.len();
    (0..n)
        .filter(|&i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            math::cross(prev, ring[i], next) < -math::EPS_CROSS
        })
        .collect()
}

/// The segment i-j is a diagonal when it lies inside the polygon at both
/// endpoints and crosses no edge.
fn is_diagonal(ring: &[Coord<f64>], i: usize, j: usize) -> bool {
    in_cone(ring, i, j) && in_cone(ring, j, i) && no_edge_crossing(ring, i, j)
}

/// Interior cone test at vertex i toward vertex j.
fn in_cone(ring: &[Coord<f64>], i: usize, j: usize) -> bool {
    let n = ring.len();
    let a0 = ring[(i + n - 1) % n];
    let a = ring[i];
    let a1 = ring[(i + 1) % n];
    let b = ring[j];

    if math::left_on(a, a1, a0) {
        // Convex vertex: b must be strictly inside the wedge a0-a-a1.
        math::left(a, b, a0) && math::left(b, a, a1)
    } else {
        // Reflex vertex: anywhere except the exterior wedge.
        !(math::left_on(a, b, a1) && math::left_on(b, a, a0))
    }
}

fn no_edge_crossing(ring: &[Coord<f64>], i: usize, j: usize) -> bool {
    let n = ring.len();
    for k in 0..n {
        let k1 = (k + 1) % n;
        if k == i || k == j || k1 == i || k1 == j {
            continue;
        }
        if math::segments_intersect(ring[i], ring[j], ring[k], ring[k1]) {
            return false;
        }
    }
    true
}

/// Ring vertices from index `from` to `to`, inclusive, wrapping.
fn slice_ring(ring: &[Coord<f64>], from: usize, to: usize) -> Vec<Coord<f64>> {
    let n = ring.len();
    let mut out = Vec::new();
    let mut k = from;
    loop {
        out.push(ring[k]);
        if k == to {
            break;
        }
        k = (k + 1) % n;
    }
    out
}

/// Greedy convexity-preserving merge across shared diagonals, Hertel-Mehlhorn
/// style. Scan order is fixed, so the result is deterministic.
fn merge_parts(mut parts: Vec<Vec<Coord<f64>>>) -> Vec<Vec<Coord<f64>>> {
    loop {
        let mut merged = None;
        'scan: for i in 0..parts.len() {
            for j in (i + 1)..parts.len() {
                if let Some(m) = try_merge(&parts[i], &parts[j]) {
                    merged = Some((i, j, m));
                    break 'scan;
                }
            }
        }
        match merged {
            Some((i, j, m)) => {
                parts[i] = m;
                parts.remove(j);
            }
            None => break,
        }
    }
    parts
}

/// Merge two CCW parts sharing an edge when the union remains convex.
fn try_merge(a: &[Coord<f64>], b: &[Coord<f64>]) -> Option<Vec<Coord<f64>>> {
    let na = a.len();
    let nb = b.len();
    for ia in 0..na {
        let u = a[ia];
        let v = a[(ia + 1) % na];
        for ib in 0..nb {
            // Shared diagonals run in opposite directions in the two parts.
            if b[ib] != v || b[(ib + 1) % nb] != u {
                continue;
            }
            let mut m = Vec::with_capacity(na + nb - 2);
            // All of a, starting just past the shared edge: v .. u.
            for k in 0..na {
                m.push(a[(ia + 1 + k) % na]);
            }
            // Interior of b between u and v.
            let mut k = (ib + 2) % nb;
            while k != ib {
                m.push(b[k]);
                k = (k + 1) % nb;
            }
            if m.len() >= 3 && math::is_convex_ring(&m) {
                return Some(m);
            }
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn ell() -> Vec<Coord<f64>> {
        vec![
            c(0.0, 0.0),
            c(4.0, 0.0),
            c(4.0, 2.0),
            c(2.0, 2.0),
            c(2.0, 4.0),
            c(0.0, 4.0),
        ]
    }

    fn total_area(parts: &[Vec<Coord<f64>>]) -> f64 {
        parts.iter().map(|p| math::signed_area(p)).sum()
    }

    #[test]
    fn test_convex_input_is_one_part() {
        let square = vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0), c(0.0, 4.0)];
        let parts = decompose(&square, 64).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], square);
    }

    #[test]
    fn test_ell_splits_into_two_parts() {
        let parts = decompose(&ell(), 64).unwrap();
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert!(math::is_convex_ring(part));
        }
        assert!((total_area(&parts) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_decomposition_is_deterministic() {
        let a = decompose(&ell(), 64).unwrap();
        let b = decompose(&ell(), 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_u_shape_area_preserved() {
        let u = vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 6.0),
            c(6.0, 6.0),
            c(6.0, 2.0),
            c(4.0, 2.0),
            c(4.0, 6.0),
            c(0.0, 6.0),
        ];
        let input_area = math::signed_area(&u);
        let parts = decompose(&u, 64).unwrap();
        assert!(parts.len() >= 2);
        for part in &parts {
            assert!(math::is_convex_ring(part), "part not convex: {part:?}");
            assert!(math::signed_area(part) > 0.0);
        }
        assert!((total_area(&parts) - input_area).abs() < 1e-9);
    }

    #[test]
    fn test_staircase_many_reflex() {
        let stairs = vec![
            c(0.0, 0.0),
            c(8.0, 0.0),
            c(8.0, 8.0),
            c(6.0, 8.0),
            c(6.0, 4.0),
            c(4.0, 4.0),
            c(4.0, 6.0),
            c(2.0, 6.0),
            c(2.0, 2.0),
            c(0.0, 2.0),
        ];
        let input_area = math::signed_area(&stairs);
        let parts = decompose(&stairs, 64).unwrap();
        for part in &parts {
            assert!(math::is_convex_ring(part));
        }
        assert!((total_area(&parts) - input_area).abs() < 1e-9);
    }

    #[test]
    fn test_part_cap_is_enforced() {
        assert_eq!(
            decompose(&ell(), 1),
            Err(DecomposeFailure::TooManyParts(1))
        );
    }

    #[test]
    fn test_merge_restores_split_square() {
        // Two triangles sharing a diagonal merge back into the square.
        let t1 = vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)];
        let t2 = vec![c(0.0, 0.0), c(4.0, 4.0), c(0.0, 4.0)];
        let merged = merge_parts(vec![t1, t2]);
        assert_eq!(merged.len(), 1);
        assert!((math::signed_area(&merged[0]) - 16.0).abs() < 1e-9);
        assert!(math::is_convex_ring(&merged[0]));
    }
}
