// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 8: post-export solid checks

use nalgebra::Point3;
use std::collections::HashMap;

use super::report::{SolidVerdict, ValidationReport, Warning};
use crate::map::{MapDocument, Solid};

const EPS_CONVEX: f64 = 1e-6;

/// Vertex identity for edge matching. Solids are built from shared base
/// coordinates, so bit equality is exact here; only the zero sign needs
/// canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct VertexKey(u64, u64, u64);

fn vertex_key(p: &Point3<f64>) -> VertexKey {
    fn canon(v: f64) -> u64 {
        if v == 0.0 {
            0.0_f64.to_bits()
        } else {
            v.to_bits()
        }
    }
    VertexKey(canon(p.x), canon(p.y), canon(p.z))
}

/// Run all checks over the exported document, appending verdicts and
/// warnings to the report.
pub fn validate(doc: &MapDocument, report: &mut ValidationReport) {
    for solid in &doc.solids {
        let verdict = check_solid(solid, report);
        report.verdicts.push(verdict);
    }
}

fn check_solid(solid: &Solid, report: &mut ValidationReport) -> SolidVerdict {
    let open_edges = open_edge_count(solid);
    if open_edges > 0 {
        report.warn(Warning::Leak {
            solid_id: solid.id,
            open_edges,
        });
    }

    let centroid = solid.centroid();
    let mut inverted_faces = 0;
    let mut convex = true;
    for (index, face) in solid.faces.iter().enumerate() {
        let outward = face.centroid() - centroid;
        if face.normal().dot(&outward) <= 0.0 {
            inverted_faces += 1;
            report.warn(Warning::InvertedNormal {
                solid_id: solid.id,
                face: index,
            });
        }
        if !face_loop_convex(face) {
            convex = false;
        }
    }
    if !convex {
        report.warn(Warning::NonConvexFace { solid_id: solid.id });
    }

    SolidVerdict {
        solid_id: solid.id,
        watertight: open_edges == 0,
        convex,
        inverted_faces,
    }
}

/// Adjacency check over shared edges: a closed boundary uses every
/// undirected edge exactly twice, once per direction.
fn open_edge_count(solid: &Solid) -> usize {
    // (count, direction balance) per undirected edge
    let mut edges: HashMap<(VertexKey, VertexKey), (u32, i32)> = HashMap::new();
    for face in &solid.faces {
        let n = face.points.len();
        for i in 0..n {
            let a = vertex_key(&face.points[i]);
            let b = vertex_key(&face.points[(i + 1) % n]);
            let (key, dir) = if a <= b { ((a, b), 1) } else { ((b, a), -1) };
            let entry = edges.entry(key).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += dir;
        }
    }
    edges
        .values()
        .filter(|(count, balance)| *count != 2 || *balance != 0)
        .count()
}

/// Face loops are stored clockwise from outside, so consecutive edge cross
/// products must stay opposite the outward normal.
fn face_loop_convex(face: &crate::geometry::Face) -> bool {
    let n = face.points.len();
    if n < 3 {
        return false;
    }
    let normal = face.normal();
    for i in 0..n {
        let p0 = face.points[i];
        let p1 = face.points[(i + 1) % n];
        let p2 = face.points[(i + 2) % n];
        let turn = (p1 - p0).cross(&(p2 - p1)).dot(&normal);
        if turn > EPS_CONVEX {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextureSet;
    use crate::geometry::{Face, FaceRole, Prism};
    use geo_types::Coord;

    fn square_prism() -> Prism {
        Prism {
            footprint_id: "a".into(),
            part_index: 0,
            base: vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 0.0, y: 10.0 },
            ],
            height: 10.0,
        }
    }

    #[test]
    fn test_valid_prism_is_clean() {
        let mut report = ValidationReport::new();
        let solid = Solid::from_prism(0, &square_prism());
        let verdict = check_solid(&solid, &mut report);
        assert!(verdict.watertight);
        assert!(verdict.convex);
        assert_eq!(verdict.inverted_faces, 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_face_leaks() {
        let mut report = ValidationReport::new();
        let mut solid = Solid::from_prism(1, &square_prism());
        solid.faces.pop();
        let verdict = check_solid(&solid, &mut report);
        assert!(!verdict.watertight);
        assert!(matches!(
            report.warnings.first(),
            Some(Warning::Leak { solid_id: 1, open_edges: 4 })
        ));
    }

    #[test]
    fn test_flipped_face_detected() {
        let mut report = ValidationReport::new();
        let mut solid = Solid::from_prism(2, &square_prism());
        solid.faces[1].points.reverse();
        let verdict = check_solid(&solid, &mut report);
        assert_eq!(verdict.inverted_faces, 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::InvertedNormal { solid_id: 2, face: 1 })));
        // Reversing a face also unbalances edge directions
        assert!(!verdict.watertight);
    }

    #[test]
    fn test_non_convex_face_detected() {
        let mut report = ValidationReport::new();
        let mut solid = Solid::from_prism(3, &square_prism());
        // Dent the roof loop into an arrowhead
        solid.faces[1] = Face {
            points: vec![
                nalgebra::Point3::new(0.0, 10.0, 10.0),
                nalgebra::Point3::new(10.0, 10.0, 10.0),
                nalgebra::Point3::new(5.0, 5.0, 10.0),
                nalgebra::Point3::new(10.0, 0.0, 10.0),
                nalgebra::Point3::new(0.0, 0.0, 10.0),
            ],
            role: FaceRole::Roof,
        };
        let verdict = check_solid(&solid, &mut report);
        assert!(!verdict.convex);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::NonConvexFace { solid_id: 3 })));
    }

    #[test]
    fn test_validate_covers_all_solids() {
        let mut doc = MapDocument::new(TextureSet::default());
        doc.push_solid(Solid::from_prism(0, &square_prism()));
        doc.push_solid(Solid::from_prism(1, &square_prism()));
        let mut report = ValidationReport::new();
        validate(&doc, &mut report);
        assert_eq!(report.verdicts.len(), 2);
        assert_eq!(report.dirty_solids(), 0);
    }
}
