// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Stage 5: extrusion of convex parts into right prisms

use geo_types::Coord;
use nalgebra::{Point3, Vector3};

use super::footprint::ConvexPart;
use crate::utils::math;

/// Face role, used for texture preset selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRole {
    Wall,
    Roof,
    Floor,
}

/// One planar face of a prism.
///
/// Points are stored clockwise as seen from outside the solid, so the plane
/// normal `(p0 - p1) × (p2 - p1)` over the first three points faces outward.
#[derive(Debug, Clone)]
pub struct Face {
    pub points: Vec<Point3<f64>>,
    pub role: FaceRole,
}

impl Face {
    /// The three points that define this face's plane.
    pub fn plane_points(&self) -> [Point3<f64>; 3] {
        [self.points[0], self.points[1], self.points[2]]
    }

    /// Outward normal via the winding rule, not normalized.
    pub fn normal(&self) -> Vector3<f64> {
        let [p0, p1, p2] = self.plane_points();
        (p0 - p1).cross(&(p2 - p1))
    }

    /// Vertex mean; sufficient for side-of-plane tests on convex solids.
    pub fn centroid(&self) -> Point3<f64> {
        let n = self.points.len() as f64;
        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / n)
    }
}

/// A convex part lifted to a flat-roofed right prism.
#[derive(Debug, Clone)]
pub struct Prism {
    pub footprint_id: String,
    pub part_index: usize,
    /// CCW base ring at z = 0, engine units.
    pub base: Vec<Coord<f64>>,
    /// Extrusion height in engine units.
    pub height: f64,
}

impl Prism {
    /// Faces in fixed order: floor, roof, then one wall per base edge.
    pub fn faces(&self) -> Vec<Face> {
        let n = self.base.len();
        let h = self.height;
        let mut faces = Vec::with_capacity(n + 2);

        // The CCW base ring seen from below is already clockwise.
        faces.push(Face {
            points: self.base.iter().map(|c| Point3::new(c.x, c.y, 0.0)).collect(),
            role: FaceRole::Floor,
        });
        faces.push(Face {
            points: self
                .base
                .iter()
                .rev()
                .map(|c| Point3::new(c.x, c.y, h))
                .collect(),
            role: FaceRole::Roof,
        });
        for i in 0..n {
            let a = self.base[i];
            let b = self.base[(i + 1) % n];
            faces.push(Face {
                points: vec![
                    Point3::new(a.x, a.y, h),
                    Point3::new(b.x, b.y, h),
                    Point3::new(b.x, b.y, 0.0),
                    Point3::new(a.x, a.y, 0.0),
                ],
                role: FaceRole::Wall,
            });
        }
        faces
    }

    pub fn face_count(&self) -> usize {
        self.base.len() + 2
    }

    pub fn base_area(&self) -> f64 {
        math::signed_area(&self.base)
    }

    pub fn centroid(&self) -> Point3<f64> {
        let c = math::ring_centroid(&self.base);
        Point3::new(c.x, c.y, self.height / 2.0)
    }
}

/// Lift a convex part to the given height (engine units).
pub fn extrude(part: &ConvexPart, height: f64) -> Prism {
    Prism {
        footprint_id: part.footprint_id.clone(),
        part_index: part.index,
        base: part.ring.clone(),
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

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
    fn test_face_count_and_roles() {
        let faces = square_prism().faces();
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[0].role, FaceRole::Floor);
        assert_eq!(faces[1].role, FaceRole::Roof);
        assert!(faces[2..].iter().all(|f| f.role == FaceRole::Wall));
    }

    #[test]
    fn test_normals_point_outward() {
        let prism = square_prism();
        let centroid = prism.centroid();
        for face in prism.faces() {
            let outward = face.centroid() - centroid;
            assert!(
                face.normal().dot(&outward) > 0.0,
                "face {:?} normal points inward",
                face.role
            );
        }
    }

    #[test]
    fn test_roof_and_floor_axis_aligned() {
        let prism = square_prism();
        let faces = prism.faces();
        let floor_n = faces[0].normal().normalize();
        let roof_n = faces[1].normal().normalize();
        assert_relative_eq!(floor_n.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(roof_n.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_top_bottom_congruent() {
        let prism = square_prism();
        let faces = prism.faces();
        for p in &faces[0].points {
            assert_eq!(p.z, 0.0);
        }
        for p in &faces[1].points {
            assert_eq!(p.z, 10.0);
        }
        assert_eq!(faces[0].points.len(), faces[1].points.len());
        assert_relative_eq!(prism.base_area(), 100.0);
    }
}
