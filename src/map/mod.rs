// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Map document model: planes, solids, worldspawn

mod writer;

pub use writer::{empty_map_string, map_to_string, write_map};

use nalgebra::{Point3, Vector3};

use crate::config::TextureSet;
use crate::geometry::{Face, FaceRole, Prism};

/// Valve 220 texture axes for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAxes {
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub u_offset: f64,
    pub v_offset: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// World-aligned axes: the dominant normal axis picks the U/V pair, the way
/// the editor assigns them for axis-aligned work.
pub fn world_aligned_axes(normal: &Vector3<f64>) -> TextureAxes {
    let (u, v) = if normal.z.abs() >= normal.x.abs() && normal.z.abs() >= normal.y.abs() {
        (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
    } else if normal.x.abs() >= normal.y.abs() {
        (Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    } else {
        (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    };
    TextureAxes {
        u,
        v,
        u_offset: 0.0,
        v_offset: 0.0,
        rotation: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    }
}

/// An oriented plane as written to the map: three points, texture, axes.
#[derive(Debug, Clone)]
pub struct Plane {
    pub points: [Point3<f64>; 3],
    pub texture: String,
    pub axes: TextureAxes,
}

impl Plane {
    /// Derive the plane from a face loop with the preset for its role.
    pub fn from_face(face: &Face, texture: impl Into<String>) -> Self {
        Self {
            points: face.plane_points(),
            texture: texture.into(),
            axes: world_aligned_axes(&face.normal()),
        }
    }

    /// Outward normal via the winding rule, not normalized.
    pub fn normal(&self) -> Vector3<f64> {
        let [p0, p1, p2] = self.points;
        (p0 - p1).cross(&(p2 - p1))
    }
}

/// One convex brush: a closed set of outward-facing faces.
#[derive(Debug, Clone)]
pub struct Solid {
    pub id: u32,
    pub faces: Vec<Face>,
}

impl Solid {
    pub fn from_prism(id: u32, prism: &Prism) -> Self {
        Self {
            id,
            faces: prism.faces(),
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex mean. Every prism vertex sits on exactly three faces, so the
    /// per-face vertex mean is unbiased and lies inside the convex solid.
    pub fn centroid(&self) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut count: f64 = 0.0;
        for face in &self.faces {
            for p in &face.points {
                sum += p.coords;
                count += 1.0;
            }
        }
        Point3::from(sum / count.max(1.0))
    }
}

/// The worldspawn entity's own keys.
#[derive(Debug, Clone)]
pub struct Worldspawn {
    pub mapversion: u32,
    pub classname: String,
    pub wads: Vec<String>,
}

impl Worldspawn {
    pub fn new(wads: Vec<String>) -> Self {
        Self {
            mapversion: 220,
            classname: "worldspawn".to_string(),
            wads,
        }
    }
}

/// The complete output document of one run.
#[derive(Debug, Clone)]
pub struct MapDocument {
    pub worldspawn: Worldspawn,
    pub solids: Vec<Solid>,
    pub textures: TextureSet,
}

impl MapDocument {
    pub fn new(textures: TextureSet) -> Self {
        Self {
            worldspawn: Worldspawn::new(textures.wads.clone()),
            solids: Vec::new(),
            textures,
        }
    }

    pub fn push_solid(&mut self, solid: Solid) {
        self.solids.push(solid);
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub fn face_count(&self) -> usize {
        self.solids.iter().map(Solid::face_count).sum()
    }

    /// Texture name for a face role, per the configured presets.
    pub fn texture_for(&self, role: FaceRole) -> &str {
        match role {
            FaceRole::Wall => &self.textures.wall,
            FaceRole::Roof => &self.textures.roof,
            FaceRole::Floor => &self.textures.skip,
        }
    }
}
