// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Footprint and derived polygon types

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use crate::utils::math;

/// A building outline as supplied by the data provider.
///
/// The ring is an open sequence of WGS84 lon/lat points (the closing edge is
/// implicit). Immutable once read; every later stage works on derived data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    pub id: String,
    pub ring: Vec<Coord<f64>>,
    /// Height in meters, when the source data carries one.
    pub height: Option<f64>,
}

impl Footprint {
    pub fn new(id: impl Into<String>, ring: Vec<Coord<f64>>) -> Self {
        Self {
            id: id.into(),
            ring,
            height: None,
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Height resolution: own attribute if present and positive, else default.
    pub fn height_or(&self, default_m: f64) -> f64 {
        match self.height {
            Some(h) if h > 0.0 => h,
            _ => default_m,
        }
    }
}

/// A footprint after projection, recentering, and scaling to engine units.
#[derive(Debug, Clone)]
pub struct ProjectedPolygon {
    pub id: String,
    pub ring: Vec<Coord<f64>>,
    pub height: Option<f64>,
}

/// One convex piece of a decomposed footprint, CCW winding.
#[derive(Debug, Clone)]
pub struct ConvexPart {
    pub footprint_id: String,
    pub index: usize,
    pub ring: Vec<Coord<f64>>,
}

impl ConvexPart {
    pub fn new(footprint_id: impl Into<String>, index: usize, ring: Vec<Coord<f64>>) -> Self {
        Self {
            footprint_id: footprint_id.into(),
            index,
            ring,
        }
    }

    pub fn area(&self) -> f64 {
        math::signed_area(&self.ring)
    }

    /// Invariant check: consecutive edge cross products never flip sign.
    pub fn is_convex(&self) -> bool {
        math::is_convex_ring(&self.ring)
    }
}
