// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! WGS84 → UTM projection and engine-unit normalization

use geo_types::{Coord, Rect};

use super::footprint::{Footprint, ProjectedPolygon};
use crate::bbox::BoundingBox;
use crate::error::{Error, Result};

// GRS80 ellipsoid, the datum of the ETRS89 UTM frames the source data uses.
const ELLIPSOID_A: f64 = 6_378_137.0;
const ELLIPSOID_F: f64 = 1.0 / 298.257_222_101;

const UTM_SCALE: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// UTM is undefined toward the poles; the polar bands need a different grid.
const UTM_MAX_LAT: f64 = 84.0;

/// Transverse Mercator projection for one UTM zone (Karney series, third
/// order in the flattening — sub-millimeter within a zone).
#[derive(Debug, Clone)]
pub struct UtmProjector {
    zone: u8,
    north: bool,
    central_meridian: f64,
    radius: f64,
    alpha: [f64; 3],
    atanh_coeff: f64,
}

impl UtmProjector {
    /// Projector for the zone containing the given point.
    pub fn for_point(lon: f64, lat: f64) -> Result<Self> {
        if lat.abs() > UTM_MAX_LAT {
            return Err(Error::UnsupportedRegion(format!(
                "latitude {lat:.4} outside the UTM domain (|lat| <= {UTM_MAX_LAT})"
            )));
        }
        let lon = normalize_lon(lon);
        let zone = (((lon + 180.0) / 6.0).floor() as i32).clamp(0, 59) as u8 + 1;

        let n = ELLIPSOID_F / (2.0 - ELLIPSOID_F);
        let n2 = n * n;
        let n3 = n2 * n;
        Ok(Self {
            zone,
            north: lat >= 0.0,
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            radius: ELLIPSOID_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            atanh_coeff: 2.0 * n.sqrt() / (1.0 + n),
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Project lon/lat degrees to UTM easting/northing meters.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let lam = (normalize_lon(lon) - self.central_meridian).to_radians();

        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - self.atanh_coeff * (self.atanh_coeff * sin_phi).atanh()).sinh();
        let xi = t.atan2(lam.cos());
        let eta = (lam.sin() / (t * t + lam.cos() * lam.cos()).sqrt()).asinh();

        let mut easting = eta;
        let mut northing = xi;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            easting += a * (k * xi).cos() * (k * eta).sinh();
            northing += a * (k * xi).sin() * (k * eta).cosh();
        }

        let false_northing = if self.north { 0.0 } else { FALSE_NORTHING_SOUTH };
        (
            FALSE_EASTING + UTM_SCALE * self.radius * easting,
            false_northing + UTM_SCALE * self.radius * northing,
        )
    }
}

fn normalize_lon(lon: f64) -> f64 {
    let mut l = (lon + 180.0) % 360.0;
    if l < 0.0 {
        l += 360.0;
    }
    l - 180.0
}

/// Stage 1: reprojection, recentering on the bbox centroid, meter → engine
/// unit scaling, and world-limit clamping.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    projector: UtmProjector,
    origin_easting: f64,
    origin_northing: f64,
    scale: f64,
    world_limit: f64,
}

impl CoordinateTransformer {
    pub fn new(bounds: &BoundingBox, scale: f64, world_limit: f64) -> Result<Self> {
        for lat in [bounds.min_lat, bounds.max_lat] {
            if lat.abs() > UTM_MAX_LAT {
                return Err(Error::UnsupportedRegion(format!(
                    "bounding box latitude {lat:.4} outside the UTM domain"
                )));
            }
        }
        let (lon_c, lat_c) = bounds.center();
        let projector = UtmProjector::for_point(lon_c, lat_c)?;
        let (origin_easting, origin_northing) = projector.project(lon_c, lat_c);
        Ok(Self {
            projector,
            origin_easting,
            origin_northing,
            scale,
            world_limit,
        })
    }

    /// Project one lon/lat point to engine units relative to the bbox
    /// centroid. Returns the point and whether it had to be clamped.
    pub fn to_units(&self, lon: f64, lat: f64) -> (Coord<f64>, bool) {
        let (e, n) = self.projector.project(lon, lat);
        let x = (e - self.origin_easting) * self.scale;
        let y = (n - self.origin_northing) * self.scale;
        let cx = x.clamp(-self.world_limit, self.world_limit);
        let cy = y.clamp(-self.world_limit, self.world_limit);
        (Coord { x: cx, y: cy }, cx != x || cy != y)
    }

    /// Stage transform for a whole footprint. The boolean reports whether any
    /// vertex was clamped to the world limit.
    pub fn transform(&self, footprint: &Footprint) -> (ProjectedPolygon, bool) {
        let mut clamped = false;
        let ring = footprint
            .ring
            .iter()
            .map(|c| {
                let (p, was_clamped) = self.to_units(c.x, c.y);
                clamped |= was_clamped;
                p
            })
            .collect();
        (
            ProjectedPolygon {
                id: footprint.id.clone(),
                ring,
                height: footprint.height,
            },
            clamped,
        )
    }

    /// Axis-aligned clip rectangle: the projected bbox corners' extent in
    /// engine units.
    pub fn clip_rect(&self, bounds: &BoundingBox) -> Rect<f64> {
        let corners = [
            (bounds.min_lon, bounds.min_lat),
            (bounds.max_lon, bounds.min_lat),
            (bounds.max_lon, bounds.max_lat),
            (bounds.min_lon, bounds.max_lat),
        ];
        let mut min = Coord {
            x: f64::INFINITY,
            y: f64::INFINITY,
        };
        let mut max = Coord {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        };
        for (lon, lat) in corners {
            let (c, _) = self.to_units(lon, lat);
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Rect::new(min, max)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
