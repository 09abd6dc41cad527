// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Geographic bounding box

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic bounding box in WGS84 lon/lat degrees.
///
/// Its centroid is the normalization origin of the whole run: every
/// projected coordinate is expressed relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Build a bounding box, enforcing `min < max` on both axes.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        if !(min_lon.is_finite() && min_lat.is_finite() && max_lon.is_finite() && max_lat.is_finite())
        {
            return Err(Error::InvalidBoundingBox(
                "coordinates must be finite".into(),
            ));
        }
        if min_lon >= max_lon || min_lat >= max_lat {
            return Err(Error::InvalidBoundingBox(
                "min must be < max for lon/lat".into(),
            ));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Parse the CLI form `<minLon,minLat,maxLon,maxLat>`.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<f64> = text
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                Error::InvalidBoundingBox("expected '<minLon,minLat,maxLon,maxLat>'".into())
            })?;
        if parts.len() != 4 {
            return Err(Error::InvalidBoundingBox(
                "expected '<minLon,minLat,maxLon,maxLat>'".into(),
            ));
        }
        Self::new(parts[0], parts[1], parts[2], parts[3])
    }

    /// Centroid in lon/lat degrees.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}
