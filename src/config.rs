// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Run configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Texture names and WAD packages written into the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSet {
    /// Texture applied to vertical faces.
    pub wall: String,
    /// Texture applied to top faces.
    pub roof: String,
    /// Neutral texture applied to bottom faces.
    pub skip: String,
    /// WAD package paths, joined with `;` into the worldspawn `wad` key.
    pub wads: Vec<String>,
}

impl Default for TextureSet {
    fn default() -> Self {
        Self {
            wall: "BRICK/BRICK01".to_string(),
            roof: "ROOF/ROOF01".to_string(),
            skip: "NULL".to_string(),
            wads: Vec::new(),
        }
    }
}

/// Configuration for one generation run.
///
/// Constructed once and passed by reference through all stages. Lengths and
/// areas are meters unless the field name says engine units; `scale` converts
/// between the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Engine units per meter.
    pub scale: f64,
    /// Douglas-Peucker tolerance in meters. 0 disables simplification.
    pub simplify_tolerance: f64,
    /// Minimum footprint area in m²; smaller rings are dropped as slivers.
    pub min_area: f64,
    /// Building height in meters when the footprint carries none.
    pub default_height: f64,
    /// Snapping grid resolution in engine units. 0 disables snapping.
    pub grid_size: f64,
    /// Post-snap minimum brush base area in engine units².
    pub min_brush_area: f64,
    /// Post-snap minimum brush height in engine units.
    pub min_brush_height: f64,
    /// Coordinates beyond ±world_limit engine units are clamped.
    pub world_limit: f64,
    /// Maximum footprints accepted per run.
    pub max_buildings: usize,
    /// Maximum solids emitted per run.
    pub max_brushes: usize,
    /// Maximum faces emitted per run.
    pub max_faces: usize,
    /// Maximum convex parts per footprint before decomposition gives up.
    pub max_parts: usize,
    /// Texture names and WAD references.
    pub textures: TextureSet,
    /// Promote validator warnings to a run-level failure.
    pub strict_validation: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            scale: 32.0,
            simplify_tolerance: 0.5,
            min_area: 2.0,
            default_height: 10.0,
            grid_size: 1.0,
            min_brush_area: 1.0,
            min_brush_height: 1.0,
            world_limit: 4096.0,
            max_buildings: 2048,
            max_brushes: 4096,
            max_faces: 32768,
            max_parts: 64,
            textures: TextureSet::default(),
            strict_validation: false,
        }
    }
}

impl MapConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: MapConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `brushforge.toml` if present, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new("brushforge.toml").exists() {
            Self::from_file("brushforge.toml")?
        } else {
            Self::default()
        };

        if let Ok(scale) = std::env::var("BRUSHFORGE_SCALE") {
            if let Ok(v) = scale.parse() {
                config.scale = v;
            }
        }
        if let Ok(grid) = std::env::var("BRUSHFORGE_GRID_SIZE") {
            if let Ok(v) = grid.parse() {
                config.grid_size = v;
            }
        }
        if let Ok(strict) = std::env::var("BRUSHFORGE_STRICT") {
            config.strict_validation = strict.parse().unwrap_or(false);
        }

        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig("scale must be positive".into()));
        }
        if self.simplify_tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "simplify_tolerance must be >= 0".into(),
            ));
        }
        if self.min_area < 0.0 {
            return Err(Error::InvalidConfig("min_area must be >= 0".into()));
        }
        if !(self.default_height.is_finite() && self.default_height > 0.0) {
            return Err(Error::InvalidConfig(
                "default_height must be positive".into(),
            ));
        }
        if self.grid_size < 0.0 {
            return Err(Error::InvalidConfig("grid_size must be >= 0".into()));
        }
        if !(self.world_limit.is_finite() && self.world_limit > 0.0) {
            return Err(Error::InvalidConfig("world_limit must be positive".into()));
        }
        if self.max_parts == 0 {
            return Err(Error::InvalidConfig("max_parts must be >= 1".into()));
        }
        Ok(())
    }

    /// Sliver threshold in engine units².
    pub fn min_area_units(&self) -> f64 {
        self.min_area * self.scale * self.scale
    }

    /// Simplification tolerance in engine units.
    pub fn simplify_tolerance_units(&self) -> f64 {
        self.simplify_tolerance * self.scale
    }
}
