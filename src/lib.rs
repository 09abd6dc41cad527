// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Brushforge Geometry Kernel
//!
//! Converts building footprint polygons inside a geographic bounding box
//! into convex solid brushes in the Valve 220 map text format. Deterministic
//! pipeline: projection, cleaning, simplification, convex decomposition,
//! extrusion, grid snapping, plane-based export, and validation.

pub mod bbox;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod map;
pub mod pipeline;
pub mod utils;
pub mod validation;

pub use bbox::BoundingBox;
pub use config::{MapConfig, TextureSet};
pub use error::{Error, Result};
pub use geometry::Footprint;
pub use map::{map_to_string, MapDocument};
pub use pipeline::{generate, PipelineOutput};
pub use validation::ValidationReport;
