// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Geometry pipeline stages: projection, cleaning, simplification,
//! decomposition, extrusion, snapping

mod cleaner;
mod decompose;
mod extrude;
mod footprint;
mod projection;
mod simplify;
mod snap;

pub use cleaner::{clean_polygon, repair_ring};
pub use decompose::{decompose, DecomposeFailure};
pub use extrude::{extrude, Face, FaceRole, Prism};
pub use footprint::{ConvexPart, Footprint, ProjectedPolygon};
pub use projection::{CoordinateTransformer, UtmProjector};
pub use simplify::simplify_ring;
pub use snap::{cull_reason, snap_prism, snap_value, CullReason};
