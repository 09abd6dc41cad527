// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! GeoJSON footprint importer
//!
//! Reads an already-fetched FeatureCollection (the cache format of the data
//! provider) into the core input contract. No network access here.

use anyhow::{bail, Context, Result};
use geo_types::Coord;
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;

use crate::geometry::Footprint;

/// Property keys checked for a building height, in meters.
const HEIGHT_KEYS: [&str; 3] = ["height", "building:height", "hoejde"];
/// Property keys checked for a storey count, converted at 3 m per level.
const LEVEL_KEYS: [&str; 2] = ["building:levels", "levels"];
const METERS_PER_LEVEL: f64 = 3.0;

/// Parse a GeoJSON FeatureCollection into footprints.
///
/// Polygons contribute their outer ring; MultiPolygon members become
/// separate footprints with a `/k` id suffix.
pub fn footprints_from_geojson(text: &str) -> Result<Vec<Footprint>> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON")?;
    let features: Vec<Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => bail!("expected a FeatureCollection, got a bare geometry"),
    };

    let mut footprints = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let id = feature_id(feature, index);
        let height = feature_height(feature);
        match &geometry.value {
            Value::Polygon(rings) => {
                if let Some(ring) = outer_ring(rings) {
                    let mut fp = Footprint::new(id, ring);
                    fp.height = height;
                    footprints.push(fp);
                }
            }
            Value::MultiPolygon(polys) => {
                for (k, rings) in polys.iter().enumerate() {
                    if let Some(ring) = outer_ring(rings) {
                        let mut fp = Footprint::new(format!("{id}/{k}"), ring);
                        fp.height = height;
                        footprints.push(fp);
                    }
                }
            }
            _ => continue,
        }
    }
    Ok(footprints)
}

/// Read and parse a GeoJSON file.
pub fn import_geojson_file(path: &str) -> Result<Vec<Footprint>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read GeoJSON file: {path}"))?;
    footprints_from_geojson(&text)
}

fn feature_id(feature: &Feature, index: usize) -> String {
    if let Some(id) = &feature.id {
        return match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        };
    }
    if let Some(props) = &feature.properties {
        if let Some(JsonValue::String(s)) = props.get("id") {
            return s.clone();
        }
    }
    format!("feature-{index}")
}

fn feature_height(feature: &Feature) -> Option<f64> {
    let props = feature.properties.as_ref()?;
    for key in HEIGHT_KEYS {
        if let Some(h) = numeric_property(props.get(key)) {
            return Some(h);
        }
    }
    for key in LEVEL_KEYS {
        if let Some(levels) = numeric_property(props.get(key)) {
            return Some(levels * METERS_PER_LEVEL);
        }
    }
    None
}

fn numeric_property(value: Option<&JsonValue>) -> Option<f64> {
    match value? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Outer ring as an open coordinate list; None for degenerate rings.
fn outer_ring(rings: &[Vec<Vec<f64>>]) -> Option<Vec<Coord<f64>>> {
    let outer = rings.first()?;
    let mut ring: Vec<Coord<f64>> = outer
        .iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Coord {
            x: pos[0],
            y: pos[1],
        })
        .collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        None
    } else {
        Some(ring)
    }
}
