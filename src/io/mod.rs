// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! I/O module - importing footprints from cached GeoJSON

mod importer;

pub use importer::{footprints_from_geojson, import_geojson_file};
