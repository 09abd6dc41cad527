// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! End-to-end pipeline tests over geographic input

use geo_types::Coord;

use brushforge::validation::Warning;
use brushforge::{generate, BoundingBox, Footprint, MapConfig};

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

/// Roughly 2.2 km x 2.2 km around Skjern, Denmark.
fn bounds() -> BoundingBox {
    BoundingBox::new(8.48, 55.94, 8.52, 55.96).unwrap()
}

fn config() -> MapConfig {
    MapConfig {
        world_limit: 65536.0,
        ..MapConfig::default()
    }
}

/// A rectangular building of roughly 19 m x 11 m near the bbox centroid.
fn rect_house(id: &str, lon0: f64, lat0: f64) -> Footprint {
    Footprint::new(
        id,
        vec![
            c(lon0, lat0),
            c(lon0 + 0.0003, lat0),
            c(lon0 + 0.0003, lat0 + 0.0001),
            c(lon0, lat0 + 0.0001),
        ],
    )
}

/// An L-shaped building: a 30 m x 20 m rectangle with a quadrant removed.
fn ell_house(id: &str) -> Footprint {
    Footprint::new(
        id,
        vec![
            c(8.5000, 55.9500),
            c(8.5005, 55.9500),
            c(8.5005, 55.9501),
            c(8.50025, 55.9501),
            c(8.50025, 55.9502),
            c(8.5000, 55.9502),
        ],
    )
}

#[test]
fn test_rect_house_yields_one_watertight_solid() {
    let out = generate(&[rect_house("h", 8.4999, 55.9499)], &bounds(), &config()).unwrap();

    assert_eq!(out.document.solid_count(), 1);
    let solid = &out.document.solids[0];
    assert_eq!(solid.face_count(), 6);

    assert_eq!(out.report.counts.buildings_processed, 1);
    assert_eq!(out.report.counts.brushes_emitted, 1);
    assert_eq!(out.report.counts.faces_emitted, 6);
    assert!(out.report.warnings.is_empty());

    // Validator verdicts: watertight, convex, no inverted normals
    assert_eq!(out.report.verdicts.len(), 1);
    let verdict = &out.report.verdicts[0];
    assert!(verdict.watertight);
    assert!(verdict.convex);
    assert_eq!(verdict.inverted_faces, 0);
}

#[test]
fn test_ell_house_decomposes_into_two_solids() {
    let out = generate(&[ell_house("ell")], &bounds(), &config()).unwrap();

    assert_eq!(out.document.solid_count(), 2);
    assert_eq!(out.report.dirty_solids(), 0);
    for verdict in &out.report.verdicts {
        assert!(verdict.watertight);
        assert!(verdict.convex);
    }
}

#[test]
fn test_every_face_normal_points_outward() {
    let out = generate(
        &[rect_house("a", 8.4999, 55.9499), ell_house("b")],
        &bounds(),
        &config(),
    )
    .unwrap();
    for solid in &out.document.solids {
        let centroid = solid.centroid();
        for face in &solid.faces {
            let outward = face.centroid() - centroid;
            assert!(
                face.normal().dot(&outward) > 0.0,
                "solid {} face points inward",
                solid.id
            );
        }
    }
}

#[test]
fn test_sliver_is_dropped_and_counted() {
    // About 19 m x 0.2 m: under the 2 m^2 minimum after projection
    let sliver = Footprint::new(
        "sliver",
        vec![
            c(8.4999, 55.94990),
            c(8.5002, 55.94990),
            c(8.5002, 55.9499005),
            c(8.4999, 55.9499005),
        ],
    );
    let out = generate(&[sliver], &bounds(), &config()).unwrap();

    assert_eq!(out.document.solid_count(), 0);
    assert_eq!(out.report.counts.buildings_skipped, 1);
    assert_eq!(out.report.counts.buildings_processed, 0);
    assert!(out
        .report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::SliverDropped { .. })));
}

#[test]
fn test_building_cap_reports_excess() {
    let fps: Vec<Footprint> = (0..5)
        .map(|i| rect_house(&format!("h{i}"), 8.4990 + 0.0005 * i as f64, 55.9499))
        .collect();
    let cfg = MapConfig {
        max_buildings: 3,
        ..config()
    };
    let out = generate(&fps, &bounds(), &cfg).unwrap();

    assert_eq!(out.document.solid_count(), 3);
    assert_eq!(out.report.counts.buildings_processed, 3);
    assert_eq!(out.report.counts.buildings_skipped, 2);
    assert!(out
        .report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::BuildingCapReached { limit: 3, skipped: 2 })));
}

#[test]
fn test_face_cap_truncates() {
    let fps: Vec<Footprint> = (0..3)
        .map(|i| rect_house(&format!("h{i}"), 8.4990 + 0.0005 * i as f64, 55.9499))
        .collect();
    let cfg = MapConfig {
        max_faces: 13, // room for two 6-face solids, not three
        ..config()
    };
    let out = generate(&fps, &bounds(), &cfg).unwrap();
    assert_eq!(out.document.solid_count(), 2);
    assert!(out
        .report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::FaceCapReached { limit: 13 })));
}

#[test]
fn test_out_of_bbox_footprint_is_clipped_away() {
    // Well north of the bounding box
    let outside = rect_house("far", 8.50, 55.99);
    let cfg = MapConfig {
        // Keep the projected bbox inside the world limit so clipping, not
        // clamping, decides
        world_limit: 1_000_000.0,
        ..MapConfig::default()
    };
    let out = generate(&[outside], &bounds(), &cfg).unwrap();
    assert_eq!(out.document.solid_count(), 0);
    assert_eq!(out.report.counts.buildings_skipped, 1);
}

#[test]
fn test_footprint_height_attribute_wins() {
    let mut tall = rect_house("tall", 8.4999, 55.9499);
    tall.height = Some(30.0);
    let short = rect_house("short", 8.5005, 55.9499);

    let out = generate(&[tall, short], &bounds(), &config()).unwrap();
    assert_eq!(out.document.solid_count(), 2);

    let top_z = |idx: usize| -> f64 {
        out.document.solids[idx]
            .faces
            .iter()
            .flat_map(|f| f.points.iter())
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max)
    };
    // 30 m * 32 units/m vs the 10 m default
    assert_eq!(top_z(0), 960.0);
    assert_eq!(top_z(1), 320.0);
}

#[test]
fn test_strict_mode_passes_clean_input() {
    let cfg = MapConfig {
        strict_validation: true,
        ..config()
    };
    let out = generate(&[rect_house("h", 8.4999, 55.9499)], &bounds(), &cfg).unwrap();
    assert_eq!(out.document.solid_count(), 1);
}

#[test]
fn test_self_intersecting_ring_is_skipped_not_fatal() {
    let bowtie = Footprint::new(
        "bowtie",
        vec![
            c(8.4999, 55.9499),
            c(8.5002, 55.9500),
            c(8.5002, 55.9499),
            c(8.4999, 55.9500),
        ],
    );
    let ok = rect_house("ok", 8.5005, 55.9499);
    let out = generate(&[bowtie, ok], &bounds(), &config()).unwrap();

    assert_eq!(out.document.solid_count(), 1);
    assert_eq!(out.report.counts.buildings_processed, 1);
    assert_eq!(out.report.counts.buildings_skipped, 1);
    assert!(out
        .report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::RingRepairFailed { .. })));
}
