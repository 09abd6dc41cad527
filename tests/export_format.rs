// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Map text format and determinism tests

use geo_types::Coord;

use brushforge::map::{empty_map_string, map_to_string};
use brushforge::{generate, BoundingBox, Footprint, MapConfig, TextureSet};

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

fn bounds() -> BoundingBox {
    BoundingBox::new(8.48, 55.94, 8.52, 55.96).unwrap()
}

fn config() -> MapConfig {
    MapConfig {
        world_limit: 65536.0,
        textures: TextureSet {
            wads: vec!["halflife.wad".into(), "brushforge.wad".into()],
            ..TextureSet::default()
        },
        ..MapConfig::default()
    }
}

fn town() -> Vec<Footprint> {
    let mut fps = Vec::new();
    for i in 0..6 {
        let lon0 = 8.4985 + 0.0005 * f64::from(i);
        fps.push(Footprint::new(
            format!("rect-{i}"),
            vec![
                c(lon0, 55.9495),
                c(lon0 + 0.0003, 55.9495),
                c(lon0 + 0.0003, 55.9496),
                c(lon0, 55.9496),
            ],
        ));
    }
    // One concave building
    fps.push(Footprint::new(
        "ell",
        vec![
            c(8.5000, 55.9500),
            c(8.5005, 55.9500),
            c(8.5005, 55.9501),
            c(8.50025, 55.9501),
            c(8.50025, 55.9502),
            c(8.5000, 55.9502),
        ],
    ));
    fps
}

#[test]
fn test_map_text_grammar() {
    let out = generate(&town(), &bounds(), &config()).unwrap();
    let text = map_to_string(&out.document);

    // Worldspawn header block, exactly as the stub writer emits it
    assert!(text.starts_with(
        "worldspawn\n{\n\"mapversion\" \"220\"\n\"classname\" \"worldspawn\"\n\"wad\" \"halflife.wad;brushforge.wad\"\n"
    ));
    assert!(text.ends_with("}\n"));
    assert_eq!(text.matches('{').count(), text.matches('}').count());

    // One block per solid, one line per face
    let solid_blocks = text.matches('{').count() - 1;
    assert_eq!(solid_blocks, out.document.solid_count());
    let face_lines = text.lines().filter(|l| l.starts_with('(')).count();
    assert_eq!(face_lines, out.report.counts.faces_emitted);

    // Face line field order: 3 points, texture, U axis, V axis, rot + scales
    let line = text.lines().find(|l| l.starts_with('(')).unwrap();
    assert_eq!(line.matches('(').count(), 3);
    assert_eq!(line.matches('[').count(), 2);
    assert!(line.trim_end().ends_with("0 1 1"));
}

#[test]
fn test_snapped_coordinates_serialize_as_integers() {
    let out = generate(&town(), &bounds(), &config()).unwrap();
    let text = map_to_string(&out.document);
    // Grid size 1: every plane point coordinate is a whole number
    for line in text.lines().filter(|l| l.starts_with('(')) {
        let points = line.split(')').take(3);
        for point in points {
            for token in point.split_whitespace().filter(|t| *t != "(") {
                assert!(
                    !token.contains('.'),
                    "non-integer coordinate {token} in {line}"
                );
            }
        }
    }
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let a = generate(&town(), &bounds(), &config()).unwrap();
    let b = generate(&town(), &bounds(), &config()).unwrap();
    assert_eq!(map_to_string(&a.document), map_to_string(&b.document));
}

#[test]
fn test_output_is_independent_of_thread_count() {
    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| generate(&town(), &bounds(), &config()).unwrap());
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(8)
        .build()
        .unwrap()
        .install(|| generate(&town(), &bounds(), &config()).unwrap());

    assert_eq!(
        map_to_string(&single.document),
        map_to_string(&many.document)
    );
    let ids: Vec<u32> = single.document.solids.iter().map(|s| s.id).collect();
    let ids_many: Vec<u32> = many.document.solids.iter().map(|s| s.id).collect();
    assert_eq!(ids, ids_many);
}

#[test]
fn test_empty_map_stub() {
    let text = empty_map_string(&["halflife.wad".to_string()]);
    assert_eq!(
        text,
        "worldspawn\n{\n\"mapversion\" \"220\"\n\"classname\" \"worldspawn\"\n\"wad\" \"halflife.wad\"\n}\n"
    );
}

#[test]
fn test_map_file_roundtrips_to_disk() {
    let out = generate(&town(), &bounds(), &config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("town.map");
    std::fs::write(&path, map_to_string(&out.document)).unwrap();
    let read_back = std::fs::read_to_string(&path).unwrap();
    assert_eq!(read_back, map_to_string(&out.document));
}
