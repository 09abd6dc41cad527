// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Brushforge Inc.

//! Valve 220 map text serialization

use std::io::{self, Write};

use super::{MapDocument, Plane};

/// Serialize the whole document into the block-structured map grammar.
pub fn write_map<W: Write>(doc: &MapDocument, w: &mut W) -> io::Result<()> {
    writeln!(w, "worldspawn")?;
    writeln!(w, "{{")?;
    writeln!(w, "\"mapversion\" \"{}\"", doc.worldspawn.mapversion)?;
    writeln!(w, "\"classname\" \"{}\"", doc.worldspawn.classname)?;
    if !doc.worldspawn.wads.is_empty() {
        writeln!(w, "\"wad\" \"{}\"", doc.worldspawn.wads.join(";"))?;
    }
    for solid in &doc.solids {
        writeln!(w, "{{")?;
        for face in &solid.faces {
            let plane = Plane::from_face(face, doc.texture_for(face.role));
            write_plane(&plane, w)?;
        }
        writeln!(w, "}}")?;
    }
    writeln!(w, "}}")?;
    Ok(())
}

/// In-memory serialization; what the determinism guarantee is stated over.
pub fn map_to_string(doc: &MapDocument) -> String {
    let mut buf = Vec::new();
    write_map(doc, &mut buf).expect("in-memory write cannot fail");
    String::from_utf8(buf).expect("map text is ASCII")
}

/// A valid worldspawn-only map, the stub the original tool emitted.
pub fn empty_map_string(wads: &[String]) -> String {
    let mut text = String::from("worldspawn\n{\n\"mapversion\" \"220\"\n\"classname\" \"worldspawn\"\n");
    if !wads.is_empty() {
        text.push_str(&format!("\"wad\" \"{}\"\n", wads.join(";")));
    }
    text.push_str("}\n");
    text
}

fn write_plane<W: Write>(plane: &Plane, w: &mut W) -> io::Result<()> {
    for p in &plane.points {
        write!(w, "( {} {} {} ) ", num(p.x), num(p.y), num(p.z))?;
    }
    let a = &plane.axes;
    writeln!(
        w,
        "{} [ {} {} {} {} ] [ {} {} {} {} ] {} {} {}",
        plane.texture,
        num(a.u.x),
        num(a.u.y),
        num(a.u.z),
        num(a.u_offset),
        num(a.v.x),
        num(a.v.y),
        num(a.v.z),
        num(a.v_offset),
        num(a.rotation),
        num(a.scale_x),
        num(a.scale_y),
    )
}

/// Engine-unit number formatting: integers when exact, otherwise fixed
/// precision with trailing zeros trimmed.
fn num(v: f64) -> String {
    let rounded = v.round();
    if (v - rounded).abs() < 1e-6 {
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{}", rounded as i64);
    }
    let mut s = format!("{v:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
