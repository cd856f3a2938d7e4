use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::property::{IntProperty, VectorProperty};
use crate::report::AnalysisOutcome;

// Legacy literal suffixes; the documents themselves are JSON text.
const ATOMS_SUFFIX: &str = "_grains.msgpack.json";
const META_SUFFIX: &str = "_grains_meta.msgpack.json";

pub fn atoms_path(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{ATOMS_SUFFIX}"))
}

pub fn meta_path(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{META_SUFFIX}"))
}

pub fn grain_label(grain_id: i32) -> String {
    if grain_id == 0 {
        "Unassigned".to_string()
    } else {
        format!("Grain_{grain_id}")
    }
}

/// Groups atoms by grain id into a label -> atom-record mapping. Groups are
/// ordered by ascending grain id ("Unassigned" first); atom index order is
/// preserved within each group.
fn build_atom_listing(positions: &VectorProperty, atom_grain_ids: &IntProperty) -> Value {
    let groups = atom_grain_ids
        .iter()
        .copied()
        .enumerate()
        .map(|(atom_i, grain_id)| (grain_id, atom_i))
        .into_group_map();
    let mut doc = Map::new();
    for grain_id in groups.keys().copied().sorted() {
        let atoms = groups[&grain_id]
            .iter()
            .map(|&atom_i| {
                let p = positions.get(atom_i);
                json!({ "id": atom_i, "pos": [p.x, p.y, p.z] })
            })
            .collect();
        doc.insert(grain_label(grain_id), Value::Array(atoms));
    }
    Value::Object(doc)
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Writes the grouped atom listing and the metadata document. Each write is
/// independently non-fatal; a failure degrades to a logged warning and the
/// numeric result is still returned to the caller.
pub fn write_grain_documents(
    prefix: &str,
    outcome: &AnalysisOutcome,
    positions: &VectorProperty,
    atom_grain_ids: &IntProperty,
) {
    let listing = build_atom_listing(positions, atom_grain_ids);
    let path = atoms_path(prefix);
    match write_pretty(&path, &listing) {
        Ok(()) => info!("Exported grain atoms to: {}", path.display()),
        Err(e) => warn!("Could not write grain atoms file {}: {e}", path.display()),
    }

    let path = meta_path(prefix);
    match write_pretty(&path, outcome) {
        Ok(()) => info!("Exported grain metadata to: {}", path.display()),
        Err(e) => warn!("Could not write grain metadata file {}: {e}", path.display()),
    }
}
