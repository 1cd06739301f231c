//! 3MF part bundles: welded per-part volumes with color and print metadata,
//! plate-centered, handed to an external package writer.
//!
//! The ZIP/template writer itself is an external collaborator; this module
//! only speaks its input contract.

use std::collections::BTreeMap;

use camber_model::Shape;
use camber_types::{MetaValue, META_PART_NAME};
use serde::{Deserialize, Serialize};

use crate::mesh::{shape_meshes, ExportError};
use crate::weld::{weld, WeldedMesh, WELD_TOLERANCE};

/// A modifier volume inside a part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierVolume {
    pub mesh: WeldedMesh,
    pub color: Option<String>,
}

/// One object entry for the package writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartBundle {
    pub name: String,
    pub color: Option<String>,
    /// Print metadata (`infillDensity`, `infillPattern`, `partName`,
    /// `minCutZ`, plus anything user-defined) passed through verbatim.
    pub meta: BTreeMap<String, MetaValue>,
    pub mesh: WeldedMesh,
    pub modifiers: Vec<ModifierVolume>,
}

/// Global transform applied before packaging: plate-centered in xy, bottom
/// at z=0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlateTransform {
    pub offset: [f64; 3],
}

/// External ZIP/template writer seam.
pub trait PackageWriter {
    fn write(&mut self, parts: &[PartBundle]) -> Result<Vec<u8>, ExportError>;
}

fn part_name(shape: &Shape, index: usize) -> String {
    shape
        .metadata()
        .get(META_PART_NAME)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Part {}", index + 1))
}

fn apply_offset(mesh: &mut WeldedMesh, offset: [f64; 3]) {
    for v in mesh.vertices.chunks_exact_mut(3) {
        v[0] += offset[0] as f32;
        v[1] += offset[1] as f32;
        v[2] += offset[2] as f32;
    }
}

/// Build welded, plate-centered bundles for a set of parts.
pub fn build_bundles(parts: &[Shape]) -> Result<(Vec<PartBundle>, PlateTransform), ExportError> {
    if parts.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut bundles = Vec::new();
    for (index, shape) in parts.iter().enumerate() {
        let meshes = shape_meshes(shape)?;
        let mut main: Option<WeldedMesh> = None;
        let mut modifiers = Vec::new();
        for mesh in &meshes {
            let welded = weld(&mesh.vertices, &mesh.indices, WELD_TOLERANCE);
            if mesh.is_modifier {
                modifiers.push(ModifierVolume {
                    mesh: welded,
                    color: mesh.color.clone(),
                });
            } else {
                main = Some(welded);
            }
        }
        bundles.push(PartBundle {
            name: part_name(shape, index),
            color: shape.color_hex().map(str::to_string),
            meta: shape.metadata().clone(),
            mesh: main.ok_or(ExportError::Empty)?,
            modifiers,
        });
    }

    // Plate centering over all volumes together.
    let mut bbox = [
        f64::MAX,
        f64::MAX,
        f64::MAX,
        f64::MIN,
        f64::MIN,
        f64::MIN,
    ];
    let mut scan = |mesh: &WeldedMesh| {
        for v in mesh.vertices.chunks_exact(3) {
            for i in 0..3 {
                bbox[i] = bbox[i].min(v[i] as f64);
                bbox[i + 3] = bbox[i + 3].max(v[i] as f64);
            }
        }
    };
    for bundle in &bundles {
        scan(&bundle.mesh);
        for modifier in &bundle.modifiers {
            scan(&modifier.mesh);
        }
    }
    let transform = PlateTransform {
        offset: [
            -(bbox[0] + bbox[3]) / 2.0,
            -(bbox[1] + bbox[4]) / 2.0,
            -bbox[2],
        ],
    };
    for bundle in &mut bundles {
        apply_offset(&mut bundle.mesh, transform.offset);
        for modifier in &mut bundle.modifiers {
            apply_offset(&mut modifier.mesh, transform.offset);
        }
    }

    Ok((bundles, transform))
}

/// Bundle the parts and hand them to the writer.
pub fn write_3mf(
    parts: &[Shape],
    writer: &mut dyn PackageWriter,
) -> Result<Vec<u8>, ExportError> {
    let (bundles, _) = build_bundles(parts)?;
    writer.write(&bundles)
}
