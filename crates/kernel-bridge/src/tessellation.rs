//! Tessellation wrapper producing `RenderMesh` with per-face triangle ranges.
//!
//! Face ids in the ranges use the same handle-relative encoding as the
//! introspection queries, so a mesh range can be tied back to a live face.

use crate::truck_introspect::face_id_for;
use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

type TruckSolid = truck_modeling::Solid;

/// Accumulates per-face polygon meshes into one indexed `RenderMesh`.
///
/// Reversed faces are appended with their triangle winding flipped and their
/// normals negated; the polygon data itself is never touched.
struct MeshBuilder {
    mesh: RenderMesh,
}

impl MeshBuilder {
    fn new() -> Self {
        MeshBuilder {
            mesh: RenderMesh::empty(),
        }
    }

    fn is_empty(&self) -> bool {
        self.mesh.indices.is_empty()
    }

    fn append(&mut self, face: FaceId, polygon: &PolygonMesh, flipped: bool) {
        let base = (self.mesh.vertices.len() / 3) as u32;
        let start_index = self.mesh.indices.len() as u32;
        let sign = if flipped { -1.0f32 } else { 1.0f32 };

        let normals = polygon.normals();
        for (i, position) in polygon.positions().iter().enumerate() {
            self.mesh.vertices.push(position[0] as f32);
            self.mesh.vertices.push(position[1] as f32);
            self.mesh.vertices.push(position[2] as f32);
            // Normals ride along when the triangulation supplies them;
            // otherwise leave zeros and let consumers derive facet normals.
            match normals.get(i) {
                Some(n) => {
                    self.mesh.normals.push(sign * n[0] as f32);
                    self.mesh.normals.push(sign * n[1] as f32);
                    self.mesh.normals.push(sign * n[2] as f32);
                }
                None => self.mesh.normals.extend_from_slice(&[0.0, 0.0, 0.0]),
            }
        }

        for tri in polygon.tri_faces() {
            let corners = [tri[0].pos as u32, tri[1].pos as u32, tri[2].pos as u32];
            let wound = if flipped {
                [corners[2], corners[1], corners[0]]
            } else {
                corners
            };
            for c in wound {
                self.mesh.indices.push(base + c);
            }
        }

        let end_index = self.mesh.indices.len() as u32;
        if end_index > start_index {
            self.mesh.face_ranges.push(FaceRange {
                face,
                start_index,
                end_index,
            });
        }
    }

    fn finish(self) -> RenderMesh {
        self.mesh
    }
}

/// Triangulate a truck solid, keeping one index range per face.
///
/// Faces whose surface cannot be meshed are skipped but still consume a face
/// index, keeping ranges aligned with the introspection order. A solid that
/// yields no per-face triangles at all falls back to one merged range.
pub fn tessellate_solid(
    solid: &TruckSolid,
    tolerance: f64,
    handle_id: u64,
) -> std::result::Result<RenderMesh, KernelError> {
    let meshed = solid.triangulation(tolerance);

    let mut builder = MeshBuilder::new();
    let faces = meshed
        .boundaries()
        .iter()
        .flat_map(|shell| shell.face_iter().cloned())
        .collect::<Vec<_>>();
    for (index, face) in faces.iter().enumerate() {
        if let Some(polygon) = face.surface() {
            builder.append(
                face_id_for(handle_id, index as u64),
                &polygon,
                !face.orientation(),
            );
        }
    }

    if builder.is_empty() {
        builder.append(face_id_for(handle_id, 0), &meshed.to_polygon(), false);
    }
    if builder.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "triangulation produced no faces".to_string(),
        });
    }

    Ok(builder.finish())
}

/// Axis-aligned bounds of a solid, derived from its triangulation so curved
/// faces contribute their full extent.
pub fn solid_bounding_box(solid: &TruckSolid, tolerance: f64) -> Option<[f64; 6]> {
    let mesh = solid.triangulation(tolerance).to_polygon();
    let positions = mesh.positions();
    if positions.is_empty() {
        return None;
    }
    let mut bbox = [
        f64::MAX,
        f64::MAX,
        f64::MAX,
        f64::MIN,
        f64::MIN,
        f64::MIN,
    ];
    for p in positions {
        for i in 0..3 {
            bbox[i] = bbox[i].min(p[i]);
            bbox[i + 3] = bbox[i + 3].max(p[i]);
        }
    }
    Some(bbox)
}
