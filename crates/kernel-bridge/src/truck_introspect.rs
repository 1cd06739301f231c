//! KernelIntrospect implementation for TruckKernel.
//!
//! Sub-shape ids are handle-relative: `handle * STRIDE + index` for faces,
//! `handle * STRIDE + EDGE_BASE + index` for edges. Stable for the session
//! because stored solids are never mutated in place.

use crate::tessellation;
use crate::traits::KernelIntrospect;
use crate::truck_kernel::TruckKernel;
use crate::types::*;

use truck_modeling::geometry::Surface;
use truck_modeling::topology::{Edge, Face, Solid};
use truck_modeling::{BoundedCurve, ParameterDivision1D};

const STRIDE: u64 = 1_000_000;
const EDGE_BASE: u64 = 500_000;

pub(crate) fn face_id_for(handle_id: u64, index: u64) -> FaceId {
    FaceId(handle_id * STRIDE + index)
}

fn edge_id_for(handle_id: u64, index: u64) -> EdgeId {
    EdgeId(handle_id * STRIDE + EDGE_BASE + index)
}

fn face_owner(face: FaceId) -> (u64, usize) {
    (face.0 / STRIDE, (face.0 % STRIDE) as usize)
}

fn edge_owner(edge: EdgeId) -> (u64, usize) {
    (edge.0 / STRIDE, ((edge.0 % STRIDE) - EDGE_BASE) as usize)
}

/// All faces of a solid in shell iteration order.
fn faces_of(solid: &Solid) -> Vec<&Face> {
    solid
        .boundaries()
        .iter()
        .flat_map(|shell| shell.face_iter())
        .collect()
}

/// Unique edges of a solid in first-seen order.
fn edges_of(solid: &Solid) -> Vec<Edge> {
    let mut seen = std::collections::HashSet::new();
    let mut edges = Vec::new();
    for shell in solid.boundaries().iter() {
        for edge in shell.edge_iter() {
            if seen.insert(edge.id()) {
                edges.push(edge.clone());
            }
        }
    }
    edges
}

fn vertex_mean(face: &Face) -> [f64; 3] {
    let mut sum = [0.0; 3];
    let mut count = 0.0;
    for wire in face.boundaries() {
        for v in wire.vertex_iter() {
            let p = v.point();
            sum[0] += p[0];
            sum[1] += p[1];
            sum[2] += p[2];
            count += 1.0;
        }
    }
    if count > 0.0 {
        [sum[0] / count, sum[1] / count, sum[2] / count]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Triangle-fan area of the outer boundary around a pivot. Exact for convex
/// planar faces, an estimate elsewhere.
fn fan_area(face: &Face, pivot: [f64; 3]) -> f64 {
    let Some(wire) = face.boundaries().first().cloned() else {
        return 0.0;
    };
    let pts: Vec<[f64; 3]> = wire
        .vertex_iter()
        .map(|v| {
            let p = v.point();
            [p[0], p[1], p[2]]
        })
        .collect();
    let mut area = 0.0;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        let u = [a[0] - pivot[0], a[1] - pivot[1], a[2] - pivot[2]];
        let v = [b[0] - pivot[0], b[1] - pivot[1], b[2] - pivot[2]];
        let c = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        area += 0.5 * (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
    }
    area
}

fn face_info_of(face: &Face) -> FaceInfo {
    let surface = face.oriented_surface();
    let centroid = vertex_mean(face);
    let area = fan_area(face, centroid);
    match surface {
        Surface::Plane(plane) => {
            let n = plane.normal();
            FaceInfo {
                normal: [n[0], n[1], n[2]],
                centroid,
                area,
                is_planar: true,
            }
        }
        _ => FaceInfo {
            normal: [0.0, 0.0, 0.0],
            centroid,
            area,
            is_planar: false,
        },
    }
}

fn edge_info_of(edge: &Edge) -> EdgeInfo {
    let curve = edge.oriented_curve();
    let range = curve.range_tuple();
    let (_params, points) = curve.parameter_division(range, 0.1);

    let front = edge.front().point();
    let back = edge.back().point();

    let mut length = 0.0;
    let mut z_min = f64::MAX;
    let mut z_max = f64::MIN;
    for w in points.windows(2) {
        let d = w[1] - w[0];
        length += (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    }
    for p in &points {
        z_min = z_min.min(p[2]);
        z_max = z_max.max(p[2]);
    }
    if points.is_empty() {
        z_min = front[2].min(back[2]);
        z_max = front[2].max(back[2]);
    }

    let midpoint = if points.is_empty() {
        [
            (front[0] + back[0]) / 2.0,
            (front[1] + back[1]) / 2.0,
            (front[2] + back[2]) / 2.0,
        ]
    } else {
        let m = points[points.len() / 2];
        [m[0], m[1], m[2]]
    };

    let chord = [back[0] - front[0], back[1] - front[1], back[2] - front[2]];
    let chord_len = (chord[0] * chord[0] + chord[1] * chord[1] + chord[2] * chord[2]).sqrt();
    let direction = if chord_len < 1e-9 {
        [0.0, 0.0, 0.0]
    } else {
        [
            chord[0] / chord_len,
            chord[1] / chord_len,
            chord[2] / chord_len,
        ]
    };

    EdgeInfo {
        midpoint,
        direction,
        length,
        z_min,
        z_max,
    }
}

impl KernelIntrospect for TruckKernel {
    fn list_faces(&self, solid: &SolidHandle) -> Vec<FaceId> {
        let Some(truck_solid) = self.get_solid(solid) else {
            return Vec::new();
        };
        (0..faces_of(truck_solid).len() as u64)
            .map(|i| face_id_for(solid.id(), i))
            .collect()
    }

    fn list_edges(&self, solid: &SolidHandle) -> Vec<EdgeId> {
        let Some(truck_solid) = self.get_solid(solid) else {
            return Vec::new();
        };
        (0..edges_of(truck_solid).len() as u64)
            .map(|i| edge_id_for(solid.id(), i))
            .collect()
    }

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId> {
        let (handle_id, face_idx) = face_owner(face);
        let Some(truck_solid) = self.get_solid(&SolidHandle(handle_id)) else {
            return Vec::new();
        };
        let faces = faces_of(truck_solid);
        let Some(target) = faces.get(face_idx) else {
            return Vec::new();
        };

        let edges = edges_of(truck_solid);
        let index_of: std::collections::HashMap<_, _> = edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id(), i as u64))
            .collect();

        let mut result = Vec::new();
        for wire in target.boundaries() {
            for edge in wire.edge_iter() {
                if let Some(&i) = index_of.get(&edge.id()) {
                    result.push(edge_id_for(handle_id, i));
                }
            }
        }
        result
    }

    fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId> {
        let (handle_id, edge_idx) = edge_owner(edge);
        let Some(truck_solid) = self.get_solid(&SolidHandle(handle_id)) else {
            return Vec::new();
        };
        let edges = edges_of(truck_solid);
        let Some(target) = edges.get(edge_idx) else {
            return Vec::new();
        };
        let target_id = target.id();

        let mut result = Vec::new();
        for (fi, face) in faces_of(truck_solid).iter().enumerate() {
            let has_edge = face
                .boundaries()
                .iter()
                .flat_map(|w| w.edge_iter())
                .any(|e| e.id() == target_id);
            if has_edge {
                result.push(face_id_for(handle_id, fi as u64));
            }
        }
        result
    }

    fn face_info(&self, face: FaceId) -> Option<FaceInfo> {
        let (handle_id, face_idx) = face_owner(face);
        let truck_solid = self.get_solid(&SolidHandle(handle_id))?;
        faces_of(truck_solid).get(face_idx).map(|f| face_info_of(f))
    }

    fn edge_info(&self, edge: EdgeId) -> Option<EdgeInfo> {
        let (handle_id, edge_idx) = edge_owner(edge);
        let truck_solid = self.get_solid(&SolidHandle(handle_id))?;
        edges_of(truck_solid).get(edge_idx).map(edge_info_of)
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Option<[f64; 6]> {
        let truck_solid = self.get_solid(solid)?;
        tessellation::solid_bounding_box(truck_solid, 0.1)
    }

    fn face_bounding_box(&self, face: FaceId) -> Option<[f64; 6]> {
        let (handle_id, face_idx) = face_owner(face);
        let truck_solid = self.get_solid(&SolidHandle(handle_id))?;
        let faces = faces_of(truck_solid);
        let target = faces.get(face_idx)?;

        let mut bbox = [
            f64::MAX,
            f64::MAX,
            f64::MAX,
            f64::MIN,
            f64::MIN,
            f64::MIN,
        ];
        let mut any = false;
        for wire in target.boundaries() {
            for v in wire.vertex_iter() {
                let p = v.point();
                for i in 0..3 {
                    bbox[i] = bbox[i].min(p[i]);
                    bbox[i + 3] = bbox[i + 3].max(p[i]);
                }
                any = true;
            }
        }
        if any {
            Some(bbox)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Kernel;

    #[test]
    fn box_face_and_edge_counts() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.make_box(1.0, 1.0, 1.0).unwrap();

        assert_eq!(kernel.list_faces(&handle).len(), 6);
        assert_eq!(kernel.list_edges(&handle).len(), 12);
        for face in kernel.list_faces(&handle) {
            assert_eq!(kernel.face_edges(face).len(), 4);
        }
    }

    #[test]
    fn box_faces_are_planar_with_unit_normals() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.make_box(2.0, 2.0, 2.0).unwrap();

        for face in kernel.list_faces(&handle) {
            let info = kernel.face_info(face).unwrap();
            assert!(info.is_planar);
            let n = info.normal;
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-9, "normal should be unit length");
        }
    }

    #[test]
    fn every_box_edge_bounds_two_faces() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.make_box(1.0, 2.0, 3.0).unwrap();

        for edge in kernel.list_edges(&handle) {
            assert_eq!(kernel.edge_faces(edge).len(), 2);
        }
    }

    #[test]
    fn cylinder_bounding_box_covers_the_radius() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.make_cylinder(2.0, 5.0).unwrap();
        let bbox = kernel.bounding_box(&handle).unwrap();
        assert!(bbox[0] < -1.9 && bbox[3] > 1.9);
        assert!(bbox[2] > -0.1 && (bbox[5] - 5.0).abs() < 0.1);
    }
}
