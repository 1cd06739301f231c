//! Vertex welding: merge vertices coincident within a spatial tolerance so
//! export meshes are manifold.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grid cell size for deduplication.
pub const WELD_TOLERANCE: f64 = 1e-5;

/// A deduplicated mesh; every original index maps to exactly one welded
/// index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeldedMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl WeldedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

fn grid_key(x: f32, y: f32, z: f32, tolerance: f64) -> (i64, i64, i64) {
    (
        (x as f64 / tolerance).round() as i64,
        (y as f64 / tolerance).round() as i64,
        (z as f64 / tolerance).round() as i64,
    )
}

/// Weld a raw vertex/index mesh onto a rounded-coordinate grid.
pub fn weld(vertices: &[f32], indices: &[u32], tolerance: f64) -> WeldedMesh {
    let mut buckets: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(vertices.len() / 3);
    let mut welded: Vec<f32> = Vec::new();

    for i in 0..vertices.len() / 3 {
        let (x, y, z) = (vertices[i * 3], vertices[i * 3 + 1], vertices[i * 3 + 2]);
        let key = grid_key(x, y, z, tolerance);
        let index = *buckets.entry(key).or_insert_with(|| {
            let new_index = (welded.len() / 3) as u32;
            welded.extend_from_slice(&[x, y, z]);
            new_index
        });
        remap.push(index);
    }

    let indices = indices
        .iter()
        .map(|&i| remap.get(i as usize).copied().unwrap_or(0))
        .collect();

    WeldedMesh {
        vertices: welded,
        indices,
    }
}
