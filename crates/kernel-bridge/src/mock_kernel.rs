//! MockKernel — deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Primitives carry exact analytic per-face and per-edge data, and transforms
//! update that data exactly, so naming, selection and pattern layout can be
//! tested without real boolean numerics. Booleans are approximated: union
//! merges both operands' topology under fresh ids, subtraction keeps the left
//! operand's topology. `cut_many` records each batched call so tests can
//! assert the single-cut contract.

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;
use camber_types::vec3;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
struct MockFace {
    id: u64,
    normal: [f64; 3],
    centroid: [f64; 3],
    area: f64,
    is_planar: bool,
    bbox: [f64; 6],
    edges: Vec<u64>,
}

#[derive(Debug, Clone)]
struct MockEdge {
    id: u64,
    p0: [f64; 3],
    p1: [f64; 3],
    midpoint: [f64; 3],
    length: f64,
    bbox: [f64; 6],
}

#[derive(Debug, Clone)]
struct MockSolid {
    faces: Vec<MockFace>,
    edges: Vec<MockEdge>,
    bbox: [f64; 6],
}

/// Deterministic geometry double with observable boolean bookkeeping.
pub struct MockKernel {
    next_handle: u64,
    next_id: u64,
    solids: HashMap<u64, MockSolid>,
    face_index: HashMap<u64, (u64, usize)>,
    edge_index: HashMap<u64, (u64, usize)>,
    batched_cut_count: usize,
    last_batched_tools: Vec<SolidHandle>,
    refuse_feature_edges: HashSet<u64>,
    fail_next_boolean: bool,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_id: 1,
            solids: HashMap::new(),
            face_index: HashMap::new(),
            edge_index: HashMap::new(),
            batched_cut_count: 0,
            last_batched_tools: Vec::new(),
            refuse_feature_edges: HashSet::new(),
            fail_next_boolean: false,
        }
    }

    /// Number of batched cut calls issued so far.
    pub fn batched_cut_count(&self) -> usize {
        self.batched_cut_count
    }

    /// Tool handles of the most recent batched cut.
    pub fn last_batched_tools(&self) -> Vec<SolidHandle> {
        self.last_batched_tools.clone()
    }

    /// Make the fillet/chamfer builder reject this edge (simulates an
    /// unfeaturable edge).
    pub fn refuse_feature_edge(&mut self, edge: EdgeId) {
        self.refuse_feature_edges.insert(edge.0);
    }

    /// Fail the next boolean operation with `BooleanFailed`.
    pub fn fail_next_boolean(&mut self) {
        self.fail_next_boolean = true;
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn store(&mut self, solid: MockSolid) -> SolidHandle {
        let handle = SolidHandle(self.next_handle);
        self.next_handle += 1;
        for (i, f) in solid.faces.iter().enumerate() {
            self.face_index.insert(f.id, (handle.id(), i));
        }
        for (i, e) in solid.edges.iter().enumerate() {
            self.edge_index.insert(e.id, (handle.id(), i));
        }
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn require(&self, handle: &SolidHandle) -> Result<MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .cloned()
            .ok_or(KernelError::EntityNotFound { id: handle.id() })
    }

    fn take_boolean_failure(&mut self) -> Result<(), KernelError> {
        if self.fail_next_boolean {
            self.fail_next_boolean = false;
            return Err(KernelError::BooleanFailed {
                reason: "forced boolean failure".to_string(),
            });
        }
        Ok(())
    }

    /// Copy a solid under fresh ids, keeping face/edge incidence.
    fn re_id(&mut self, solid: &MockSolid) -> MockSolid {
        let mut edge_map = HashMap::new();
        let edges = solid
            .edges
            .iter()
            .map(|e| {
                let id = self.alloc_id();
                edge_map.insert(e.id, id);
                MockEdge { id, ..e.clone() }
            })
            .collect();
        let faces = solid
            .faces
            .iter()
            .map(|f| MockFace {
                id: self.alloc_id(),
                edges: f.edges.iter().map(|e| edge_map[e]).collect(),
                ..f.clone()
            })
            .collect();
        MockSolid {
            faces,
            edges,
            bbox: solid.bbox,
        }
    }

    fn merge(&mut self, a: &MockSolid, b: &MockSolid) -> MockSolid {
        let ra = self.re_id(a);
        let rb = self.re_id(b);
        MockSolid {
            faces: ra.faces.into_iter().chain(rb.faces).collect(),
            edges: ra.edges.into_iter().chain(rb.edges).collect(),
            bbox: vec3::bbox_union(a.bbox, b.bbox),
        }
    }

    // ── Primitive construction ─────────────────────────────────────────────

    fn box_solid(&mut self, l: f64, w: f64, h: f64) -> MockSolid {
        let (hx, hy) = (l / 2.0, w / 2.0);
        let corners = [
            [-hx, -hy, 0.0],
            [hx, -hy, 0.0],
            [hx, hy, 0.0],
            [-hx, hy, 0.0],
            [-hx, -hy, h],
            [hx, -hy, h],
            [hx, hy, h],
            [-hx, hy, h],
        ];
        // 4 bottom, 4 top, 4 vertical
        let edge_pairs = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let edges: Vec<MockEdge> = edge_pairs
            .iter()
            .map(|&(i, j)| self.segment_edge(corners[i], corners[j]))
            .collect();

        type BoxFace = (Vec<usize>, [f64; 3], [f64; 3], f64);
        let face_defs: Vec<BoxFace> = vec![
            (vec![0, 1, 2, 3], [0.0, 0.0, -1.0], [0.0, 0.0, 0.0], l * w),
            (vec![4, 5, 6, 7], [0.0, 0.0, 1.0], [0.0, 0.0, h], l * w),
            (vec![0, 9, 4, 8], [0.0, -1.0, 0.0], [0.0, -hy, h / 2.0], l * h),
            (vec![2, 11, 6, 10], [0.0, 1.0, 0.0], [0.0, hy, h / 2.0], l * h),
            (vec![3, 8, 7, 11], [-1.0, 0.0, 0.0], [-hx, 0.0, h / 2.0], w * h),
            (vec![1, 10, 5, 9], [1.0, 0.0, 0.0], [hx, 0.0, h / 2.0], w * h),
        ];
        let faces = face_defs
            .into_iter()
            .map(|(edge_idx, normal, centroid, area)| {
                let ids = edge_idx.iter().map(|&i| edges[i].id).collect::<Vec<_>>();
                let bbox = edge_idx
                    .iter()
                    .map(|&i| edges[i].bbox)
                    .reduce(vec3::bbox_union)
                    .unwrap();
                MockFace {
                    id: self.alloc_id(),
                    normal,
                    centroid,
                    area,
                    is_planar: true,
                    bbox,
                    edges: ids,
                }
            })
            .collect();

        MockSolid {
            faces,
            edges,
            bbox: [-hx, -hy, 0.0, hx, hy, h],
        }
    }

    fn segment_edge(&mut self, p0: [f64; 3], p1: [f64; 3]) -> MockEdge {
        MockEdge {
            id: self.alloc_id(),
            p0,
            p1,
            midpoint: vec3::scale(vec3::add(p0, p1), 0.5),
            length: vec3::distance(p0, p1),
            bbox: [
                p0[0].min(p1[0]),
                p0[1].min(p1[1]),
                p0[2].min(p1[2]),
                p0[0].max(p1[0]),
                p0[1].max(p1[1]),
                p0[2].max(p1[2]),
            ],
        }
    }

    fn circle_edge(&mut self, radius: f64, z: f64) -> MockEdge {
        MockEdge {
            id: self.alloc_id(),
            p0: [radius, 0.0, z],
            p1: [radius, 0.0, z],
            // parameter midpoint of a full circle starting at (r, 0)
            midpoint: [-radius, 0.0, z],
            length: 2.0 * PI * radius,
            bbox: [-radius, -radius, z, radius, radius, z],
        }
    }

    fn cylinder_solid(&mut self, r: f64, h: f64) -> MockSolid {
        let bottom_circle = self.circle_edge(r, 0.0);
        let top_circle = self.circle_edge(r, h);
        let bottom_id = bottom_circle.id;
        let top_id = top_circle.id;

        let bottom = MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, -1.0],
            centroid: [0.0, 0.0, 0.0],
            area: PI * r * r,
            is_planar: true,
            bbox: [-r, -r, 0.0, r, r, 0.0],
            edges: vec![bottom_id],
        };
        let top = MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, 1.0],
            centroid: [0.0, 0.0, h],
            area: PI * r * r,
            is_planar: true,
            bbox: [-r, -r, h, r, r, h],
            edges: vec![top_id],
        };
        let side = MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, 0.0],
            centroid: [0.0, 0.0, h / 2.0],
            area: 2.0 * PI * r * h,
            is_planar: false,
            bbox: [-r, -r, 0.0, r, r, h],
            edges: vec![bottom_id, top_id],
        };

        MockSolid {
            faces: vec![bottom, top, side],
            edges: vec![bottom_circle, top_circle],
            bbox: [-r, -r, 0.0, r, r, h],
        }
    }

    fn sphere_solid(&mut self, r: f64) -> MockSolid {
        let face = MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, 0.0],
            centroid: [0.0, 0.0, r],
            area: 4.0 * PI * r * r,
            is_planar: false,
            bbox: [-r, -r, 0.0, r, r, 2.0 * r],
            edges: Vec::new(),
        };
        MockSolid {
            faces: vec![face],
            edges: Vec::new(),
            bbox: [-r, -r, 0.0, r, r, 2.0 * r],
        }
    }

    fn polygon_solid(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        depth: f64,
    ) -> Result<MockSolid, KernelError> {
        if outer.len() < 3 {
            return Err(KernelError::InvalidInput {
                message: "outer contour has fewer than 3 points".to_string(),
            });
        }
        // Outer counter-clockwise, holes clockwise, so the shared side-face
        // normal formula points out of the material for both.
        let outer = oriented(outer, true);
        let holes: Vec<Vec<[f64; 2]>> = holes.iter().map(|h| oriented(h, false)).collect();

        let (outer_area, outer_centroid) = ring_area_centroid(&outer);
        let mut net_area = outer_area.abs();
        let mut weighted = vec3::scale([outer_centroid[0], outer_centroid[1], 0.0], outer_area.abs());
        for h in &holes {
            let (a, c) = ring_area_centroid(h);
            net_area -= a.abs();
            weighted = vec3::sub(weighted, vec3::scale([c[0], c[1], 0.0], a.abs()));
        }
        let cap_centroid = if net_area.abs() > 1e-12 {
            vec3::scale(weighted, 1.0 / net_area)
        } else {
            [outer_centroid[0], outer_centroid[1], 0.0]
        };

        let mut edges: Vec<MockEdge> = Vec::new();
        let mut faces: Vec<MockFace> = Vec::new();
        let mut bottom_edge_ids = Vec::new();
        let mut top_edge_ids = Vec::new();

        let mut rings: Vec<&[[f64; 2]]> = vec![outer.as_slice()];
        for h in &holes {
            rings.push(h.as_slice());
        }

        for ring in &rings {
            let n = ring.len();
            let mut ring_bottom = Vec::new();
            let mut ring_top = Vec::new();
            let mut ring_vertical = Vec::new();
            for i in 0..n {
                let j = (i + 1) % n;
                let b0 = [ring[i][0], ring[i][1], 0.0];
                let b1 = [ring[j][0], ring[j][1], 0.0];
                let t0 = [ring[i][0], ring[i][1], depth];
                ring_bottom.push(edges.len());
                edges.push(self.segment_edge(b0, b1));
                ring_top.push(edges.len());
                edges.push(self.segment_edge(
                    [b0[0], b0[1], depth],
                    [b1[0], b1[1], depth],
                ));
                ring_vertical.push(edges.len());
                edges.push(self.segment_edge(b0, t0));
            }
            for i in 0..n {
                let j = (i + 1) % n;
                let d = [ring[j][0] - ring[i][0], ring[j][1] - ring[i][1]];
                let seg_len = (d[0] * d[0] + d[1] * d[1]).sqrt();
                if seg_len < 1e-12 {
                    continue;
                }
                let normal = [d[1] / seg_len, -d[0] / seg_len, 0.0];
                let mid = [
                    (ring[i][0] + ring[j][0]) / 2.0,
                    (ring[i][1] + ring[j][1]) / 2.0,
                    depth / 2.0,
                ];
                let edge_ids = vec![
                    edges[ring_bottom[i]].id,
                    edges[ring_top[i]].id,
                    edges[ring_vertical[i]].id,
                    edges[ring_vertical[j]].id,
                ];
                let bbox = [
                    ring[i][0].min(ring[j][0]),
                    ring[i][1].min(ring[j][1]),
                    0.0,
                    ring[i][0].max(ring[j][0]),
                    ring[i][1].max(ring[j][1]),
                    depth,
                ];
                faces.push(MockFace {
                    id: self.alloc_id(),
                    normal,
                    centroid: mid,
                    area: seg_len * depth,
                    is_planar: true,
                    bbox,
                    edges: edge_ids,
                });
            }
            bottom_edge_ids.extend(ring_bottom.iter().map(|&i| edges[i].id));
            top_edge_ids.extend(ring_top.iter().map(|&i| edges[i].id));
        }

        let mut bbox2 = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
        for p in &outer {
            bbox2[0] = bbox2[0].min(p[0]);
            bbox2[1] = bbox2[1].min(p[1]);
            bbox2[2] = bbox2[2].max(p[0]);
            bbox2[3] = bbox2[3].max(p[1]);
        }
        let cap_bbox = |z: f64| [bbox2[0], bbox2[1], z, bbox2[2], bbox2[3], z];

        faces.push(MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, -1.0],
            centroid: [cap_centroid[0], cap_centroid[1], 0.0],
            area: net_area,
            is_planar: true,
            bbox: cap_bbox(0.0),
            edges: bottom_edge_ids,
        });
        faces.push(MockFace {
            id: self.alloc_id(),
            normal: [0.0, 0.0, 1.0],
            centroid: [cap_centroid[0], cap_centroid[1], depth],
            area: net_area,
            is_planar: true,
            bbox: cap_bbox(depth),
            edges: top_edge_ids,
        });

        Ok(MockSolid {
            faces,
            edges,
            bbox: [bbox2[0], bbox2[1], 0.0, bbox2[2], bbox2[3], depth],
        })
    }

    fn transformed(
        &mut self,
        solid: &MockSolid,
        f: impl Fn([f64; 3]) -> [f64; 3],
        rotate_vectors: Option<([f64; 3], f64)>,
    ) -> MockSolid {
        let map_bbox = |bbox: [f64; 6]| -> [f64; 6] {
            let mut out = [
                f64::MAX,
                f64::MAX,
                f64::MAX,
                f64::MIN,
                f64::MIN,
                f64::MIN,
            ];
            for &x in &[bbox[0], bbox[3]] {
                for &y in &[bbox[1], bbox[4]] {
                    for &z in &[bbox[2], bbox[5]] {
                        let p = f([x, y, z]);
                        for i in 0..3 {
                            out[i] = out[i].min(p[i]);
                            out[i + 3] = out[i + 3].max(p[i]);
                        }
                    }
                }
            }
            out
        };

        let mut edge_map = HashMap::new();
        let edges = solid
            .edges
            .iter()
            .map(|e| {
                let id = self.alloc_id();
                edge_map.insert(e.id, id);
                MockEdge {
                    id,
                    p0: f(e.p0),
                    p1: f(e.p1),
                    midpoint: f(e.midpoint),
                    length: e.length,
                    bbox: map_bbox(e.bbox),
                }
            })
            .collect();
        let faces = solid
            .faces
            .iter()
            .map(|face| {
                let normal = match rotate_vectors {
                    Some((axis, angle)) => vec3::rotate_about(face.normal, axis, angle),
                    None => face.normal,
                };
                MockFace {
                    id: self.alloc_id(),
                    normal,
                    centroid: f(face.centroid),
                    area: face.area,
                    is_planar: face.is_planar,
                    bbox: map_bbox(face.bbox),
                    edges: face.edges.iter().map(|e| edge_map[e]).collect(),
                }
            })
            .collect();

        MockSolid {
            faces,
            edges,
            bbox: map_bbox(solid.bbox),
        }
    }
}

/// Return the ring with the requested winding (true = counter-clockwise).
fn oriented(ring: &[[f64; 2]], ccw: bool) -> Vec<[f64; 2]> {
    let (area, _) = ring_area_centroid(ring);
    if (area > 0.0) == ccw {
        ring.to_vec()
    } else {
        ring.iter().rev().copied().collect()
    }
}

/// Shoelace signed area and centroid of a 2D ring.
fn ring_area_centroid(ring: &[[f64; 2]]) -> (f64, [f64; 2]) {
    let n = ring.len();
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let w = ring[i][0] * ring[j][1] - ring[j][0] * ring[i][1];
        area += w;
        cx += (ring[i][0] + ring[j][0]) * w;
        cy += (ring[i][1] + ring[j][1]) * w;
    }
    area /= 2.0;
    if area.abs() < 1e-12 {
        let inv = 1.0 / n as f64;
        let mx = ring.iter().map(|p| p[0]).sum::<f64>() * inv;
        let my = ring.iter().map(|p| p[1]).sum::<f64>() * inv;
        return (area, [mx, my]);
    }
    (area, [cx / (6.0 * area), cy / (6.0 * area)])
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn make_box(
        &mut self,
        length: f64,
        width: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = self.box_solid(length, width, height);
        Ok(self.store(solid))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError> {
        let solid = self.cylinder_solid(radius, height);
        Ok(self.store(solid))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError> {
        let solid = self.sphere_solid(radius);
        Ok(self.store(solid))
    }

    fn make_prism(
        &mut self,
        sides: u32,
        flat_to_flat: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError> {
        if sides < 3 {
            return Err(KernelError::InvalidInput {
                message: format!("prism needs at least 3 sides, got {}", sides),
            });
        }
        let ring = crate::primitives::prism_ring(sides, flat_to_flat);
        let solid = self.polygon_solid(&ring, &[], height)?;
        Ok(self.store(solid))
    }

    fn extrude_polygon(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = self.polygon_solid(outer, holes, depth)?;
        Ok(self.store(solid))
    }

    fn translate_solid(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let s = self.require(solid)?;
        let moved = self.transformed(&s, |p| vec3::add(p, offset), None);
        Ok(self.store(moved))
    }

    fn rotate_solid(
        &mut self,
        solid: &SolidHandle,
        axis: [f64; 3],
        angle: f64,
    ) -> Result<SolidHandle, KernelError> {
        if vec3::norm(axis) < 1e-12 {
            return Err(KernelError::InvalidInput {
                message: "rotation axis has zero length".to_string(),
            });
        }
        let s = self.require(solid)?;
        let moved = self.transformed(
            &s,
            |p| vec3::rotate_about(p, axis, angle),
            Some((axis, angle)),
        );
        Ok(self.store(moved))
    }

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.require(a)?;
        let sb = self.require(b)?;
        let merged = self.merge(&sa, &sb);
        Ok(self.store(merged))
    }

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.require(a)?;
        self.require(b)?;
        let result = self.re_id(&sa);
        Ok(self.store(result))
    }

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.require(a)?;
        self.require(b)?;
        let result = self.re_id(&sa);
        Ok(self.store(result))
    }

    fn cut_many(
        &mut self,
        a: &SolidHandle,
        tools: &[SolidHandle],
    ) -> Result<SolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.require(a)?;
        for tool in tools {
            self.require(tool)?;
        }
        self.batched_cut_count += 1;
        self.last_batched_tools = tools.to_vec();
        let result = self.re_id(&sa);
        Ok(self.store(result))
    }

    fn unify_same_domain(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let s = self.require(solid)?;
        let mut groups: HashMap<(i64, i64, i64, i64), Vec<usize>> = HashMap::new();
        let quant = |v: f64| (v * 1e6).round() as i64;
        for (i, f) in s.faces.iter().enumerate() {
            if !f.is_planar {
                continue;
            }
            let d = vec3::dot(f.normal, f.centroid);
            groups
                .entry((quant(f.normal[0]), quant(f.normal[1]), quant(f.normal[2]), quant(d)))
                .or_default()
                .push(i);
        }

        let mut consumed: HashSet<usize> = HashSet::new();
        let mut faces: Vec<MockFace> = Vec::new();
        for (i, f) in s.faces.iter().enumerate() {
            if consumed.contains(&i) {
                continue;
            }
            let d = vec3::dot(f.normal, f.centroid);
            let group = if f.is_planar {
                groups
                    .get(&(quant(f.normal[0]), quant(f.normal[1]), quant(f.normal[2]), quant(d)))
                    .cloned()
                    .unwrap_or_else(|| vec![i])
            } else {
                vec![i]
            };
            if group.len() <= 1 {
                faces.push(f.clone());
                continue;
            }
            let mut area = 0.0;
            let mut centroid = [0.0; 3];
            let mut bbox = s.faces[group[0]].bbox;
            let mut edge_ids = Vec::new();
            for &gi in &group {
                consumed.insert(gi);
                let g = &s.faces[gi];
                area += g.area;
                centroid = vec3::add(centroid, vec3::scale(g.centroid, g.area));
                bbox = vec3::bbox_union(bbox, g.bbox);
                edge_ids.extend(g.edges.iter().copied());
            }
            if area > 1e-12 {
                centroid = vec3::scale(centroid, 1.0 / area);
            }
            faces.push(MockFace {
                id: f.id,
                normal: f.normal,
                centroid,
                area,
                is_planar: true,
                bbox,
                edges: edge_ids,
            });
        }

        let unified = MockSolid {
            faces,
            edges: s.edges.clone(),
            bbox: s.bbox,
        };
        let unified = self.re_id(&unified);
        Ok(self.store(unified))
    }

    fn fillet_edges(
        &mut self,
        solid: &SolidHandle,
        edges: &[EdgeId],
        _radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        let s = self.require(solid)?;
        let added = edges
            .iter()
            .filter(|e| !self.refuse_feature_edges.contains(&e.0))
            .count();
        if added == 0 {
            return Err(KernelError::FeatureFailed {
                reason: "No edges were added".to_string(),
            });
        }
        let result = self.re_id(&s);
        Ok(self.store(result))
    }

    fn chamfer_edges(
        &mut self,
        solid: &SolidHandle,
        edges: &[EdgeId],
        distance: f64,
    ) -> Result<SolidHandle, KernelError> {
        self.fillet_edges(solid, edges, distance)
    }

    fn make_compound(&mut self, parts: &[SolidHandle]) -> Result<SolidHandle, KernelError> {
        let mut solids = Vec::new();
        for p in parts {
            solids.push(self.require(p)?);
        }
        let Some(first) = solids.first().cloned() else {
            return Err(KernelError::InvalidInput {
                message: "compound needs at least one part".to_string(),
            });
        };
        let mut acc = self.re_id(&first);
        for s in &solids[1..] {
            acc = self.merge(&acc, s);
        }
        Ok(self.store(acc))
    }

    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        _linear_deflection: f64,
        _angular_deflection: f64,
    ) -> Result<RenderMesh, KernelError> {
        let s = self.require(solid)?;

        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();
        let mut face_ranges = Vec::new();

        // One quad per face, sized from its area and placed at its centroid.
        for face in &s.faces {
            let start_index = indices.len() as u32;
            let base_vertex = (vertices.len() / 3) as u32;

            let n = if vec3::norm(face.normal) < 1e-9 {
                [0.0, 0.0, 1.0]
            } else {
                face.normal
            };
            let half = face.area.sqrt() / 2.0;
            let (u, v) = tangent_vectors(n);
            let c = face.centroid;

            let corners = [
                vec3::sub(vec3::sub(c, vec3::scale(u, half)), vec3::scale(v, half)),
                vec3::sub(vec3::add(c, vec3::scale(u, half)), vec3::scale(v, half)),
                vec3::add(vec3::add(c, vec3::scale(u, half)), vec3::scale(v, half)),
                vec3::add(vec3::sub(c, vec3::scale(u, half)), vec3::scale(v, half)),
            ];
            for corner in &corners {
                vertices.extend_from_slice(&[corner[0] as f32, corner[1] as f32, corner[2] as f32]);
                normals.extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
            }
            indices.extend_from_slice(&[
                base_vertex,
                base_vertex + 1,
                base_vertex + 2,
                base_vertex,
                base_vertex + 2,
                base_vertex + 3,
            ]);

            face_ranges.push(FaceRange {
                face: FaceId(face.id),
                start_index,
                end_index: indices.len() as u32,
            });
        }

        Ok(RenderMesh {
            vertices,
            normals,
            indices,
            face_ranges,
        })
    }
}

/// Two tangent vectors orthogonal to a normal.
fn tangent_vectors(n: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    let up = if n[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let u = vec3::normalize(vec3::cross(up, n));
    let v = vec3::cross(n, u);
    (u, v)
}

impl KernelIntrospect for MockKernel {
    fn list_faces(&self, solid: &SolidHandle) -> Vec<FaceId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.faces.iter().map(|f| FaceId(f.id)).collect())
            .unwrap_or_default()
    }

    fn list_edges(&self, solid: &SolidHandle) -> Vec<EdgeId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.edges.iter().map(|e| EdgeId(e.id)).collect())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId> {
        let Some(&(solid_id, idx)) = self.face_index.get(&face.0) else {
            return Vec::new();
        };
        self.solids
            .get(&solid_id)
            .and_then(|s| s.faces.get(idx))
            .map(|f| f.edges.iter().map(|&e| EdgeId(e)).collect())
            .unwrap_or_default()
    }

    fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId> {
        let Some(&(solid_id, _)) = self.edge_index.get(&edge.0) else {
            return Vec::new();
        };
        self.solids
            .get(&solid_id)
            .map(|s| {
                s.faces
                    .iter()
                    .filter(|f| f.edges.contains(&edge.0))
                    .map(|f| FaceId(f.id))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn face_info(&self, face: FaceId) -> Option<FaceInfo> {
        let &(solid_id, idx) = self.face_index.get(&face.0)?;
        let f = self.solids.get(&solid_id)?.faces.get(idx)?;
        Some(FaceInfo {
            normal: f.normal,
            centroid: f.centroid,
            area: f.area,
            is_planar: f.is_planar,
        })
    }

    fn edge_info(&self, edge: EdgeId) -> Option<EdgeInfo> {
        let &(solid_id, idx) = self.edge_index.get(&edge.0)?;
        let e = self.solids.get(&solid_id)?.edges.get(idx)?;
        Some(EdgeInfo {
            midpoint: e.midpoint,
            direction: vec3::normalize(vec3::sub(e.p1, e.p0)),
            length: e.length,
            z_min: e.bbox[2],
            z_max: e.bbox[5],
        })
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Option<[f64; 6]> {
        self.solids.get(&solid.id()).map(|s| s.bbox)
    }

    fn face_bounding_box(&self, face: FaceId) -> Option<[f64; 6]> {
        let &(solid_id, idx) = self.face_index.get(&face.0)?;
        self.solids.get(&solid_id)?.faces.get(idx).map(|f| f.bbox)
    }
}
