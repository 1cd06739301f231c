//! The semantic naming layer: canonical auto-naming, lazy edge names,
//! post-boolean re-matching and name resolution.
//!
//! Names are a side table of geometric fingerprints (`FaceRef`/`EdgeRef`)
//! kept flat on the shape; re-identification is similarity scoring, never
//! kernel identity.

use std::collections::{BTreeMap, HashMap};

use camber_types::{
    edge_name, split_dotted, vec3, EdgeRef, FaceRef, CANONICAL_DOT_THRESHOLD, CANONICAL_FACES,
    SIDE_FACE,
};
use kernel_bridge::{EdgeId, FaceId, KernelIntrospect, SolidHandle};

use crate::shape::{AutoName, Shape, SubPart};

/// Minimum blended score for a post-boolean greedy assignment.
const REMATCH_FLOOR: f64 = 0.30;

/// Cylinder cap normals must be within this of the ±Z axis.
const CAP_DOT_THRESHOLD: f64 = 0.95;

pub(crate) fn face_ref_of(kb: &dyn KernelIntrospect, face: FaceId) -> Option<FaceRef> {
    kb.face_info(face).map(|info| FaceRef {
        normal: info.normal,
        centroid: info.centroid,
        area: info.area,
    })
}

pub(crate) fn edge_ref_of(kb: &dyn KernelIntrospect, edge: EdgeId) -> Option<EdgeRef> {
    kb.edge_info(edge).map(|info| EdgeRef {
        midpoint: info.midpoint,
        direction: info.direction,
        length: info.length,
    })
}

/// Canonical auto-naming for a freshly built primitive.
pub(crate) fn auto_name_faces(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    kind: AutoName,
) -> BTreeMap<String, FaceRef> {
    match kind {
        AutoName::Box => auto_name_box(kb, solid),
        AutoName::Cylinder => auto_name_cylinder(kb, solid),
    }
}

/// Assign each face to the first unused canonical slot whose reference
/// normal agrees with the face normal.
fn auto_name_box(kb: &dyn KernelIntrospect, solid: &SolidHandle) -> BTreeMap<String, FaceRef> {
    let mut names = BTreeMap::new();
    let mut used = [false; CANONICAL_FACES.len()];

    for face in kb.list_faces(solid) {
        let Some(info) = kb.face_info(face) else {
            continue;
        };
        if !info.is_planar {
            continue;
        }
        for (slot, (name, reference)) in CANONICAL_FACES.iter().enumerate() {
            if used[slot] {
                continue;
            }
            if vec3::dot(info.normal, *reference) > CANONICAL_DOT_THRESHOLD {
                used[slot] = true;
                names.insert(
                    name.to_string(),
                    FaceRef {
                        normal: info.normal,
                        centroid: info.centroid,
                        area: info.area,
                    },
                );
                break;
            }
        }
    }
    names
}

/// Cylinders get `top`/`bottom` for the ±Z caps and `side` for the first
/// curved face.
fn auto_name_cylinder(kb: &dyn KernelIntrospect, solid: &SolidHandle) -> BTreeMap<String, FaceRef> {
    let mut names = BTreeMap::new();

    for face in kb.list_faces(solid) {
        let Some(info) = kb.face_info(face) else {
            continue;
        };
        let face_ref = FaceRef {
            normal: info.normal,
            centroid: info.centroid,
            area: info.area,
        };
        if info.is_planar {
            let up = vec3::dot(info.normal, [0.0, 0.0, 1.0]);
            if up > CAP_DOT_THRESHOLD && !names.contains_key("top") {
                names.insert("top".to_string(), face_ref);
            } else if up < -CAP_DOT_THRESHOLD && !names.contains_key("bottom") {
                names.insert("bottom".to_string(), face_ref);
            }
        } else if !names.contains_key(SIDE_FACE) {
            names.insert(SIDE_FACE.to_string(), face_ref);
        }
    }
    names
}

/// An edge is named `a-b` iff exactly two of the currently named faces are
/// incident to it.
pub(crate) fn compute_edge_names(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    faces: &BTreeMap<String, FaceRef>,
) -> BTreeMap<String, EdgeRef> {
    let mut face_names: HashMap<FaceId, String> = HashMap::new();
    for (name, face_ref) in faces {
        if let Some(face) = resolve_face_ref(kb, solid, face_ref) {
            face_names.entry(face).or_insert_with(|| name.clone());
        }
    }

    let mut edges = BTreeMap::new();
    for edge in kb.list_edges(solid) {
        let incident: Vec<&String> = kb
            .edge_faces(edge)
            .into_iter()
            .filter_map(|f| face_names.get(&f))
            .collect();
        if incident.len() != 2 || incident[0] == incident[1] {
            continue;
        }
        let name = edge_name(incident[0], incident[1]);
        if let Some(edge_ref) = edge_ref_of(kb, edge) {
            edges.entry(name).or_insert(edge_ref);
        }
    }
    edges
}

/// Post-boolean re-match: greedy global assignment of stored names onto the
/// live shape's planar faces.
///
/// Score per (name, face) pair:
/// `0.50·max(0, normal·normal') + 0.35·max(0, 1 − dist/max(D, 100)) + 0.15·areaRatio`.
/// Assignment stops once the best remaining score drops below 0.30;
/// unmatched names are dropped.
pub(crate) fn rematch_faces(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    stored: &BTreeMap<String, FaceRef>,
) -> BTreeMap<String, FaceRef> {
    if stored.is_empty() {
        return BTreeMap::new();
    }
    let diagonal = kb
        .bounding_box(solid)
        .map(vec3::bbox_diagonal)
        .unwrap_or(0.0);
    let reach = diagonal.max(100.0);

    let live: Vec<(FaceId, FaceRef)> = kb
        .list_faces(solid)
        .into_iter()
        .filter(|f| kb.face_info(*f).map(|i| i.is_planar).unwrap_or(false))
        .filter_map(|f| face_ref_of(kb, f).map(|r| (f, r)))
        .collect();

    let names: Vec<(&String, &FaceRef)> = stored.iter().collect();
    let mut scores: Vec<(f64, usize, usize)> = Vec::new();
    for (ni, (_, stored_ref)) in names.iter().enumerate() {
        for (fi, (_, live_ref)) in live.iter().enumerate() {
            let normal_score = vec3::dot(live_ref.normal, stored_ref.normal).max(0.0);
            let dist = vec3::distance(live_ref.centroid, stored_ref.centroid);
            let dist_score = (1.0 - dist / reach).max(0.0);
            let area_ratio = if stored_ref.area.max(live_ref.area) > 1e-12 {
                stored_ref.area.min(live_ref.area) / stored_ref.area.max(live_ref.area)
            } else {
                1.0
            };
            let score = 0.50 * normal_score + 0.35 * dist_score + 0.15 * area_ratio;
            scores.push((score, ni, fi));
        }
    }
    scores.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut taken_names = vec![false; names.len()];
    let mut taken_faces = vec![false; live.len()];
    let mut result = BTreeMap::new();
    for (score, ni, fi) in scores {
        if score < REMATCH_FLOOR {
            break;
        }
        if taken_names[ni] || taken_faces[fi] {
            continue;
        }
        taken_names[ni] = true;
        taken_faces[fi] = true;
        result.insert(names[ni].0.clone(), live[fi].1.clone());
    }
    log::debug!(
        "re-matched {}/{} face names onto {} live faces",
        result.len(),
        names.len(),
        live.len()
    );
    result
}

/// Find the live face best matching a stored ref:
/// `0.6·dot + 0.4·max(0, 1 − dist/tol)` with `tol = max(1, 0.1·D)`;
/// accepted only when the normal agreement is strong and the blend clears 0.3.
pub(crate) fn resolve_face_ref(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    stored: &FaceRef,
) -> Option<FaceId> {
    let diagonal = kb
        .bounding_box(solid)
        .map(vec3::bbox_diagonal)
        .unwrap_or(0.0);
    let tol = (0.1 * diagonal).max(1.0);
    let stored_curved = vec3::norm(stored.normal) < 1e-9;

    let mut best: Option<(f64, FaceId)> = None;
    for face in kb.list_faces(solid) {
        let Some(info) = kb.face_info(face) else {
            continue;
        };
        // Curved faces have no single normal; match them to curved refs by
        // position alone.
        let normal_dot = if stored_curved && vec3::norm(info.normal) < 1e-9 {
            1.0
        } else {
            vec3::dot(info.normal, stored.normal)
        };
        if normal_dot <= 0.9 {
            continue;
        }
        let dist = vec3::distance(info.centroid, stored.centroid);
        let score = 0.6 * normal_dot + 0.4 * (1.0 - dist / tol).max(0.0);
        if score > 0.3 && best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, face));
        }
    }
    best.map(|(_, f)| f)
}

/// Live edges whose midpoint lies within 1.0 of the stored midpoint.
pub(crate) fn resolve_edge_ref(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    stored: &EdgeRef,
) -> Vec<EdgeId> {
    kb.list_edges(solid)
        .into_iter()
        .filter(|e| {
            kb.edge_info(*e)
                .map(|info| vec3::distance(info.midpoint, stored.midpoint) <= 1.0)
                .unwrap_or(false)
        })
        .collect()
}

/// Merge two boolean operands' naming tables (left wins), re-match onto the
/// fused geometry and carve out sub-part entries for shape-named operands.
pub(crate) fn rematch_boolean(
    kb: &dyn KernelIntrospect,
    solid: &SolidHandle,
    left: &Shape,
    right: &Shape,
) -> (BTreeMap<String, FaceRef>, BTreeMap<String, SubPart>) {
    left.ensure_face_names();
    right.ensure_face_names();
    let left_faces = left.named.borrow().faces.clone();
    let right_faces = right.named.borrow().faces.clone();

    let mut merged = right_faces.clone();
    merged.extend(left_faces.clone());

    let rematched = rematch_faces(kb, solid, &merged);

    // Existing sub-parts survive, left wins on conflicts.
    let mut sub_parts = right.sub_parts().clone();
    sub_parts.extend(left.sub_parts().clone());

    for (operand, original) in [(left, &left_faces), (right, &right_faces)] {
        if let Some(part_name) = operand.shape_name() {
            let faces: BTreeMap<String, FaceRef> = rematched
                .iter()
                .filter(|(name, _)| original.contains_key(*name))
                .map(|(name, face_ref)| (name.clone(), face_ref.clone()))
                .collect();
            sub_parts.insert(
                part_name.to_string(),
                SubPart {
                    faces,
                    edges: BTreeMap::new(),
                },
            );
        }
    }

    (rematched, sub_parts)
}

impl Shape {
    /// Look up a named face ref. Dotted names (`part.face`) address sub-parts;
    /// bare names fall back to sub-parts when absent at the top level.
    pub fn face(&self, name: &str) -> Option<FaceRef> {
        self.ensure_face_names();
        if let Some((part, feature)) = split_dotted(name) {
            return self
                .sub_parts()
                .get(part)
                .and_then(|p| p.faces.get(feature).cloned());
        }
        if let Some(face_ref) = self.named.borrow().faces.get(name) {
            return Some(face_ref.clone());
        }
        self.sub_parts()
            .values()
            .find_map(|p| p.faces.get(name).cloned())
    }

    /// Look up a named edge ref, computing the table on first access.
    pub fn edge(&self, name: &str) -> Option<EdgeRef> {
        if let Some((part, feature)) = split_dotted(name) {
            return self
                .sub_parts()
                .get(part)
                .and_then(|p| p.edges.get(feature).cloned());
        }
        self.ensure_edge_names();
        if let Some(edge_ref) = self.named_edges().get(name) {
            return Some(edge_ref.clone());
        }
        self.sub_parts()
            .values()
            .find_map(|p| p.edges.get(name).cloned())
    }

    /// Name the face matched by `selector` (axis or existing name).
    pub fn name_face(&self, selector: &str, new_name: &str) -> Shape {
        if self.geometry().is_none() {
            self.errors()
                .record("nameFace", "shape has no geometry", None);
            return self.clone();
        }
        let matched = crate::select::faces_matching(self, selector);
        let Some(face) = matched.first() else {
            self.errors().record(
                "nameFace",
                format!("selector {:?} matched no face", selector),
                None,
            );
            return self.clone();
        };
        let face_ref = {
            let kernel = self.kernel();
            let kb = kernel.borrow();
            face_ref_of(kb.as_introspect(), *face)
        };
        let Some(face_ref) = face_ref else {
            self.errors().record(
                "nameFace",
                format!("selector {:?} matched a vanished face", selector),
                None,
            );
            return self.clone();
        };
        let next = self.clone();
        next.named
            .borrow_mut()
            .faces
            .insert(new_name.to_string(), face_ref);
        next
    }

    /// Name the edge matched by `selector` (axis or existing name).
    pub fn name_edge(&self, selector: &str, new_name: &str) -> Shape {
        if self.geometry().is_none() {
            self.errors()
                .record("nameEdge", "shape has no geometry", None);
            return self.clone();
        }
        let matched = crate::select::edges_matching(self, selector);
        let Some(edge) = matched.first() else {
            self.errors().record(
                "nameEdge",
                format!("selector {:?} matched no edge", selector),
                None,
            );
            return self.clone();
        };
        let edge_ref = {
            let kernel = self.kernel();
            let kb = kernel.borrow();
            edge_ref_of(kb.as_introspect(), *edge)
        };
        let Some(edge_ref) = edge_ref else {
            self.errors().record(
                "nameEdge",
                format!("selector {:?} matched a vanished edge", selector),
                None,
            );
            return self.clone();
        };
        let next = self.clone();
        next.ensure_edge_names();
        {
            let mut tables = next.named.borrow_mut();
            if let crate::shape::EdgeNames::Computed(map) = &mut tables.edges {
                map.insert(new_name.to_string(), edge_ref);
            }
        }
        next
    }
}
