//! Face and edge selection: axis selectors, named selectors, set
//! subtraction and predicate filtering.

use camber_types::vec3;
use kernel_bridge::{EdgeId, FaceId, KernelIntrospect};

use crate::naming;
use crate::shape::{Selection, Shape};

/// Tolerance for the `>A` / `<A` extreme-centroid comparison.
const AXIS_EXTREME_TOL: f64 = 1e-3;

/// Component threshold for the `|A` parallel test.
const PARALLEL_TOL: f64 = 0.9;

/// Tolerance for the z-extent convenience filters.
const Z_FILTER_TOL: f64 = 1e-2;

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    All,
    Axis { kind: AxisKind, axis: usize },
    Name(String),
    Or(Box<Selector>, Box<Selector>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisKind {
    Max,
    Min,
    Parallel,
}

fn axis_index(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        _ => None,
    }
}

fn parse(selector: &str) -> Selector {
    let s = selector.trim();
    if s.is_empty() {
        return Selector::All;
    }
    if let Some((a, b)) = s.split_once(" or ") {
        return Selector::Or(Box::new(parse(a)), Box::new(parse(b)));
    }
    let mut chars = s.chars();
    if let (Some(op), Some(axis_char), None) = (chars.next(), chars.next(), chars.next()) {
        if let Some(axis) = axis_index(axis_char) {
            let kind = match op {
                '>' => Some(AxisKind::Max),
                '<' => Some(AxisKind::Min),
                '|' => Some(AxisKind::Parallel),
                _ => None,
            };
            if let Some(kind) = kind {
                return Selector::Axis { kind, axis };
            }
        }
    }
    Selector::Name(s.to_string())
}

fn axis_unit(axis: usize) -> [f64; 3] {
    let mut v = [0.0; 3];
    v[axis] = 1.0;
    v
}

/// Subset of `candidates` whose key component is extreme within tolerance.
fn extreme_subset<T: Copy>(
    candidates: &[T],
    key: impl Fn(T) -> Option<f64>,
    want_max: bool,
) -> Vec<T> {
    let values: Vec<(T, f64)> = candidates
        .iter()
        .filter_map(|&c| key(c).map(|v| (c, v)))
        .collect();
    let Some(target) = values
        .iter()
        .map(|(_, v)| *v)
        .reduce(|a, b| if want_max { a.max(b) } else { a.min(b) })
    else {
        return Vec::new();
    };
    values
        .into_iter()
        .filter(|(_, v)| (v - target).abs() <= AXIS_EXTREME_TOL)
        .map(|(c, _)| c)
        .collect()
}

fn apply_face_selector(shape: &Shape, selector: &Selector, candidates: &[FaceId]) -> Vec<FaceId> {
    let kernel = shape.kernel();
    match selector {
        Selector::All => candidates.to_vec(),
        Selector::Axis { kind, axis } => {
            let kb = kernel.borrow();
            match kind {
                AxisKind::Max | AxisKind::Min => extreme_subset(
                    candidates,
                    |f| kb.face_info(f).map(|i| i.centroid[*axis]),
                    *kind == AxisKind::Max,
                ),
                AxisKind::Parallel => candidates
                    .iter()
                    .filter(|f| {
                        kb.face_info(**f)
                            .map(|i| vec3::dot(i.normal, axis_unit(*axis)).abs() > PARALLEL_TOL)
                            .unwrap_or(false)
                    })
                    .copied()
                    .collect(),
            }
        }
        Selector::Name(name) => {
            let Some(face_ref) = shape.face(name) else {
                shape.errors().record(
                    "faces",
                    format!("no face named {:?}", name),
                    None,
                );
                return Vec::new();
            };
            let Some(geometry) = shape.geometry() else {
                return Vec::new();
            };
            let kb = kernel.borrow();
            match naming::resolve_face_ref(kb.as_introspect(), &geometry, &face_ref) {
                Some(face) => vec![face],
                None => {
                    drop(kb);
                    shape.errors().record(
                        "faces",
                        format!("face {:?} no longer resolves on the live shape", name),
                        None,
                    );
                    Vec::new()
                }
            }
        }
        Selector::Or(a, b) => {
            let mut out = apply_face_selector(shape, a, candidates);
            for f in apply_face_selector(shape, b, candidates) {
                if !out.contains(&f) {
                    out.push(f);
                }
            }
            out
        }
    }
}

fn apply_edge_selector(shape: &Shape, selector: &Selector, candidates: &[EdgeId]) -> Vec<EdgeId> {
    let kernel = shape.kernel();
    match selector {
        Selector::All => candidates.to_vec(),
        Selector::Axis { kind, axis } => {
            let kb = kernel.borrow();
            match kind {
                AxisKind::Max | AxisKind::Min => extreme_subset(
                    candidates,
                    |e| kb.edge_info(e).map(|i| i.midpoint[*axis]),
                    *kind == AxisKind::Max,
                ),
                AxisKind::Parallel => candidates
                    .iter()
                    .filter(|e| {
                        kb.edge_info(**e)
                            .map(|i| i.direction[*axis].abs() > PARALLEL_TOL)
                            .unwrap_or(false)
                    })
                    .copied()
                    .collect(),
            }
        }
        Selector::Name(name) => {
            let Some(edge_ref) = shape.edge(name) else {
                shape
                    .errors()
                    .record("edges", format!("no edge named {:?}", name), None);
                return Vec::new();
            };
            let Some(geometry) = shape.geometry() else {
                return Vec::new();
            };
            let kb = kernel.borrow();
            let matched = naming::resolve_edge_ref(kb.as_introspect(), &geometry, &edge_ref);
            matched
                .into_iter()
                .filter(|e| candidates.contains(e))
                .collect()
        }
        Selector::Or(a, b) => {
            let mut out = apply_edge_selector(shape, a, candidates);
            for e in apply_edge_selector(shape, b, candidates) {
                if !out.contains(&e) {
                    out.push(e);
                }
            }
            out
        }
    }
}

fn all_faces(shape: &Shape) -> Vec<FaceId> {
    match shape.geometry() {
        Some(geometry) => shape.kernel().borrow().list_faces(&geometry),
        None => Vec::new(),
    }
}

/// Edge candidates: edges of the selected faces when a face selection is
/// active, otherwise every edge of the shape, de-duplicated by id.
fn edge_candidates(shape: &Shape) -> Vec<EdgeId> {
    let kernel = shape.kernel();
    let kb = kernel.borrow();
    match shape.selected_faces() {
        Some(faces) => {
            let mut out = Vec::new();
            for face in faces {
                for edge in kb.face_edges(face) {
                    if !out.contains(&edge) {
                        out.push(edge);
                    }
                }
            }
            out
        }
        None => match shape.geometry() {
            Some(geometry) => kb.list_edges(&geometry),
            None => Vec::new(),
        },
    }
}

pub(crate) fn faces_matching(shape: &Shape, selector: &str) -> Vec<FaceId> {
    let candidates = all_faces(shape);
    apply_face_selector(shape, &parse(selector), &candidates)
}

pub(crate) fn edges_matching(shape: &Shape, selector: &str) -> Vec<EdgeId> {
    let candidates = edge_candidates(shape);
    apply_edge_selector(shape, &parse(selector), &candidates)
}

/// Arguments handed to a `filter_edges` predicate.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFilter {
    pub z_min: f64,
    pub z_max: f64,
    pub edge: EdgeId,
}

impl Shape {
    /// Select faces; `""` selects all, `">z"`/`"<z"`/`"|z"` select by axis,
    /// anything else resolves as a name, and `"a or b"` unions two selectors.
    pub fn faces(&self, selector: &str) -> Shape {
        let matched = faces_matching(self, selector);
        let mut next = self.clone();
        next.set_selection(Selection::Faces(matched));
        next
    }

    /// Faces NOT matched by the selector.
    pub fn faces_not(&self, selector: &str) -> Shape {
        let matched = faces_matching(self, selector);
        let remaining: Vec<FaceId> = all_faces(self)
            .into_iter()
            .filter(|f| !matched.contains(f))
            .collect();
        let mut next = self.clone();
        next.set_selection(Selection::Faces(remaining));
        next
    }

    /// Select edges of the current face selection (or of the whole shape).
    pub fn edges(&self, selector: &str) -> Shape {
        let matched = edges_matching(self, selector);
        let mut next = self.clone();
        next.set_selection(Selection::Edges(matched));
        next
    }

    /// Candidate edges NOT matched by the selector.
    pub fn edges_not(&self, selector: &str) -> Shape {
        let matched = edges_matching(self, selector);
        let remaining: Vec<EdgeId> = edge_candidates(self)
            .into_iter()
            .filter(|e| !matched.contains(e))
            .collect();
        let mut next = self.clone();
        next.set_selection(Selection::Edges(remaining));
        next
    }

    /// Keep candidate edges the predicate accepts.
    pub fn filter_edges(&self, predicate: impl Fn(&EdgeFilter) -> bool) -> Shape {
        let candidates = match self.selected_edges() {
            Some(edges) => edges,
            None => edge_candidates(self),
        };
        let kernel = self.kernel();
        let kept: Vec<EdgeId> = {
            let kb = kernel.borrow();
            candidates
                .into_iter()
                .filter(|e| {
                    kb.edge_info(*e)
                        .map(|info| {
                            predicate(&EdgeFilter {
                                z_min: info.z_min,
                                z_max: info.z_max,
                                edge: *e,
                            })
                        })
                        .unwrap_or(false)
                })
                .collect()
        };
        let mut next = self.clone();
        next.set_selection(Selection::Edges(kept));
        next
    }

    /// Drop edges lying in the shape's bottom plane.
    pub fn filter_out_bottom(&self) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.filter_edges(|_| true);
        };
        let floor = bbox[2];
        self.filter_edges(move |e| e.z_max > floor + Z_FILTER_TOL)
    }

    /// Drop edges lying in the shape's top plane.
    pub fn filter_out_top(&self) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.filter_edges(|_| true);
        };
        let ceiling = bbox[5];
        self.filter_edges(move |e| e.z_min < ceiling - Z_FILTER_TOL)
    }
}
