//! The immutable shape value threaded through a fluent chain.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use camber_types::{
    is_hex_color, is_infill_pattern, EdgeRef, FaceRef, MetaValue, INFILL_PATTERNS,
    META_INFILL_DENSITY, META_INFILL_PATTERN, META_MIN_CUT_Z, META_PART_NAME,
};
use kernel_bridge::{EdgeId, FaceId, KernelBundle, KernelIntrospect, SolidHandle};

use crate::error::ErrorRegistry;
use crate::naming;

/// Current sub-shape selection carried by a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    None,
    Faces(Vec<FaceId>),
    Edges(Vec<EdgeId>),
}

/// Deferred auto-naming request, resolved on first name access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoName {
    Box,
    Cylinder,
}

/// Naming tables preserved for one operand of a boolean, addressable as
/// `part.face` afterwards.
#[derive(Debug, Clone, Default)]
pub struct SubPart {
    pub faces: BTreeMap<String, FaceRef>,
    pub edges: BTreeMap<String, EdgeRef>,
}

/// Tri-state edge-name table: `NotComputed` is distinct from "computed and
/// empty" so laziness stays observable.
#[derive(Debug, Clone)]
pub enum EdgeNames {
    NotComputed,
    Computed(BTreeMap<String, EdgeRef>),
}

#[derive(Clone)]
pub(crate) struct NameTables {
    pub faces: BTreeMap<String, FaceRef>,
    pub edges: EdgeNames,
    pub pending: Option<AutoName>,
}

impl NameTables {
    fn empty() -> Self {
        NameTables {
            faces: BTreeMap::new(),
            edges: EdgeNames::NotComputed,
            pending: None,
        }
    }
}

/// Immutable handle bundling kernel geometry, selection, display metadata and
/// the semantic naming tables. Every operation returns a new value.
#[derive(Clone)]
pub struct Shape {
    kernel: Rc<RefCell<dyn KernelBundle>>,
    errors: ErrorRegistry,
    geometry: Option<SolidHandle>,
    plane: String,
    selection: Selection,
    color: Option<String>,
    modifiers: Vec<Shape>,
    metadata: BTreeMap<String, MetaValue>,
    shape_name: Option<String>,
    sub_parts: BTreeMap<String, SubPart>,
    // Interior mutability only for lazily computed tables; semantically the
    // value is immutable.
    pub(crate) named: RefCell<NameTables>,
}

impl Shape {
    pub(crate) fn new_empty(kernel: Rc<RefCell<dyn KernelBundle>>, errors: ErrorRegistry) -> Shape {
        Shape {
            kernel,
            errors,
            geometry: None,
            plane: "XY".to_string(),
            selection: Selection::None,
            color: None,
            modifiers: Vec::new(),
            metadata: BTreeMap::new(),
            shape_name: None,
            sub_parts: BTreeMap::new(),
            named: RefCell::new(NameTables::empty()),
        }
    }

    pub(crate) fn from_handle(
        kernel: Rc<RefCell<dyn KernelBundle>>,
        errors: ErrorRegistry,
        handle: SolidHandle,
    ) -> Shape {
        let mut shape = Shape::new_empty(kernel, errors);
        shape.geometry = Some(handle);
        shape
    }

    // ── Internal derivation plumbing ───────────────────────────────────────

    pub(crate) fn set_geometry(&mut self, geometry: Option<SolidHandle>) {
        self.geometry = geometry;
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub(crate) fn set_pending_auto_name(&mut self, pending: Option<AutoName>) {
        self.named.borrow_mut().pending = pending;
    }

    pub(crate) fn set_named_faces(&mut self, faces: BTreeMap<String, FaceRef>) {
        self.named.borrow_mut().faces = faces;
    }

    pub(crate) fn invalidate_edge_names(&mut self) {
        self.named.borrow_mut().edges = EdgeNames::NotComputed;
    }

    pub(crate) fn set_sub_parts(&mut self, sub_parts: BTreeMap<String, SubPart>) {
        self.sub_parts = sub_parts;
    }

    pub(crate) fn merge_display_from(&mut self, right: &Shape) {
        // Metadata merges with the left operand winning on conflicts.
        let mut merged = right.metadata.clone();
        merged.extend(self.metadata.clone());
        self.metadata = merged;
        if self.color.is_none() {
            self.color = right.color.clone();
        }
        self.modifiers.extend(right.modifiers.iter().cloned());
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn kernel(&self) -> Rc<RefCell<dyn KernelBundle>> {
        Rc::clone(&self.kernel)
    }

    pub fn errors(&self) -> ErrorRegistry {
        self.errors.clone()
    }

    pub fn geometry(&self) -> Option<SolidHandle> {
        self.geometry.clone()
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn plane(&self) -> &str {
        &self.plane
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_faces(&self) -> Option<Vec<FaceId>> {
        match &self.selection {
            Selection::Faces(f) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn selected_edges(&self) -> Option<Vec<EdgeId>> {
        match &self.selection {
            Selection::Edges(e) => Some(e.clone()),
            _ => None,
        }
    }

    pub fn color_hex(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn modifiers(&self) -> &[Shape] {
        &self.modifiers
    }

    pub fn metadata(&self) -> &BTreeMap<String, MetaValue> {
        &self.metadata
    }

    pub fn metadata_number(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(|v| v.as_f64())
    }

    pub fn shape_name(&self) -> Option<&str> {
        self.shape_name.as_deref()
    }

    pub fn sub_part_names(&self) -> Vec<String> {
        self.sub_parts.keys().cloned().collect()
    }

    pub(crate) fn sub_parts(&self) -> &BTreeMap<String, SubPart> {
        &self.sub_parts
    }

    pub fn bounding_box(&self) -> Option<[f64; 6]> {
        let geometry = self.geometry.as_ref()?;
        self.kernel.borrow().bounding_box(geometry)
    }

    pub fn last_error(&self) -> Option<crate::error::RecordedError> {
        self.errors.last()
    }

    // ── Lazy naming tables ─────────────────────────────────────────────────

    /// Face-name table, computing any deferred primitive auto-naming first.
    pub fn named_faces(&self) -> BTreeMap<String, FaceRef> {
        self.ensure_face_names();
        self.named.borrow().faces.clone()
    }

    /// Edge-name table, computed on first access.
    pub fn named_edges(&self) -> BTreeMap<String, EdgeRef> {
        self.ensure_edge_names();
        match &self.named.borrow().edges {
            EdgeNames::Computed(map) => map.clone(),
            EdgeNames::NotComputed => BTreeMap::new(),
        }
    }

    /// True once the edge table has been computed (even if empty).
    pub fn edge_names_computed(&self) -> bool {
        matches!(self.named.borrow().edges, EdgeNames::Computed(_))
    }

    pub(crate) fn ensure_face_names(&self) {
        let pending = self.named.borrow().pending;
        let Some(kind) = pending else {
            return;
        };
        let Some(geometry) = self.geometry.as_ref() else {
            return;
        };
        let faces = {
            let kb = self.kernel.borrow();
            naming::auto_name_faces(kb.as_introspect(), geometry, kind)
        };
        let mut tables = self.named.borrow_mut();
        tables.faces = faces;
        tables.pending = None;
    }

    pub(crate) fn ensure_edge_names(&self) {
        self.ensure_face_names();
        if matches!(self.named.borrow().edges, EdgeNames::Computed(_)) {
            return;
        }
        let Some(geometry) = self.geometry.as_ref() else {
            self.named.borrow_mut().edges = EdgeNames::Computed(BTreeMap::new());
            return;
        };
        let faces = self.named.borrow().faces.clone();
        let edges = {
            let kb = self.kernel.borrow();
            naming::compute_edge_names(kb.as_introspect(), geometry, &faces)
        };
        self.named.borrow_mut().edges = EdgeNames::Computed(edges);
    }

    // ── Display & print metadata builders ──────────────────────────────────

    /// Set the display color from a `#rrggbb` string.
    pub fn color(&self, hex: &str) -> Shape {
        if !is_hex_color(hex) {
            self.errors.record(
                "color",
                format!("expected #rrggbb color, got {:?}", hex),
                None,
            );
            return self.clone();
        }
        let mut next = self.clone();
        next.color = Some(hex.to_string());
        next
    }

    /// Set the sparse infill density in percent.
    pub fn infill_density(&self, percent: i64) -> Shape {
        if !(0..=100).contains(&percent) {
            self.errors.record(
                "infillDensity",
                format!("density must be 0-100 percent, got {}", percent),
                None,
            );
            return self.clone();
        }
        let mut next = self.clone();
        next.metadata
            .insert(META_INFILL_DENSITY.to_string(), MetaValue::Int(percent));
        next
    }

    /// Set the sparse infill pattern.
    pub fn infill_pattern(&self, pattern: &str) -> Shape {
        if !is_infill_pattern(pattern) {
            self.errors.record(
                "infillPattern",
                format!(
                    "unknown infill pattern {:?}, expected one of {:?}",
                    pattern, INFILL_PATTERNS
                ),
                None,
            );
            return self.clone();
        }
        let mut next = self.clone();
        next.metadata.insert(
            META_INFILL_PATTERN.to_string(),
            MetaValue::Str(pattern.to_string()),
        );
        next
    }

    pub fn part_name(&self, name: &str) -> Shape {
        let mut next = self.clone();
        next.metadata
            .insert(META_PART_NAME.to_string(), MetaValue::Str(name.to_string()));
        next
    }

    /// Floor plane consumed by legacy grid cutters.
    pub fn min_cut_z(&self, z: f64) -> Shape {
        if !z.is_finite() {
            self.errors
                .record("minCutZ", format!("floor must be finite, got {}", z), None);
            return self.clone();
        }
        let mut next = self.clone();
        next.metadata
            .insert(META_MIN_CUT_Z.to_string(), MetaValue::Num(z));
        next
    }

    /// Attach a modifier volume: kept out of boolean math, exported as a
    /// distinct overlapping region.
    pub fn with_modifier(&self, modifier: Shape) -> Shape {
        let mut next = self.clone();
        next.modifiers.push(modifier);
        next
    }

    /// Tag this value as a named sub-part for dotted access after booleans.
    pub fn name(&self, shape_name: &str) -> Shape {
        let mut next = self.clone();
        next.shape_name = Some(shape_name.to_string());
        next
    }

    /// Re-match this shape's naming tables against replacement geometry after
    /// a subtraction-style rebuild (hole, pattern cut, feature op).
    pub fn rebuilt_after_cut(&self, new_geometry: SolidHandle) -> Shape {
        self.ensure_face_names();
        let stored = self.named.borrow().faces.clone();
        let rematched = {
            let kb = self.kernel.borrow();
            naming::rematch_faces(kb.as_introspect(), &new_geometry, &stored)
        };
        let mut next = self.clone();
        next.set_geometry(Some(new_geometry));
        next.set_selection(Selection::None);
        next.set_named_faces(rematched);
        next.set_pending_auto_name(None);
        next.invalidate_edge_names();
        next
    }
}
