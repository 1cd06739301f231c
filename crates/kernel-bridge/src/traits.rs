use crate::types::*;

/// Construction and modification surface of the B-Rep kernel. Implemented by
/// `TruckKernel` (real geometry) and `MockKernel` (deterministic test double).
pub trait Kernel {
    /// Box spanning [-l/2, l/2] x [-w/2, w/2] x [0, h].
    fn make_box(&mut self, length: f64, width: f64, height: f64)
        -> Result<SolidHandle, KernelError>;

    /// Cylinder on the z-axis from z=0 to z=h.
    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError>;

    /// Sphere resting on the build plate: center (0, 0, r).
    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError>;

    /// Regular n-sided prism, one flat horizontal, extruded z=0..h.
    /// `flat_to_flat` is the across-flats width (twice the inradius).
    fn make_prism(
        &mut self,
        sides: u32,
        flat_to_flat: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Extrude a closed xy-plane contour (with optional hole contours) along +Z.
    fn extrude_polygon(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        depth: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Return a new solid moved by `offset`. The input handle stays valid.
    fn translate_solid(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Return a new solid rotated about an axis through the origin by
    /// `angle` radians.
    fn rotate_solid(
        &mut self,
        solid: &SolidHandle,
        axis: [f64; 3],
        angle: f64,
    ) -> Result<SolidHandle, KernelError>;

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Batched subtraction: one boolean evaluation against the whole tool
    /// list. Backends without compound tools may fold internally, but callers
    /// must issue a single call per pattern.
    fn cut_many(
        &mut self,
        a: &SolidHandle,
        tools: &[SolidHandle],
    ) -> Result<SolidHandle, KernelError>;

    /// Merge coplanar faces and collinear edges after a fuse so feature ops
    /// see clean topology.
    fn unify_same_domain(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Round the listed edges. Edges the builder rejects are skipped; the
    /// operation fails with `FeatureFailed` when no edge could be added.
    fn fillet_edges(
        &mut self,
        solid: &SolidHandle,
        edges: &[EdgeId],
        radius: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Bevel the listed edges; same skip semantics as `fillet_edges`.
    fn chamfer_edges(
        &mut self,
        solid: &SolidHandle,
        edges: &[EdgeId],
        distance: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Group several solids into one compound shape.
    fn make_compound(&mut self, parts: &[SolidHandle]) -> Result<SolidHandle, KernelError>;

    /// Triangulate a solid.
    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        linear_deflection: f64,
        angular_deflection: f64,
    ) -> Result<RenderMesh, KernelError>;
}

/// Read-only topology and geometry queries.
pub trait KernelIntrospect {
    /// Faces in deterministic order. Ids are stable for the session.
    fn list_faces(&self, solid: &SolidHandle) -> Vec<FaceId>;

    /// Unique edges in deterministic order.
    fn list_edges(&self, solid: &SolidHandle) -> Vec<EdgeId>;

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId>;

    fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId>;

    fn face_info(&self, face: FaceId) -> Option<FaceInfo>;

    fn edge_info(&self, edge: EdgeId) -> Option<EdgeInfo>;

    /// Axis-aligned bounds [min_x, min_y, min_z, max_x, max_y, max_z].
    fn bounding_box(&self, solid: &SolidHandle) -> Option<[f64; 6]>;

    fn face_bounding_box(&self, face: FaceId) -> Option<[f64; 6]>;
}

/// Combined trait for call sites that need both mutable kernel access and
/// read-only introspection on the same object.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
