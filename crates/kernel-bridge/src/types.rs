use serde::{Deserialize, Serialize};

/// Opaque handle to a solid owned by the kernel.
/// Valid only for the current kernel session; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Session-stable face identifier; the same face yields the same id for the
/// lifetime of the kernel, so it can serve as a sub-shape hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u64);

/// Session-stable edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

/// Per-face surface summary used by naming and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    /// Outward unit normal; the zero vector for non-planar faces the backend
    /// cannot summarize with a single direction.
    pub normal: [f64; 3],
    pub centroid: [f64; 3],
    pub area: f64,
    pub is_planar: bool,
}

/// Per-edge curve summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Point at the curve's parameter midpoint.
    pub midpoint: [f64; 3],
    /// Unit chord direction; zero for closed edges.
    pub direction: [f64; 3],
    pub length: f64,
    pub z_min: f64,
    pub z_max: f64,
}

/// Errors surfaced by kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("feature operation failed: {reason}")]
    FeatureFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("entity not found: {id}")]
    EntityNotFound { id: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Tessellated triangle mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat vertex normals, parallel to `vertices`.
    pub normals: Vec<f32>,
    /// Triangle index triples into the vertex array.
    pub indices: Vec<u32>,
    /// Triangle ranges grouped by logical face.
    pub face_ranges: Vec<FaceRange>,
}

impl RenderMesh {
    pub fn empty() -> Self {
        RenderMesh {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            face_ranges: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A contiguous run of triangle indices belonging to one face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRange {
    pub face: FaceId,
    /// Start offset into `indices`, inclusive.
    pub start_index: u32,
    /// End offset into `indices`, exclusive.
    pub end_index: u32,
}

impl Serialize for FaceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FaceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(FaceId)
    }
}

impl Serialize for EdgeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EdgeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(EdgeId)
    }
}
