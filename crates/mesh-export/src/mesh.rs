//! Shape-to-mesh conversion, including modifier volume handling.

use camber_model::Shape;
use kernel_bridge::{Kernel, KernelError};
use serde::{Deserialize, Serialize};

/// Default tessellation quality.
pub const LINEAR_DEFLECTION: f64 = 0.1;
pub const ANGULAR_DEFLECTION: f64 = 0.5;

/// Errors from mesh conversion and export.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("shape has no geometry")]
    NoGeometry,

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("nothing to export")]
    Empty,

    #[error("package writer failed: {reason}")]
    Writer { reason: String },
}

/// One display/export mesh. A shape with modifiers yields the main mesh
/// (modifier volumes subtracted) plus one mesh per modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeMesh {
    /// Flat vertex positions [x0, y0, z0, ...].
    pub vertices: Vec<f32>,
    /// Triangle index triples.
    pub indices: Vec<u32>,
    /// Display color of the volume.
    pub color: Option<String>,
    /// True for modifier volumes.
    pub is_modifier: bool,
}

/// Tessellate a shape into its display meshes.
pub fn shape_meshes(shape: &Shape) -> Result<Vec<ShapeMesh>, ExportError> {
    let geometry = shape.geometry().ok_or(ExportError::NoGeometry)?;
    let kernel = shape.kernel();

    // Modifier volumes are subtracted from the display mesh only; a failed
    // modifier cut leaves the full main mesh.
    let mut main = geometry;
    for modifier in shape.modifiers() {
        let Some(tool) = modifier.geometry() else {
            continue;
        };
        match kernel.borrow_mut().boolean_subtract(&main, &tool) {
            Ok(cut) => main = cut,
            Err(e) => log::debug!("modifier cut skipped: {}", e),
        }
    }

    let mut meshes = Vec::new();
    let main_mesh =
        kernel
            .borrow_mut()
            .tessellate(&main, LINEAR_DEFLECTION, ANGULAR_DEFLECTION)?;
    meshes.push(ShapeMesh {
        vertices: main_mesh.vertices,
        indices: main_mesh.indices,
        color: shape.color_hex().map(str::to_string),
        is_modifier: false,
    });

    for modifier in shape.modifiers() {
        let Some(tool) = modifier.geometry() else {
            continue;
        };
        let mesh = kernel
            .borrow_mut()
            .tessellate(&tool, LINEAR_DEFLECTION, ANGULAR_DEFLECTION)?;
        meshes.push(ShapeMesh {
            vertices: mesh.vertices,
            indices: mesh.indices,
            color: modifier.color_hex().map(str::to_string),
            is_modifier: true,
        });
    }

    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camber_model::Workbench;
    use kernel_bridge::MockKernel;

    #[test]
    fn plain_shape_yields_one_mesh() {
        let wb = Workbench::new(MockKernel::new());
        let meshes = shape_meshes(&wb.cuboid(10.0, 10.0, 10.0).color("#ff0000")).unwrap();
        assert_eq!(meshes.len(), 1);
        assert!(!meshes[0].is_modifier);
        assert_eq!(meshes[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(meshes[0].indices.len() % 3, 0);
        assert!(!meshes[0].vertices.is_empty());
    }

    #[test]
    fn modifiers_add_tagged_meshes() {
        let wb = Workbench::new(MockKernel::new());
        let shape = wb
            .cuboid(20.0, 20.0, 20.0)
            .with_modifier(wb.sphere(5.0).color("#ffffff"));
        let meshes = shape_meshes(&shape).unwrap();
        assert_eq!(meshes.len(), 2);
        assert!(!meshes[0].is_modifier);
        assert!(meshes[1].is_modifier);
        assert_eq!(meshes[1].color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn empty_shape_reports_no_geometry() {
        let wb = Workbench::new(MockKernel::new());
        let bad = wb.cuboid(-1.0, 1.0, 1.0);
        assert!(matches!(
            shape_meshes(&bad),
            Err(ExportError::NoGeometry)
        ));
    }
}
