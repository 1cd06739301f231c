//! A flat collection of shapes exported together.

use camber_model::Shape;

use crate::mesh::{shape_meshes, ExportError, ShapeMesh};
use crate::stl::meshes_to_stl;
use crate::threemf::{build_bundles, PackageWriter, PartBundle, PlateTransform};

/// Linear collection of parts with flat mesh, STL and 3MF outputs.
#[derive(Default)]
pub struct Assembly {
    parts: Vec<Shape>,
}

impl Assembly {
    pub fn new() -> Self {
        Assembly { parts: Vec::new() }
    }

    pub fn add(&mut self, shape: Shape) {
        self.parts.push(shape);
    }

    pub fn parts(&self) -> &[Shape] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Flattened meshes of every part; parts with modifiers contribute
    /// several meshes each.
    pub fn to_meshes(&self) -> Result<Vec<ShapeMesh>, ExportError> {
        let mut meshes = Vec::new();
        for part in &self.parts {
            meshes.extend(shape_meshes(part)?);
        }
        Ok(meshes)
    }

    /// One STL solid compounding every part at world coordinates.
    pub fn to_stl(&self) -> Result<Vec<u8>, ExportError> {
        if self.parts.is_empty() {
            return Err(ExportError::Empty);
        }
        let meshes = self.to_meshes()?;
        Ok(meshes_to_stl("assembly", &meshes))
    }

    /// Welded, plate-centered part bundles for the 3MF writer.
    pub fn to_bundles(&self) -> Result<(Vec<PartBundle>, PlateTransform), ExportError> {
        build_bundles(&self.parts)
    }

    /// Package the assembly through an external 3MF writer.
    pub fn to_3mf(&self, writer: &mut dyn PackageWriter) -> Result<Vec<u8>, ExportError> {
        let (bundles, _) = self.to_bundles()?;
        writer.write(&bundles)
    }
}
