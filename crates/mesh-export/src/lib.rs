//! Mesh conversion and export: tessellation with modifier volumes, vertex
//! welding, ASCII STL and 3MF part bundles.

mod assembly;
mod mesh;
mod stl;
mod threemf;
mod weld;

pub use assembly::Assembly;
pub use mesh::{shape_meshes, ExportError, ShapeMesh, ANGULAR_DEFLECTION, LINEAR_DEFLECTION};
pub use stl::{meshes_to_stl, shape_to_stl};
pub use threemf::{
    build_bundles, write_3mf, ModifierVolume, PackageWriter, PartBundle, PlateTransform,
};
pub use weld::{weld, WeldedMesh, WELD_TOLERANCE};
