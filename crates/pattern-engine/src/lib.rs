//! Parametric pattern cutting over arbitrarily-oriented planar faces.
//!
//! Layout math is pure and separately testable; all removed material goes
//! through a single batched boolean cut per pattern.

mod apply;
mod cutter;
mod frame;
mod layout;
mod options;

pub use apply::CutPattern;
pub use frame::{face_frame, top_face_frame, FaceFrame};
pub use layout::{grid_centers, line_centers, GridParams, LineLayout};
pub use options::{PatternOptions, PatternShape};
