//! Fluent, immutable solid modeling on top of a pluggable B-Rep kernel.
//!
//! A [`Workbench`] owns the kernel session; every operation on a [`Shape`]
//! returns a new value, never throws, and records failures in the shared
//! error registry so a chain stays continuable.

mod boolean;
mod error;
mod feature;
mod naming;
mod relative;
mod select;
mod shape;
mod text;
mod transform;
mod workbench;

pub use error::{ErrorRegistry, ModelError, RecordedError};
pub use select::EdgeFilter;
pub use shape::{AutoName, EdgeNames, Selection, Shape, SubPart};
pub use text::{FontFace, FontRegistry, PathCommand, TextOptions};
pub use workbench::Workbench;
