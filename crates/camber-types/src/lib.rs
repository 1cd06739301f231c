pub mod color;
pub mod meta;
pub mod names;
pub mod refs;
pub mod vec3;

pub use color::*;
pub use meta::*;
pub use names::*;
pub use refs::*;
pub use vec3::*;
