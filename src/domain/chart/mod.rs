//! Chart aggregate: engine-facing data, theme and the engine boundary traits.

pub mod entities;
pub mod surface;
pub mod value_objects;

pub use entities::*;
pub use surface::*;
pub use value_objects::*;
