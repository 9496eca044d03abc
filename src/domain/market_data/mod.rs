//! Market data aggregate: price bars, series and the value objects they are built from.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
