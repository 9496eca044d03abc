pub mod chart_surface;
pub mod gateway;
pub mod selection_sync;
pub mod symbol_search;

pub use chart_surface::*;
pub use gateway::*;
pub use selection_sync::*;
pub use symbol_search::*;
