//! Analysis aggregate: the bias result returned by the service and its visual encoding.

pub mod entities;
pub mod visual;

pub use entities::*;
pub use visual::{
    BiasIcon, BiasVisual, ScoreTier, VisualCategory, confidence_width, map_bias_label,
    map_bias_str, map_score,
};
