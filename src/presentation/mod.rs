pub mod bias_matrix;
pub mod chart_panel;
pub mod symbol_selector;

pub use bias_matrix::BiasMatrix;
pub use chart_panel::ChartPanel;
pub use symbol_selector::SymbolSelector;
