//! Charts module - Chart catalog and rendering

mod catalog;
mod plotter;

pub use catalog::{ChartSpec, DashboardView, Tab};
pub use plotter::ChartPlotter;
