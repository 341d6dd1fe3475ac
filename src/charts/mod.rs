//! Charts module - Static PNG and interactive HTML rendering

mod error;
mod plotter;
mod renderer;

pub use error::ChartError;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
