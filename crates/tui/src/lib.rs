//! txstream-tui - live terminal chart sink for the txstream pipeline.

mod chart;
mod plot;

pub use plot::PlotOutput;
