//! Frame-by-frame driver and its reports

mod heat_simulation;
mod report;

pub use heat_simulation::HeatSimulation;
pub use report::FrameReport;
