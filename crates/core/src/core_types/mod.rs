//! Core types shared by every stage

pub mod grid;
pub mod status;

pub use grid::GridGeometry;
pub use status::{BoundaryTemperatures, CellStatus};
