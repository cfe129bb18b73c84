//! Field solver for the masked heat equation
//!
//! Everything that operates on the grid once the domain is classified lives
//! here: the double-buffered [`FieldStore`], the explicit stencil, variance
//! renormalisation, the gradient, the equal-flux field-line tracer and the
//! Julia parameter schedule. All per-cell loops are data-parallel over rows via
//! rayon; each stage reads a committed buffer and writes a separate one.
//!
//! # Example
//!
//! ```rust,ignore
//! use heat_sim_core::solver::{BoundaryCondition, DiffusionParams, FieldStore, GridPreset};
//!
//! let geometry = GridPreset::Low.geometry();
//! let mut store = FieldStore::allocate(geometry)?;
//! store.step(&DiffusionParams::lattice(0.2, BoundaryCondition::Dirichlet));
//! ```

mod boundary;
mod context;
mod display;
pub mod field_lines;
mod fields;
mod gradient;
mod heat_transfer;
mod julia;
pub mod profiler;
mod quality;
mod store;
mod variance;

// Re-exports
pub use boundary::{BoundaryCondition, Neighbors};
pub use context::SimulationContext;
pub use display::{display_values, FieldRepresentation};
pub use field_lines::{
    select_seeds, trace_field_line, trace_field_lines, FieldLine, FieldLineConfig, SeedCurve,
    Termination,
};
pub use fields::FieldData;
pub use gradient::{compute_gradient, GradientField};
pub use heat_transfer::{step_diffusion_cpu, DiffusionParams};
pub use julia::JuliaSchedule;
pub use profiler::{FrameTimer, ProfilerScope};
pub use quality::{GridPreset, REFERENCE_X_RANGE, REFERENCE_Y_RANGE};
pub use store::FieldStore;
pub use variance::{compute_variance, display_scale, renormalize_field};
