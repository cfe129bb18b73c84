//! Heat Simulation Core Library
//!
//! Animates the 2-D heat equation on irregular and fractal domains with an
//! explicit finite-difference stencil on a uniform grid.
//!
//! ## Pipeline
//!
//! Each displayed frame runs:
//! - Domain classification of every cell (rescanned when a Julia domain moves)
//! - Several explicit stencil steps under a Dirichlet, periodic or absorbing edge policy
//! - Optional variance-based renormalisation for display contrast
//! - Gradient computation and equal-flux field-line tracing
//!
//! Rendering and frame export are left to the caller, which reads the
//! committed field and traced lines through [`HeatSimulation`] accessors.

// Core types and utilities
pub mod core_types;

// Run configuration and errors
pub mod config;
pub mod error;

// Domain shapes and the classifier
pub mod domain;

// Grid solver and frame driver
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{BoundaryTemperatures, CellStatus, GridGeometry};

pub use config::{DisplayConfig, FrameConfig, InitialCondition, PhysicsParams, SimulationConfig};
pub use domain::{JuliaParameter, Shape};
pub use error::{ConfigError, SimError};
pub use simulation::{FrameReport, HeatSimulation};
pub use solver::{
    BoundaryCondition, FieldData, FieldLine, FieldLineConfig, FieldRepresentation, GridPreset,
    JuliaSchedule,
};
