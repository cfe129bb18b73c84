//! Error types for simulation setup
//!
//! Numerical trouble (an integration step above the stability bound, runaway
//! amplitudes) is not reported here: it is a configuration precondition that is
//! logged at construction time. The only hard failures are rejected
//! configurations and field buffers that cannot be allocated.

use std::fmt;

/// A configuration value that cannot describe a valid run
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid needs at least two cells on each axis
    GridTooSmall {
        /// Cells along x
        nx: usize,
        /// Cells along y
        ny: usize,
    },
    /// Coordinate window is empty, inverted or not finite
    InvalidWindow {
        /// Axis name (`"x"` or `"y"`)
        axis: &'static str,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// A physical or numerical parameter must be finite and strictly positive
    NonPositive {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// A coordinate parameter must be finite
    NotFinite {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// A count parameter must be at least one
    ZeroCount {
        /// Parameter name
        name: &'static str,
    },
    /// Counts whose product overflows `usize`
    CountOverflow {
        /// Parameter names of the product
        names: (&'static str, &'static str),
    },
    /// A domain shape carries parameters its membership test cannot use
    InvalidShape {
        /// Shape name
        shape: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::GridTooSmall { nx, ny } => {
                write!(f, "Grid must have at least 2x2 cells, got {nx}x{ny}")
            }
            ConfigError::InvalidWindow { axis, min, max } => {
                write!(f, "Invalid {axis} window [{min}, {max}]")
            }
            ConfigError::NonPositive { name, value } => {
                write!(f, "Parameter '{name}' must be finite and positive, got {value}")
            }
            ConfigError::NotFinite { name, value } => {
                write!(f, "Parameter '{name}' must be finite, got {value}")
            }
            ConfigError::ZeroCount { name } => write!(f, "Parameter '{name}' must be at least 1"),
            ConfigError::CountOverflow { names: (a, b) } => {
                write!(f, "Product of '{a}' and '{b}' overflows")
            }
            ConfigError::InvalidShape { shape, reason } => {
                write!(f, "Invalid {shape} domain: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to set up a simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Configuration rejected by validation
    Config(ConfigError),
    /// Field buffers could not be reserved
    Allocation {
        /// Number of cells requested per buffer
        cells: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(err) => write!(f, "Configuration error: {err}"),
            SimError::Allocation { cells } => {
                write!(f, "Failed to allocate field buffers for {cells} cells")
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(err) => Some(err),
            SimError::Allocation { .. } => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err)
    }
}

/// Check that a parameter is finite and strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
