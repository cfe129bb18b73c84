//! Escape-time membership for Mandelbrot and Julia sets
//!
//! Iterates `z ← z² + c` until `|z|²` exceeds a fixed limit or the iteration cap
//! is reached. Points that never escape belong to the set.

use crate::core_types::CellStatus;
use crate::error::{require_positive, ConfigError};
use nalgebra::Complex;
use serde::{Deserialize, Serialize};

/// Parameters shared by every escape-time domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeTime {
    /// Iteration cap; points still bounded after this many steps are inside
    pub max_iterations: u32,
    /// Escape threshold on `|z|²`
    pub escape_limit: f64,
    /// Window coordinates are divided by this before iterating
    pub scale: f64,
    /// Number of graded iteration shells drawn around a heated set
    #[serde(default)]
    pub shells: u16,
}

impl Default for EscapeTime {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            escape_limit: 10.0,
            scale: 1.0,
            shells: 0,
        }
    }
}

impl EscapeTime {
    /// Parameters used for Julia-set domains (coordinates shrunk by 1.1)
    pub fn julia_default() -> Self {
        Self {
            scale: 1.1,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self, shape: &'static str) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidShape {
                shape,
                reason: "iteration cap must be at least 1".to_string(),
            });
        }
        require_positive("escape_limit", self.escape_limit)?;
        require_positive("scale", self.scale)
    }

    /// Escape iteration of the Mandelbrot orbit started at 0 with `c = (x, y)`
    pub fn mandelbrot(&self, x: f64, y: f64) -> Option<u32> {
        let c = Complex::new(x / self.scale, y / self.scale);
        escape_iteration(Complex::new(0.0, 0.0), c, self.max_iterations, self.escape_limit)
    }

    /// Escape iteration of the Julia orbit started at `(x, y)` for parameter `c`
    pub fn julia(&self, x: f64, y: f64, c: Complex<f64>) -> Option<u32> {
        let z = Complex::new(x / self.scale, y / self.scale);
        escape_iteration(z, c, self.max_iterations, self.escape_limit)
    }

    /// Status of a point in a heated escape-time domain
    ///
    /// The set itself is the innermost heated layer. With `shells > 0`, an orbit
    /// escaping at iteration `n ≥ cap / 2^k` (smallest such `k ≤ shells`) lands in
    /// shell `k`; everything escaping earlier is interior fluid.
    pub fn heated_status(&self, escape: Option<u32>) -> CellStatus {
        let Some(n) = escape else {
            return CellStatus::boundary(0);
        };
        let shells = self.shells.min(31);
        (1..=shells)
            .find(|&k| n >= self.max_iterations >> k)
            .map_or(CellStatus::INTERIOR, CellStatus::boundary)
    }
}

/// Iterate `z ← z² + c` from `z`; `Some(n)` if `|z|² > limit` at step `n`, `None` if bounded
#[inline]
pub fn escape_iteration(
    mut z: Complex<f64>,
    c: Complex<f64>,
    max_iterations: u32,
    limit: f64,
) -> Option<u32> {
    for n in 0..max_iterations {
        if z.norm_sqr() > limit {
            return Some(n);
        }
        z = z * z + c;
    }
    None
}
