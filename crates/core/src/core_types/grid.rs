//! Grid geometry
//!
//! Maps cell indices `(i, j)` of an `nx × ny` grid onto the continuous window
//! `[x_min, x_max] × [y_min, y_max]` and back. Index `i` runs along x, `j` along y,
//! and fields are stored row-major (`j * nx + i`).

use crate::error::ConfigError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Affine map between the cell lattice and window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    nx: usize,
    ny: usize,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl GridGeometry {
    /// Create a geometry; call [`GridGeometry::validate`] before allocating fields
    #[must_use]
    pub const fn new(nx: usize, ny: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            nx,
            ny,
            x_min: x_range.0,
            x_max: x_range.1,
            y_min: y_range.0,
            y_max: y_range.1,
        }
    }

    /// Reject grids the stencil cannot run on
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an axis has fewer than two cells or a window
    /// bound is inverted or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx < 2 || self.ny < 2 {
            return Err(ConfigError::GridTooSmall {
                nx: self.nx,
                ny: self.ny,
            });
        }
        for (axis, min, max) in [
            ("x", self.x_min, self.x_max),
            ("y", self.y_min, self.y_max),
        ] {
            if !(min.is_finite() && max.is_finite() && max > min) {
                return Err(ConfigError::InvalidWindow { axis, min, max });
            }
        }
        Ok(())
    }

    /// Cells along x
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Window bounds as `((x_min, x_max), (y_min, y_max))`
    pub const fn window(&self) -> ((f64, f64), (f64, f64)) {
        ((self.x_min, self.x_max), (self.y_min, self.y_max))
    }

    /// Cell width along x
    pub fn dx(&self) -> f64 {
        (self.x_max - self.x_min) / self.nx as f64
    }

    /// Cell height along y
    pub fn dy(&self) -> f64 {
        (self.y_max - self.y_min) / self.ny as f64
    }

    /// Row-major storage index of cell `(i, j)`
    #[inline]
    pub const fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Window coordinates of the centre of cell `(i, j)`
    #[inline]
    pub fn ij_to_xy(&self, i: usize, j: usize) -> Vector2<f64> {
        Vector2::new(
            self.x_min + (i as f64 + 0.5) * self.dx(),
            self.y_min + (j as f64 + 0.5) * self.dy(),
        )
    }

    /// Cell containing `(x, y)`; may lie outside the grid for points outside the window
    #[inline]
    pub fn xy_to_ij(&self, x: f64, y: f64) -> (i64, i64) {
        let u = (x - self.x_min) / (self.x_max - self.x_min);
        let v = (y - self.y_min) / (self.y_max - self.y_min);
        (
            (u * self.nx as f64).floor() as i64,
            (v * self.ny as f64).floor() as i64,
        )
    }

    /// Cell containing `(x, y)`, clamped onto the nearest edge cell
    #[inline]
    pub fn xy_to_ij_clamped(&self, x: f64, y: f64) -> (usize, usize) {
        let (i, j) = self.xy_to_ij(x, y);
        (
            i.clamp(0, self.nx as i64 - 1) as usize,
            j.clamp(0, self.ny as i64 - 1) as usize,
        )
    }

    /// Whether `(x, y)` lies inside the window
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..self.x_max).contains(&x) && (self.y_min..self.y_max).contains(&y)
    }
}
