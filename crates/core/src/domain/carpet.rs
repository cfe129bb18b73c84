//! Menger-Sierpinski carpet
//!
//! The square `[-half_size, half_size]²` is split into `ratio × ratio` blocks; the
//! central block is removed and the remaining blocks are refined the same way,
//! `depth` times.

use crate::error::{require_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Carpet geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carpet {
    /// Half side length of the enclosing square
    pub half_size: f64,
    /// Number of refinement levels
    pub depth: u32,
    /// Blocks per side at each level (odd, at least 3)
    pub ratio: u32,
}

impl Default for Carpet {
    fn default() -> Self {
        Self {
            half_size: 1.0,
            depth: 2,
            ratio: 5,
        }
    }
}

/// Where a point falls relative to the carpet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarpetCell {
    /// Outside the enclosing square
    Outside,
    /// On the carpet material
    Solid,
    /// Inside a hole removed at the given level (0 = largest hole)
    Hole(u32),
}

impl Carpet {
    pub(crate) fn validate(&self, shape: &'static str) -> Result<(), ConfigError> {
        require_positive("half_size", self.half_size)?;
        if self.ratio < 3 || self.ratio & 1 == 0 {
            return Err(ConfigError::InvalidShape {
                shape,
                reason: format!("ratio must be odd and at least 3, got {}", self.ratio),
            });
        }
        Ok(())
    }

    /// Locate `(x, y)` in the carpet
    pub fn locate(&self, x: f64, y: f64) -> CarpetCell {
        let side = 2.0 * self.half_size;
        let mut u = (x + self.half_size) / side;
        let mut v = (y + self.half_size) / side;
        if u <= 0.0 || u >= 1.0 || v <= 0.0 || v >= 1.0 {
            return CarpetCell::Outside;
        }

        let ratio = f64::from(self.ratio);
        let middle = f64::from(self.ratio / 2);
        for level in 0..self.depth {
            u *= ratio;
            v *= ratio;
            let (bu, bv) = (u.floor(), v.floor());
            if bu == middle && bv == middle {
                return CarpetCell::Hole(level);
            }
            u -= bu;
            v -= bv;
        }
        CarpetCell::Solid
    }
}
