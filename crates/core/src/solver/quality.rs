//! Grid resolution presets
//!
//! Every preset covers the same 16:9 window `[-2, 2] × [-1.125, 1.125]`, so a
//! shape looks the same at any resolution. Finer grids need a smaller time step
//! for the same lattice rate.

use crate::core_types::GridGeometry;
use serde::{Deserialize, Serialize};

/// Horizontal extent of the reference window
pub const REFERENCE_X_RANGE: (f64, f64) = (-2.0, 2.0);
/// Vertical extent of the reference window
pub const REFERENCE_Y_RANGE: (f64, f64) = (-1.125, 1.125);

/// Preset determining grid resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPreset {
    /// 1280×720 cells
    Ultra,
    /// 960×540 cells
    High,
    /// 640×360 cells
    Medium,
    /// 320×180 cells
    Low,
}

impl GridPreset {
    /// Grid dimensions `(nx, ny)` of this preset
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Ultra => (1280, 720),
            Self::High => (960, 540),
            Self::Medium => (640, 360),
            Self::Low => (320, 180),
        }
    }

    /// Geometry of this preset over the reference window
    #[must_use]
    pub const fn geometry(&self) -> GridGeometry {
        let (nx, ny) = self.dimensions();
        GridGeometry::new(nx, ny, REFERENCE_X_RANGE, REFERENCE_Y_RANGE)
    }

    /// Preset that keeps a frame interactive on a typical desktop CPU
    #[must_use]
    pub fn recommended() -> Self {
        Self::Medium
    }
}
