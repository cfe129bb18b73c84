//! Per-cell domain status and the fixed temperatures attached to it

use serde::{Deserialize, Serialize};

/// Classification of one grid cell
///
/// - `0`: outside the domain, held at the outside temperature
/// - `1`: interior fluid, evolved by the stencil
/// - `2 + d`: graded boundary layer at depth `d`, held at a fixed temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct CellStatus(u16);

impl CellStatus {
    /// Outside the domain
    pub const OUTSIDE: Self = Self(0);
    /// Interior fluid cell
    pub const INTERIOR: Self = Self(1);

    /// Graded boundary cell at `depth` (0 = innermost heated layer)
    #[inline]
    pub const fn boundary(depth: u16) -> Self {
        Self(depth.saturating_add(2))
    }

    /// Raw status code
    #[inline]
    pub const fn code(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_outside(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_interior(self) -> bool {
        self.0 == 1
    }

    /// Any status other than outside
    #[inline]
    pub const fn is_in_domain(self) -> bool {
        self.0 != 0
    }

    /// Depth of a graded boundary cell, `None` for outside and interior cells
    #[inline]
    pub const fn boundary_depth(self) -> Option<u16> {
        if self.0 >= 2 {
            Some(self.0 - 2)
        } else {
            None
        }
    }
}

/// Temperatures imposed on cells the stencil never updates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryTemperatures {
    /// Value held by outside cells
    pub outside: f64,
    /// Value held by the innermost heated layer
    pub inside: f64,
    /// Geometric factor applied per layer of depth
    pub shell_attenuation: f64,
}

impl Default for BoundaryTemperatures {
    fn default() -> Self {
        Self {
            outside: 2.0,
            inside: 0.0,
            shell_attenuation: 0.75,
        }
    }
}

impl BoundaryTemperatures {
    /// Fixed value for a status, `None` for interior cells
    pub fn fixed_value(&self, status: CellStatus) -> Option<f64> {
        if status.is_outside() {
            Some(self.outside)
        } else {
            status
                .boundary_depth()
                .map(|depth| self.inside * self.shell_attenuation.powi(i32::from(depth)))
        }
    }
}
