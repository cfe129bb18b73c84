//! Boundary-condition policies at the edges of the grid
//!
//! The policy decides which cell stands in for a neighbour that would fall
//! outside the grid:
//!
//! - `Dirichlet`: the index is clamped onto the edge, so the edge row reads itself
//!   and acts as a wall against the outermost value.
//! - `Periodic`: the index wraps around.
//! - `Absorbing`: interior cells use clamped neighbours; the four border lines
//!   relax toward their inward neighbour instead of following the stencil. This
//!   only approximates an outgoing boundary.

use serde::{Deserialize, Serialize};

/// Boundary-condition policy, selected once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    #[default]
    Dirichlet,
    Periodic,
    Absorbing,
}

/// Coordinates of the four axis neighbours of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    /// x - 1
    pub left: usize,
    /// x + 1
    pub right: usize,
    /// y - 1
    pub down: usize,
    /// y + 1
    pub up: usize,
}

impl BoundaryCondition {
    /// Neighbour coordinates of `(x, y)` on a `width × height` grid
    #[inline]
    pub fn neighbors(self, x: usize, y: usize, width: usize, height: usize) -> Neighbors {
        let ((left, right), (down, up)) = match self {
            BoundaryCondition::Dirichlet | BoundaryCondition::Absorbing => {
                (clamped(x, width), clamped(y, height))
            }
            BoundaryCondition::Periodic => (wrapped(x, width), wrapped(y, height)),
        };
        Neighbors {
            left,
            right,
            down,
            up,
        }
    }

    /// Inward neighbour of a border cell under the absorbing policy
    ///
    /// Borders are tested in the order right, top, left, bottom, so corners
    /// relax along the first matching border. Returns `None` for non-border cells
    /// and for every cell under the other policies.
    #[inline]
    pub fn absorbing_source(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Option<(usize, usize)> {
        if self != BoundaryCondition::Absorbing {
            return None;
        }
        if x == width - 1 {
            Some((x - 1, y))
        } else if y == height - 1 {
            Some((x, y - 1))
        } else if x == 0 {
            Some((1, y))
        } else if y == 0 {
            Some((x, 1))
        } else {
            None
        }
    }
}

/// `(i - 1, i + 1)` clamped to `[0, n - 1]`
#[inline]
pub(crate) fn clamped(i: usize, n: usize) -> (usize, usize) {
    (i.saturating_sub(1), (i + 1).min(n - 1))
}

/// `(i - 1, i + 1)` modulo `n`
#[inline]
pub(crate) fn wrapped(i: usize, n: usize) -> (usize, usize) {
    ((i + n - 1) % n, (i + 1) % n)
}
