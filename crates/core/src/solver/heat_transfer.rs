//! Explicit finite-difference heat stencil
//!
//! One step of
//! ```text
//! ∂φ/∂t = (1/ν) ∇²φ - v ∂φ/∂x
//! ```
//! on the masked grid. Only interior cells (status 1) are updated; outside and
//! graded boundary cells keep their value and act as fixed sources for their
//! neighbours.
//!
//! In lattice units the update of an interior cell is
//! ```text
//! φ' = φ + rx (φ_E + φ_W - 2φ) + ry (φ_N + φ_S - 2φ) - rx v (φ_E - φ)
//! ```
//! with `rx = dt / (dx² ν)` and `ry = dt / (dy² ν)`. The scheme is bounded only
//! while `rx + ry ≤ ½` (`rx ≤ ¼` on square cells); this is not enforced.

use super::boundary::BoundaryCondition;
use crate::config::PhysicsParams;
use crate::core_types::{CellStatus, GridGeometry};
use rayon::prelude::*;

/// Lattice coefficients of one stencil step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// `dt / (dx² ν)`
    pub rate_x: f64,
    /// `dt / (dy² ν)`
    pub rate_y: f64,
    /// Drift speed of the one-sided advection term
    pub drift: f64,
    /// `dt / (dx ν)`, relaxation rate of absorbing border cells
    pub edge_rate: f64,
    /// Optional clamp of updated values to `[-vmax, vmax]`
    pub amplitude_clamp: Option<f64>,
    /// Edge policy
    pub boundary: BoundaryCondition,
}

impl DiffusionParams {
    /// Derive lattice coefficients from physical constants and grid spacing
    pub fn from_physics(
        physics: &PhysicsParams,
        geometry: &GridGeometry,
        boundary: BoundaryCondition,
    ) -> Self {
        let dx = geometry.dx();
        let dy = geometry.dy();
        Self {
            rate_x: physics.dt / (dx * dx * physics.viscosity),
            rate_y: physics.dt / (dy * dy * physics.viscosity),
            drift: physics.drift_speed,
            edge_rate: physics.dt / (dx * physics.viscosity),
            amplitude_clamp: physics.amplitude_clamp,
            boundary,
        }
    }

    /// Square-cell coefficients with a given lattice rate and no drift
    pub fn lattice(rate: f64, boundary: BoundaryCondition) -> Self {
        Self {
            rate_x: rate,
            rate_y: rate,
            drift: 0.0,
            edge_rate: rate,
            amplitude_clamp: None,
            boundary,
        }
    }

    /// `2 (rx + ry)`; the explicit scheme stays bounded while this is at most 1
    pub fn stability_number(&self) -> f64 {
        2.0 * (self.rate_x + self.rate_y)
    }

    /// Whether the coefficients respect the explicit stability bound
    pub fn is_stable(&self) -> bool {
        self.stability_number() <= 1.0
    }
}

/// Advance `field_in` by one step into `field_out`
///
/// Every cell of `field_out` is written: interior cells receive the stencil
/// update, all others a copy of their input value. Rows are processed in
/// parallel and only ever read `field_in`, so the result does not depend on the
/// update order.
///
/// # Arguments
///
/// * `field_in` - Committed field of the previous step
/// * `field_out` - Buffer receiving the new field
/// * `status` - Status grid
/// * `width` - Grid width in cells
/// * `height` - Grid height in cells
/// * `params` - Lattice coefficients and edge policy
pub fn step_diffusion_cpu(
    field_in: &[f64],
    field_out: &mut [f64],
    status: &[CellStatus],
    width: usize,
    height: usize,
    params: &DiffusionParams,
) {
    debug_assert_eq!(field_in.len(), width * height);
    debug_assert_eq!(field_out.len(), width * height);
    debug_assert_eq!(status.len(), width * height);

    field_out
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let idx = y * width + x;
                let t = field_in[idx];

                if !status[idx].is_interior() {
                    *cell = t;
                    continue;
                }

                let updated = if let Some((sx, sy)) =
                    params.boundary.absorbing_source(x, y, width, height)
                {
                    // Border line: relax toward the inward neighbour
                    t - params.edge_rate * (t - field_in[sy * width + sx])
                } else {
                    let n = params.boundary.neighbors(x, y, width, height);
                    let left = field_in[y * width + n.left];
                    let right = field_in[y * width + n.right];
                    let down = field_in[n.down * width + x];
                    let up = field_in[n.up * width + x];

                    t + params.rate_x * (left + right - 2.0 * t)
                        + params.rate_y * (down + up - 2.0 * t)
                        - params.rate_x * params.drift * (right - t)
                };

                *cell = match params.amplitude_clamp {
                    Some(vmax) => updated.clamp(-vmax, vmax),
                    None => updated,
                };
            }
        });
}
