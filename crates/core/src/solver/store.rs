//! Double-buffered field storage
//!
//! [`FieldStore`] owns the committed field, the scratch buffer the next step
//! writes into, and the status grid. Buffers are allocated once per run. A step
//! only reads the committed buffer and only writes the scratch buffer; the swap
//! afterwards is the commit, so readers never observe a half-updated field.

use super::fields::FieldData;
use super::heat_transfer::{step_diffusion_cpu, DiffusionParams};
use super::variance::{compute_variance, renormalize_field};
use crate::config::InitialCondition;
use crate::core_types::{BoundaryTemperatures, CellStatus, GridGeometry};
use crate::domain::{JuliaParameter, Shape};
use crate::error::SimError;
use rayon::prelude::*;
use tracing::debug;

/// Temperature buffers and status grid of one run
#[derive(Debug, Clone)]
pub struct FieldStore {
    geometry: GridGeometry,
    current: FieldData<f64>,
    next: FieldData<f64>,
    status: FieldData<CellStatus>,
}

impl FieldStore {
    /// Allocate all buffers for `geometry`; every cell starts outside at 0
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Allocation`] when a buffer cannot be reserved.
    pub fn allocate(geometry: GridGeometry) -> Result<Self, SimError> {
        let (nx, ny) = (geometry.nx(), geometry.ny());
        let store = Self {
            geometry,
            current: FieldData::try_with_value(nx, ny, 0.0)?,
            next: FieldData::try_with_value(nx, ny, 0.0)?,
            status: FieldData::try_with_value(nx, ny, CellStatus::OUTSIDE)?,
        };
        debug!("Allocated field buffers: {}x{} cells", nx, ny);
        Ok(store)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Committed field
    pub fn field(&self) -> &FieldData<f64> {
        &self.current
    }

    /// Committed field, for seeding custom initial states
    pub fn field_mut(&mut self) -> &mut FieldData<f64> {
        &mut self.current
    }

    pub fn status(&self) -> &FieldData<CellStatus> {
        &self.status
    }

    /// Classify every cell centre; rows are processed in parallel
    pub fn classify(&mut self, shape: &Shape, julia: JuliaParameter) {
        let geometry = self.geometry;
        self.status
            .as_mut_slice()
            .par_chunks_mut(geometry.nx())
            .enumerate()
            .for_each(|(j, row)| {
                for (i, cell) in row.iter_mut().enumerate() {
                    let p = geometry.ij_to_xy(i, j);
                    *cell = shape.classify(p.x, p.y, julia);
                }
            });
    }

    /// Assign initial values from the current status grid
    ///
    /// Outside and graded cells get their fixed temperature, interior cells the
    /// initial condition at their centre.
    pub fn initialize(
        &mut self,
        initial: &InitialCondition,
        temperatures: &BoundaryTemperatures,
    ) {
        let geometry = self.geometry;
        let status = self.status.as_slice();
        self.current
            .as_mut_slice()
            .par_chunks_mut(geometry.nx())
            .enumerate()
            .for_each(|(j, row)| {
                for (i, value) in row.iter_mut().enumerate() {
                    let p = geometry.ij_to_xy(i, j);
                    *value = temperatures
                        .fixed_value(status[geometry.index(i, j)])
                        .unwrap_or_else(|| initial.value_at(p.x, p.y));
                }
            });
    }

    /// Rescan the status grid for a new Julia parameter
    ///
    /// Cells that change status take the fixed temperature of their new status;
    /// cells that become interior keep their current value. Returns the number
    /// of changed cells.
    pub fn reclassify(
        &mut self,
        shape: &Shape,
        julia: JuliaParameter,
        temperatures: &BoundaryTemperatures,
    ) -> usize {
        let geometry = self.geometry;
        let nx = geometry.nx();
        self.status
            .as_mut_slice()
            .par_chunks_mut(nx)
            .zip(self.current.as_mut_slice().par_chunks_mut(nx))
            .enumerate()
            .map(|(j, (status_row, field_row))| {
                let mut changed = 0;
                for i in 0..nx {
                    let p = geometry.ij_to_xy(i, j);
                    let updated = shape.classify(p.x, p.y, julia);
                    if updated != status_row[i] {
                        changed += 1;
                        status_row[i] = updated;
                        if let Some(value) = temperatures.fixed_value(updated) {
                            field_row[i] = value;
                        }
                    }
                }
                changed
            })
            .sum()
    }

    /// Advance the committed field by one stencil step and commit it
    pub fn step(&mut self, params: &DiffusionParams) {
        step_diffusion_cpu(
            self.current.as_slice(),
            self.next.as_mut_slice(),
            self.status.as_slice(),
            self.geometry.nx(),
            self.geometry.ny(),
            params,
        );
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Second moment of the committed field over in-domain cells
    pub fn variance(&self) -> f64 {
        compute_variance(&self.current, &self.status)
    }

    /// Divide the committed field by `√variance`; see [`renormalize_field`]
    pub fn normalize(&mut self, variance: f64) -> bool {
        renormalize_field(&mut self.current, &self.status, variance)
    }
}
