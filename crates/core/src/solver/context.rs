//! Per-run mutable state shared by the frame stages
//!
//! Holds what would otherwise be process-wide: the current Julia parameter, the
//! frame counter and the sampled seed curve of the field-line tracer, which is
//! built on first use and then kept for the rest of the run.

use super::field_lines::{FieldLineConfig, SeedCurve};
use super::julia::JuliaSchedule;
use crate::domain::JuliaParameter;
use tracing::info;

/// Run state passed by reference into each frame stage
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationContext {
    julia: JuliaParameter,
    frame: u64,
    seed_curve: Option<SeedCurve>,
}

impl SimulationContext {
    /// Context at frame 0 with the schedule's first parameter
    pub fn new(schedule: &JuliaSchedule) -> Self {
        Self {
            julia: schedule.advance(0),
            frame: 0,
            seed_curve: None,
        }
    }

    /// Julia parameter of the current frame
    pub fn julia(&self) -> JuliaParameter {
        self.julia
    }

    /// Index of the frame being produced
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Move the Julia parameter to the current frame; returns whether it changed
    pub fn advance_julia(&mut self, schedule: &JuliaSchedule) -> bool {
        let next = schedule.advance(self.frame);
        let changed = next != self.julia;
        self.julia = next;
        changed
    }

    /// Seed curve of the tracer, sampled on first request
    pub fn seed_curve(&mut self, config: &FieldLineConfig) -> &SeedCurve {
        self.seed_curve.get_or_insert_with(|| {
            info!(
                "Sampling field-line seed curve: {} points on ellipse ({:.3}, {:.3})",
                config.samples(),
                config.semi_axes[0],
                config.semi_axes[1]
            );
            SeedCurve::from_config(config)
        })
    }

    /// Whether the seed curve has been sampled yet
    pub fn has_seed_curve(&self) -> bool {
        self.seed_curve.is_some()
    }

    /// Close the current frame
    pub fn finish_frame(&mut self) {
        self.frame += 1;
    }
}
