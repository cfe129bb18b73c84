//! Frame driver for the heat animation
//!
//! [`HeatSimulation`] owns the field store and per-run context and runs one
//! displayed frame at a time:
//!
//! 1. move the Julia parameter and rescan the status grid (Julia domains only)
//! 2. take `substeps` stencil steps
//! 3. measure the variance and, with adaptive scaling, renormalise
//! 4. compute the gradient of the committed field
//! 5. seed and trace the field lines
//!
//! Everything a renderer needs is readable between calls. Stopping a run means
//! not calling [`HeatSimulation::advance_frame`] again; a frame is never left
//! half done.

use super::report::FrameReport;
use crate::config::SimulationConfig;
use crate::core_types::{CellStatus, GridGeometry};
use crate::domain::JuliaParameter;
use crate::error::SimError;
use crate::solver::{
    compute_gradient, display_scale, display_values, trace_field_lines, DiffusionParams,
    FieldData, FieldLine, FieldStore, FrameTimer, GradientField, ProfilerScope,
    SimulationContext,
};
use tracing::{debug, info, warn};

/// Masked heat-equation animation
pub struct HeatSimulation {
    config: SimulationConfig,
    params: DiffusionParams,
    store: FieldStore,
    context: SimulationContext,
    gradient: GradientField,
    field_lines: Vec<FieldLine>,
    timer: FrameTimer,
}

impl HeatSimulation {
    /// Build a run: validate, allocate, classify and set initial values
    ///
    /// An integration step above the explicit stability bound is accepted with a
    /// warning.
    ///
    /// # Arguments
    ///
    /// * `config` - Complete run configuration
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for invalid parameters and
    /// [`SimError::Allocation`] when the field buffers cannot be reserved.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;

        let params = DiffusionParams::from_physics(&config.physics, &config.grid, config.boundary);
        if !params.is_stable() {
            warn!(
                "Integration step exceeds the explicit stability bound: 2(rx + ry) = {:.4} > 1",
                params.stability_number()
            );
        }

        let mut store = FieldStore::allocate(config.grid)?;
        let context = SimulationContext::new(&config.julia);
        store.classify(&config.shape, context.julia());
        store.initialize(&config.initial, &config.temperatures);
        let gradient = compute_gradient(store.field(), &config.grid);

        info!(
            "Heat simulation initialized: {}x{} grid, shape={}, boundary={:?}, intstep={:.5}",
            config.grid.nx(),
            config.grid.ny(),
            config.shape.name(),
            config.boundary,
            params.rate_x
        );

        Ok(Self {
            config,
            params,
            store,
            context,
            gradient,
            field_lines: Vec::new(),
            timer: FrameTimer::new(),
        })
    }

    /// Produce the next displayed frame
    pub fn advance_frame(&mut self) -> FrameReport {
        let scope = ProfilerScope::new("frame");
        let frame = self.context.frame();

        let reclassified_cells = self.update_domain();

        {
            let _integrate = ProfilerScope::new("integrate");
            for _ in 0..self.config.frames.substeps {
                self.store.step(&self.params);
            }
        }

        let variance = self.store.variance();
        let adaptive = self.config.display.adaptive_scaling;
        let normalized = adaptive && self.store.normalize(variance);
        let scale = if adaptive {
            display_scale(variance)
        } else {
            1.0
        };

        self.gradient = compute_gradient(self.store.field(), &self.config.grid);
        self.trace_lines();

        let elapsed_ms = scope.elapsed_ms();
        self.timer.record(elapsed_ms);
        self.context.finish_frame();

        let julia = self.context.julia();
        debug!(
            "Frame {}: {} substeps, variance={:.6e}, scale={:.4}, lines={}, {:.2}ms",
            frame,
            self.config.frames.substeps,
            variance,
            scale,
            self.field_lines.len(),
            elapsed_ms
        );

        FrameReport {
            frame,
            julia: [julia.re, julia.im],
            substeps: self.config.frames.substeps,
            variance,
            display_scale: scale,
            normalized,
            reclassified_cells,
            field_lines: self.field_lines.len(),
            elapsed_ms,
        }
    }

    /// Produce `frames` frames and collect their reports
    pub fn run(&mut self, frames: u64) -> Vec<FrameReport> {
        (0..frames).map(|_| self.advance_frame()).collect()
    }

    /// Produce the number of frames the configuration asks for
    pub fn run_configured(&mut self) -> Vec<FrameReport> {
        self.run(self.config.frames.frames)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Lattice coefficients derived from the configuration
    pub fn diffusion_params(&self) -> &DiffusionParams {
        &self.params
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.store.geometry()
    }

    /// Committed scalar field
    pub fn field(&self) -> &FieldData<f64> {
        self.store.field()
    }

    pub fn status(&self) -> &FieldData<CellStatus> {
        self.store.status()
    }

    /// Gradient of the last produced frame
    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    /// Field lines of the last produced frame
    pub fn field_lines(&self) -> &[FieldLine] {
        &self.field_lines
    }

    /// Renderer-facing values of the committed field
    pub fn display_values(&self) -> Vec<f64> {
        display_values(
            self.store.field(),
            self.store.status(),
            &self.gradient,
            self.config.display.representation,
        )
    }

    /// Current second moment of the field
    pub fn variance(&self) -> f64 {
        self.store.variance()
    }

    /// Index of the next frame to be produced
    pub fn frame(&self) -> u64 {
        self.context.frame()
    }

    pub fn julia(&self) -> JuliaParameter {
        self.context.julia()
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    fn update_domain(&mut self) -> usize {
        if !self.config.shape.depends_on_julia() || !self.context.advance_julia(&self.config.julia)
        {
            return 0;
        }
        let _scope = ProfilerScope::new("reclassify");
        let julia = self.context.julia();
        let changed = self
            .store
            .reclassify(&self.config.shape, julia, &self.config.temperatures);
        info!(
            "Frame {}: Julia parameter c = ({:.5}, {:.5})",
            self.context.frame(),
            julia.re,
            julia.im
        );
        debug!("Reclassified {} cells", changed);
        changed
    }

    fn trace_lines(&mut self) {
        let Some(line_config) = self.config.field_lines else {
            self.field_lines.clear();
            return;
        };
        let _scope = ProfilerScope::new("field_lines");
        let curve = self.context.seed_curve(&line_config);
        self.field_lines = trace_field_lines(
            curve,
            &self.gradient,
            self.store.status(),
            self.store.geometry(),
            &line_config,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialCondition;
    use crate::domain::Shape;
    use crate::error::ConfigError;
    use crate::solver::{FieldLineConfig, GridPreset, JuliaSchedule};

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::from_preset(GridPreset::Low);
        config.frames.substeps = 2;
        config.field_lines = Some(FieldLineConfig {
            n_lines: 10,
            oversampling: 10,
            max_steps: 200,
            ..FieldLineConfig::default()
        });
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.frames.substeps = 0;
        assert!(matches!(
            HeatSimulation::new(config),
            Err(SimError::Config(ConfigError::ZeroCount { name: "substeps" }))
        ));
    }

    #[test]
    fn test_frame_report() {
        let mut sim = HeatSimulation::new(small_config()).unwrap();
        let reports = sim.run(3);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].frame, 2);
        assert_eq!(sim.frame(), 3);
        assert_eq!(reports[0].field_lines, 11);
        assert_eq!(sim.field_lines().len(), 11);
        assert_eq!(reports[0].display_scale, 1.0);
        assert!(!reports[0].normalized);
        assert_eq!(sim.timer().frames(), 3);
        // Frame 0 uses the parameter the grid was classified with
        assert_eq!(reports[0].reclassified_cells, 0);
    }

    #[test]
    fn test_julia_domain_follows_schedule() {
        let mut config = small_config();
        config.julia = JuliaSchedule::Circle {
            center: [-0.9, 0.0],
            radius: 0.15,
            period: 8.0,
        };
        let schedule = config.julia;
        let mut sim = HeatSimulation::new(config).unwrap();
        let reports = sim.run(3);
        assert!(reports[1].reclassified_cells > 0);
        assert_eq!(sim.julia(), schedule.advance(2));
    }

    #[test]
    fn test_static_shape_never_reclassifies() {
        let mut config = small_config();
        config.shape = Shape::Ellipse {
            semi_x: 1.5,
            semi_y: 0.8,
        };
        config.julia = JuliaSchedule::Cardioid;
        let mut sim = HeatSimulation::new(config).unwrap();
        assert!(sim.run(2).iter().all(|r| r.reclassified_cells == 0));
    }

    #[test]
    fn test_adaptive_scaling_normalizes() {
        let mut config = small_config();
        config.display.adaptive_scaling = true;
        config.field_lines = None;
        config.initial = InitialCondition::Uniform { value: 3.0 };
        let mut sim = HeatSimulation::new(config).unwrap();
        let report = sim.advance_frame();
        assert!(report.normalized);
        assert!(report.display_scale > 1.0);
        assert!((sim.variance() - 1.0).abs() < 1e-9);
        assert!(sim.field_lines().is_empty());
    }

    #[test]
    fn test_display_values_blank_outside() {
        let sim = HeatSimulation::new(small_config()).unwrap();
        let values = sim.display_values();
        for (value, status) in values.iter().zip(sim.status().as_slice()) {
            if status.is_outside() {
                assert_eq!(*value, 0.0);
            }
        }
    }
}
