//! Equal-flux field lines of the gradient
//!
//! A reference ellipse is sampled at `n_lines × oversampling` points. Summing
//! `|∇φ| · arc length` along it gives the flux through each arc; seeds are then
//! picked every time the running flux passes the next multiple of
//! `total / n_lines`, so line density follows flux density. Each seed is traced
//! along the normalised gradient with a fixed step length.
//!
//! The ellipse is only a proxy for the domain boundary, and the gradient is
//! sampled at the cell containing the current point (no interpolation).

use super::fields::FieldData;
use super::gradient::GradientField;
use crate::core_types::{CellStatus, GridGeometry};
use crate::error::{require_positive, ConfigError};
use nalgebra::Vector2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Seeding and tracing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldLineConfig {
    /// Lines seeded after the first one; `n_lines + 1` lines are traced
    pub n_lines: usize,
    /// Seed candidates per line along the reference ellipse
    pub oversampling: usize,
    /// Centre of the reference ellipse
    pub center: [f64; 2],
    /// Semi-axes of the reference ellipse
    pub semi_axes: [f64; 2],
    /// Distance moved per tracing step
    pub step: f64,
    /// Step budget per line
    pub max_steps: usize,
    /// Tracing stops once `|∇φ|²` drops to this value
    ///
    /// Compared against the centred difference over two cells, so the default
    /// is a quarter of the threshold for a one-cell difference quotient.
    pub stop_norm_sq: f64,
    /// `|∇φ|²` is raised to at least this value before normalising; same scale
    /// as `stop_norm_sq`
    pub floor_norm_sq: f64,
    /// Keep every n-th traced point (the endpoints are always kept)
    #[serde(default = "default_vertex_stride")]
    pub vertex_stride: usize,
}

fn default_vertex_stride() -> usize {
    8
}

impl Default for FieldLineConfig {
    fn default() -> Self {
        Self {
            n_lines: 200,
            oversampling: 100,
            center: [0.0, 0.0],
            semi_axes: [3.58_f64.sqrt(), 1.18_f64.sqrt()],
            step: 0.00002,
            max_steps: 100_000,
            stop_norm_sq: 2.5e-15,
            floor_norm_sq: 2.5e-10,
            vertex_stride: default_vertex_stride(),
        }
    }
}

impl FieldLineConfig {
    /// Number of seed candidates on the reference curve, saturating on overflow
    /// (rejected by [`FieldLineConfig::validate`])
    pub fn samples(&self) -> usize {
        self.n_lines.saturating_mul(self.oversampling)
    }

    /// Check counts, step, thresholds and the reference ellipse
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for zero counts, a sample count that overflows,
    /// a non-positive step or thresholds, a non-finite centre, and negative or
    /// non-finite semi-axes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_lines == 0 {
            return Err(ConfigError::ZeroCount { name: "n_lines" });
        }
        if self.oversampling == 0 {
            return Err(ConfigError::ZeroCount {
                name: "oversampling",
            });
        }
        if self.vertex_stride == 0 {
            return Err(ConfigError::ZeroCount {
                name: "vertex_stride",
            });
        }
        if self.n_lines.checked_mul(self.oversampling).is_none() {
            return Err(ConfigError::CountOverflow {
                names: ("n_lines", "oversampling"),
            });
        }
        require_positive("step", self.step)?;
        require_positive("stop_norm_sq", self.stop_norm_sq)?;
        require_positive("floor_norm_sq", self.floor_norm_sq)?;
        for (name, value) in [("center_x", self.center[0]), ("center_y", self.center[1])] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        // A zero radius is a degenerate but legal curve
        for (name, value) in [("semi_x", self.semi_axes[0]), ("semi_y", self.semi_axes[1])] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

/// Sampled reference curve carrying the seed candidates
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCurve {
    points: Vec<Vector2<f64>>,
    /// `arc_lengths[i] = |points[i + 1] - points[i]|`, wrapping at the end
    arc_lengths: Vec<f64>,
}

impl SeedCurve {
    /// Sample an ellipse at `samples` equally spaced angles, starting at angle 0
    pub fn ellipse(center: Vector2<f64>, semi_axes: Vector2<f64>, samples: usize) -> Self {
        let dangle = TAU / samples.max(1) as f64;
        let points: Vec<Vector2<f64>> = (0..samples)
            .map(|i| {
                let angle = i as f64 * dangle;
                center + Vector2::new(semi_axes.x * angle.cos(), semi_axes.y * angle.sin())
            })
            .collect();
        let arc_lengths = (0..points.len())
            .map(|i| (points[(i + 1) % points.len()] - points[i]).norm())
            .collect();
        Self {
            points,
            arc_lengths,
        }
    }

    /// Reference ellipse of a tracing configuration
    pub fn from_config(config: &FieldLineConfig) -> Self {
        Self::ellipse(
            Vector2::from(config.center),
            Vector2::from(config.semi_axes),
            config.samples(),
        )
    }

    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc_lengths
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flux through each arc: `|∇φ|` at the sample's cell times the arc length
    pub fn arc_flux(&self, gradient: &GradientField, geometry: &GridGeometry) -> Vec<f64> {
        self.points
            .iter()
            .zip(&self.arc_lengths)
            .map(|(p, length)| {
                let (i, j) = geometry.xy_to_ij_clamped(p.x, p.y);
                gradient.at(i, j).norm() * length
            })
            .collect()
    }
}

/// Pick seed indices so that consecutive seeds enclose equal flux
///
/// Always returns `n_lines + 1` indices: the first sample, then for each
/// `j = 1..=n_lines` the first sample whose cumulative flux exceeds
/// `j · total / n_lines` (clamped to the last sample). A curve without flux
/// puts every later seed on the last sample.
pub fn select_seeds(arc_flux: &[f64], n_lines: usize) -> Vec<usize> {
    if arc_flux.is_empty() {
        return Vec::new();
    }
    let integral: Vec<f64> = arc_flux
        .iter()
        .scan(0.0, |sum, flux| {
            *sum += flux;
            Some(*sum)
        })
        .collect();
    let last = integral.len() - 1;
    let delta = integral[last] / n_lines.max(1) as f64;

    let mut seeds = Vec::with_capacity(n_lines + 1);
    seeds.push(0);
    let mut i = 0;
    for j in 1..=n_lines {
        let target = j as f64 * delta;
        while i < integral.len() && integral[i] <= target {
            i += 1;
        }
        seeds.push(i.min(last));
    }
    seeds
}

/// Why tracing of a line stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Gradient fell below the stopping threshold
    Vanished,
    /// Step budget used up
    BudgetExhausted,
    /// Reached a cell outside the domain or stepped past the grid window
    LeftDomain,
}

/// One traced polyline
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLine {
    /// Window coordinates, starting at the seed
    pub points: Vec<Vector2<f64>>,
    pub termination: Termination,
}

impl FieldLine {
    pub fn start(&self) -> Option<Vector2<f64>> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Vector2<f64>> {
        self.points.last().copied()
    }
}

/// Follow the normalised gradient from `start`
///
/// # Arguments
///
/// * `start` - Seed point in window coordinates
/// * `gradient` - Gradient of the committed field
/// * `status` - Status grid; tracing stops in outside cells and past the window
/// * `geometry` - Grid geometry for point-to-cell lookup
/// * `config` - Step length, budget and thresholds
pub fn trace_field_line(
    start: Vector2<f64>,
    gradient: &GradientField,
    status: &FieldData<CellStatus>,
    geometry: &GridGeometry,
    config: &FieldLineConfig,
) -> FieldLine {
    let stride = config.vertex_stride.max(1);
    let mut points = vec![start];
    let mut p = start;
    let mut termination = Termination::BudgetExhausted;
    let mut since_kept = 0;

    for _ in 0..config.max_steps {
        // Past the window there is no cell to classify the point
        if !geometry.contains(p.x, p.y) {
            termination = Termination::LeftDomain;
            break;
        }
        let (i, j) = geometry.xy_to_ij_clamped(p.x, p.y);
        if status.get(i, j).is_outside() {
            termination = Termination::LeftDomain;
            break;
        }
        let grad = gradient.at(i, j);
        let norm_sq = grad.norm_squared();
        if norm_sq <= config.stop_norm_sq {
            termination = Termination::Vanished;
            break;
        }
        p += grad * (config.step / norm_sq.max(config.floor_norm_sq).sqrt());
        since_kept += 1;
        if since_kept == stride {
            points.push(p);
            since_kept = 0;
        }
    }

    if points.last() != Some(&p) {
        points.push(p);
    }
    FieldLine {
        points,
        termination,
    }
}

/// Seed and trace the equal-flux lines of one frame
///
/// Lines are traced in parallel; the output follows seed order, first seed at
/// angle zero.
pub fn trace_field_lines(
    curve: &SeedCurve,
    gradient: &GradientField,
    status: &FieldData<CellStatus>,
    geometry: &GridGeometry,
    config: &FieldLineConfig,
) -> Vec<FieldLine> {
    let flux = curve.arc_flux(gradient, geometry);
    let seeds = select_seeds(&flux, config.n_lines);
    seeds
        .par_iter()
        .map(|&seed| trace_field_line(curve.points()[seed], gradient, status, geometry, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_grid(n: usize) -> GridGeometry {
        GridGeometry::new(n, n, (-2.0, 2.0), (-2.0, 2.0))
    }

    /// Unit radial field `(x, y) / r`, sampled at cell centres
    fn radial_gradient(geometry: &GridGeometry) -> GradientField {
        let mut gx = FieldData::new(geometry.nx(), geometry.ny());
        let mut gy = FieldData::new(geometry.nx(), geometry.ny());
        for j in 0..geometry.ny() {
            for i in 0..geometry.nx() {
                let p = geometry.ij_to_xy(i, j);
                let r = p.norm();
                gx.set(i, j, p.x / r);
                gy.set(i, j, p.y / r);
            }
        }
        GradientField { gx, gy }
    }

    #[test]
    fn test_default_config() {
        let config = FieldLineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.samples(), 20_000);
        assert_relative_eq!(config.semi_axes[0] * config.semi_axes[0], 3.58, epsilon = 1e-12);

        let mut bad = config;
        bad.n_lines = 0;
        assert_eq!(bad.validate(), Err(ConfigError::ZeroCount { name: "n_lines" }));
        let mut bad = config;
        bad.step = 0.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_thresholds_match_two_cell_difference() {
        let config = FieldLineConfig::default();
        // Gradient of a ramp is halved by the two-cell span, so |∇φ|² is quartered
        assert_relative_eq!(config.stop_norm_sq * 4.0, 1.0e-14, max_relative = 1e-12);
        assert_relative_eq!(config.floor_norm_sq * 4.0, 1.0e-9, max_relative = 1e-12);
        assert!(config.stop_norm_sq < config.floor_norm_sq);
    }

    #[test]
    fn test_rejects_non_finite_center() {
        let mut bad = FieldLineConfig::default();
        bad.center[1] = f64::NAN;
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::NotFinite {
                name: "center_y",
                ..
            })
        ));
        bad.center = [f64::INFINITY, 0.0];
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::NotFinite {
                name: "center_x",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_overflowing_sample_count() {
        let config = FieldLineConfig {
            oversampling: usize::MAX,
            ..FieldLineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CountOverflow {
                names: ("n_lines", "oversampling")
            })
        );
        assert_eq!(config.samples(), usize::MAX);
    }

    #[test]
    fn test_ellipse_sampling() {
        let curve = SeedCurve::ellipse(Vector2::new(1.0, 0.0), Vector2::new(2.0, 1.0), 4);
        assert_eq!(curve.len(), 4);
        assert_relative_eq!(curve.points()[0].x, 3.0);
        assert_relative_eq!(curve.points()[1].y, 1.0, epsilon = 1e-12);
        // Closing arc wraps to the first sample
        for &length in curve.arc_lengths() {
            assert_relative_eq!(length, 5.0_f64.sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_seed_count_is_lines_plus_one() {
        let flux: Vec<f64> = (0..1000).map(|i| 1.0 + (i % 7) as f64).collect();
        let seeds = select_seeds(&flux, 200);
        assert_eq!(seeds.len(), 201);
        assert_eq!(seeds[0], 0);
        assert!(seeds.windows(2).all(|w| w[0] <= w[1]));
        assert!(seeds.iter().all(|&s| s < flux.len()));
    }

    #[test]
    fn test_uniform_flux_gives_uniform_seeds() {
        let flux = vec![1.0; 200 * 100];
        let seeds = select_seeds(&flux, 200);
        for j in 1..200 {
            assert_eq!(seeds[j], j * 100);
        }
        assert_eq!(seeds[200], flux.len() - 1);
    }

    #[test]
    fn test_seeds_concentrate_where_flux_is_high() {
        // First half carries nine times the flux of the second half
        let mut flux = vec![9.0; 500];
        flux.extend([1.0; 500]);
        let seeds = select_seeds(&flux, 10);
        let in_first_half = seeds[1..].iter().filter(|&&s| s < 500).count();
        assert_eq!(in_first_half, 8);
        assert_eq!(seeds[9], 500);
    }

    #[test]
    fn test_zero_flux_clamps_to_last_sample() {
        let seeds = select_seeds(&[0.0; 50], 5);
        assert_eq!(seeds, [0, 49, 49, 49, 49, 49]);
        assert!(select_seeds(&[], 5).is_empty());
    }

    #[test]
    fn test_radial_field_spaces_seeds_evenly_in_angle() {
        let geometry = square_grid(200);
        let gradient = radial_gradient(&geometry);
        let config = FieldLineConfig {
            n_lines: 20,
            oversampling: 50,
            semi_axes: [1.0, 1.0],
            ..FieldLineConfig::default()
        };
        let curve = SeedCurve::from_config(&config);
        let seeds = select_seeds(&curve.arc_flux(&gradient, &geometry), config.n_lines);
        assert_eq!(seeds.len(), 21);
        for j in 1..20 {
            let gap = seeds[j] as f64 - seeds[j - 1] as f64;
            assert!((gap - 50.0).abs() <= 1.0, "gap {gap} at seed {j}");
        }
    }

    #[test]
    fn test_trace_follows_gradient_until_budget() {
        let geometry = square_grid(100);
        let gradient = GradientField {
            gx: FieldData::with_value(100, 100, 2.0),
            gy: FieldData::new(100, 100),
        };
        let status = FieldData::with_value(100, 100, CellStatus::INTERIOR);
        let config = FieldLineConfig {
            step: 0.001,
            max_steps: 500,
            vertex_stride: 1,
            ..FieldLineConfig::default()
        };
        let line = trace_field_line(Vector2::new(0.5, 0.0), &gradient, &status, &geometry, &config);
        assert_eq!(line.termination, Termination::BudgetExhausted);
        assert_eq!(line.points.len(), 501);
        let end = line.end().unwrap();
        assert_relative_eq!(end.x, 1.0, epsilon = 1e-9);
        assert_eq!(end.y, 0.0);
    }

    #[test]
    fn test_trace_stops_at_window_edge() {
        let geometry = square_grid(40);
        let gradient = GradientField {
            gx: FieldData::with_value(40, 40, 1.0),
            gy: FieldData::new(40, 40),
        };
        let status = FieldData::with_value(40, 40, CellStatus::INTERIOR);
        let config = FieldLineConfig {
            step: 0.01,
            max_steps: 1000,
            vertex_stride: 1,
            ..FieldLineConfig::default()
        };
        let line = trace_field_line(Vector2::new(1.9, 0.0), &gradient, &status, &geometry, &config);
        assert_eq!(line.termination, Termination::LeftDomain);

        let end = line.end().unwrap();
        assert!(end.x >= 2.0 && end.x < 2.0 + config.step + 1e-12, "end {end:?}");
        let (last, inner) = line.points.split_last().unwrap();
        assert_eq!(last, &end);
        assert!(inner.iter().all(|q| geometry.contains(q.x, q.y)));
    }

    #[test]
    fn test_trace_stops_on_vanishing_gradient() {
        let geometry = square_grid(16);
        let gradient = GradientField {
            gx: FieldData::new(16, 16),
            gy: FieldData::new(16, 16),
        };
        let status = FieldData::with_value(16, 16, CellStatus::INTERIOR);
        let line = trace_field_line(
            Vector2::new(0.1, 0.1),
            &gradient,
            &status,
            &geometry,
            &FieldLineConfig::default(),
        );
        assert_eq!(line.termination, Termination::Vanished);
        assert_eq!(line.points.len(), 1);
    }

    #[test]
    fn test_trace_stops_outside_domain() {
        let geometry = square_grid(40);
        let gradient = radial_gradient(&geometry);
        let mut status = FieldData::with_value(40, 40, CellStatus::INTERIOR);
        for j in 0..40 {
            for i in 0..40 {
                if geometry.ij_to_xy(i, j).norm() > 1.0 {
                    status.set(i, j, CellStatus::OUTSIDE);
                }
            }
        }
        let config = FieldLineConfig {
            step: 0.01,
            vertex_stride: 1,
            ..FieldLineConfig::default()
        };
        let line = trace_field_line(Vector2::new(0.3, 0.2), &gradient, &status, &geometry, &config);
        assert_eq!(line.termination, Termination::LeftDomain);
        let end = line.end().unwrap();
        assert!(end.norm() > 0.9 && end.norm() < 1.2);
    }

    #[test]
    fn test_parallel_tracing_keeps_seed_order() {
        let geometry = square_grid(64);
        let gradient = radial_gradient(&geometry);
        let status = FieldData::with_value(64, 64, CellStatus::INTERIOR);
        let config = FieldLineConfig {
            n_lines: 8,
            oversampling: 10,
            semi_axes: [1.0, 1.0],
            max_steps: 20,
            step: 0.01,
            ..FieldLineConfig::default()
        };
        let curve = SeedCurve::from_config(&config);
        let lines = trace_field_lines(&curve, &gradient, &status, &geometry, &config);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0].start(), Some(curve.points()[0]));
        let angles: Vec<f64> = lines[1..8]
            .iter()
            .filter_map(FieldLine::start)
            .map(|p| p.y.atan2(p.x).rem_euclid(TAU))
            .collect();
        assert!(angles.windows(2).all(|w| w[0] < w[1]));
    }
}
