//! Integration tests for the stencil, the store and the frame driver
//!
//! Covers the end-to-end Gaussian scenario on a fully fluid 100×100 grid, the
//! discrete maximum principle, translation invariance under the periodic policy
//! and the behaviour of the reference configuration.
//!
//! Run tests with: cargo test --test `heat_equation`

use approx::assert_relative_eq;
use heat_sim_core::solver::{DiffusionParams, FieldStore};
use heat_sim_core::{
    BoundaryCondition, GridGeometry, HeatSimulation, InitialCondition, JuliaParameter,
    PhysicsParams, Shape, SimulationConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 100×100 grid over `[-1, 1]²` whose whole area is fluid
///
/// `dt / (dx² ν) = 4e-5 / (0.02² · 1) = 0.1`
fn gaussian_config() -> SimulationConfig {
    let geometry = GridGeometry::new(100, 100, (-1.0, 1.0), (-1.0, 1.0));
    let center = geometry.ij_to_xy(50, 50);
    let mut config = SimulationConfig {
        grid: geometry,
        shape: Shape::Rectangle {
            half_width: 2.0,
            half_height: 2.0,
        },
        boundary: BoundaryCondition::Dirichlet,
        physics: PhysicsParams {
            dt: 0.00004,
            viscosity: 1.0,
            drift_speed: 0.0,
            amplitude_clamp: None,
        },
        initial: InitialCondition::Gaussian {
            center: [center.x, center.y],
            mean: 0.0,
            amplitude: 1.0,
            width: 0.01,
        },
        field_lines: None,
        ..SimulationConfig::default()
    };
    config.frames.substeps = 1;
    config
}

fn max_value(sim: &HeatSimulation) -> f64 {
    sim.field()
        .as_slice()
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Gaussian bump on a closed domain
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_lattice_rate_of_scenario() {
    let sim = HeatSimulation::new(gaussian_config()).unwrap();
    assert_relative_eq!(sim.diffusion_params().rate_x, 0.1, epsilon = 1e-12);
    assert!(sim.diffusion_params().is_stable());
    assert!(sim.status().as_slice().iter().all(|s| s.is_interior()));
}

#[test]
fn test_gaussian_spreads_after_one_step() {
    let mut sim = HeatSimulation::new(gaussian_config()).unwrap();
    let before = sim.field().clone();
    assert_relative_eq!(before.get(50, 50), 1.0);

    sim.advance_frame();
    let after = sim.field();

    assert!(after.get(50, 50) < before.get(50, 50));
    for (i, j) in [(49, 50), (51, 50), (50, 49), (50, 51)] {
        assert!(
            after.get(i, j) > before.get(i, j),
            "neighbour ({i}, {j}) did not warm up"
        );
    }
}

#[test]
fn test_variance_decreases_over_fifty_steps() {
    let mut sim = HeatSimulation::new(gaussian_config()).unwrap();
    let mut previous = sim.variance();
    for report in sim.run(50) {
        assert!(
            report.variance < previous,
            "variance rose at frame {}: {} -> {}",
            report.frame,
            previous,
            report.variance
        );
        previous = report.variance;
    }
}

#[test]
fn test_max_is_non_increasing() {
    let mut sim = HeatSimulation::new(gaussian_config()).unwrap();
    let mut previous = max_value(&sim);
    for _ in 0..40 {
        sim.advance_frame();
        let current = max_value(&sim);
        assert!(current <= previous + 1e-15);
        previous = current;
    }
}

#[test]
fn test_total_heat_is_conserved_behind_walls() {
    let mut sim = HeatSimulation::new(gaussian_config()).unwrap();
    let total: f64 = sim.field().as_slice().iter().sum();
    sim.run(25);
    let after: f64 = sim.field().as_slice().iter().sum();
    assert_relative_eq!(after, total, epsilon = 1e-10);
}

#[test]
fn test_uniform_field_with_matching_walls_is_fixed() {
    let mut config = gaussian_config();
    config.shape = Shape::Rectangle {
        half_width: 0.8,
        half_height: 0.8,
    };
    config.initial = InitialCondition::Uniform { value: 0.6 };
    config.temperatures.outside = 0.6;
    let mut sim = HeatSimulation::new(config).unwrap();
    sim.run(5);
    for &v in sim.field().as_slice() {
        assert_relative_eq!(v, 0.6, epsilon = 1e-12);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Periodic policy
// ═══════════════════════════════════════════════════════════════════════════════

fn periodic_store(shift: usize) -> FieldStore {
    let geometry = GridGeometry::new(24, 16, (0.0, 24.0), (0.0, 16.0));
    let mut store = FieldStore::allocate(geometry).unwrap();
    store.classify(
        &Shape::Rectangle {
            half_width: 100.0,
            half_height: 100.0,
        },
        JuliaParameter::new(0.0, 0.0),
    );
    let field = store.field_mut();
    for j in 0..16 {
        for i in 0..24 {
            let value = ((i * 7 + j * 3) % 11) as f64 / 11.0;
            field.set((i + shift) % 24, j, value);
        }
    }
    store
}

#[test]
fn test_periodic_step_commutes_with_shift() {
    let params = DiffusionParams::lattice(0.2, BoundaryCondition::Periodic);
    let mut base = periodic_store(0);
    let mut shifted = periodic_store(1);
    base.step(&params);
    shifted.step(&params);

    for j in 0..16 {
        for i in 0..24 {
            assert_relative_eq!(
                shifted.field().get((i + 1) % 24, j),
                base.field().get(i, j),
                epsilon = 1e-14
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration surface
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unstable_step_still_runs() {
    let mut config = gaussian_config();
    config.physics.dt = 0.001;
    let mut sim = HeatSimulation::new(config).unwrap();
    assert!(!sim.diffusion_params().is_stable());
    sim.advance_frame();
}

#[test]
fn test_amplitude_clamp_bounds_runaway() {
    let mut config = gaussian_config();
    config.physics.dt = 0.001;
    config.physics.amplitude_clamp = Some(5.0);
    let mut sim = HeatSimulation::new(config).unwrap();
    sim.run(20);
    assert!(sim.field().as_slice().iter().all(|v| v.abs() <= 5.0));
}

#[test]
fn test_config_survives_json() {
    let config = gaussian_config();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.grid.nx(), 100);
    assert_eq!(parsed.shape, config.shape);
    assert_eq!(parsed.boundary, config.boundary);
    assert_eq!(parsed.frames, config.frames);
    assert!(parsed.field_lines.is_none());
    assert_relative_eq!(parsed.physics.dt, config.physics.dt, max_relative = 1e-14);
    assert!(parsed.validate().is_ok());
}
