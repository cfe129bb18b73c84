//! Run configuration
//!
//! A [`SimulationConfig`] fixes everything a run needs up front: grid, domain
//! shape, boundary policy, physical constants, initial condition, frame cadence,
//! display scaling, field-line tracing and the Julia schedule. `Default` is the
//! reference animation (heated Julia set on a 1280×720 grid).

use crate::core_types::{BoundaryTemperatures, GridGeometry};
use crate::domain::Shape;
use crate::error::{require_positive, ConfigError};
use crate::solver::{
    BoundaryCondition, FieldLineConfig, FieldRepresentation, GridPreset, JuliaSchedule,
};
use serde::{Deserialize, Serialize};

/// Physical constants of the heat equation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Time step per stencil application
    pub dt: f64,
    /// Divides the time step; larger values diffuse more slowly
    pub viscosity: f64,
    /// Speed of the drift term to the right (0 disables it)
    #[serde(default)]
    pub drift_speed: f64,
    /// Clamp updated values to `[-vmax, vmax]`; only for chasing instabilities
    #[serde(default)]
    pub amplitude_clamp: Option<f64>,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            dt: 0.000004,
            viscosity: 10.0,
            drift_speed: 0.0,
            amplitude_clamp: None,
        }
    }
}

/// Field values assigned to interior cells at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialCondition {
    /// Same value everywhere
    Uniform { value: f64 },
    /// `mean + amplitude · exp(-d² / width²)` around `center`
    Gaussian {
        center: [f64; 2],
        mean: f64,
        amplitude: f64,
        width: f64,
    },
}

impl Default for InitialCondition {
    fn default() -> Self {
        InitialCondition::Gaussian {
            center: [-1.0, 0.0],
            mean: 0.1,
            amplitude: 0.0,
            width: 0.01,
        }
    }
}

impl InitialCondition {
    /// Initial value at `(x, y)`
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        match *self {
            InitialCondition::Uniform { value } => value,
            InitialCondition::Gaussian {
                center,
                mean,
                amplitude,
                width,
            } => {
                let dist2 = (x - center[0]).powi(2) + (y - center[1]).powi(2);
                let bump = (amplitude * (-dist2 / (width * width)).exp()).max(1.0e-15);
                mean + bump
            }
        }
    }
}

/// How many frames to produce and how many stencil steps separate them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Number of displayed frames
    pub frames: u64,
    /// Stencil steps per displayed frame
    pub substeps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frames: 4500,
            substeps: 50,
        }
    }
}

/// Renderer-facing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Renormalise the field by its variance before each frame
    pub adaptive_scaling: bool,
    /// Which per-cell quantity the renderer colours
    pub representation: FieldRepresentation,
}

/// Complete description of one animation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridGeometry,
    pub shape: Shape,
    #[serde(default)]
    pub boundary: BoundaryCondition,
    #[serde(default)]
    pub physics: PhysicsParams,
    #[serde(default)]
    pub temperatures: BoundaryTemperatures,
    #[serde(default)]
    pub initial: InitialCondition,
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_field_lines")]
    pub field_lines: Option<FieldLineConfig>,
    #[serde(default)]
    pub julia: JuliaSchedule,
}

#[allow(clippy::unnecessary_wraps)]
fn default_field_lines() -> Option<FieldLineConfig> {
    Some(FieldLineConfig::default())
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_preset(GridPreset::Ultra)
    }
}

impl SimulationConfig {
    /// Reference run on the grid of a preset
    pub fn from_preset(preset: GridPreset) -> Self {
        Self {
            grid: preset.geometry(),
            shape: Shape::default(),
            boundary: BoundaryCondition::default(),
            physics: PhysicsParams::default(),
            temperatures: BoundaryTemperatures::default(),
            initial: InitialCondition::default(),
            frames: FrameConfig::default(),
            display: DisplayConfig::default(),
            field_lines: default_field_lines(),
            julia: JuliaSchedule::default(),
        }
    }

    /// Check every parameter a run depends on
    ///
    /// The explicit stability bound is not checked here; it is reported as a
    /// warning when the simulation is built.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.shape.validate()?;
        require_positive("dt", self.physics.dt)?;
        require_positive("viscosity", self.physics.viscosity)?;
        if !self.physics.drift_speed.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "drift_speed",
                value: self.physics.drift_speed,
            });
        }
        if let Some(vmax) = self.physics.amplitude_clamp {
            require_positive("amplitude_clamp", vmax)?;
        }
        if let InitialCondition::Gaussian { width, .. } = self.initial {
            require_positive("width", width)?;
        }
        if self.frames.substeps == 0 {
            return Err(ConfigError::ZeroCount { name: "substeps" });
        }
        if let Some(lines) = &self.field_lines {
            lines.validate()?;
        }
        self.julia.validate()
    }
}
