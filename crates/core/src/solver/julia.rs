//! Closed-form schedules for the Julia parameter
//!
//! The parameter is a pure function of the frame index, so any frame can be
//! reproduced without replaying the ones before it.

use crate::domain::JuliaParameter;
use crate::error::{require_positive, ConfigError};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// How the Julia parameter moves from frame to frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JuliaSchedule {
    /// Constant parameter
    Fixed { cx: f64, cy: f64 },
    /// `center + radius · e^{2πi t / period}`
    Circle {
        center: [f64; 2],
        radius: f64,
        period: f64,
    },
    /// Slow walk just outside the main cardioid of the Mandelbrot set
    Cardioid,
}

impl Default for JuliaSchedule {
    fn default() -> Self {
        JuliaSchedule::Circle {
            center: [-0.9, 0.0],
            radius: 0.15,
            period: 4500.0,
        }
    }
}

impl JuliaSchedule {
    /// Parameter for frame `frame`
    pub fn advance(&self, frame: u64) -> JuliaParameter {
        let t = frame as f64;
        match *self {
            JuliaSchedule::Fixed { cx, cy } => JuliaParameter::new(cx, cy),
            JuliaSchedule::Circle {
                center,
                radius,
                period,
            } => {
                let angle = TAU * t / period;
                JuliaParameter::new(
                    center[0] + radius * angle.cos(),
                    center[1] + radius * angle.sin(),
                )
            }
            JuliaSchedule::Cardioid => {
                let theta = (1.05 + 0.00003 * t).cbrt();
                let (sin, cos) = theta.sin_cos();
                let cx = 0.5 * (cos * (1.0 - 0.5 * cos) + 0.5 * sin * sin);
                let cy = 0.5 * sin * (1.0 - cos) + 0.02 * (t * FRAC_PI_2 * 0.002).sin();
                JuliaParameter::new(cx, cy)
            }
        }
    }

    /// Check that the schedule only produces finite parameters
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a circle has a non-positive period or a
    /// non-finite centre or radius, or a fixed parameter is not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            JuliaSchedule::Fixed { cx, cy } => {
                if !(cx.is_finite() && cy.is_finite()) {
                    return Err(ConfigError::NonPositive {
                        name: "julia",
                        value: if cx.is_finite() { cy } else { cx },
                    });
                }
                Ok(())
            }
            JuliaSchedule::Circle {
                center,
                radius,
                period,
            } => {
                require_positive("period", period)?;
                for (name, value) in [("cx", center[0]), ("cy", center[1]), ("radius", radius)] {
                    if !value.is_finite() {
                        return Err(ConfigError::NonPositive { name, value });
                    }
                }
                Ok(())
            }
            JuliaSchedule::Cardioid => Ok(()),
        }
    }
}
