//! Domain classification
//!
//! Every grid cell is assigned a [`CellStatus`] from the continuous coordinates of
//! its centre. The classification depends only on the coordinates, the selected
//! [`Shape`] and, for Julia domains, the current Julia parameter, so it is
//! resolution independent and can be recomputed at any time.
//!
//! Plain billiard shapes produce only outside/interior cells. "Heated" shapes
//! also mark conductors held at the inside temperature, optionally graded into
//! layers of increasing depth.

mod carpet;
mod escape_time;

pub use carpet::{Carpet, CarpetCell};
pub use escape_time::{escape_iteration, EscapeTime};

use crate::core_types::CellStatus;
use crate::error::{require_positive, ConfigError};
use nalgebra::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Complex parameter `c` driving Julia-set domains
pub type JuliaParameter = Complex<f64>;

/// Domain shape with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle centred at the origin
    Rectangle { half_width: f64, half_height: f64 },
    /// Ellipse centred at the origin
    Ellipse { semi_x: f64, semi_y: f64 },
    /// Rectangle of length `2 * half_length` capped by half discs of `radius`
    Stadium { half_length: f64, radius: f64 },
    /// Whole window minus a central disc
    Sinai { radius: f64 },
    /// Square rotated by 45 degrees
    Diamond { half_diagonal: f64 },
    /// Regular polygon inscribed in a circle of `radius`, turned by `rotation` radians
    Polygon { sides: u32, radius: f64, rotation: f64 },
    /// Disc minus an inner disc whose centre is shifted along x
    Annulus {
        outer_radius: f64,
        inner_radius: f64,
        inner_offset: f64,
    },
    /// Annulus whose inner disc is a heated conductor
    AnnulusHeated {
        outer_radius: f64,
        inner_radius: f64,
        inner_offset: f64,
    },
    /// Menger-Sierpinski carpet; holes are outside
    Menger { carpet: Carpet },
    /// Carpet whose holes are heated, deeper levels cooler
    ///
    /// When `open`, the region around the carpet is fluid as well.
    MengerHeated { carpet: Carpet, open: bool },
    /// Filled Julia set is the fluid domain
    JuliaInterior { escape: EscapeTime },
    /// Exterior of a heated Mandelbrot set
    Mandelbrot { escape: EscapeTime },
    /// Exterior of a heated filled Julia set
    Julia { escape: EscapeTime },
    /// Heated Mandelbrot set inside a cold circular conductor of `radius`
    MandelbrotCircle { escape: EscapeTime, radius: f64 },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Julia {
            escape: EscapeTime::julia_default(),
        }
    }
}

impl Shape {
    /// Short name used in logs and errors
    pub const fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Stadium { .. } => "stadium",
            Shape::Sinai { .. } => "sinai",
            Shape::Diamond { .. } => "diamond",
            Shape::Polygon { .. } => "polygon",
            Shape::Annulus { .. } => "annulus",
            Shape::AnnulusHeated { .. } => "annulus_heated",
            Shape::Menger { .. } => "menger",
            Shape::MengerHeated { .. } => "menger_heated",
            Shape::JuliaInterior { .. } => "julia_interior",
            Shape::Mandelbrot { .. } => "mandelbrot",
            Shape::Julia { .. } => "julia",
            Shape::MandelbrotCircle { .. } => "mandelbrot_circle",
        }
    }

    /// Whether the classification changes with the Julia parameter
    pub const fn depends_on_julia(&self) -> bool {
        matches!(self, Shape::Julia { .. } | Shape::JuliaInterior { .. })
    }

    /// Check that the shape parameters describe a usable domain
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive lengths, polygons with fewer than
    /// three sides, an annulus whose hole is not smaller than its disc, or invalid
    /// carpet / escape-time parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name();
        match *self {
            Shape::Rectangle {
                half_width,
                half_height,
            } => {
                require_positive("half_width", half_width)?;
                require_positive("half_height", half_height)
            }
            Shape::Ellipse { semi_x, semi_y } => {
                require_positive("semi_x", semi_x)?;
                require_positive("semi_y", semi_y)
            }
            Shape::Stadium {
                half_length,
                radius,
            } => {
                require_positive("radius", radius)?;
                if half_length.is_finite() && half_length >= 0.0 {
                    Ok(())
                } else {
                    Err(ConfigError::NonPositive {
                        name: "half_length",
                        value: half_length,
                    })
                }
            }
            Shape::Sinai { radius } => require_positive("radius", radius),
            Shape::Diamond { half_diagonal } => require_positive("half_diagonal", half_diagonal),
            Shape::Polygon { sides, radius, .. } => {
                if sides < 3 {
                    return Err(ConfigError::InvalidShape {
                        shape: name,
                        reason: format!("needs at least 3 sides, got {sides}"),
                    });
                }
                require_positive("radius", radius)
            }
            Shape::Annulus {
                outer_radius,
                inner_radius,
                ..
            }
            | Shape::AnnulusHeated {
                outer_radius,
                inner_radius,
                ..
            } => {
                require_positive("outer_radius", outer_radius)?;
                require_positive("inner_radius", inner_radius)?;
                if inner_radius >= outer_radius {
                    return Err(ConfigError::InvalidShape {
                        shape: name,
                        reason: format!(
                            "inner radius {inner_radius} must be below outer radius {outer_radius}"
                        ),
                    });
                }
                Ok(())
            }
            Shape::Menger { carpet } | Shape::MengerHeated { carpet, .. } => carpet.validate(name),
            Shape::JuliaInterior { escape }
            | Shape::Mandelbrot { escape }
            | Shape::Julia { escape } => escape.validate(name),
            Shape::MandelbrotCircle { escape, radius } => {
                escape.validate(name)?;
                require_positive("radius", radius)
            }
        }
    }

    /// Classify the point `(x, y)`
    ///
    /// Pure and total: any real coordinates yield a status. `julia` is read only
    /// by Julia-based shapes.
    pub fn classify(&self, x: f64, y: f64, julia: JuliaParameter) -> CellStatus {
        match *self {
            Shape::Rectangle {
                half_width,
                half_height,
            } => inside_if(x.abs() < half_width && y.abs() < half_height),
            Shape::Ellipse { semi_x, semi_y } => {
                inside_if((x / semi_x).powi(2) + (y / semi_y).powi(2) < 1.0)
            }
            Shape::Stadium {
                half_length,
                radius,
            } => {
                let ax = x.abs();
                let in_body = ax <= half_length && y.abs() < radius;
                let in_cap = (ax - half_length).powi(2) + y * y < radius * radius;
                inside_if(in_body || in_cap)
            }
            Shape::Sinai { radius } => inside_if(x * x + y * y > radius * radius),
            Shape::Diamond { half_diagonal } => inside_if(x.abs() + y.abs() < half_diagonal),
            Shape::Polygon {
                sides,
                radius,
                rotation,
            } => inside_if(in_regular_polygon(x, y, sides, radius, rotation)),
            Shape::Annulus {
                outer_radius,
                inner_radius,
                inner_offset,
            } => {
                let in_disc = x * x + y * y < outer_radius * outer_radius;
                let in_hole = (x - inner_offset).powi(2) + y * y <= inner_radius * inner_radius;
                inside_if(in_disc && !in_hole)
            }
            Shape::AnnulusHeated {
                outer_radius,
                inner_radius,
                inner_offset,
            } => {
                if (x - inner_offset).powi(2) + y * y <= inner_radius * inner_radius {
                    CellStatus::boundary(0)
                } else {
                    inside_if(x * x + y * y < outer_radius * outer_radius)
                }
            }
            Shape::Menger { carpet } => inside_if(carpet.locate(x, y) == CarpetCell::Solid),
            Shape::MengerHeated { carpet, open } => match carpet.locate(x, y) {
                CarpetCell::Outside if open => CellStatus::INTERIOR,
                CarpetCell::Outside => CellStatus::OUTSIDE,
                CarpetCell::Solid => CellStatus::INTERIOR,
                CarpetCell::Hole(level) => {
                    CellStatus::boundary(u16::try_from(level).unwrap_or(u16::MAX))
                }
            },
            Shape::JuliaInterior { escape } => inside_if(escape.julia(x, y, julia).is_none()),
            Shape::Mandelbrot { escape } => escape.heated_status(escape.mandelbrot(x, y)),
            Shape::Julia { escape } => escape.heated_status(escape.julia(x, y, julia)),
            Shape::MandelbrotCircle { escape, radius } => {
                if x * x + y * y > radius * radius {
                    CellStatus::OUTSIDE
                } else {
                    escape.heated_status(escape.mandelbrot(x, y))
                }
            }
        }
    }
}

#[inline]
fn inside_if(inside: bool) -> CellStatus {
    if inside {
        CellStatus::INTERIOR
    } else {
        CellStatus::OUTSIDE
    }
}

/// Strictly inside the regular polygon with vertices at `rotation + 2πk/sides`
fn in_regular_polygon(x: f64, y: f64, sides: u32, radius: f64, rotation: f64) -> bool {
    let n = f64::from(sides);
    let apothem = radius * (PI / n).cos();
    (0..sides).all(|k| {
        // Outward normal of the edge between vertices k and k + 1
        let normal = rotation + TAU * f64::from(k) / n + PI / n;
        x * normal.cos() + y * normal.sin() < apothem
    })
}

/// Hexagon turned by a quarter turn, the reference polygon domain
pub fn reference_polygon() -> Shape {
    Shape::Polygon {
        sides: 6,
        radius: 1.0,
        rotation: FRAC_PI_2,
    }
}
