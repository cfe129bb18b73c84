//! Per-cell values handed to the renderer

use super::fields::FieldData;
use super::gradient::GradientField;
use crate::core_types::CellStatus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which quantity the renderer colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRepresentation {
    /// The field value itself
    #[default]
    Intensity,
    /// `|∇φ|`
    GradientNorm,
}

/// Values to colour, one per cell in row-major order
///
/// Outside cells always map to 0 so the renderer can paint them with a flat
/// background colour.
pub fn display_values(
    field: &FieldData<f64>,
    status: &FieldData<CellStatus>,
    gradient: &GradientField,
    representation: FieldRepresentation,
) -> Vec<f64> {
    let values: Vec<f64> = match representation {
        FieldRepresentation::Intensity => field.data.clone(),
        FieldRepresentation::GradientNorm => gradient.magnitude(),
    };
    values
        .into_par_iter()
        .zip(status.data.par_iter())
        .map(|(v, s)| if s.is_outside() { 0.0 } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::GridGeometry;
    use crate::solver::gradient::compute_gradient;

    #[test]
    fn test_outside_cells_are_blank() {
        let geometry = GridGeometry::new(3, 2, (0.0, 3.0), (0.0, 2.0));
        let mut field = FieldData::new(3, 2);
        field.data.copy_from_slice(&[2.0, 1.0, 0.0, 2.0, 1.0, 0.0]);
        let mut status = FieldData::with_value(3, 2, CellStatus::INTERIOR);
        status.set(0, 0, CellStatus::OUTSIDE);
        let gradient = compute_gradient(&field, &geometry);

        let intensity = display_values(&field, &status, &gradient, FieldRepresentation::Intensity);
        assert_eq!(intensity, [0.0, 1.0, 0.0, 2.0, 1.0, 0.0]);

        let norm = display_values(
            &field,
            &status,
            &gradient,
            FieldRepresentation::GradientNorm,
        );
        assert_eq!(norm[0], 0.0);
        assert!(norm[1..].iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }
}
