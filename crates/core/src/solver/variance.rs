//! Variance-based renormalisation for display scaling
//!
//! The second moment is taken over every in-domain cell (status ≠ 0). Dividing
//! by its square root keeps the colour range stable while the field decays; it
//! has no role in the physics.

use super::fields::FieldData;
use crate::core_types::CellStatus;
use rayon::prelude::*;

/// Mean of `φ²` over in-domain cells (count floored at 1)
pub fn compute_variance(field: &FieldData<f64>, status: &FieldData<CellStatus>) -> f64 {
    let (sum, count) = field
        .data
        .par_iter()
        .zip(status.data.par_iter())
        .filter(|(_, s)| s.is_in_domain())
        .map(|(v, _)| (v * v, 1_usize))
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
    sum / count.max(1) as f64
}

/// Divide every in-domain cell by `√variance`
///
/// The whole field is rescaled in one pass or not at all: a variance that is
/// zero, negative or not finite leaves the field untouched and returns `false`.
pub fn renormalize_field(
    field: &mut FieldData<f64>,
    status: &FieldData<CellStatus>,
    variance: f64,
) -> bool {
    if !(variance.is_finite() && variance > 0.0) {
        return false;
    }
    let stdv = variance.sqrt();
    field
        .data
        .par_iter_mut()
        .zip(status.data.par_iter())
        .filter(|(_, s)| s.is_in_domain())
        .for_each(|(v, _)| *v /= stdv);
    true
}

/// Colour-scale divisor handed to the renderer: `√(1 + variance)`
pub fn display_scale(variance: f64) -> f64 {
    (1.0 + variance).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn masked() -> (FieldData<f64>, FieldData<CellStatus>) {
        let mut field = FieldData::new(2, 2);
        field.data.copy_from_slice(&[1.0, 3.0, -2.0, 100.0]);
        let mut status = FieldData::new(2, 2);
        status.data.copy_from_slice(&[
            CellStatus::INTERIOR,
            CellStatus::boundary(0),
            CellStatus::INTERIOR,
            CellStatus::OUTSIDE,
        ]);
        (field, status)
    }

    #[test]
    fn test_variance_skips_outside_cells() {
        let (field, status) = masked();
        assert_relative_eq!(compute_variance(&field, &status), (1.0 + 9.0 + 4.0) / 3.0);
    }

    #[test]
    fn test_empty_domain_variance_is_zero() {
        let field = FieldData::with_value(3, 3, 5.0);
        let status = FieldData::new(3, 3);
        assert_eq!(compute_variance(&field, &status), 0.0);
    }

    #[test]
    fn test_renormalize_gives_unit_variance() {
        let (mut field, status) = masked();
        let variance = compute_variance(&field, &status);
        assert!(renormalize_field(&mut field, &status, variance));
        assert_relative_eq!(compute_variance(&field, &status), 1.0, epsilon = 1e-12);
        // Outside cell untouched
        assert_eq!(field.data[3], 100.0);
    }

    #[test]
    fn test_degenerate_variance_is_ignored() {
        let (mut field, status) = masked();
        let before = field.clone();
        assert!(!renormalize_field(&mut field, &status, 0.0));
        assert!(!renormalize_field(&mut field, &status, f64::NAN));
        assert_eq!(field, before);
        assert_relative_eq!(display_scale(3.0), 2.0);
    }
}
