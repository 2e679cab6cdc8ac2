//! Float guards shared by the component and solver crates.

use crate::TpError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, TpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TpError::NonFinite { what, value: v })
    }
}

/// Ensure `min <= v <= max`; NaN always fails.
pub fn ensure_in_range(v: f64, min: f64, max: f64, what: &'static str) -> Result<f64, TpError> {
    ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(TpError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// `|actual - expected| / |reference|`, or 0 when the reference is zero.
pub fn relative_residual(actual: f64, expected: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (actual - expected).abs() / reference.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_wet_bulb_is_not_finite() {
        let err = ensure_finite(f64::NAN, "wet bulb").unwrap_err();
        assert!(err.to_string().contains("wet bulb"));
    }

    #[test]
    fn utilization_band() {
        assert_eq!(ensure_in_range(0.5, 0.0, 1.0, "utilization").unwrap(), 0.5);
        let err = ensure_in_range(1.5, 0.0, 1.0, "utilization").unwrap_err();
        assert!(matches!(err, TpError::OutOfRange { value, .. } if value == 1.5));
        assert!(matches!(
            ensure_in_range(f64::NAN, 0.0, 1.0, "utilization"),
            Err(TpError::NonFinite { .. })
        ));
    }

    #[test]
    fn condenser_imbalance() {
        // Q_cond = 1170 MW against Q_evap + W = 1000 + 168 MW.
        let r = relative_residual(1170e6, 1168e6, 1170e6);
        assert!((r - 2.0 / 1170.0).abs() < 1e-15);
        assert_eq!(relative_residual(3.0, 1.0, 0.0), 0.0);
    }
}
