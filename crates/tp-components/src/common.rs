//! Common helpers for component calculations.

use crate::error::{ComponentError, ComponentResult};
use tp_core::TpError;
use tp_core::numeric::{ensure_finite, ensure_in_range};

pub use tp_core::units::constants::{CP_AIR, CP_WATER, H_FG_WATER};

/// Ensure a value is finite.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<f64> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::OutOfRange { what, value });
    }
    Ok(value)
}

/// Ensure `min <= value < max`.
pub fn check_half_open(value: f64, min: f64, max: f64, what: &'static str) -> ComponentResult<f64> {
    check_finite(value, what)?;
    if value < min || value >= max {
        return Err(ComponentError::OutOfRange { what, value });
    }
    Ok(value)
}

/// Ensure `min <= value <= max`.
pub fn check_closed(value: f64, min: f64, max: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_in_range(value, min, max, what).map_err(|err| match err {
        TpError::OutOfRange { what, value, .. } => ComponentError::OutOfRange { what, value },
        _ => ComponentError::NonPhysical { what },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_positive() {
        assert!(check_positive(1.0, "flow").is_ok());
        assert!(matches!(
            check_positive(0.0, "flow"),
            Err(ComponentError::OutOfRange { value, .. }) if value == 0.0
        ));
        assert!(matches!(
            check_positive(f64::NAN, "flow"),
            Err(ComponentError::NonPhysical { .. })
        ));
    }

    #[test]
    fn test_ranges() {
        assert!(check_half_open(0.0, 0.0, 100.0, "t").is_ok());
        assert!(check_half_open(100.0, 0.0, 100.0, "t").is_err());
        assert!(check_closed(50.0, -20.0, 50.0, "t_wb").is_ok());
        assert!(matches!(
            check_closed(50.1, -20.0, 50.0, "t_wb"),
            Err(ComponentError::OutOfRange { value, .. }) if value == 50.1
        ));
        assert!(matches!(
            check_closed(f64::NAN, -20.0, 50.0, "t_wb"),
            Err(ComponentError::NonPhysical { .. })
        ));
    }
}
