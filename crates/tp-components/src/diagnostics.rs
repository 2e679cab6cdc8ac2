//! Non-fatal findings attached to component and plant solutions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A warning the caller should see but that does not invalidate the solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Water-side and air-side tower duties disagree beyond the threshold.
    TowerEnergyBalance { residual: f64, threshold: f64 },
    /// Dry bulb was not supplied and was estimated from the wet bulb.
    EstimatedDryBulb { t_db: f64, depression: f64 },
    /// Condenser to evaporator pressure ratio is unusually high.
    HighCompressionRatio { ratio: f64, limit: f64 },
    /// Heat-exchanger effectiveness implied by the duty exceeds the design target.
    EffectivenessAboveTarget {
        exchanger: String,
        implied: f64,
        target: f64,
    },
}

impl Diagnostic {
    /// Log through `tracing` and hand the diagnostic back for collection.
    pub fn emit(self) -> Self {
        tracing::warn!(diagnostic = %self, "solution diagnostic");
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TowerEnergyBalance {
                residual,
                threshold,
            } => write!(
                f,
                "cooling tower energy balance error {:.1}% exceeds {:.0}%; check air/water ratio or psychrometric assumptions",
                residual * 100.0,
                threshold * 100.0
            ),
            Diagnostic::EstimatedDryBulb { t_db, depression } => write!(
                f,
                "dry bulb not supplied, estimated as {t_db:.1} °C (wet bulb + {depression:.1} °C)"
            ),
            Diagnostic::HighCompressionRatio { ratio, limit } => {
                write!(f, "compression ratio {ratio:.2} exceeds {limit:.1}")
            }
            Diagnostic::EffectivenessAboveTarget {
                exchanger,
                implied,
                target,
            } => write!(
                f,
                "{exchanger} effectiveness {implied:.3} exceeds design target {target:.3}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_values() {
        let d = Diagnostic::TowerEnergyBalance {
            residual: 0.1966,
            threshold: 0.15,
        };
        assert!(d.to_string().contains("19.7%"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let d = Diagnostic::EstimatedDryBulb {
            t_db: 35.5,
            depression: 10.0,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""kind":"estimated_dry_bulb""#));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
