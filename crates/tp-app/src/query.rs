//! One-off property lookups for front ends, in engineering units.

use serde::Serialize;
use tp_core::units::constants::ZERO_CELSIUS_K;
use tp_core::units::to_celsius;
use tp_fluids::{
    AirBackend, HumidAirInput, HumidAirState, Property, PropertyBackend, PropertyPair,
    build_air_oracle, build_oracle,
};

use crate::error::{AppError, AppResult};
use crate::runtime_build::parse_refrigerant;

/// Refrigerant state inputs; exactly two must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateQuery {
    pub p_kpa: Option<f64>,
    pub t_c: Option<f64>,
    pub h_kj_kg: Option<f64>,
    pub s_kj_kg_k: Option<f64>,
    pub quality: Option<f64>,
}

impl StateQuery {
    fn si_values(&self) -> Vec<(Property, f64)> {
        [
            (Property::Pressure, self.p_kpa.map(|v| v * 1000.0)),
            (Property::Temperature, self.t_c.map(|v| v + ZERO_CELSIUS_K)),
            (Property::Enthalpy, self.h_kj_kg.map(|v| v * 1000.0)),
            (Property::Entropy, self.s_kj_kg_k.map(|v| v * 1000.0)),
            (Property::Quality, self.quality),
        ]
        .into_iter()
        .filter_map(|(prop, v)| v.map(|v| (prop, v)))
        .collect()
    }
}

/// Resolved refrigerant state in engineering units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport {
    pub fluid: String,
    pub backend: String,
    pub p_kpa: f64,
    pub t_c: f64,
    pub h_kj_kg: f64,
    pub s_kj_kg_k: f64,
    pub rho_kg_m3: f64,
    pub quality: Option<f64>,
    pub phase: String,
}

pub fn refrigerant_state(fluid: &str, backend: PropertyBackend, query: &StateQuery) -> AppResult<StateReport> {
    let refrigerant = parse_refrigerant(fluid)?;
    let values = query.si_values();
    if values.len() != 2 {
        return Err(AppError::InvalidInput(format!(
            "exactly two of p, t, h, s, q are required, got {}",
            values.len()
        )));
    }
    let pair = PropertyPair::from_values(&values)?;
    let oracle = build_oracle(backend);
    let state = oracle.state(refrigerant, pair)?;
    Ok(StateReport {
        fluid: refrigerant.key().to_string(),
        backend: oracle.name().to_string(),
        p_kpa: state.pressure().value / 1000.0,
        t_c: to_celsius(state.temperature()),
        h_kj_kg: state.enthalpy() / 1000.0,
        s_kj_kg_k: state.entropy() / 1000.0,
        rho_kg_m3: state.density().value,
        quality: state.quality(),
        phase: state.phase().key().to_string(),
    })
}

/// Moist air from dry bulb plus exactly one of wet bulb or relative humidity [0, 1].
pub fn humid_air_state(
    backend: AirBackend,
    t_db: f64,
    t_wb: Option<f64>,
    rh: Option<f64>,
) -> AppResult<HumidAirState> {
    let input = match (t_wb, rh) {
        (Some(t_wb), None) => HumidAirInput::WetBulb(t_wb),
        (None, Some(rh)) => HumidAirInput::RelativeHumidity(rh),
        _ => {
            return Err(AppError::InvalidInput(
                "give exactly one of wet bulb or relative humidity".to_string(),
            ));
        }
    };
    Ok(build_air_oracle(backend).state(t_db, input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturated_vapor_from_temperature_and_quality() {
        let query = StateQuery {
            t_c: Some(5.0),
            quality: Some(1.0),
            ..StateQuery::default()
        };
        let report = refrigerant_state("R134a", PropertyBackend::Correlation, &query).unwrap();
        assert_relative_eq!(report.t_c, 5.0, epsilon = 1e-6);
        assert!(report.p_kpa > 300.0 && report.p_kpa < 400.0);
        assert_eq!(report.quality, Some(1.0));
    }

    #[test]
    fn state_needs_two_properties() {
        let one = StateQuery {
            t_c: Some(5.0),
            ..StateQuery::default()
        };
        assert!(matches!(
            refrigerant_state("R134a", PropertyBackend::Correlation, &one),
            Err(AppError::InvalidInput(_))
        ));

        let three = StateQuery {
            p_kpa: Some(350.0),
            t_c: Some(10.0),
            quality: Some(0.5),
            ..StateQuery::default()
        };
        assert!(refrigerant_state("R134a", PropertyBackend::Correlation, &three).is_err());
    }

    #[test]
    fn unavailable_backend_reports_property_error() {
        let query = StateQuery {
            t_c: Some(5.0),
            quality: Some(1.0),
            ..StateQuery::default()
        };
        assert!(matches!(
            refrigerant_state("R134a", PropertyBackend::Unavailable, &query),
            Err(AppError::Property(_))
        ));
    }

    #[test]
    fn humid_air_requires_one_second_property() {
        let ashrae = AirBackend::Ashrae;
        let air = humid_air_state(ashrae, 35.0, Some(25.5), None).unwrap();
        assert!(air.rh > 0.4 && air.rh < 0.5);
        assert!(humid_air_state(ashrae, 35.0, Some(25.5), Some(0.5)).is_err());
        assert!(humid_air_state(ashrae, 35.0, None, None).is_err());
        assert!(matches!(
            humid_air_state(ashrae, 20.0, Some(25.0), None),
            Err(AppError::InvalidInput(_))
        ));
        // Rejected before CoolProp is reached
        assert!(matches!(
            humid_air_state(AirBackend::CoolProp, 20.0, Some(25.0), None),
            Err(AppError::InvalidInput(_))
        ));
    }
}
