//! Refrigerant state definitions.

use crate::error::{FluidError, FluidResult};
use crate::refrigerant::Refrigerant;
use tp_core::units::{Density, Pressure, Temperature, k, pa, to_celsius};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEntropy = f64;

/// Vapor mass fraction in the two-phase dome (0 = saturated liquid).
pub type Quality = f64;

/// Intensive properties that can fix a refrigerant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Pressure,
    Temperature,
    Enthalpy,
    Entropy,
    Quality,
}

impl Property {
    pub fn key(&self) -> &'static str {
        match self {
            Property::Pressure => "P",
            Property::Temperature => "T",
            Property::Enthalpy => "h",
            Property::Entropy => "s",
            Property::Quality => "Q",
        }
    }
}

/// Exactly two independent properties, in SI units (Pa, K, J/kg, J/(kg·K), -).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyPair {
    PT { p: Pressure, t: Temperature },
    PH { p: Pressure, h: SpecEnthalpy },
    PS { p: Pressure, s: SpecEntropy },
    PQ { p: Pressure, x: Quality },
    TH { t: Temperature, h: SpecEnthalpy },
    TS { t: Temperature, s: SpecEntropy },
    TQ { t: Temperature, x: Quality },
    HS { h: SpecEnthalpy, s: SpecEntropy },
    HQ { h: SpecEnthalpy, x: Quality },
    SQ { s: SpecEntropy, x: Quality },
}

impl PropertyPair {
    /// Build a pair from loosely specified properties.
    ///
    /// Exactly two distinct properties must be given; fewer, more, or a
    /// repeated property is an error.
    pub fn from_values(values: &[(Property, f64)]) -> FluidResult<Self> {
        let [(a, va), (b, vb)] = values else {
            return Err(FluidError::InvalidArg {
                what: "exactly two independent properties are required",
            });
        };
        if !va.is_finite() || !vb.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "property values must be finite",
            });
        }

        use Property::*;
        let pair = match (*a, *b) {
            (Pressure, Temperature) => PropertyPair::PT { p: pa(*va), t: k(*vb) },
            (Temperature, Pressure) => PropertyPair::PT { p: pa(*vb), t: k(*va) },
            (Pressure, Enthalpy) => PropertyPair::PH { p: pa(*va), h: *vb },
            (Enthalpy, Pressure) => PropertyPair::PH { p: pa(*vb), h: *va },
            (Pressure, Entropy) => PropertyPair::PS { p: pa(*va), s: *vb },
            (Entropy, Pressure) => PropertyPair::PS { p: pa(*vb), s: *va },
            (Pressure, Quality) => PropertyPair::PQ { p: pa(*va), x: *vb },
            (Quality, Pressure) => PropertyPair::PQ { p: pa(*vb), x: *va },
            (Temperature, Enthalpy) => PropertyPair::TH { t: k(*va), h: *vb },
            (Enthalpy, Temperature) => PropertyPair::TH { t: k(*vb), h: *va },
            (Temperature, Entropy) => PropertyPair::TS { t: k(*va), s: *vb },
            (Entropy, Temperature) => PropertyPair::TS { t: k(*vb), s: *va },
            (Temperature, Quality) => PropertyPair::TQ { t: k(*va), x: *vb },
            (Quality, Temperature) => PropertyPair::TQ { t: k(*vb), x: *va },
            (Enthalpy, Entropy) => PropertyPair::HS { h: *va, s: *vb },
            (Entropy, Enthalpy) => PropertyPair::HS { h: *vb, s: *va },
            (Enthalpy, Quality) => PropertyPair::HQ { h: *va, x: *vb },
            (Quality, Enthalpy) => PropertyPair::HQ { h: *vb, x: *va },
            (Entropy, Quality) => PropertyPair::SQ { s: *va, x: *vb },
            (Quality, Entropy) => PropertyPair::SQ { s: *vb, x: *va },
            _ => {
                return Err(FluidError::InvalidArg {
                    what: "the two properties must be different",
                });
            }
        };
        Ok(pair)
    }

    pub fn properties(&self) -> (Property, Property) {
        use Property::*;
        match self {
            PropertyPair::PT { .. } => (Pressure, Temperature),
            PropertyPair::PH { .. } => (Pressure, Enthalpy),
            PropertyPair::PS { .. } => (Pressure, Entropy),
            PropertyPair::PQ { .. } => (Pressure, Quality),
            PropertyPair::TH { .. } => (Temperature, Enthalpy),
            PropertyPair::TS { .. } => (Temperature, Entropy),
            PropertyPair::TQ { .. } => (Temperature, Quality),
            PropertyPair::HS { .. } => (Enthalpy, Entropy),
            PropertyPair::HQ { .. } => (Enthalpy, Quality),
            PropertyPair::SQ { .. } => (Entropy, Quality),
        }
    }
}

/// Phase region of a refrigerant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SubcooledLiquid,
    TwoPhase,
    SuperheatedVapor,
    Supercritical,
    /// Single-phase state within 0.1 K of saturation.
    Saturated,
}

impl Phase {
    /// Band around the saturation temperature treated as saturated [K].
    pub const SATURATION_BAND_K: f64 = 0.1;

    /// Classify from pressure, temperature, quality and the saturation
    /// temperature at that pressure (`None` above the critical pressure).
    pub fn classify(
        p_pa: f64,
        t_k: f64,
        quality: Option<Quality>,
        p_crit_pa: f64,
        t_sat_k: Option<f64>,
    ) -> Self {
        if matches!(quality, Some(x) if (0.0..=1.0).contains(&x)) {
            return Phase::TwoPhase;
        }
        if p_pa > p_crit_pa {
            return Phase::Supercritical;
        }
        match t_sat_k {
            Some(t_sat) if t_k < t_sat - Self::SATURATION_BAND_K => Phase::SubcooledLiquid,
            Some(t_sat) if t_k > t_sat + Self::SATURATION_BAND_K => Phase::SuperheatedVapor,
            Some(_) => Phase::Saturated,
            None => Phase::Supercritical,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Phase::SubcooledLiquid => "subcooled_liquid",
            Phase::TwoPhase => "two_phase",
            Phase::SuperheatedVapor => "superheated_vapor",
            Phase::Supercritical => "supercritical",
            Phase::Saturated => "saturated",
        }
    }
}

/// Fully resolved refrigerant state.
///
/// Immutable once built by a property oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    fluid: Refrigerant,
    p: Pressure,
    t: Temperature,
    h: SpecEnthalpy,
    s: SpecEntropy,
    rho: Density,
    quality: Option<Quality>,
    phase: Phase,
}

impl ThermoState {
    /// Assemble a state, validating that every property is physical.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fluid: Refrigerant,
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        rho: Density,
        quality: Option<Quality>,
        phase: Phase,
    ) -> FluidResult<Self> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !h.is_finite() || !s.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "enthalpy and entropy must be finite",
            });
        }
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        if let Some(x) = quality
            && !(0.0..=1.0).contains(&x)
        {
            return Err(FluidError::NonPhysical {
                what: "quality must lie in [0, 1]",
            });
        }

        Ok(Self {
            fluid,
            p,
            t,
            h,
            s,
            rho,
            quality,
            phase,
        })
    }

    pub fn fluid(&self) -> Refrigerant {
        self.fluid
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }

    pub fn temperature_c(&self) -> f64 {
        to_celsius(self.t)
    }

    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.h
    }

    pub fn entropy(&self) -> SpecEntropy {
        self.s
    }

    pub fn density(&self) -> Density {
        self.rho
    }

    /// Vapor quality, defined only inside the two-phase dome.
    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
