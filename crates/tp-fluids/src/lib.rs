//! tp-fluids: refrigerant and humid-air properties for thermoplant.
//!
//! Provides:
//! - Refrigerant identities and the immutable [`ThermoState`]
//! - [`PropertyPair`] inputs (exactly two independent properties)
//! - The [`RefrigerantOracle`] capability with three backends:
//!   CoolProp (through `rfluids`), a built-in R134a correlation, and an
//!   unavailable backend that fails every query
//! - The [`HumidAirOracle`] capability with ASHRAE psychrometrics or
//!   CoolProp humid air
//!
//! # Example
//!
//! ```no_run
//! use tp_fluids::{PropertyBackend, PropertyPair, Refrigerant, build_oracle};
//! use tp_core::units::celsius;
//!
//! let oracle = build_oracle(PropertyBackend::CoolProp);
//! let p = oracle.saturation_pressure(Refrigerant::R134a, celsius(5.0)).unwrap();
//! let vapor = oracle
//!     .state(Refrigerant::R134a, PropertyPair::PT { p, t: celsius(10.0) })
//!     .unwrap();
//! println!("h = {:.1} kJ/kg", vapor.enthalpy() / 1000.0);
//! ```

pub mod coolprop;
pub mod coolprop_air;
pub mod correlation;
pub mod error;
pub mod oracle;
pub mod psychro;
pub mod refrigerant;
pub mod state;
pub mod unavailable;

pub use coolprop::CoolPropOracle;
pub use coolprop_air::CoolPropHumidAir;
pub use correlation::R134aCorrelation;
pub use error::{FluidError, FluidResult};
pub use oracle::{PropertyBackend, RefrigerantOracle, build_oracle};
pub use psychro::{
    AirBackend, AshraePsychrometrics, HumidAirInput, HumidAirOracle, HumidAirState,
    build_air_oracle,
};
pub use refrigerant::Refrigerant;
pub use state::{Phase, Property, PropertyPair, Quality, SpecEnthalpy, SpecEntropy, ThermoState};
pub use unavailable::UnavailableOracle;
