// tp-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Power as UomPower, Pressure as UomPressure, Ratio as UomRatio,
    TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Absolute temperature from a Celsius reading.
#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Celsius reading of an absolute temperature.
#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn megawatts(v: f64) -> Power {
    use uom::si::power::megawatt;
    Power::new::<megawatt>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub fn celsius_to_fahrenheit(t_c: f64) -> f64 {
    t_c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(t_f: f64) -> f64 {
    (t_f - 32.0) * 5.0 / 9.0
}

/// Cooling duty in refrigeration tons (1 ton = 3.517 kW).
pub fn mw_to_tons(power_mw: f64) -> f64 {
    power_mw * 1000.0 / constants::TON_REFRIGERATION_KW
}

pub fn tons_to_mw(tons: f64) -> f64 {
    tons * constants::TON_REFRIGERATION_KW / 1000.0
}

pub mod constants {
    use super::*;

    /// Liquid water specific heat [J/(kg·K)].
    pub const CP_WATER: f64 = 4186.0;
    /// Dry air specific heat near 20 °C [J/(kg·K)].
    pub const CP_AIR: f64 = 1005.0;
    /// Latent heat of vaporization of water near 30 °C [J/kg].
    pub const H_FG_WATER: f64 = 2.26e6;
    pub const P_ATM_PA: f64 = 101_325.0;
    pub const ZERO_CELSIUS_K: f64 = 273.15;
    pub const TON_REFRIGERATION_KW: f64 = 3.517;
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    pub const HOURS_PER_YEAR: f64 = 8760.0;

    #[inline]
    pub fn p_atm() -> Pressure {
        pa(P_ATM_PA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _q = megawatts(1.0);
        let _rho = kg_per_m3(1.2);
        let _r = unitless(0.5);
        assert_relative_eq!(kpa(101.325).value, constants::p_atm().value);
        assert_relative_eq!(watts(1.0e6).value, megawatts(1.0).value);
    }

    #[test]
    fn celsius_maps_to_kelvin() {
        assert_relative_eq!(celsius(25.0).value, 298.15, epsilon = 1e-9);
        assert_relative_eq!(to_celsius(k(273.15)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn engineering_conversions() {
        assert_relative_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_relative_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert_relative_eq!(mw_to_tons(3.517), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(tons_to_mw(mw_to_tons(42.0)), 42.0, epsilon = 1e-9);
    }
}
