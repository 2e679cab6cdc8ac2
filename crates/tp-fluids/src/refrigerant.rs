//! Refrigerant identities.

use std::fmt;

/// Working fluids a chiller can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Refrigerant {
    /// 1,1,1,2-Tetrafluoroethane, the large-chiller default
    R134a,
    /// Difluoromethane
    R32,
    /// Pentafluoroethane
    R125,
    /// 1,1-Difluoroethane
    R152a,
    /// 1,1,1,3,3-Pentafluoropropane (low-pressure centrifugal machines)
    R245fa,
    /// 2,3,3,3-Tetrafluoropropene
    R1234yf,
    /// Ammonia (R717)
    Ammonia,
    /// Propane (R290)
    Propane,
    /// Isobutane (R600a)
    Isobutane,
    /// Carbon dioxide (R744)
    CarbonDioxide,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 10] = [
        Refrigerant::R134a,
        Refrigerant::R32,
        Refrigerant::R125,
        Refrigerant::R152a,
        Refrigerant::R245fa,
        Refrigerant::R1234yf,
        Refrigerant::Ammonia,
        Refrigerant::Propane,
        Refrigerant::Isobutane,
        Refrigerant::CarbonDioxide,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R125 => "R125",
            Refrigerant::R152a => "R152a",
            Refrigerant::R245fa => "R245fa",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::Ammonia => "R717",
            Refrigerant::Propane => "R290",
            Refrigerant::Isobutane => "R600a",
            Refrigerant::CarbonDioxide => "R744",
        }
    }

    /// Get CoolProp fluid name.
    pub fn coolprop_name(&self) -> &'static str {
        match self {
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R125 => "R125",
            Refrigerant::R152a => "R152a",
            Refrigerant::R245fa => "R245fa",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::Ammonia => "Ammonia",
            Refrigerant::Propane => "n-Propane",
            Refrigerant::Isobutane => "Isobutane",
            Refrigerant::CarbonDioxide => "CarbonDioxide",
        }
    }

    /// Map to rfluids Pure enum (internal use for the CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Refrigerant::R134a => Pure::R134a,
            Refrigerant::R32 => Pure::R32,
            Refrigerant::R125 => Pure::R125,
            Refrigerant::R152a => Pure::R152a,
            Refrigerant::R245fa => Pure::R245fa,
            Refrigerant::R1234yf => Pure::R1234yf,
            Refrigerant::Ammonia => Pure::Ammonia,
            Refrigerant::Propane => Pure::nPropane,
            Refrigerant::Isobutane => Pure::Isobutane,
            Refrigerant::CarbonDioxide => Pure::CarbonDioxide,
        }
    }
}

impl fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Refrigerant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "").as_str() {
            "R134A" | "HFC134A" => Ok(Refrigerant::R134a),
            "R32" => Ok(Refrigerant::R32),
            "R125" => Ok(Refrigerant::R125),
            "R152A" => Ok(Refrigerant::R152a),
            "R245FA" => Ok(Refrigerant::R245fa),
            "R1234YF" => Ok(Refrigerant::R1234yf),
            "R717" | "NH3" | "AMMONIA" => Ok(Refrigerant::Ammonia),
            "R290" | "PROPANE" | "NPROPANE" => Ok(Refrigerant::Propane),
            "R600A" | "ISOBUTANE" => Ok(Refrigerant::Isobutane),
            "R744" | "CO2" | "CARBONDIOXIDE" => Ok(Refrigerant::CarbonDioxide),
            _ => Err("unknown refrigerant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back() {
        for fluid in Refrigerant::ALL {
            assert_eq!(fluid.key().parse::<Refrigerant>(), Ok(fluid));
        }
    }

    #[test]
    fn aliases() {
        assert_eq!("r-134a".parse::<Refrigerant>(), Ok(Refrigerant::R134a));
        assert_eq!("NH3".parse::<Refrigerant>(), Ok(Refrigerant::Ammonia));
        assert!("R22".parse::<Refrigerant>().is_err());
    }
}
