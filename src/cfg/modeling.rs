use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ionospheric delay compensation strategy
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IonosphereOption {
    /// Not compensated. Delay is left in the measurements
    /// and the measurement variance is increased accordingly (5m std).
    Off,
    /// Broadcast Klobuchar model
    #[default]
    Broadcast,
    /// SBAS ionosphere grid (falls back to broadcast model)
    Sbas,
    /// IONEX total electron content maps (falls back to broadcast model)
    Ionex,
    /// QZSS broadcast Klobuchar model (falls back to GPS coefficients)
    Qzss,
    /// Dual frequency ionosphere free pseudo range combination
    IonosphereFree,
    /// Delay is estimated by a downstream process, passes through uncorrected.
    Estimated,
}

impl IonosphereOption {
    /// True when the ionosphere free combination is formed
    pub fn is_ionosphere_free(&self) -> bool {
        matches!(self, Self::IonosphereFree)
    }
}

impl std::fmt::Display for IonosphereOption {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Broadcast => write!(f, "broadcast"),
            Self::Sbas => write!(f, "sbas"),
            Self::Ionex => write!(f, "ionex"),
            Self::Qzss => write!(f, "qzss"),
            Self::IonosphereFree => write!(f, "iono-free"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

impl std::str::FromStr for IonosphereOption {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "off" | "none" => Ok(Self::Off),
            "broadcast" | "brdc" | "klobuchar" => Ok(Self::Broadcast),
            "sbas" => Ok(Self::Sbas),
            "ionex" | "tec" => Ok(Self::Ionex),
            "qzss" | "qzs" => Ok(Self::Qzss),
            "iono-free" | "if" | "iflc" | "dual-freq" => Ok(Self::IonosphereFree),
            "estimated" | "est" => Ok(Self::Estimated),
            _ => Err(Error::UnknownIonosphereOption(c)),
        }
    }
}

/// Tropospheric delay compensation strategy
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TroposphereOption {
    /// Not compensated: measurement variance is increased (3m std).
    Off,
    /// Saastamoinen model with standard atmosphere
    #[default]
    Saastamoinen,
    /// SBAS troposphere model
    Sbas,
    /// Delay is estimated by a downstream process. The single point
    /// solution still relies on the Saastamoinen model.
    Estimated,
}

impl std::fmt::Display for TroposphereOption {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Saastamoinen => write!(f, "saastamoinen"),
            Self::Sbas => write!(f, "sbas"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

impl std::str::FromStr for TroposphereOption {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "off" | "none" => Ok(Self::Off),
            "saastamoinen" | "saas" => Ok(Self::Saastamoinen),
            "sbas" => Ok(Self::Sbas),
            "estimated" | "est" => Ok(Self::Estimated),
            _ => Err(Error::UnknownTroposphereOption(c)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{IonosphereOption, TroposphereOption};
    use std::str::FromStr;

    #[test]
    fn atmosphere_options_parsing() {
        for option in [
            IonosphereOption::Off,
            IonosphereOption::Broadcast,
            IonosphereOption::Sbas,
            IonosphereOption::Ionex,
            IonosphereOption::Qzss,
            IonosphereOption::IonosphereFree,
            IonosphereOption::Estimated,
        ] {
            let parsed = IonosphereOption::from_str(&option.to_string()).unwrap();
            assert_eq!(parsed, option);
        }

        assert_eq!(
            TroposphereOption::from_str(" SAAS ").unwrap(),
            TroposphereOption::Saastamoinen
        );
        assert!(TroposphereOption::from_str("niell").is_err());
        assert!(IonosphereOption::from_str("nequick").is_err());
    }
}
