use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::prelude::{IonosphereOption, TroposphereOption};

/// Navigation method the single point solution is computed for.
#[allow(non_camel_case_types)]
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// Single Point Positioning is a code based navigation technique.
    /// The atmosphere is compensated as defined by [IonosphereOption]
    /// and [TroposphereOption].
    #[default]
    SPP,

    /// The single point solution is the front-end of a precise
    /// navigation process. Atmosphere options are overridden
    /// by [IonosphereOption::Broadcast] and [TroposphereOption::Saastamoinen].
    Precise,
}

impl std::fmt::Display for Method {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SPP => write!(fmt, "SPP"),
            Self::Precise => write!(fmt, "Precise"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spp" | "single" => Ok(Self::SPP),
            "precise" => Ok(Self::Precise),
            _ => Err(Error::UnknownNavigationMethod),
        }
    }
}
