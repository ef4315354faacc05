#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Constellation, Error, SV};

mod method;
mod modeling;

pub use method::Method;
pub use modeling::{IonosphereOption, TroposphereOption};

/// Source of the satellite states. Mostly informative to the [Solver],
/// which only uses it to qualify its solutions, and forwarded to your
/// [EphemerisSource] implementation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EphemerisSelection {
    /// Broadcast ephemeris
    #[default]
    Broadcast,
    /// Precise orbit and clock products
    Precise,
    /// Broadcast ephemeris with SBAS corrections
    Sbas,
    /// Broadcast ephemeris with SSR corrections, antenna phase center referenced
    SsrApc,
    /// Broadcast ephemeris with SSR corrections, center of mass referenced
    SsrCom,
}

impl std::fmt::Display for EphemerisSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Broadcast => write!(f, "broadcast"),
            Self::Precise => write!(f, "precise"),
            Self::Sbas => write!(f, "sbas"),
            Self::SsrApc => write!(f, "ssr-apc"),
            Self::SsrCom => write!(f, "ssr-com"),
        }
    }
}

impl std::str::FromStr for EphemerisSelection {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "broadcast" | "brdc" => Ok(Self::Broadcast),
            "precise" => Ok(Self::Precise),
            "sbas" | "brdc+sbas" => Ok(Self::Sbas),
            "ssr-apc" | "brdc+ssrapc" => Ok(Self::SsrApc),
            "ssr-com" | "brdc+ssrcom" => Ok(Self::SsrCom),
            _ => Err(Error::UnknownEphemerisSelection(c)),
        }
    }
}

/// Measurement error model: standard deviation of the code
/// and Doppler observations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasurementErrors {
    /// Code to phase error ratio
    #[cfg_attr(feature = "serde", serde(default = "default_code_phase_ratio"))]
    pub code_phase_ratio: f64,

    /// Phase error, constant term (m)
    #[cfg_attr(feature = "serde", serde(default = "default_phase_error_m"))]
    pub base_m: f64,

    /// Phase error, elevation dependent term (m)
    #[cfg_attr(feature = "serde", serde(default = "default_phase_error_m"))]
    pub elevation_m: f64,

    /// Doppler error (Hz)
    #[cfg_attr(feature = "serde", serde(default = "default_doppler_error_hz"))]
    pub doppler_hz: f64,
}

const fn default_code_phase_ratio() -> f64 {
    100.0
}

const fn default_phase_error_m() -> f64 {
    0.003
}

const fn default_doppler_error_hz() -> f64 {
    1.0
}

impl Default for MeasurementErrors {
    fn default() -> Self {
        Self {
            code_phase_ratio: default_code_phase_ratio(),
            base_m: default_phase_error_m(),
            elevation_m: default_phase_error_m(),
            doppler_hz: default_doppler_error_hz(),
        }
    }
}

/// Elevation dependent SNR mask. Thresholds are defined for
/// elevation bins centered on 5°, 15°, .. 85° and linearly interpolated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnrMask {
    /// Enables this mask
    #[cfg_attr(feature = "serde", serde(default))]
    pub enabled: bool,

    /// SNR thresholds (dB.Hz), for the primary and secondary signal
    #[cfg_attr(feature = "serde", serde(default))]
    pub thresholds_dbhz: [[f64; 9]; 2],
}

impl SnrMask {
    /// Builds an enabled [SnrMask] with the same
    /// threshold at all elevations, on both signals.
    pub fn uniform(threshold_dbhz: f64) -> Self {
        Self {
            enabled: true,
            thresholds_dbhz: [[threshold_dbhz; 9]; 2],
        }
    }

    /// True when this measurement should be discarded.
    /// `signal` is 0 for the primary signal, 1 for the secondary.
    pub(crate) fn rejects(&self, signal: usize, elevation_rad: f64, snr_dbhz: f64) -> bool {
        if !self.enabled || signal > 1 {
            return false;
        }

        let mask = &self.thresholds_dbhz[signal];

        let mut a = (elevation_rad.to_degrees() + 5.0) / 10.0;
        let i = a.floor();
        a -= i;

        let min_snr = if i < 1.0 {
            mask[0]
        } else if i > 8.0 {
            mask[8]
        } else {
            let i = i as usize;
            (1.0 - a) * mask[i - 1] + a * mask[i]
        };

        snr_dbhz < min_snr
    }
}

fn default_elevation_mask_rad() -> f64 {
    15.0_f64.to_radians()
}

const fn default_max_gdop() -> f64 {
    30.0
}

fn default_constellations() -> Vec<Constellation> {
    vec![
        Constellation::GPS,
        Constellation::Glonass,
        Constellation::Galileo,
        Constellation::BeiDou,
        Constellation::QZSS,
        Constellation::IRNSS,
        Constellation::SBAS,
    ]
}

/// [Solver] configuration, immutable during a resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Navigation [Method]
    #[cfg_attr(feature = "serde", serde(default))]
    pub method: Method,

    /// Satellites below this elevation (rad) are not used
    #[cfg_attr(feature = "serde", serde(default = "default_elevation_mask_rad"))]
    pub elevation_mask_rad: f64,

    /// Ionosphere compensation
    #[cfg_attr(feature = "serde", serde(default))]
    pub ionosphere: IonosphereOption,

    /// Troposphere compensation
    #[cfg_attr(feature = "serde", serde(default))]
    pub troposphere: TroposphereOption,

    /// Measurement error model
    #[cfg_attr(feature = "serde", serde(default))]
    pub errors: MeasurementErrors,

    /// Satellite state source
    #[cfg_attr(feature = "serde", serde(default))]
    pub ephemeris: EphemerisSelection,

    /// Galileo satellite states come from F/NAV messages (I/NAV otherwise).
    /// This selects the broadcast group delay that applies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub galileo_fnav: bool,

    /// Enables RAIM fault detection and exclusion
    #[cfg_attr(feature = "serde", serde(default))]
    pub raim: bool,

    /// Solutions with larger GDOP are rejected
    #[cfg_attr(feature = "serde", serde(default = "default_max_gdop"))]
    pub max_gdop: f64,

    /// SNR mask
    #[cfg_attr(feature = "serde", serde(default))]
    pub snr_mask: SnrMask,

    /// Constellations that may contribute.
    /// [Constellation::SBAS] selects all augmentation systems.
    #[cfg_attr(feature = "serde", serde(default = "default_constellations"))]
    pub constellations: Vec<Constellation>,

    /// Satellites that never contribute
    #[cfg_attr(feature = "serde", serde(default))]
    pub excluded: Vec<SV>,

    /// Satellites that contribute whatever their constellation selection
    #[cfg_attr(feature = "serde", serde(default))]
    pub included: Vec<SV>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: Method::default(),
            elevation_mask_rad: default_elevation_mask_rad(),
            ionosphere: IonosphereOption::default(),
            troposphere: TroposphereOption::default(),
            errors: MeasurementErrors::default(),
            ephemeris: EphemerisSelection::default(),
            galileo_fnav: false,
            raim: false,
            max_gdop: default_max_gdop(),
            snr_mask: SnrMask::default(),
            constellations: default_constellations(),
            excluded: Vec::new(),
            included: Vec::new(),
        }
    }
}

impl Config {
    /// Returns [Config] with updated navigation [Method]
    pub fn with_navigation_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Returns [Config] with updated elevation mask (degrees)
    pub fn with_elevation_mask_deg(mut self, mask_deg: f64) -> Self {
        self.elevation_mask_rad = mask_deg.to_radians();
        self
    }

    /// Returns [Config] with updated [IonosphereOption]
    pub fn with_ionosphere(mut self, option: IonosphereOption) -> Self {
        self.ionosphere = option;
        self
    }

    /// Returns [Config] with updated [TroposphereOption]
    pub fn with_troposphere(mut self, option: TroposphereOption) -> Self {
        self.troposphere = option;
        self
    }

    /// Returns [Config] with RAIM enabled or disabled
    pub fn with_raim(mut self, enabled: bool) -> Self {
        self.raim = enabled;
        self
    }

    /// Returns [Config] with updated maximal GDOP
    pub fn with_max_gdop(mut self, max_gdop: f64) -> Self {
        self.max_gdop = max_gdop;
        self
    }

    /// Returns [Config] with updated [SnrMask]
    pub fn with_snr_mask(mut self, mask: SnrMask) -> Self {
        self.snr_mask = mask;
        self
    }

    /// Returns [Config] with updated [EphemerisSelection]
    pub fn with_ephemeris(mut self, selection: EphemerisSelection) -> Self {
        self.ephemeris = selection;
        self
    }

    /// Returns [Config] where this satellite is excluded
    pub fn with_excluded_sv(mut self, sv: SV) -> Self {
        self.excluded.push(sv);
        self
    }

    /// Ionosphere option actually applied with current [Method]
    pub(crate) fn effective_ionosphere(&self) -> IonosphereOption {
        match self.method {
            Method::SPP => self.ionosphere,
            Method::Precise => IonosphereOption::Broadcast,
        }
    }

    /// Troposphere option actually applied with current [Method]
    pub(crate) fn effective_troposphere(&self) -> TroposphereOption {
        match self.method {
            Method::SPP => self.troposphere,
            Method::Precise => TroposphereOption::Saastamoinen,
        }
    }

    /// True when the ionosphere free combination is formed
    pub(crate) fn ionosphere_free(&self) -> bool {
        self.effective_ionosphere().is_ionosphere_free()
    }

    /// True if this [Constellation] was selected
    pub(crate) fn selects(&self, constellation: Constellation) -> bool {
        self.constellations.iter().any(|selected| {
            *selected == constellation || (*selected == Constellation::SBAS && constellation.is_sbas())
        })
    }
}

#[cfg(doc)]
use crate::prelude::{EphemerisSource, Solver};
