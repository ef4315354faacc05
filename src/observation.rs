use crate::prelude::{Epoch, Error, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Observable [Code]: frequency band and tracking attribute,
/// following RINEX conventions (for example `1C`, `2W`, `5Q`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Code {
    /// Frequency band number (1..=9)
    pub band: u8,
    /// Tracking attribute (C, P, W, I, Q, X..)
    pub attribute: char,
}

impl Code {
    /// Builds a new [Code] from band number and tracking attribute
    pub const fn new(band: u8, attribute: char) -> Self {
        Self { band, attribute }
    }

    /// True if this [Code] matches both band and attribute
    pub(crate) fn is(&self, band: u8, attribute: char) -> bool {
        self.band == band && self.attribute == attribute
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.band, self.attribute)
    }
}

impl std::str::FromStr for Code {
    type Err = Error;
    /// Parses a [Code] from either "1C" or the complete
    /// RINEX observable descriptor ("C1C", "L1C", "D1C", "S1C").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_uppercase().chars().collect::<Vec<_>>();
        let descriptor = match trimmed.len() {
            2 => &trimmed[..],
            3 => &trimmed[1..],
            _ => return Err(Error::InvalidObservableCode(s.to_string())),
        };

        let mut chars = descriptor.iter().copied();

        let band = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .filter(|b| *b > 0)
            .ok_or(Error::InvalidObservableCode(s.to_string()))?;

        let attribute = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or(Error::InvalidObservableCode(s.to_string()))?;

        Ok(Self::new(band as u8, attribute))
    }
}

/// Signal sampled on one frequency.
/// Null values mean "not available".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signal {
    /// Tracked [Code]
    pub code: Code,
    /// Code pseudo range (m)
    pub pseudo_range_m: f64,
    /// Carrier phase (cycles)
    pub phase_cycles: f64,
    /// Doppler shift (Hz)
    pub doppler_hz: f64,
    /// Signal to noise ratio (dB.Hz)
    pub snr_dbhz: f64,
}

impl Signal {
    /// Builds a [Signal] from a pseudo range (m) observation
    pub fn pseudo_range(code: Code, pseudo_range_m: f64) -> Self {
        Self {
            code,
            pseudo_range_m,
            ..Default::default()
        }
    }

    /// Copies and returns [Signal] with updated Doppler (Hz)
    pub fn with_doppler(mut self, doppler_hz: f64) -> Self {
        self.doppler_hz = doppler_hz;
        self
    }

    /// Copies and returns [Signal] with updated carrier phase (cycles)
    pub fn with_phase(mut self, phase_cycles: f64) -> Self {
        self.phase_cycles = phase_cycles;
        self
    }

    /// Copies and returns [Signal] with updated SNR (dB.Hz)
    pub fn with_snr(mut self, snr_dbhz: f64) -> Self {
        self.snr_dbhz = snr_dbhz;
        self
    }
}

/// [Observation] of one satellite at one epoch.
/// The primary [Signal] is the one used in single frequency navigation,
/// the secondary [Signal] is only used by the ionosphere free combination.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Observed satellite
    pub sv: SV,
    /// Primary [Signal]
    pub primary: Signal,
    /// Secondary [Signal]
    pub secondary: Option<Signal>,
}

impl Observation {
    /// Builds a single frequency [Observation]
    pub fn new(epoch: Epoch, sv: SV, primary: Signal) -> Self {
        Self {
            epoch,
            sv,
            primary,
            secondary: None,
        }
    }

    /// Copies and returns [Observation] with secondary [Signal]
    pub fn with_secondary(mut self, secondary: Signal) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Secondary pseudo range, null when not available
    pub(crate) fn secondary_pseudo_range_m(&self) -> f64 {
        self.secondary
            .map(|signal| signal.pseudo_range_m)
            .unwrap_or_default()
    }

    /// Secondary SNR, null when not available
    pub(crate) fn secondary_snr_dbhz(&self) -> f64 {
        self.secondary
            .map(|signal| signal.snr_dbhz)
            .unwrap_or_default()
    }
}
