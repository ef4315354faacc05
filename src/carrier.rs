use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    observation::Code,
    prelude::Constellation,
    system::System,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS/QZSS/SBAS) same frequency as E1 and B1aB1c
    #[default]
    L1,
    /// L2 (GPS/QZSS)
    L2,
    /// L5 (GPS/QZSS/SBAS/IRNSS) same frequency as E5A and B2A
    L5,
    /// L6 (QZSS) same frequency as E6
    L6,
    /// S (IRNSS)
    S,
    /// E1 (Galileo)
    E1,
    /// E5 (Galileo) same frequency as B2
    E5,
    /// E5A (Galileo) same frequency as L5
    E5A,
    /// E5B (Galileo) same frequency as B2iB2b
    E5B,
    /// E6 (Galileo) same frequency as L6
    E6,
    /// B1aB1c (BDS) same frequency as L1
    B1aB1c,
    /// B1I (BDS)
    B1I,
    /// B2I/B2B (BDS) same frequency as E5b
    B2iB2b,
    /// B2 (BDS) same frequency as E5
    B2,
    /// B2A (BDS) same frequency as L5 and E5A
    B2A,
    /// B3 (BDS)
    B3,
    /// G1 (Glonass FDMA) for given frequency channel
    G1(i8),
    /// G2 (Glonass FDMA) for given frequency channel
    G2(i8),
    /// G1a (Glonass CDMA)
    G1a,
    /// G2a (Glonass CDMA)
    G2a,
    /// G3 (Glonass CDMA)
    G3,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::L6 => write!(f, "L6"),
            Self::S => write!(f, "S"),
            Self::E1 => write!(f, "E1"),
            Self::E5 => write!(f, "E5"),
            Self::E5A => write!(f, "E5A"),
            Self::E5B => write!(f, "E5B"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B1aB1c => write!(f, "B1A/B1C"),
            Self::B2iB2b => write!(f, "B2I/B2B"),
            Self::B2 => write!(f, "B2"),
            Self::B3 => write!(f, "B3"),
            Self::B2A => write!(f, "B2A"),
            Self::G1(k) => write!(f, "G1({})", k),
            Self::G2(k) => write!(f, "G2({})", k),
            Self::G1a => write!(f, "G1a"),
            Self::G2a => write!(f, "G2a"),
            Self::G3 => write!(f, "G3"),
        }
    }
}

impl Carrier {
    /// Glonass G1 base frequency (Hz)
    pub(crate) const G1_BASE_HZ: f64 = 1602.0E6;
    /// Glonass G1 channel spacing (Hz)
    pub(crate) const G1_STEP_HZ: f64 = 0.5625E6;
    /// Glonass G2 base frequency (Hz)
    pub(crate) const G2_BASE_HZ: f64 = 1246.0E6;
    /// Glonass G2 channel spacing (Hz)
    pub(crate) const G2_STEP_HZ: f64 = 0.4375E6;

    /// Carrier frequency (Hz)
    pub fn frequency(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 | Self::B1aB1c => 1575.42E6_f64,
            Self::L2 => 1227.60E6_f64,
            Self::L5 | Self::E5A | Self::B2A => 1176.45E6_f64,
            Self::E5 | Self::B2 => 1191.795E6_f64,
            Self::L6 | Self::E6 => 1278.750E6_f64,
            Self::S => 2492.028E6_f64,
            Self::B3 => 1268.52E6_f64,
            Self::E5B | Self::B2iB2b => 1207.14E6_f64,
            Self::B1I => 1561.098E6_f64,
            Self::G1(k) => Self::G1_BASE_HZ + Self::G1_STEP_HZ * *k as f64,
            Self::G2(k) => Self::G2_BASE_HZ + Self::G2_STEP_HZ * *k as f64,
            Self::G1a => 1600.995E6_f64,
            Self::G2a => 1248.06E6_f64,
            Self::G3 => 1202.025E6_f64,
        }
    }

    /// Carrier wavelength (m)
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }

    /// Identifies the [Carrier] a [Code] was tracked on, for this [Constellation].
    /// Glonass FDMA signals require the satellite frequency channel.
    pub fn from_code(
        constellation: Constellation,
        code: Code,
        glonass_channel: Option<i8>,
    ) -> Option<Self> {
        match (System::from_constellation(constellation)?, code.band) {
            (System::GPS, 1) | (System::QZSS, 1) | (System::SBAS, 1) => Some(Self::L1),
            (System::GPS, 2) | (System::QZSS, 2) => Some(Self::L2),
            (System::GPS, 5) | (System::QZSS, 5) | (System::SBAS, 5) => Some(Self::L5),
            (System::QZSS, 6) => Some(Self::L6),
            (System::Galileo, 1) => Some(Self::E1),
            (System::Galileo, 5) => Some(Self::E5A),
            (System::Galileo, 6) => Some(Self::E6),
            (System::Galileo, 7) => Some(Self::E5B),
            (System::Galileo, 8) => Some(Self::E5),
            (System::BeiDou, 1) => Some(Self::B1aB1c),
            (System::BeiDou, 2) => Some(Self::B1I),
            (System::BeiDou, 5) => Some(Self::B2A),
            (System::BeiDou, 6) => Some(Self::B3),
            (System::BeiDou, 7) => Some(Self::B2iB2b),
            (System::BeiDou, 8) => Some(Self::B2),
            (System::Glonass, 1) => glonass_channel.map(Self::G1),
            (System::Glonass, 2) => glonass_channel.map(Self::G2),
            (System::Glonass, 3) => Some(Self::G3),
            (System::Glonass, 4) => Some(Self::G1a),
            (System::Glonass, 6) => Some(Self::G2a),
            (System::IRNSS, 5) => Some(Self::L5),
            (System::IRNSS, 9) => Some(Self::S),
            _ => None,
        }
    }
}
