//! Supported navigation systems and their clock state
use crate::prelude::Constellation;

/// Navigation systems the solver knows how to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum System {
    GPS,
    Glonass,
    Galileo,
    BeiDou,
    QZSS,
    IRNSS,
    SBAS,
}

impl System {
    /// Classifies a [Constellation], None when not supported.
    pub fn from_constellation(constellation: Constellation) -> Option<Self> {
        match constellation {
            Constellation::GPS => Some(Self::GPS),
            Constellation::Glonass => Some(Self::Glonass),
            Constellation::Galileo => Some(Self::Galileo),
            Constellation::BeiDou => Some(Self::BeiDou),
            Constellation::QZSS => Some(Self::QZSS),
            Constellation::IRNSS => Some(Self::IRNSS),
            c if c.is_sbas() => Some(Self::SBAS),
            _ => None,
        }
    }

    /// Inter system offset this system is affected by,
    /// None when it shares the reference clock.
    pub fn clock_offset(&self) -> Option<ClockOffset> {
        match self {
            Self::Glonass => Some(ClockOffset::Glonass),
            Self::Galileo => Some(ClockOffset::Galileo),
            Self::BeiDou => Some(ClockOffset::BeiDou),
            Self::IRNSS => Some(ClockOffset::IRNSS),
            Self::GPS | Self::QZSS | Self::SBAS => None,
        }
    }

    /// Pseudo range error factor
    pub fn error_factor(&self) -> f64 {
        match self {
            Self::Glonass => 1.5,
            Self::SBAS => 3.0,
            _ => 1.0,
        }
    }
}

/// Inter system time offset, estimated relative to the GPS reference clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ClockOffset {
    Glonass,
    Galileo,
    BeiDou,
    IRNSS,
}

impl ClockOffset {
    /// All offsets, in state vector order
    pub const ALL: [Self; 4] = [Self::Glonass, Self::Galileo, Self::BeiDou, Self::IRNSS];

    /// Column of the state vector (and design matrix) for this offset
    pub fn column(&self) -> usize {
        match self {
            Self::Glonass => 4,
            Self::Galileo => 5,
            Self::BeiDou => 6,
            Self::IRNSS => 7,
        }
    }

    /// Index in the per system clock bias array of the solution
    /// (the reference clock sits at index 0)
    pub fn clock_index(&self) -> usize {
        self.column() - 3
    }
}

impl std::fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Glonass => write!(f, "GLO"),
            Self::Galileo => write!(f, "GAL"),
            Self::BeiDou => write!(f, "BDS"),
            Self::IRNSS => write!(f, "IRN"),
        }
    }
}

/// Set of inter system offsets observed during one iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SeenSystems([bool; 4]);

impl SeenSystems {
    pub fn insert(&mut self, offset: ClockOffset) {
        self.0[offset.clock_index() - 1] = true;
    }

    /// Offsets that were not observed and need to be constrained
    pub fn unseen(&self) -> impl Iterator<Item = ClockOffset> + '_ {
        ClockOffset::ALL
            .into_iter()
            .filter(|offset| !self.0[offset.clock_index() - 1])
    }
}
