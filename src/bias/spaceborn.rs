use crate::prelude::{Duration, Epoch, SV};

#[cfg(doc)]
use crate::prelude::{Config, IonosphereOption};

/// Broadcast group delays, as identified in the navigation messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GroupDelay {
    /// GPS, QZSS and IRNSS total group delay (TGD)
    Tgd,
    /// Galileo E1-E5a broadcast group delay (F/NAV)
    BgdE5aE1,
    /// Galileo E1-E5b broadcast group delay (I/NAV)
    BgdE5bE1,
    /// BeiDou B1I group delay (TGD1)
    TgdB1I,
    /// BeiDou B2I group delay (TGD2)
    TgdB2I,
    /// BeiDou B1C pilot group delay
    TgdB1Cp,
    /// BeiDou B1C data inter signal correction
    IscB1Cd,
    /// Glonass time difference between G2 and G1 transmission (Δτn)
    GlonassDtauN,
}

/// Differential code biases between P and C/A codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CodeBias {
    /// P1-C1 code bias
    P1C1,
    /// P2-C2 code bias
    P2C2,
}

/// [SpacebornBias] must be implemented to provide the on-board
/// biases from your navigation database.
pub trait SpacebornBias {
    /// Provide the requested [GroupDelay] for this satellite.
    /// If this is not known, simply return [Duration::ZERO], but
    /// it will reflect on the accuracy of your single frequency solutions.
    fn group_delay(&self, t: Epoch, sv: SV, delay: GroupDelay) -> Duration;

    /// Provide the differential [CodeBias] (m) for this satellite.
    /// Only used when pseudo ranges were sampled on C/A codes.
    /// Default implementation returns 0.
    fn code_bias_m(&self, _t: Epoch, _sv: SV, _bias: CodeBias) -> f64 {
        0.0
    }

    /// Provide the frequency channel of this Glonass satellite.
    /// Glonass FDMA signals cannot contribute without it.
    /// Default implementation returns None.
    fn glonass_channel(&self, _sv: SV) -> Option<i8> {
        None
    }
}
